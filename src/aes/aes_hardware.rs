//! Hardware-accelerated round engine (x86_64 AES-NI)
//!
//! Mirrors `aes_core.rs` but drives the CPU's dedicated AES instructions
//! instead of table lookups. Key expansion follows the published expansion
//! patterns for 128/192/256-bit keys; the 192-bit pattern blends adjacent
//! expansion outputs with a double-precision shuffle to line round keys up
//! on 128-bit boundaries, since 192 bits doesn't divide evenly into the
//! 128-bit registers AESKEYGENASSIST produces.
//!
//! # Features
//!
//! - `hardware_available`: runtime feature probe (AES-NI and SSE2).
//! - `forward_schedule` / `inverse_schedule`: AESKEYGENASSIST/AESIMC-based
//!   key expansion, one round-key word sequence in, same shape out as
//!   `aes_schedule`'s portable functions.
//! - `encrypt_block` / `decrypt_block`: AESENC/AESENCLAST and
//!   AESDEC/AESDECLAST round sequences.
//!
//! # Usage
//!
//! Round keys are exchanged with the rest of the crate as plain `u32` words
//! (the same representation `aes_schedule` uses) so the two engines are
//! interchangeable at the `CipherContext` level; this module only converts
//! to and from `__m128i` at its own boundary. `CipherContext::set_key` calls
//! `hardware_available` once to decide whether to bind a key to this engine
//! or to the portable one; the choice is fixed for the context's lifetime.
//!
//! # Disclaimer
//!
//! Every public function here is `unsafe` except `hardware_available`
//! itself: callers must not invoke the others unless `hardware_available`
//! has already returned `true` on the current CPU. `CipherContext` upholds
//! that contract; nothing outside the `aes` module calls into this module
//! directly.

#![cfg(target_arch = "x86_64")]

use super::aes_tables::AES_BLOCK_SIZE;
use std::arch::x86_64::*;

/// Probe whether the running CPU supports the AES-NI and SSE2 instructions
/// this module's engine depends on.
///
/// # Returns
///
/// `true` if both features are present; `false` otherwise, in which case
/// `CipherContext` falls back to the portable engine.
pub(crate) fn hardware_available() -> bool {
    is_x86_feature_detected!("aes") && is_x86_feature_detected!("sse2")
}

unsafe fn load_round_key(schedule: &[u32], round: usize) -> __m128i {
    let mut bytes = [0u8; 16];
    for i in 0..4 {
        bytes[4 * i..4 * i + 4].copy_from_slice(&schedule[round * 4 + i].to_be_bytes());
    }
    _mm_loadu_si128(bytes.as_ptr() as *const __m128i)
}

unsafe fn store_round_key(schedule: &mut [u32], round: usize, v: __m128i) {
    let mut bytes = [0u8; 16];
    _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, v);
    for i in 0..4 {
        schedule[round * 4 + i] = u32::from_be_bytes(bytes[4 * i..4 * i + 4].try_into().unwrap());
    }
}

unsafe fn words_from_m128i(v: __m128i) -> [u32; 4] {
    let mut bytes = [0u8; 16];
    _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, v);
    let mut w = [0u32; 4];
    for i in 0..4 {
        w[i] = u32::from_be_bytes(bytes[4 * i..4 * i + 4].try_into().unwrap());
    }
    w
}

unsafe fn expand_128(key: &[u8]) -> Vec<u32> {
    const RCON: [i32; 10] = [
        0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36,
    ];

    unsafe fn expand_step(key: __m128i, keygened: __m128i) -> __m128i {
        let keygened = _mm_shuffle_epi32(keygened, 0xff);
        let mut key = key;
        key = _mm_xor_si128(key, _mm_slli_si128(key, 4));
        key = _mm_xor_si128(key, _mm_slli_si128(key, 4));
        key = _mm_xor_si128(key, _mm_slli_si128(key, 4));
        _mm_xor_si128(key, keygened)
    }

    let mut rk = [0u32; 4 * 11];
    let mut current = _mm_loadu_si128(key.as_ptr() as *const __m128i);
    store_round_key(&mut rk, 0, current);
    for (round, rcon) in RCON.iter().enumerate() {
        let gen = _mm_aeskeygenassist_si128(current, *rcon);
        current = expand_step(current, gen);
        store_round_key(&mut rk, round + 1, current);
    }
    rk.to_vec()
}

unsafe fn assist_192(temp1: &mut __m128i, temp2: &mut __m128i, temp3: &mut __m128i) {
    *temp2 = _mm_shuffle_epi32(*temp2, 0x55);
    let mut temp4 = _mm_slli_si128(*temp1, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    *temp1 = _mm_xor_si128(*temp1, *temp2);
    *temp2 = _mm_shuffle_epi32(*temp1, 0xff);
    temp4 = _mm_slli_si128(*temp3, 0x4);
    *temp3 = _mm_xor_si128(*temp3, temp4);
    *temp3 = _mm_xor_si128(*temp3, *temp2);
}

unsafe fn expand_192(key: &[u8]) -> Vec<u32> {
    let mut padded = [0u8; 32];
    padded[..24].copy_from_slice(key);

    let mut ks = [_mm_setzero_si128(); 13];
    let mut temp1 = _mm_loadu_si128(padded.as_ptr() as *const __m128i);
    let mut temp3 = _mm_loadu_si128(padded[16..].as_ptr() as *const __m128i);

    ks[0] = temp1;
    ks[1] = temp3;

    let mut temp2 = _mm_aeskeygenassist_si128(temp3, 0x01);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[1] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(ks[1]),
        _mm_castsi128_pd(temp1),
        0,
    ));
    ks[2] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(temp1),
        _mm_castsi128_pd(temp3),
        1,
    ));

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x02);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[3] = temp1;
    ks[4] = temp3;

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x04);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[4] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(ks[4]),
        _mm_castsi128_pd(temp1),
        0,
    ));
    ks[5] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(temp1),
        _mm_castsi128_pd(temp3),
        1,
    ));

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x08);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[6] = temp1;
    ks[7] = temp3;

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x10);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[7] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(ks[7]),
        _mm_castsi128_pd(temp1),
        0,
    ));
    ks[8] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(temp1),
        _mm_castsi128_pd(temp3),
        1,
    ));

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x20);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[9] = temp1;
    ks[10] = temp3;

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x40);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[10] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(ks[10]),
        _mm_castsi128_pd(temp1),
        0,
    ));
    ks[11] = _mm_castpd_si128(_mm_shuffle_pd(
        _mm_castsi128_pd(temp1),
        _mm_castsi128_pd(temp3),
        1,
    ));

    temp2 = _mm_aeskeygenassist_si128(temp3, 0x80);
    assist_192(&mut temp1, &mut temp2, &mut temp3);
    ks[12] = temp1;

    let mut rk = [0u32; 4 * 13];
    for (round, v) in ks.into_iter().enumerate() {
        let w = words_from_m128i(v);
        rk[round * 4..round * 4 + 4].copy_from_slice(&w);
    }
    rk.to_vec()
}

unsafe fn assist_256_1(temp1: &mut __m128i, temp2: &mut __m128i) {
    *temp2 = _mm_shuffle_epi32(*temp2, 0xff);
    let mut temp4 = _mm_slli_si128(*temp1, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp1 = _mm_xor_si128(*temp1, temp4);
    *temp1 = _mm_xor_si128(*temp1, *temp2);
}

unsafe fn assist_256_2(temp1: &__m128i, temp3: &mut __m128i) {
    let temp4 = _mm_aeskeygenassist_si128(*temp1, 0x00);
    let temp2 = _mm_shuffle_epi32(temp4, 0xaa);
    let mut temp4 = _mm_slli_si128(*temp3, 0x4);
    *temp3 = _mm_xor_si128(*temp3, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp3 = _mm_xor_si128(*temp3, temp4);
    temp4 = _mm_slli_si128(temp4, 0x4);
    *temp3 = _mm_xor_si128(*temp3, temp4);
    *temp3 = _mm_xor_si128(*temp3, temp2);
}

unsafe fn expand_256(key: &[u8]) -> Vec<u32> {
    let mut temp1 = _mm_loadu_si128(key.as_ptr() as *const __m128i);
    let mut temp3 = _mm_loadu_si128(key[16..].as_ptr() as *const __m128i);

    let mut ks = [_mm_setzero_si128(); 15];
    ks[0] = temp1;
    ks[1] = temp3;

    let rcons: [i32; 7] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40];
    let mut idx = 2;
    for rcon in rcons.iter() {
        let mut temp2 = _mm_aeskeygenassist_si128(temp3, *rcon);
        assist_256_1(&mut temp1, &mut temp2);
        ks[idx] = temp1;
        idx += 1;
        if idx >= 15 {
            break;
        }
        assist_256_2(&temp1, &mut temp3);
        ks[idx] = temp3;
        idx += 1;
    }

    let mut rk = [0u32; 4 * 15];
    for (round, v) in ks.into_iter().enumerate() {
        let w = words_from_m128i(v);
        rk[round * 4..round * 4 + 4].copy_from_slice(&w);
    }
    rk.to_vec()
}

/// Expand a 16/24/32-byte key into the forward round-key word sequence
/// using AESKEYGENASSIST.
///
/// # Parameters
///
/// - `key`: the raw AES key, 16, 24 or 32 bytes long.
///
/// # Returns
///
/// The forward round-key sequence, bit-identical to
/// `aes_schedule::forward_schedule`'s output for the same key.
pub(crate) fn forward_schedule(key: &[u8]) -> Vec<u32> {
    unsafe {
        match key.len() {
            16 => expand_128(key),
            24 => expand_192(key),
            32 => expand_256(key),
            other => unreachable!("unsupported AES key length: {other}"),
        }
    }
}

/// Derive the inverse round-key sequence with AESIMC, mirroring
/// `aes_schedule::inverse_schedule` but operating on `__m128i` registers.
///
/// # Parameters
///
/// - `fwd`: the forward round-key sequence from `forward_schedule`.
/// - `round_count`: the number of AES rounds (10, 12 or 14).
///
/// # Returns
///
/// The inverse round-key sequence, the same length as `fwd`.
pub(crate) fn inverse_schedule(fwd: &[u32], round_count: usize) -> Vec<u32> {
    let mut inv = vec![0u32; (round_count + 1) * 4];
    unsafe {
        let last = load_round_key(fwd, round_count);
        let first = load_round_key(fwd, 0);
        store_round_key(&mut inv, 0, last);
        store_round_key(&mut inv, round_count, first);
        for r in 1..round_count {
            let rk = load_round_key(fwd, round_count - r);
            let mixed = _mm_aesimc_si128(rk);
            store_round_key(&mut inv, r, mixed);
        }
    }
    inv
}

/// Encrypt one block in place via AESENC/AESENCLAST.
///
/// # Parameters
///
/// - `schedule`: the forward round-key sequence from `forward_schedule`.
/// - `round_count`: the number of AES rounds (10, 12 or 14).
/// - `block`: the 16-byte block to encrypt in place.
///
/// # Safety
///
/// The caller must have already checked `hardware_available()` returns
/// `true` on the current CPU.
pub(crate) unsafe fn encrypt_block(schedule: &[u32], round_count: usize, block: &mut [u8; AES_BLOCK_SIZE]) {
    let mut state = _mm_loadu_si128(block.as_ptr() as *const __m128i);
    state = _mm_xor_si128(state, load_round_key(schedule, 0));
    for round in 1..round_count {
        state = _mm_aesenc_si128(state, load_round_key(schedule, round));
    }
    state = _mm_aesenclast_si128(state, load_round_key(schedule, round_count));
    _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, state);
}

/// Decrypt one block in place via AESDEC/AESDECLAST, reading the inverse
/// schedule produced by [`inverse_schedule`].
///
/// # Parameters
///
/// - `schedule`: the inverse round-key sequence from `inverse_schedule`.
/// - `round_count`: the number of AES rounds (10, 12 or 14).
/// - `block`: the 16-byte block to decrypt in place.
///
/// # Safety
///
/// The caller must have already checked `hardware_available()` returns
/// `true` on the current CPU.
pub(crate) unsafe fn decrypt_block(schedule: &[u32], round_count: usize, block: &mut [u8; AES_BLOCK_SIZE]) {
    let mut state = _mm_loadu_si128(block.as_ptr() as *const __m128i);
    state = _mm_xor_si128(state, load_round_key(schedule, 0));
    for round in 1..round_count {
        state = _mm_aesdec_si128(state, load_round_key(schedule, round));
    }
    state = _mm_aesdeclast_si128(state, load_round_key(schedule, round_count));
    _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, state);
}
