//! SDCTR (stateful counter) mode
//!
//! Each block is produced by encrypting the current counter value and
//! XORing the result into the data; the counter is then incremented as a
//! single big-endian 128-bit integer, with carries propagating from the
//! least-significant byte towards the most-significant one. Since the
//! keystream depends only on the counter, the same operation serves both
//! encryption and decryption.
//!
//! # Features
//!
//! - `ctr_apply_inplace`: encrypt-the-counter-then-XOR, shared by both
//!   directions.
//!
//! # Usage
//!
//! Defined on [`CipherContext`](super::CipherContext); call `set_key` and
//! `set_iv` (with the starting counter block) first. As with CBC, a record
//! may be split across several calls; the counter left installed at the end
//! of one call picks up where the next one needs to start.
//!
//! # Example
//!
//! ```
//! use sdctr_aes::aes::CipherContext;
//!
//! let mut ctx = CipherContext::new();
//! ctx.set_key(&[0x5au8; 16]);
//! ctx.set_iv(&[0u8; 16]);
//!
//! let mut data = [0x11u8; 32];
//! ctx.ctr_apply_inplace(&mut data);
//! ```

use super::aes_cipher::{assert_valid_span, CipherContext};

fn increment_counter(counter: &mut [u8; 16]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

impl CipherContext {
    /// Apply SDCTR keystream to `data` in place; identical for encryption
    /// and decryption. `data.len()` must be a positive multiple of 16.
    ///
    /// The counter installed via `set_iv` (or left over from a previous
    /// call) is consumed one block at a time and incremented with wraparound
    /// at 2^128.
    ///
    /// # Parameters
    ///
    /// - `data`: the buffer to encrypt or decrypt in place, a positive
    ///   multiple of 16 bytes long.
    ///
    /// # Panics
    ///
    /// Panics if `data` is empty or not a multiple of the AES block size,
    /// or if called before `set_key`/`set_iv`.
    pub fn ctr_apply_inplace(&mut self, data: &mut [u8]) {
        assert_valid_span(data.len());
        self.require_keyed();

        let mut counter = self.iv_bytes();
        for block in data.chunks_mut(16) {
            let mut keystream = counter;
            self.encrypt_block_raw(&mut keystream);
            for i in 0..16 {
                block[i] ^= keystream[i];
            }
            increment_counter(&mut counter);
        }
        self.install_iv(&counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_encrypt_again_recovers_plaintext() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0x5au8; 16]);
        ctx.set_iv(&[0u8; 16]);

        let original: Vec<u8> = (0..48u8).collect();
        let mut data = original.clone();
        ctx.ctr_apply_inplace(&mut data);
        assert_ne!(data, original);

        ctx.set_iv(&[0u8; 16]);
        ctx.ctr_apply_inplace(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn counter_carries_across_all_sixteen_bytes() {
        let mut counter = [0xffu8; 16];
        increment_counter(&mut counter);
        assert_eq!(counter, [0u8; 16]);
    }

    #[test]
    fn counter_only_touches_trailing_byte_without_carry() {
        let mut counter = [0u8; 16];
        counter[15] = 0x05;
        increment_counter(&mut counter);
        assert_eq!(counter[15], 0x06);
        assert_eq!(&counter[..15], &[0u8; 15]);
    }

    #[test]
    fn splitting_the_span_does_not_change_the_keystream() {
        let mut whole = CipherContext::new();
        whole.set_key(&[0x7eu8; 32]);
        whole.set_iv(&[0u8; 16]);
        let mut one_shot = vec![0xaau8; 48];
        whole.ctr_apply_inplace(&mut one_shot);

        let mut split_ctx = CipherContext::new();
        split_ctx.set_key(&[0x7eu8; 32]);
        split_ctx.set_iv(&[0u8; 16]);
        let mut split = vec![0xaau8; 48];
        split_ctx.ctr_apply_inplace(&mut split[..16]);
        split_ctx.ctr_apply_inplace(&mut split[16..32]);
        split_ctx.ctr_apply_inplace(&mut split[32..]);

        assert_eq!(one_shot, split);
    }

    #[test]
    #[should_panic(expected = "span length must be a positive multiple of 16")]
    fn rejects_unaligned_span() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0u8; 16]);
        ctx.set_iv(&[0u8; 16]);
        let mut data = [0u8; 5];
        ctx.ctr_apply_inplace(&mut data);
    }
}
