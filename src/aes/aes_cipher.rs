//! Stateful cipher context
//!
//! `CipherContext` owns a key schedule, chaining state, and a fixed choice
//! of engine (portable T-tables or hardware AES-NI). It is the object the
//! mode wrappers in `aes_cbc.rs` and `aes_ctr.rs` operate on; callers never
//! touch the schedules or block engine directly.
//!
//! # Features
//!
//! - `CipherContext::new`/`set_key`/`set_iv`: build a context and install a
//!   key and chaining state.
//! - `cbc_encrypt_inplace`/`cbc_decrypt_inplace` (in `aes_cbc.rs`) and
//!   `ctr_apply_inplace` (in `aes_ctr.rs`): the block operations this
//!   context drives.
//!
//! # Usage
//!
//! Construct with `new`, call `set_key` once per key, then `set_iv` before
//! the first block operation of a record. Re-keying with `set_key` resets
//! chaining state to zero; a fresh `set_iv` is needed after that too if the
//! new key isn't meant to start from a zero IV.
//!
//! # Example
//!
//! ```
//! use sdctr_aes::aes::CipherContext;
//!
//! let mut ctx = CipherContext::new();
//! ctx.set_key(&[0u8; 16]);
//! ctx.set_iv(&[0u8; 16]);
//! ```

use zeroize::Zeroize;

use super::aes_core;
#[cfg(target_arch = "x86_64")]
use super::aes_hardware;

/// Which round engine a context was bound to at `set_key` time.
///
/// Fixed once a key is installed: a context never switches engines mid-life,
/// which is what keeps the two IV representations below from ever aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Implementation {
    Portable,
    Hardware,
}

impl Zeroize for Implementation {
    fn zeroize(&mut self) {
        *self = Implementation::Portable;
    }
}

/// Chaining state (CBC's last ciphertext block, or CTR's counter block),
/// held in whichever representation its engine works in natively: the
/// portable engine wants host words, AES-NI wants a raw byte vector.
#[derive(Debug, Clone, Copy)]
enum IvState {
    Portable([u32; 4]),
    Hardware([u8; 16]),
}

impl Zeroize for IvState {
    fn zeroize(&mut self) {
        match self {
            IvState::Portable(words) => words.zeroize(),
            IvState::Hardware(bytes) => bytes.zeroize(),
        }
    }
}

impl IvState {
    fn to_bytes(self) -> [u8; 16] {
        match self {
            IvState::Portable(words) => {
                let mut out = [0u8; 16];
                for i in 0..4 {
                    out[4 * i..4 * i + 4].copy_from_slice(&words[i].to_be_bytes());
                }
                out
            }
            IvState::Hardware(bytes) => bytes,
        }
    }
}

/// Owns the expanded key schedule and chaining state for one AES key.
///
/// A context goes through exactly two states: freshly constructed (no key,
/// unusable for block operations) and keyed (`set_key` has been called,
/// after which `set_iv` and the mode wrappers in `aes_cbc`/`aes_ctr` may be
/// used). Re-keying is supported by calling `set_key` again; it replaces
/// the schedules and resets chaining state to zero.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct CipherContext {
    round_count: usize,
    forward_schedule: Vec<u32>,
    inverse_schedule: Vec<u32>,
    iv: IvState,
    implementation: Implementation,
    key_bits: usize,
}

impl Default for CipherContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherContext {
    /// Construct an unkeyed context. Calling any block operation before
    /// `set_key` is a programming error.
    ///
    /// # Returns
    ///
    /// A fresh context with no key and no chaining state.
    pub fn new() -> Self {
        CipherContext {
            round_count: 0,
            forward_schedule: Vec::new(),
            inverse_schedule: Vec::new(),
            iv: IvState::Portable([0; 4]),
            implementation: Implementation::Portable,
            key_bits: 0,
        }
    }

    /// Install a 128/192/256-bit key, expanding both the forward and
    /// inverse schedules and picking the fastest available engine.
    ///
    /// The chosen engine never changes for the lifetime of this key; a
    /// fresh call to `set_key` re-detects it and may switch.
    ///
    /// # Parameters
    ///
    /// - `key`: the raw AES key, 16, 24 or 32 bytes long.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not 16, 24 or 32 bytes long.
    pub fn set_key(&mut self, key: &[u8]) {
        let round_count = match key.len() {
            16 => 10,
            24 => 12,
            32 => 14,
            other => panic!(
                "AES CIPHER PANIC: invalid key length {other} bytes, expected 16, 24 or 32"
            ),
        };

        let implementation = if Self::hardware_available() {
            Implementation::Hardware
        } else {
            Implementation::Portable
        };

        let (forward_schedule, inverse_schedule) = match implementation {
            Implementation::Portable => {
                let fwd = super::aes_schedule::forward_schedule(key);
                let inv = super::aes_schedule::inverse_schedule(&fwd, round_count);
                (fwd, inv)
            }
            Implementation::Hardware => {
                #[cfg(target_arch = "x86_64")]
                {
                    let fwd = aes_hardware::forward_schedule(key);
                    let inv = aes_hardware::inverse_schedule(&fwd, round_count);
                    (fwd, inv)
                }
                #[cfg(not(target_arch = "x86_64"))]
                unreachable!("hardware engine is only selected on x86_64")
            }
        };

        self.round_count = round_count;
        self.forward_schedule = forward_schedule;
        self.inverse_schedule = inverse_schedule;
        self.implementation = implementation;
        self.key_bits = key.len() * 8;
        self.iv = match implementation {
            Implementation::Portable => IvState::Portable([0; 4]),
            Implementation::Hardware => IvState::Hardware([0; 16]),
        };
    }

    #[cfg(target_arch = "x86_64")]
    fn hardware_available() -> bool {
        aes_hardware::hardware_available()
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn hardware_available() -> bool {
        false
    }

    /// Install the 128-bit IV or counter block. Converts it into whichever
    /// representation the active engine works with natively.
    ///
    /// # Parameters
    ///
    /// - `iv`: the CBC initialization vector, or the SDCTR starting counter
    ///   block.
    ///
    /// # Panics
    ///
    /// Panics if called before `set_key`.
    pub fn set_iv(&mut self, iv: &[u8; 16]) {
        self.require_keyed();
        self.install_iv(iv);
    }

    pub(crate) fn install_iv(&mut self, iv: &[u8; 16]) {
        self.iv = match self.implementation {
            Implementation::Portable => {
                let mut words = [0u32; 4];
                for i in 0..4 {
                    words[i] = u32::from_be_bytes(iv[4 * i..4 * i + 4].try_into().unwrap());
                }
                IvState::Portable(words)
            }
            Implementation::Hardware => IvState::Hardware(*iv),
        };
    }

    pub(crate) fn iv_bytes(&self) -> [u8; 16] {
        self.iv.to_bytes()
    }

    pub(crate) fn require_keyed(&self) {
        assert!(
            self.round_count != 0,
            "AES CIPHER PANIC: context used before set_key"
        );
    }

    pub(crate) fn key_bits(&self) -> usize {
        self.key_bits
    }

    pub(crate) fn encrypt_block_raw(&self, block: &mut [u8; 16]) {
        match self.implementation {
            Implementation::Portable => {
                aes_core::encrypt_block(&self.forward_schedule, self.round_count, block)
            }
            Implementation::Hardware => {
                #[cfg(target_arch = "x86_64")]
                unsafe {
                    aes_hardware::encrypt_block(&self.forward_schedule, self.round_count, block)
                }
                #[cfg(not(target_arch = "x86_64"))]
                unreachable!("hardware engine is only selected on x86_64")
            }
        }
    }

    pub(crate) fn decrypt_block_raw(&self, block: &mut [u8; 16]) {
        match self.implementation {
            Implementation::Portable => {
                aes_core::decrypt_block(&self.inverse_schedule, self.round_count, block)
            }
            Implementation::Hardware => {
                #[cfg(target_arch = "x86_64")]
                unsafe {
                    aes_hardware::decrypt_block(&self.inverse_schedule, self.round_count, block)
                }
                #[cfg(not(target_arch = "x86_64"))]
                unreachable!("hardware engine is only selected on x86_64")
            }
        }
    }
}

pub(crate) fn assert_valid_span(len: usize) {
    assert!(
        len > 0 && len % 16 == 0,
        "AES CIPHER PANIC: span length must be a positive multiple of 16, got {len}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "AES CIPHER PANIC: context used before set_key")]
    fn using_context_before_set_key_panics() {
        let ctx = CipherContext::new();
        ctx.require_keyed();
    }

    #[test]
    #[should_panic(expected = "invalid key length")]
    fn set_key_rejects_bad_length() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0u8; 20]);
    }

    #[test]
    fn set_key_resets_iv_to_zero() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0u8; 16]);
        ctx.set_iv(&[0xffu8; 16]);
        ctx.set_key(&[0u8; 16]);
        assert_eq!(ctx.iv_bytes(), [0u8; 16]);
    }

    #[test]
    fn block_size_is_always_sixteen() {
        assert_eq!(super::super::aes_tables::AES_BLOCK_SIZE, 16);
    }
}
