//! AES in Cipher Block Chaining (CBC) mode
//!
//! CBC XORs each plaintext block with the previous ciphertext block (or the
//! IV, for the first block) before encrypting it, so identical plaintext
//! blocks never produce identical ciphertext. Both directions operate on
//! the caller's buffer in place and leave the context's chaining state
//! advanced to the last ciphertext block, ready for a follow-up call on the
//! next record.
//!
//! # Features
//!
//! - `cbc_encrypt_inplace`: chain-then-encrypt each block.
//! - `cbc_decrypt_inplace`: decrypt-then-chain each block.
//!
//! # Usage
//!
//! Both methods are defined on [`CipherContext`](super::CipherContext); call
//! `set_key` and `set_iv` first. A record may be split across several calls:
//! the chaining state left installed at the end of one call is exactly what
//! the next call needs to continue.
//!
//! # Example
//!
//! ```
//! use sdctr_aes::aes::CipherContext;
//!
//! let mut ctx = CipherContext::new();
//! ctx.set_key(&[0x2bu8; 16]);
//! ctx.set_iv(&[0u8; 16]);
//!
//! let mut data = [0x11u8; 32];
//! ctx.cbc_encrypt_inplace(&mut data);
//! ```

use super::aes_cipher::{assert_valid_span, CipherContext};

impl CipherContext {
    /// Encrypt `data` in place under CBC mode. `data.len()` must be a
    /// positive multiple of 16.
    ///
    /// # Parameters
    ///
    /// - `data`: the plaintext to encrypt in place, a positive multiple of
    ///   16 bytes long.
    ///
    /// # Panics
    ///
    /// Panics if `data` is empty or not a multiple of the AES block size,
    /// or if called before `set_key`/`set_iv`.
    pub fn cbc_encrypt_inplace(&mut self, data: &mut [u8]) {
        assert_valid_span(data.len());
        self.require_keyed();

        let mut chain = self.iv_bytes();
        for block in data.chunks_mut(16) {
            for i in 0..16 {
                block[i] ^= chain[i];
            }
            let mut buf: [u8; 16] = block.try_into().unwrap();
            self.encrypt_block_raw(&mut buf);
            block.copy_from_slice(&buf);
            chain = buf;
        }
        self.install_iv(&chain);
    }

    /// Decrypt `data` in place under CBC mode. `data.len()` must be a
    /// positive multiple of 16.
    ///
    /// # Parameters
    ///
    /// - `data`: the ciphertext to decrypt in place, a positive multiple of
    ///   16 bytes long.
    ///
    /// # Panics
    ///
    /// Panics if `data` is empty or not a multiple of the AES block size,
    /// or if called before `set_key`/`set_iv`.
    pub fn cbc_decrypt_inplace(&mut self, data: &mut [u8]) {
        assert_valid_span(data.len());
        self.require_keyed();

        let mut chain = self.iv_bytes();
        for block in data.chunks_mut(16) {
            let ciphertext: [u8; 16] = block.try_into().unwrap();
            let mut buf = ciphertext;
            self.decrypt_block_raw(&mut buf);
            for i in 0..16 {
                buf[i] ^= chain[i];
            }
            block.copy_from_slice(&buf);
            chain = ciphertext;
        }
        self.install_iv(&chain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_across_several_blocks() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0x2bu8; 16]);
        ctx.set_iv(&[0u8; 16]);

        let original: Vec<u8> = (0..64u8).collect();
        let mut data = original.clone();
        ctx.cbc_encrypt_inplace(&mut data);
        assert_ne!(data, original);

        ctx.set_iv(&[0u8; 16]);
        ctx.cbc_decrypt_inplace(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn fips197_ecb_vector_via_cbc_with_zero_iv() {
        let mut ctx = CipherContext::new();
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        ctx.set_key(&key);
        ctx.set_iv(&[0u8; 16]);

        let mut block = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        ctx.cbc_encrypt_inplace(&mut block);
        assert_eq!(hex::encode(&block), "69c4e0d86a7b0430d8cdb78070b4c55a");
    }

    #[test]
    #[should_panic(expected = "span length must be a positive multiple of 16")]
    fn rejects_unaligned_span() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0u8; 16]);
        ctx.set_iv(&[0u8; 16]);
        let mut data = [0u8; 20];
        ctx.cbc_encrypt_inplace(&mut data);
    }

    #[test]
    #[should_panic(expected = "span length must be a positive multiple of 16")]
    fn rejects_empty_span() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0u8; 16]);
        ctx.set_iv(&[0u8; 16]);
        let mut data: [u8; 0] = [];
        ctx.cbc_encrypt_inplace(&mut data);
    }

    #[test]
    fn chaining_state_carries_across_calls() {
        let mut ctx = CipherContext::new();
        ctx.set_key(&[0x11u8; 16]);
        ctx.set_iv(&[0u8; 16]);

        let mut one_shot = [1u8; 32];
        ctx.cbc_encrypt_inplace(&mut one_shot);

        let mut ctx2 = CipherContext::new();
        ctx2.set_key(&[0x11u8; 16]);
        ctx2.set_iv(&[0u8; 16]);
        let mut split = [1u8; 32];
        ctx2.cbc_encrypt_inplace(&mut split[..16]);
        ctx2.cbc_encrypt_inplace(&mut split[16..]);

        assert_eq!(one_shot, split);
    }
}
