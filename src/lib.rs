//! AES-128/192/256 block cipher core for the SSH transport layer.
//!
//! Implements the three cipher primitives an SSH transport needs from a
//! block cipher: CBC encryption, CBC decryption, and SDCTR (a stateful
//! counter mode), built on a FIPS-197 AES core that runs over a portable
//! T-table engine by default and switches to a runtime-detected AES-NI fast
//! path when the CPU supports it. The two engines are required to be
//! bit-identical (see `aes::aes_hardware`'s tests).
//!
//! # Features
//!
//! - `aes::CipherContext`: a stateful handle holding the expanded key
//!   schedule and chaining state for one key, with CBC and SDCTR
//!   operations as methods.
//! - `algorithm::SshCipherAlgorithm`: resolves the seven SSH transport
//!   cipher names to the key size and mode `CipherContext` needs.
//!
//! # Usage
//!
//! Construct a context, install a key and an IV or counter block, then
//! drive one of the mode methods over a buffer whose length is a multiple
//! of 16 bytes.
//!
//! # Example
//!
//! ```
//! use sdctr_aes::aes::CipherContext;
//!
//! let mut ctx = CipherContext::new();
//! ctx.set_key(&[0u8; 16]);
//! ctx.set_iv(&[0u8; 16]);
//!
//! let mut data = [0x11u8; 32];
//! ctx.cbc_encrypt_inplace(&mut data);
//! ```
//!
//! # Disclaimer
//!
//! This crate implements the block cipher only (key exchange, MAC and
//! padding/framing belong to the transport layer that drives it), and
//! carries no authenticated mode (GCM/OCB): callers that need integrity as
//! well as confidentiality must pair it with a separate MAC.

pub mod aes;
pub mod algorithm;
