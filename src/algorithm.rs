//! SSH transport algorithm-name registry
//!
//! Maps the SSH wire names a key-exchange negotiation settles on to the
//! key size and mode this crate needs to configure a [`CipherContext`].
//! This is a thin collaborator: it carries no cryptographic state of its
//! own, it just resolves a name to the parameters `CipherContext::set_key`
//! and the CBC/CTR wrapper methods expect.
//!
//! # Features
//!
//! - `SshCipherAlgorithm::from_name`: resolves a wire name to a key size and
//!   mode.
//! - `key_bits`/`key_bytes`/`mode`/`block_bytes`: the parameters a resolved
//!   algorithm carries.
//!
//! # Usage
//!
//! There is no constructor here that hands back a ready-to-use
//! [`CipherContext`]: `SshCipherAlgorithm` has no way to steer which mode
//! method a caller reaches for, since a context's mode is a choice of which
//! method to call (`cbc_encrypt_inplace`/`cbc_decrypt_inplace` vs
//! `ctr_apply_inplace`), not a field on the context. Resolve a name, build a
//! context with `CipherContext::new`, size the key with `key_bytes` before
//! calling `set_key`, and branch on `mode` to decide which wrapper methods
//! to call for the rest of the session.
//!
//! [`CipherContext`]: crate::aes::CipherContext

/// Block cipher mode negotiated alongside the algorithm name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Cbc,
    Sdctr,
}

/// One of the seven SSH transport cipher names this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshCipherAlgorithm {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
    RijndaelCbcLysator,
    Aes128Ctr,
    Aes192Ctr,
    Aes256Ctr,
}

impl SshCipherAlgorithm {
    const ALL: &'static [(&'static str, SshCipherAlgorithm)] = &[
        ("aes128-cbc", SshCipherAlgorithm::Aes128Cbc),
        ("aes192-cbc", SshCipherAlgorithm::Aes192Cbc),
        ("aes256-cbc", SshCipherAlgorithm::Aes256Cbc),
        (
            "rijndael-cbc@lysator.liu.se",
            SshCipherAlgorithm::RijndaelCbcLysator,
        ),
        ("aes128-ctr", SshCipherAlgorithm::Aes128Ctr),
        ("aes192-ctr", SshCipherAlgorithm::Aes192Ctr),
        ("aes256-ctr", SshCipherAlgorithm::Aes256Ctr),
    ];

    /// Resolve an SSH wire name (e.g. `"aes256-ctr"`) to its algorithm.
    ///
    /// `rijndael-cbc@lysator.liu.se` is accepted as a historical alias for
    /// `aes256-cbc`: both name 256-bit-key Rijndael/AES in CBC mode.
    ///
    /// # Parameters
    ///
    /// - `name`: the SSH wire name as negotiated during key exchange.
    ///
    /// # Returns
    ///
    /// The matching algorithm.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not one of the seven names this crate
    /// registers.
    pub fn from_name(name: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::ALL
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, algorithm)| *algorithm)
            .ok_or_else(|| format!("unrecognized SSH cipher algorithm name: {name}").into())
    }

    /// The SSH wire name for this algorithm.
    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, algorithm)| *algorithm == self)
            .map(|(name, _)| *name)
            .expect("every variant has a registry entry")
    }

    /// Key size in bits (128, 192 or 256).
    pub fn key_bits(self) -> usize {
        match self {
            SshCipherAlgorithm::Aes128Cbc | SshCipherAlgorithm::Aes128Ctr => 128,
            SshCipherAlgorithm::Aes192Cbc | SshCipherAlgorithm::Aes192Ctr => 192,
            SshCipherAlgorithm::Aes256Cbc
            | SshCipherAlgorithm::RijndaelCbcLysator
            | SshCipherAlgorithm::Aes256Ctr => 256,
        }
    }

    /// Key size in bytes.
    pub fn key_bytes(self) -> usize {
        self.key_bits() / 8
    }

    /// Block cipher mode this algorithm negotiates.
    pub fn mode(self) -> CipherMode {
        match self {
            SshCipherAlgorithm::Aes128Cbc
            | SshCipherAlgorithm::Aes192Cbc
            | SshCipherAlgorithm::Aes256Cbc
            | SshCipherAlgorithm::RijndaelCbcLysator => CipherMode::Cbc,
            SshCipherAlgorithm::Aes128Ctr
            | SshCipherAlgorithm::Aes192Ctr
            | SshCipherAlgorithm::Aes256Ctr => CipherMode::Sdctr,
        }
    }

    /// Block size in bytes; always 16 for AES regardless of key size.
    pub fn block_bytes(self) -> usize {
        16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_round_trips() {
        for (name, algorithm) in SshCipherAlgorithm::ALL {
            assert_eq!(SshCipherAlgorithm::from_name(name).unwrap(), *algorithm);
            assert_eq!(algorithm.name(), *name);
        }
    }

    #[test]
    fn unknown_name_resolves_to_an_error() {
        assert!(SshCipherAlgorithm::from_name("blowfish-cbc").is_err());
    }

    #[test]
    fn rijndael_alias_is_256_bit_cbc() {
        let algo = SshCipherAlgorithm::from_name("rijndael-cbc@lysator.liu.se").unwrap();
        assert_eq!(algo.key_bits(), 256);
        assert_eq!(algo.mode(), CipherMode::Cbc);
    }

    #[test]
    fn ctr_algorithms_report_sdctr_mode() {
        for name in ["aes128-ctr", "aes192-ctr", "aes256-ctr"] {
            let algo = SshCipherAlgorithm::from_name(name).unwrap();
            assert_eq!(algo.mode(), CipherMode::Sdctr);
        }
    }
}
