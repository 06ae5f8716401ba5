mod aes_cbc;
mod aes_cipher;
mod aes_core;
mod aes_ctr;
#[cfg(target_arch = "x86_64")]
mod aes_hardware;
mod aes_schedule;
mod aes_tables;

pub use aes_cipher::CipherContext;

#[cfg(test)]
mod tests;
