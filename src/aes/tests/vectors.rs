//! Known-answer vectors
//!
//! One test per vector, rather than a parameterized table, so a failure
//! names the exact vector that broke.

use crate::aes::CipherContext;

fn ecb_via_cbc_zero_iv(key_hex: &str, plaintext_hex: &str, ciphertext_hex: &str) {
    let mut ctx = CipherContext::new();
    ctx.set_key(&hex::decode(key_hex).unwrap());
    ctx.set_iv(&[0u8; 16]);

    let mut block = hex::decode(plaintext_hex).unwrap();
    ctx.cbc_encrypt_inplace(&mut block);
    assert_eq!(hex::encode(&block), ciphertext_hex);
}

#[test]
fn vector_1_aes128_ecb() {
    ecb_via_cbc_zero_iv(
        "000102030405060708090a0b0c0d0e0f",
        "00112233445566778899aabbccddeeff",
        "69c4e0d86a7b0430d8cdb78070b4c55a",
    );
}

#[test]
fn vector_2_aes192_ecb() {
    ecb_via_cbc_zero_iv(
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "00112233445566778899aabbccddeeff",
        "dda97ca4864cdfe06eaf70a0ec0d7191",
    );
}

#[test]
fn vector_3_aes256_ecb() {
    ecb_via_cbc_zero_iv(
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "00112233445566778899aabbccddeeff",
        "8ea2b7ca516745bfeafc49904b496089",
    );
}

#[test]
fn vector_4_aes128_cbc_two_blocks() {
    let mut ctx = CipherContext::new();
    ctx.set_key(&hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap());
    ctx.set_iv(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap().try_into().unwrap());

    let mut first = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
    ctx.cbc_encrypt_inplace(&mut first);
    assert_eq!(hex::encode(&first), "7649abac8119b246cee98e9b12e9197d");

    let mut second = hex::decode("ae2d8a571e03ac9c9eb76fac45af8e51").unwrap();
    ctx.cbc_encrypt_inplace(&mut second);
    assert_eq!(hex::encode(&second), "5086cb9b507219ee95db113a917678b2");
}

#[test]
fn vector_5_aes128_ctr() {
    let mut ctx = CipherContext::new();
    ctx.set_key(&hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap());
    let counter: [u8; 16] = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff")
        .unwrap()
        .try_into()
        .unwrap();
    ctx.set_iv(&counter);

    let mut data = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
    ctx.ctr_apply_inplace(&mut data);
    assert_eq!(hex::encode(&data), "874d6191b620e3261bef6864990db6ce");
    assert_eq!(
        hex::encode(ctx.iv_bytes()),
        "f0f1f2f3f4f5f6f7f8f9fafbfcfdff00"
    );
}

#[test]
fn vector_6_ctr_counter_carry() {
    let mut ctx = CipherContext::new();
    ctx.set_key(&[0u8; 16]);
    ctx.set_iv(&[0xffu8; 16]);

    let mut block = [0u8; 16];
    ctx.ctr_apply_inplace(&mut block);
    assert_eq!(ctx.iv_bytes(), [0u8; 16]);
}

#[test]
fn key_schedule_sanity_across_key_sizes() {
    for key_len in [16usize, 24, 32] {
        let key: Vec<u8> = (0..key_len as u8).collect();
        let mut ctx = CipherContext::new();
        ctx.set_key(&key);
        assert_eq!(ctx.key_bits(), key_len * 8);
    }
}
