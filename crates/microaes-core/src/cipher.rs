//! Key expansion and the single-block cipher paths.

use zeroize::Zeroize;

use crate::block::{Block, BLOCK_SIZE};
use crate::key::{RoundKeys, Variant, MAX_ROUND_KEYS, MAX_SCHEDULE_WORDS, NB};
use crate::mode::Error;
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::sbox;
use crate::trace::{NullObserver, RoundObserver, RoundStage};

// Round constants: successive powers of x in GF(2^8), applied to the high
// byte of the rotated word. Index 9 (0x36) is the highest any variant reaches.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a master key into the round-key schedule for `variant`.
///
/// Fails with [`Error::InvalidArgument`] when `key` is not exactly
/// `variant.key_len()` bytes long; no other failure exists.
pub fn expand_key(key: &[u8], variant: Variant) -> Result<RoundKeys, Error> {
    if key.len() != variant.key_len() {
        return Err(Error::InvalidArgument);
    }
    Ok(expand_words(key, variant))
}

// FIPS-197 §5.2 key expansion. `key` must already be variant-sized.
pub(crate) fn expand_words(key: &[u8], variant: Variant) -> RoundKeys {
    let nk = variant.key_words();
    let total = NB * (variant.rounds() + 1);

    let mut w = [0u32; MAX_SCHEDULE_WORDS];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        let bytes: [u8; 4] = chunk.try_into().expect("chunk length is four");
        w[i] = u32::from_be_bytes(bytes);
    }
    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(temp.rotate_left(8)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut keys = [[0u8; BLOCK_SIZE]; MAX_ROUND_KEYS];
    for (round, round_key) in keys.iter_mut().enumerate().take(variant.rounds() + 1) {
        for word in 0..NB {
            let bytes = w[round * NB + word].to_be_bytes();
            round_key[4 * word..4 * word + 4].copy_from_slice(&bytes);
        }
    }
    w.zeroize();

    RoundKeys::new(keys, variant.rounds())
}

/// Encrypts one block in place with a pre-expanded schedule.
#[inline]
pub fn encrypt_block(state: &mut Block, keys: &RoundKeys) {
    encrypt_block_with(state, keys, &mut NullObserver);
}

/// Decrypts one block in place with a pre-expanded schedule.
#[inline]
pub fn decrypt_block(state: &mut Block, keys: &RoundKeys) {
    decrypt_block_with(state, keys, &mut NullObserver);
}

/// Forward cipher with an observer invoked between round stages.
///
/// [`encrypt_block`] routes through this with [`NullObserver`], which
/// monomorphizes down to the untraced loop.
pub fn encrypt_block_with<O: RoundObserver>(state: &mut Block, keys: &RoundKeys, observer: &mut O) {
    let nr = keys.rounds();
    observer.on_stage(0, RoundStage::Start, state);
    add_round_key(state, keys.get(0));
    observer.on_stage(0, RoundStage::AddRoundKey, state);
    for round in 1..nr {
        sub_bytes(state);
        observer.on_stage(round, RoundStage::SubBytes, state);
        shift_rows(state);
        observer.on_stage(round, RoundStage::ShiftRows, state);
        mix_columns(state);
        observer.on_stage(round, RoundStage::MixColumns, state);
        add_round_key(state, keys.get(round));
        observer.on_stage(round, RoundStage::AddRoundKey, state);
    }
    sub_bytes(state);
    observer.on_stage(nr, RoundStage::SubBytes, state);
    shift_rows(state);
    observer.on_stage(nr, RoundStage::ShiftRows, state);
    add_round_key(state, keys.get(nr));
    observer.on_stage(nr, RoundStage::End, state);
}

/// Inverse cipher with an observer invoked between round stages.
pub fn decrypt_block_with<O: RoundObserver>(state: &mut Block, keys: &RoundKeys, observer: &mut O) {
    let nr = keys.rounds();
    observer.on_stage(nr, RoundStage::Start, state);
    add_round_key(state, keys.get(nr));
    observer.on_stage(nr, RoundStage::AddRoundKey, state);
    for round in (1..nr).rev() {
        inv_shift_rows(state);
        observer.on_stage(round, RoundStage::InvShiftRows, state);
        inv_sub_bytes(state);
        observer.on_stage(round, RoundStage::InvSubBytes, state);
        add_round_key(state, keys.get(round));
        observer.on_stage(round, RoundStage::AddRoundKey, state);
        inv_mix_columns(state);
        observer.on_stage(round, RoundStage::InvMixColumns, state);
    }
    inv_shift_rows(state);
    observer.on_stage(0, RoundStage::InvShiftRows, state);
    inv_sub_bytes(state);
    observer.on_stage(0, RoundStage::InvSubBytes, state);
    add_round_key(state, keys.get(0));
    observer.on_stage(0, RoundStage::End, state);
}

/// Encrypts a single block under AES-128.
pub fn aes128_encrypt_block(block: &mut Block, key: &[u8; 16]) {
    let keys = expand_words(key, Variant::Aes128);
    encrypt_block(block, &keys);
}

/// Decrypts a single block under AES-128.
pub fn aes128_decrypt_block(block: &mut Block, key: &[u8; 16]) {
    let keys = expand_words(key, Variant::Aes128);
    decrypt_block(block, &keys);
}

/// Encrypts a single block under AES-192.
pub fn aes192_encrypt_block(block: &mut Block, key: &[u8; 24]) {
    let keys = expand_words(key, Variant::Aes192);
    encrypt_block(block, &keys);
}

/// Decrypts a single block under AES-192.
pub fn aes192_decrypt_block(block: &mut Block, key: &[u8; 24]) {
    let keys = expand_words(key, Variant::Aes192);
    decrypt_block(block, &keys);
}

/// Encrypts a single block under AES-256.
pub fn aes256_encrypt_block(block: &mut Block, key: &[u8; 32]) {
    let keys = expand_words(key, Variant::Aes256);
    encrypt_block(block, &keys);
}

/// Decrypts a single block under AES-256.
pub fn aes256_decrypt_block(block: &mut Block, key: &[u8; 32]) {
    let keys = expand_words(key, Variant::Aes256);
    decrypt_block(block, &keys);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).expect("valid hex literal")
    }

    fn unhex_block(s: &str) -> Block {
        unhex(s).try_into().expect("exactly one block of hex")
    }

    #[test]
    fn encrypt_matches_fips_appendix_b() {
        let key: [u8; 16] = unhex("2b7e151628aed2a6abf7158809cf4f3c")
            .try_into()
            .expect("16-byte key");
        let mut block = unhex_block("3243f6a8885a308d313198a2e0370734");
        aes128_encrypt_block(&mut block, &key);
        assert_eq!(block, unhex_block("3925841d02dc09fbdc118597196a0b32"));
        aes128_decrypt_block(&mut block, &key);
        assert_eq!(block, unhex_block("3243f6a8885a308d313198a2e0370734"));
    }

    #[test]
    fn encrypt_matches_fips_appendix_c1() {
        let key = unhex("000102030405060708090a0b0c0d0e0f");
        let keys = expand_key(&key, Variant::Aes128).expect("key length matches variant");
        let mut block = unhex_block("00112233445566778899aabbccddeeff");
        encrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("69c4e0d86a7b0430d8cdb78070b4c55a"));
        decrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("00112233445566778899aabbccddeeff"));
    }

    #[test]
    fn encrypt_matches_fips_appendix_c2() {
        let key = unhex("000102030405060708090a0b0c0d0e0f1011121314151617");
        let keys = expand_key(&key, Variant::Aes192).expect("key length matches variant");
        let mut block = unhex_block("00112233445566778899aabbccddeeff");
        encrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("dda97ca4864cdfe06eaf70a0ec0d7191"));
        decrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("00112233445566778899aabbccddeeff"));
    }

    #[test]
    fn encrypt_matches_fips_appendix_c3() {
        let key = unhex("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
        let keys = expand_key(&key, Variant::Aes256).expect("key length matches variant");
        let mut block = unhex_block("00112233445566778899aabbccddeeff");
        encrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("8ea2b7ca516745bfeafc49904b496089"));
        decrypt_block(&mut block, &keys);
        assert_eq!(block, unhex_block("00112233445566778899aabbccddeeff"));
    }

    #[test]
    fn schedule_matches_fips_appendix_a1() {
        let key = unhex("2b7e151628aed2a6abf7158809cf4f3c");
        let keys = expand_key(&key, Variant::Aes128).expect("key length matches variant");
        assert_eq!(&keys.get(0)[..], &key[..]);
        assert_eq!(*keys.get(10), unhex_block("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }

    #[test]
    fn schedule_is_total_for_every_variant() {
        for variant in Variant::ALL {
            let key = vec![0u8; variant.key_len()];
            let keys = expand_key(&key, variant).expect("key length matches variant");
            assert_eq!(keys.rounds(), variant.rounds());
        }
    }

    #[test]
    fn expand_key_rejects_mismatched_key_length() {
        assert!(matches!(
            expand_key(&[0u8; 24], Variant::Aes128),
            Err(Error::InvalidArgument)
        ));
        assert!(matches!(
            expand_key(&[0u8; 16], Variant::Aes256),
            Err(Error::InvalidArgument)
        ));
        assert!(matches!(
            expand_key(&[], Variant::Aes192),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for variant in Variant::ALL {
            let mut key = vec![0u8; variant.key_len()];
            for _ in 0..100 {
                rng.fill_bytes(&mut key);
                let keys = expand_key(&key, variant).expect("key length matches variant");
                let mut block = [0u8; 16];
                rng.fill_bytes(&mut block);
                let original = block;
                encrypt_block(&mut block, &keys);
                decrypt_block(&mut block, &keys);
                assert_eq!(block, original);
            }
        }
    }
}
