//! In-place ECB and CBC drivers over short caller-supplied buffers.
//!
//! Every driver follows the same contract: inputs are validated before any
//! byte of the buffer is touched, the schedule is built once, and the buffer
//! is then walked block by block. On validation failure the buffer is
//! returned to the caller untouched.

use std::fmt;

use crate::block::{xor_in_place, Block, BLOCK_SIZE};
use crate::cipher::{self, expand_key};
use crate::key::Variant;

/// Upper bound, in bytes, on the buffers the mode drivers accept.
///
/// The bound keeps every call heap-free; it is a surface limit, not an
/// algorithmic one. Longer inputs can be fed through in segments, chaining
/// the previous segment's final ciphertext block as the next IV in CBC mode.
pub const MAX_INPUT_SIZE: usize = 64;

/// Longest supported master key in bytes (AES-256).
pub const MAX_KEY_SIZE: usize = 32;

/// Failure reported by the cipher entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// An input failed validation: empty, oversize or unaligned buffer, or a
    /// key whose length does not match the variant. The caller's buffer is
    /// untouched when this is returned.
    InvalidArgument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

impl std::error::Error for Error {}

// Buffers must be nonzero, within the surface cap, and block-aligned.
// Unaligned sizes are rejected outright rather than silently processing the
// caller's trailing padding.
fn check_buffer(data: &[u8]) -> Result<(), Error> {
    if data.is_empty() || data.len() > MAX_INPUT_SIZE || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

fn as_block_mut(chunk: &mut [u8]) -> &mut Block {
    chunk.try_into().expect("chunk length is one block")
}

/// Encrypts `data` in place in electronic-code-book mode.
///
/// Each block is enciphered independently under the same schedule, so equal
/// plaintext blocks produce equal ciphertext blocks. ECB leaks plaintext
/// structure and is kept for compatibility only; prefer [`cbc_encrypt`].
///
/// `data` must be a nonzero multiple of [`BLOCK_SIZE`] no longer than
/// [`MAX_INPUT_SIZE`], and `key` must match `variant`, else
/// [`Error::InvalidArgument`].
pub fn ecb_encrypt(data: &mut [u8], key: &[u8], variant: Variant) -> Result<(), Error> {
    check_buffer(data)?;
    let keys = expand_key(key, variant)?;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher::encrypt_block(as_block_mut(chunk), &keys);
    }
    Ok(())
}

/// Decrypts `data` in place in electronic-code-book mode.
///
/// Accepts the same inputs as [`ecb_encrypt`].
pub fn ecb_decrypt(data: &mut [u8], key: &[u8], variant: Variant) -> Result<(), Error> {
    check_buffer(data)?;
    let keys = expand_key(key, variant)?;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher::decrypt_block(as_block_mut(chunk), &keys);
    }
    Ok(())
}

/// Encrypts `data` in place in cipher-block-chaining mode.
///
/// The first block is XORed with `iv` before encryption; every later block
/// is XORed with the ciphertext just produced for its predecessor.
///
/// Accepts the same buffer and key contract as [`ecb_encrypt`].
pub fn cbc_encrypt(data: &mut [u8], key: &[u8], iv: &Block, variant: Variant) -> Result<(), Error> {
    check_buffer(data)?;
    let keys = expand_key(key, variant)?;
    let mut prev = *iv;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        let block = as_block_mut(chunk);
        xor_in_place(block, &prev);
        cipher::encrypt_block(block, &keys);
        prev = *block;
    }
    Ok(())
}

/// Decrypts `data` in place in cipher-block-chaining mode.
///
/// Accepts the same inputs as [`cbc_encrypt`], with `iv` matching the one
/// used at encryption time.
pub fn cbc_decrypt(data: &mut [u8], key: &[u8], iv: &Block, variant: Variant) -> Result<(), Error> {
    check_buffer(data)?;
    let keys = expand_key(key, variant)?;
    // Blocks are walked back to front: block i is XORed against the
    // ciphertext of block i-1, which a front-to-back in-place walk would
    // already have overwritten.
    let blocks = data.len() / BLOCK_SIZE;
    for idx in (1..blocks).rev() {
        let (head, tail) = data.split_at_mut(idx * BLOCK_SIZE);
        let block = as_block_mut(&mut tail[..BLOCK_SIZE]);
        cipher::decrypt_block(block, &keys);
        let prev: &Block = head[(idx - 1) * BLOCK_SIZE..]
            .try_into()
            .expect("head ends on a block boundary");
        xor_in_place(block, prev);
    }
    let first = as_block_mut(&mut data[..BLOCK_SIZE]);
    cipher::decrypt_block(first, &keys);
    xor_in_place(first, iv);
    Ok(())
}
