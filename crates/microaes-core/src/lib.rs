//! Compact AES (Rijndael) core with ECB and CBC modes over 128/192/256-bit
//! keys.
//!
//! The crate follows the FIPS-197 specification and provides:
//! - Key schedule for all three key lengths.
//! - Single-block encryption and decryption.
//! - In-place ECB and CBC drivers over short caller-supplied buffers.
//!
//! Buffers are mutated in place and never reallocated; the expanded key
//! schedule lives on the stack for the duration of one call and is wiped on
//! drop. No state persists between calls, so concurrent calls on disjoint
//! buffers need no coordination.
//!
//! The implementation aims for clarity and testability rather than
//! constant-time guarantees; the table lookups are data-dependent, so it
//! should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod key;
mod mode;
mod round;
mod sbox;
mod trace;

pub use crate::block::{Block, BLOCK_SIZE};
pub use crate::cipher::{
    aes128_decrypt_block, aes128_encrypt_block, aes192_decrypt_block, aes192_encrypt_block,
    aes256_decrypt_block, aes256_encrypt_block, decrypt_block, decrypt_block_with, encrypt_block,
    encrypt_block_with, expand_key,
};
pub use crate::key::{RoundKeys, Variant};
pub use crate::mode::{
    cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt, Error, MAX_INPUT_SIZE, MAX_KEY_SIZE,
};
pub use crate::trace::{NullObserver, RoundObserver, RoundStage};
