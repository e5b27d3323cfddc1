//! Round-stage observer hook for diagnostics.
//!
//! Observers are a debugging aid, not part of the cryptographic contract.
//! The plain cipher paths use [`NullObserver`], so untraced callers pay
//! nothing for the hook.

use crate::block::Block;

/// Identifies the transformation that produced the state handed to an
/// observer callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStage {
    /// State as handed to the cipher, before any transformation.
    Start,
    /// After SubBytes.
    SubBytes,
    /// After ShiftRows.
    ShiftRows,
    /// After MixColumns.
    MixColumns,
    /// After AddRoundKey.
    AddRoundKey,
    /// After the inverse SubBytes.
    InvSubBytes,
    /// After the inverse ShiftRows.
    InvShiftRows,
    /// After the inverse MixColumns.
    InvMixColumns,
    /// Final state, after the last AddRoundKey.
    End,
}

/// Observer invoked between round stages by
/// [`encrypt_block_with`](crate::encrypt_block_with) and
/// [`decrypt_block_with`](crate::decrypt_block_with).
///
/// The default implementation ignores every callback, so an observer only
/// overrides what it cares about.
pub trait RoundObserver {
    /// Called with the state after each stage of each round.
    fn on_stage(&mut self, round: usize, stage: RoundStage, state: &Block) {
        let _ = (round, stage, state);
    }
}

/// Observer that ignores every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl RoundObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{decrypt_block_with, encrypt_block, encrypt_block_with, expand_key};
    use crate::key::Variant;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(usize, RoundStage)>,
    }

    impl RoundObserver for Recorder {
        fn on_stage(&mut self, round: usize, stage: RoundStage, _state: &Block) {
            self.events.push((round, stage));
        }
    }

    #[test]
    fn observer_sees_every_stage_of_a_forward_cipher() {
        let keys = expand_key(&[0u8; 16], Variant::Aes128).expect("key length matches variant");
        let mut block = [0u8; 16];
        let mut recorder = Recorder::default();
        encrypt_block_with(&mut block, &keys, &mut recorder);
        // Start + initial AddRoundKey, four stages for rounds 1..=9, and
        // SubBytes/ShiftRows/End for the final round.
        assert_eq!(recorder.events.len(), 41);
        assert_eq!(recorder.events.first(), Some(&(0, RoundStage::Start)));
        assert_eq!(recorder.events.last(), Some(&(10, RoundStage::End)));
    }

    #[test]
    fn observer_sees_every_stage_of_an_inverse_cipher() {
        let keys = expand_key(&[0u8; 16], Variant::Aes128).expect("key length matches variant");
        let mut block = [0u8; 16];
        let mut recorder = Recorder::default();
        decrypt_block_with(&mut block, &keys, &mut recorder);
        assert_eq!(recorder.events.len(), 41);
        assert_eq!(recorder.events.first(), Some(&(10, RoundStage::Start)));
        assert_eq!(recorder.events.last(), Some(&(0, RoundStage::End)));
        assert!(recorder
            .events
            .iter()
            .any(|&(_, stage)| stage == RoundStage::InvMixColumns));
    }

    #[test]
    fn traced_and_plain_paths_agree() {
        let keys = expand_key(&[0x5au8; 24], Variant::Aes192).expect("key length matches variant");
        let mut traced = *b"0123456789abcdef";
        let mut plain = traced;
        let mut recorder = Recorder::default();
        encrypt_block_with(&mut traced, &keys, &mut recorder);
        encrypt_block(&mut plain, &keys);
        assert_eq!(traced, plain);
        assert!(!recorder.events.is_empty());
    }
}
