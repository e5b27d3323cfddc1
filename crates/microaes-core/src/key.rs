//! Variant selection and the expanded round-key schedule.

use zeroize::Zeroize;

use crate::block::Block;

// Words per block (Nb). Fixed at 4 for every AES variant.
pub(crate) const NB: usize = 4;

// Round keys in the largest schedule (AES-256: Nr + 1 = 15).
pub(crate) const MAX_ROUND_KEYS: usize = 15;

// 32-bit words in the largest schedule (Nb * (Nr + 1) = 60).
pub(crate) const MAX_SCHEDULE_WORDS: usize = NB * MAX_ROUND_KEYS;

/// Selects the AES key length and, with it, the `(Nk, Nr)` parameter pair.
///
/// Raw tag values match the wire convention of the surrounding tooling:
/// 0, 1 and 2 for the three key lengths, with 3 reserved as an upper
/// sentinel that [`Variant::from_tag`] rejects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Variant {
    /// 128-bit key: Nk = 4, 10 rounds.
    Aes128 = 0,
    /// 192-bit key: Nk = 6, 12 rounds.
    Aes192 = 1,
    /// 256-bit key: Nk = 8, 14 rounds.
    Aes256 = 2,
}

impl Variant {
    /// The three supported variants, in tag order.
    pub const ALL: [Variant; 3] = [Variant::Aes128, Variant::Aes192, Variant::Aes256];

    /// Number of 32-bit words in the master key (`Nk`).
    #[inline]
    pub fn key_words(self) -> usize {
        match self {
            Variant::Aes128 => 4,
            Variant::Aes192 => 6,
            Variant::Aes256 => 8,
        }
    }

    /// Number of cipher rounds (`Nr`).
    #[inline]
    pub fn rounds(self) -> usize {
        match self {
            Variant::Aes128 => 10,
            Variant::Aes192 => 12,
            Variant::Aes256 => 14,
        }
    }

    /// Master key length in bytes.
    #[inline]
    pub fn key_len(self) -> usize {
        self.key_words() * 4
    }

    /// Raw tag value of this variant.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Maps a raw tag back to a variant, rejecting the reserved sentinel (3)
    /// and everything beyond it.
    pub fn from_tag(tag: u8) -> Option<Variant> {
        match tag {
            0 => Some(Variant::Aes128),
            1 => Some(Variant::Aes192),
            2 => Some(Variant::Aes256),
            _ => None,
        }
    }
}

/// Expanded round-key schedule.
///
/// Built once per cipher call by [`expand_key`](crate::expand_key), held on
/// the stack, and wiped when dropped. The backing storage is sized for the
/// largest variant; `rounds` records how much of it is live.
#[derive(Clone)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUND_KEYS],
    rounds: usize,
}

impl RoundKeys {
    pub(crate) fn new(keys: [Block; MAX_ROUND_KEYS], rounds: usize) -> Self {
        Self { keys, rounds }
    }

    /// Round key for `round`, valid for `0..=rounds()`.
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[round]
    }

    /// Number of cipher rounds (`Nr`) this schedule covers; the schedule
    /// holds `rounds() + 1` round keys.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl Drop for RoundKeys {
    fn drop(&mut self) {
        self.keys.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parameters_match_fips() {
        assert_eq!(Variant::Aes128.key_words(), 4);
        assert_eq!(Variant::Aes128.rounds(), 10);
        assert_eq!(Variant::Aes128.key_len(), 16);
        assert_eq!(Variant::Aes192.key_words(), 6);
        assert_eq!(Variant::Aes192.rounds(), 12);
        assert_eq!(Variant::Aes192.key_len(), 24);
        assert_eq!(Variant::Aes256.key_words(), 8);
        assert_eq!(Variant::Aes256.rounds(), 14);
        assert_eq!(Variant::Aes256.key_len(), 32);
    }

    #[test]
    fn tag_mapping_round_trips_and_rejects_the_sentinel() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_tag(variant.tag()), Some(variant));
        }
        assert_eq!(Variant::from_tag(3), None);
        assert_eq!(Variant::from_tag(0xff), None);
    }
}
