//! Static definitions of the three Arcs die kinds.
//!
//! Each kind exposes its full face list and a *reduced* face list: the
//! distinct face values with the number of physical faces carrying each value.
//! Enumeration runs over reduced faces (at most 5 per kind), which is what
//! keeps the combination count far below the `6^n` ordered-roll space.
//!
//! The skirmish die is statistically a coin — half its faces are a lone hit,
//! half are blank — so it is modeled as a 2-face die. This is why the total
//! microstate count is `2^s · 6^(a+r)` rather than `6^(s+a+r)`.

use Symbol::{Blank, BuildingHit, Flame, Hit, Intercept, Key};

/// One symbol printed on a die face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A hit against enemy ships.
    Hit,
    /// Self-damage.
    Flame,
    /// Intercept — at most one per roll takes effect.
    Intercept,
    Blank,
    /// A hit against enemy buildings.
    BuildingHit,
    /// A captured key (outrage resource).
    Key,
}

/// One die face: a fixed multiset of symbols.
pub type Face = &'static [Symbol];

/// Skirmish faces. Coin model: one hit face, one blank face, equally likely.
static SKIRMISH_FACES: [Face; 2] = [&[Blank], &[Hit]];
static SKIRMISH_REDUCED: [(Face, u32); 2] = [(&[Blank], 1), (&[Hit], 1)];

/// Assault faces in physical order; `hit hit` appears on two faces.
static ASSAULT_FACES: [Face; 6] = [
    &[Hit, Flame],
    &[Hit, Hit],
    &[Hit, Hit, Flame],
    &[Blank],
    &[Hit, Intercept],
    &[Hit, Hit],
];
static ASSAULT_REDUCED: [(Face, u32); 5] = [
    (&[Hit, Flame], 1),
    (&[Hit, Hit], 2),
    (&[Hit, Hit, Flame], 1),
    (&[Blank], 1),
    (&[Hit, Intercept], 1),
];

/// Raid faces in physical order; `building-hit flame` appears on two faces.
static RAID_FACES: [Face; 6] = [
    &[BuildingHit, Flame],
    &[Intercept],
    &[Intercept, Key, Key],
    &[Key, Flame],
    &[Key, BuildingHit],
    &[BuildingHit, Flame],
];
static RAID_REDUCED: [(Face, u32); 5] = [
    (&[BuildingHit, Flame], 2),
    (&[Intercept], 1),
    (&[Intercept, Key, Key], 1),
    (&[Key, Flame], 1),
    (&[Key, BuildingHit], 1),
];

/// One of the three Arcs die kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DieKind {
    Skirmish,
    Assault,
    Raid,
}

/// All die kinds in canonical (skirmish, assault, raid) order.
pub const DIE_KINDS: [DieKind; 3] = [DieKind::Skirmish, DieKind::Assault, DieKind::Raid];

impl DieKind {
    /// Full ordered face list for this kind.
    pub fn faces(self) -> &'static [Face] {
        match self {
            DieKind::Skirmish => &SKIRMISH_FACES,
            DieKind::Assault => &ASSAULT_FACES,
            DieKind::Raid => &RAID_FACES,
        }
    }

    /// Distinct face values with their physical frequencies.
    ///
    /// Frequencies sum to [`sides`](Self::sides) — the invariant that makes
    /// combination weights reproduce the ordered-roll count exactly.
    pub fn reduced_faces(self) -> &'static [(Face, u32)] {
        match self {
            DieKind::Skirmish => &SKIRMISH_REDUCED,
            DieKind::Assault => &ASSAULT_REDUCED,
            DieKind::Raid => &RAID_REDUCED,
        }
    }

    /// How many physical faces of this kind equal `face`.
    pub fn frequency(self, face: Face) -> u32 {
        self.faces().iter().filter(|f| **f == face).count() as u32
    }

    /// Microstate base: the number of physical faces (2 for skirmish, 6 otherwise).
    pub fn sides(self) -> u32 {
        self.faces().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_frequencies_sum_to_sides() {
        for kind in DIE_KINDS {
            let total: u32 = kind.reduced_faces().iter().map(|&(_, f)| f).sum();
            assert_eq!(
                total,
                kind.sides(),
                "{kind:?} reduced frequencies sum to {total}, expected {}",
                kind.sides()
            );
        }
    }

    #[test]
    fn test_reduced_faces_match_full_list() {
        for kind in DIE_KINDS {
            // Every reduced face carries the frequency counted from the full list.
            for &(face, freq) in kind.reduced_faces() {
                assert_eq!(kind.frequency(face), freq, "{kind:?} face {face:?}");
            }
            // Every physical face appears in the reduced list exactly once.
            for face in kind.faces() {
                let matches = kind
                    .reduced_faces()
                    .iter()
                    .filter(|(f, _)| f == face)
                    .count();
                assert_eq!(matches, 1, "{kind:?} face {face:?} in reduced list");
            }
        }
    }

    #[test]
    fn test_sides() {
        assert_eq!(DieKind::Skirmish.sides(), 2);
        assert_eq!(DieKind::Assault.sides(), 6);
        assert_eq!(DieKind::Raid.sides(), 6);
    }

    #[test]
    fn test_faces_non_empty() {
        for kind in DIE_KINDS {
            for face in kind.faces() {
                assert!(!face.is_empty(), "{kind:?} has an empty face");
            }
        }
    }
}
