//! Seeded single-roll sampler — a stochastic cross-check for the exact PMF.
//!
//! Rolls the **full** face lists uniformly, so it shares nothing with the
//! reduced-face enumeration path: agreement between empirical frequencies and
//! [`compute_pmf`](crate::enumerate::compute_pmf) exercises the dice tables,
//! the resolver, and the weighting independently. Deterministic given the
//! seed; not part of the engine's correctness contract.

use crate::dice::{DieKind, DIE_KINDS};
use crate::enumerate::RollConfig;
use crate::error::Error;
use crate::outcome::Outcome;

/// SplitMix64 PRNG — single u64 state, good statistical quality.
#[derive(Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next u64.
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Index into `0..sides` by multiply-high on 12 bits.
    ///
    /// Max bias 6/4096 ≈ 0.15% — below the tolerance of any sampling
    /// cross-check this module supports.
    #[inline(always)]
    fn face_index(&mut self, sides: u64) -> usize {
        (((self.next_u64() & 0xFFF) * sides) >> 12) as usize
    }
}

/// Roll one configuration's dice and resolve the drawn faces.
///
/// Validates the intercept-conversion precondition exactly like the
/// enumerator.
pub fn sample_outcome(cfg: &RollConfig, rng: &mut SplitMix64) -> Result<Outcome, Error> {
    let conversion = cfg.conversion()?;

    let mut acc = Outcome::default();
    for kind in DIE_KINDS {
        let count = match kind {
            DieKind::Skirmish => cfg.skirmish,
            DieKind::Assault => cfg.assault,
            DieKind::Raid => cfg.raid,
        };
        let faces = kind.faces();
        for _ in 0..count {
            acc.absorb_face(faces[rng.face_index(faces.len() as u64)]);
        }
    }
    Ok(acc.finish(conversion))
}
