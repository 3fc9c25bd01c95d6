//! Exact PMF computation by weighted enumeration of reduced-face combinations.
//!
//! For each pool the enumerator generates every combination-with-replacement
//! of that kind's reduced faces, as a count vector `(k₁..kₘ)` with
//! `Σkᵢ = n`. Each combination carries:
//!
//! - its **adjusted multinomial coefficient** `n!/∏kᵢ! · ∏freqᵢ^kᵢ` — the
//!   number of ordered rolls of physical dice producing it — computed once,
//!   in exact `u128` arithmetic;
//! - its **partial outcome**: the combination's symbols pre-folded into an
//!   [`Outcome`] record, so cross-product tuples merge three small records
//!   instead of re-walking symbols.
//!
//! The cross product of the three pools runs as a rayon map-reduce: each
//! worker folds weights into its own `HashMap<Outcome, u128>`, partitions
//! merge by summation. The grand total must equal `2^s · 6^(a+r)` exactly
//! (integer equality) before weights normalize to probabilities.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dice::DieKind;
use crate::error::Error;
use crate::outcome::Outcome;

/// How many dice of each kind to roll, and how intercepts resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    pub skirmish: u32,
    pub assault: u32,
    pub raid: u32,
    /// Number of fresh ships being attacked. Only consulted when
    /// `convert_intercepts` is set.
    pub fresh_targets: Option<u32>,
    /// Convert the (at most one effective) intercept into `fresh_targets`
    /// self-damage instead of reporting it as an unresolved marker.
    pub convert_intercepts: bool,
}

impl RollConfig {
    pub fn new(skirmish: u32, assault: u32, raid: u32) -> Self {
        RollConfig {
            skirmish,
            assault,
            raid,
            fresh_targets: None,
            convert_intercepts: false,
        }
    }

    /// Enable intercept conversion against `fresh_targets` fresh ships.
    pub fn with_conversion(mut self, fresh_targets: u32) -> Self {
        self.fresh_targets = Some(fresh_targets);
        self.convert_intercepts = true;
        self
    }

    pub fn total_dice(&self) -> u32 {
        self.skirmish + self.assault + self.raid
    }

    /// Check the intercept-conversion precondition.
    pub fn validate(&self) -> Result<(), Error> {
        self.conversion().map(|_| ())
    }

    /// The conversion to hand to [`Outcome::finish`]: `Some(fresh_targets)`
    /// when converting, `None` when intercepts stay unresolved.
    pub(crate) fn conversion(&self) -> Result<Option<u32>, Error> {
        if self.convert_intercepts {
            Ok(Some(self.fresh_targets.ok_or(Error::FreshTargetsUnset)?))
        } else {
            Ok(None)
        }
    }

    /// Closed-form microstate count: `2^skirmish · 6^(assault+raid)`.
    pub fn expected_microstates(&self) -> u128 {
        let kinds = [
            (DieKind::Skirmish, self.skirmish),
            (DieKind::Assault, self.assault),
            (DieKind::Raid, self.raid),
        ];
        let mut total: u128 = 1;
        for (kind, count) in kinds {
            let pool = (kind.sides() as u128)
                .checked_pow(count)
                .expect("microstate count overflows u128");
            total = total
                .checked_mul(pool)
                .expect("microstate count overflows u128");
        }
        total
    }

    /// Pool several individually-configured rolls into one combined roll.
    ///
    /// Per-kind counts add: rolling the combined pool once is equivalent to
    /// rolling the parts together (tested). Conversion settings come from the
    /// first configuration and must agree across all of them.
    pub fn combined(rolls: &[RollConfig]) -> RollConfig {
        let Some((first, rest)) = rolls.split_first() else {
            return RollConfig::default();
        };
        let mut acc = *first;
        for roll in rest {
            debug_assert_eq!(
                (roll.fresh_targets, roll.convert_intercepts),
                (first.fresh_targets, first.convert_intercepts),
                "combined rolls disagree on intercept conversion"
            );
            acc.skirmish += roll.skirmish;
            acc.assault += roll.assault;
            acc.raid += roll.raid;
        }
        acc
    }
}

/// The probability mass function over macrostates for one configuration.
///
/// Entries are sorted ascending by probability; equal probabilities order
/// lexicographically by textual key, which keeps the output deterministic
/// across thread counts.
#[derive(Clone, Debug)]
pub struct Pmf {
    entries: Vec<(Outcome, f64)>,
}

impl Pmf {
    /// Sort entries into canonical order: ascending probability, ties by key.
    pub(crate) fn from_unsorted(mut entries: Vec<(Outcome, f64)>) -> Pmf {
        entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.key().cmp(&b.0.key())));
        Pmf { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &(Outcome, f64)> {
        self.entries.iter()
    }

    /// Entries rendered to the textual-key boundary form.
    pub fn keyed(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.entries.iter().map(|(o, p)| (o.key(), *p))
    }

    /// Sum of all probabilities (1.0 up to float error).
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// Probability of one macrostate (0.0 when absent).
    pub fn probability_of(&self, outcome: &Outcome) -> f64 {
        self.entries
            .iter()
            .find(|(o, _)| o == outcome)
            .map_or(0.0, |(_, p)| *p)
    }
}

/// Diagnostics from one enumeration pass. Not part of the correctness
/// contract.
#[derive(Clone, Copy, Debug)]
pub struct EnumerationStats {
    /// Cross-product tuples visited (combinations, not microstates).
    pub loop_iterations: u64,
    /// Distinct macrostates in the PMF.
    pub distinct_outcomes: usize,
    /// Total microstate weight; equals `2^s · 6^(a+r)`.
    pub grand_total: u128,
    pub elapsed: Duration,
}

/// One combination-with-replacement of a pool's reduced faces.
struct PoolCombination {
    /// The combination's symbols pre-folded into an outcome record
    /// (conversion not yet applied).
    partial: Outcome,
    /// Adjusted multinomial coefficient: ordered physical rolls represented.
    microstates: u128,
}

/// Binomial coefficient C(n, k) in exact integer arithmetic.
///
/// The running product after step i is C(n, i+1), an integer, so the division
/// is always exact.
fn binomial(n: u32, k: u32) -> u128 {
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc
            .checked_mul(n - i)
            .expect("binomial coefficient overflows u128")
            / (i + 1);
    }
    acc
}

/// Multinomial coefficient n!/∏kᵢ! as a product of binomials.
fn multinomial(n: u32, counts: &[u32]) -> u128 {
    let mut remaining = n;
    let mut acc: u128 = 1;
    for &k in counts {
        acc = acc
            .checked_mul(binomial(remaining, k))
            .expect("multinomial coefficient overflows u128");
        remaining -= k;
    }
    acc
}

/// All combinations-with-replacement of `count` dice over a kind's reduced
/// faces, each with its adjusted multinomial coefficient and partial outcome.
///
/// A pool of zero dice contributes a single empty combination with
/// coefficient 1, so absent pools are identities in the cross product.
fn pool_combinations(kind: DieKind, count: u32) -> Vec<PoolCombination> {
    let reduced = kind.reduced_faces();
    let mut combos = Vec::new();
    let mut counts = vec![0u32; reduced.len()];
    fill_counts(kind, &mut counts, 0, count, &mut combos);
    combos
}

fn fill_counts(
    kind: DieKind,
    counts: &mut Vec<u32>,
    position: usize,
    remaining: u32,
    combos: &mut Vec<PoolCombination>,
) {
    let reduced = kind.reduced_faces();
    if position + 1 == reduced.len() {
        counts[position] = remaining;
        combos.push(weigh_combination(kind, counts));
        counts[position] = 0;
        return;
    }
    for take in 0..=remaining {
        counts[position] = take;
        fill_counts(kind, counts, position + 1, remaining - take, combos);
    }
    counts[position] = 0;
}

/// Resolve one count vector into its weighted partial outcome.
fn weigh_combination(kind: DieKind, counts: &[u32]) -> PoolCombination {
    let reduced = kind.reduced_faces();
    let n: u32 = counts.iter().sum();

    let mut microstates = multinomial(n, counts);
    let mut partial = Outcome::default();
    for (&(face, freq), &k) in reduced.iter().zip(counts) {
        if k == 0 {
            continue;
        }
        // Each copy of a reduced face stands for `freq` physical faces.
        let face_ways = (freq as u128)
            .checked_pow(k)
            .expect("microstate weight overflows u128");
        microstates = microstates
            .checked_mul(face_ways)
            .expect("microstate weight overflows u128");
        for _ in 0..k {
            partial.absorb_face(face);
        }
    }
    PoolCombination {
        partial,
        microstates,
    }
}

/// Compute the exact PMF for one roll configuration.
///
/// Fails up front on an invalid configuration; panics if the enumerated
/// microstate total disagrees with the closed form (an internal bug, never a
/// data condition). A zero-die configuration yields the single `"0"` outcome
/// with probability exactly 1.0.
pub fn compute_pmf(cfg: &RollConfig) -> Result<Pmf, Error> {
    compute_pmf_with_stats(cfg).map(|(pmf, _)| pmf)
}

/// [`compute_pmf`] plus enumeration diagnostics.
pub fn compute_pmf_with_stats(cfg: &RollConfig) -> Result<(Pmf, EnumerationStats), Error> {
    let conversion = cfg.conversion()?;
    let start = Instant::now();

    let skirmish = pool_combinations(DieKind::Skirmish, cfg.skirmish);
    let assault = pool_combinations(DieKind::Assault, cfg.assault);
    let raid = pool_combinations(DieKind::Raid, cfg.raid);

    // Map: each skirmish combination folds its slice of the cross product
    // into a private map. Reduce: merge by summation — outcome aggregation
    // is commutative, so partition order is irrelevant.
    let weights: HashMap<Outcome, u128> = skirmish
        .par_iter()
        .map(|s| {
            let mut local: HashMap<Outcome, u128> = HashMap::new();
            for a in &assault {
                let sa_partial = s.partial.merged(&a.partial);
                let sa_weight = s
                    .microstates
                    .checked_mul(a.microstates)
                    .expect("microstate weight overflows u128");
                for r in &raid {
                    let outcome = sa_partial.merged(&r.partial).finish(conversion);
                    let weight = sa_weight
                        .checked_mul(r.microstates)
                        .expect("microstate weight overflows u128");
                    *local.entry(outcome).or_insert(0) += weight;
                }
            }
            local
        })
        .reduce(HashMap::new, |mut into, from| {
            for (outcome, weight) in from {
                *into.entry(outcome).or_insert(0) += weight;
            }
            into
        });

    let grand_total: u128 = weights.values().sum();
    let expected = cfg.expected_microstates();
    assert_eq!(
        grand_total,
        expected,
        "microstate total mismatch: counted {grand_total}, closed form 2^{} * 6^{} = {expected}",
        cfg.skirmish,
        cfg.assault + cfg.raid
    );

    let stats = EnumerationStats {
        loop_iterations: (skirmish.len() * assault.len() * raid.len()) as u64,
        distinct_outcomes: weights.len(),
        grand_total,
        elapsed: start.elapsed(),
    };
    log::debug!(
        "enumerated {} cross-product tuples into {} outcomes in {:?}",
        stats.loop_iterations,
        stats.distinct_outcomes,
        stats.elapsed
    );

    let entries = weights
        .into_iter()
        .map(|(outcome, weight)| (outcome, weight as f64 / grand_total as f64))
        .collect();
    Ok((Pmf::from_unsorted(entries), stats))
}
