//! Min/max bound queries over a computed PMF.
//!
//! A [`Bounds`] record carries up to eight optional constraints (min/max for
//! each of hits, damage, keys, building hits). Matching is a pure
//! conjunction: every supplied bound must hold, unsupplied bounds constrain
//! nothing. Alongside the matched probability the query returns a
//! human-readable description of the active bounds; the phrase table is total
//! over all eight fields and deterministic.

use serde::{Deserialize, Serialize};

use crate::enumerate::Pmf;
use crate::outcome::Outcome;

/// Optional min/max constraints on the four resolved fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_hits: Option<u32>,
    pub max_hits: Option<u32>,
    pub min_damage: Option<u32>,
    pub max_damage: Option<u32>,
    pub min_keys: Option<u32>,
    pub max_keys: Option<u32>,
    pub min_building_hits: Option<u32>,
    pub max_building_hits: Option<u32>,
}

impl Bounds {
    /// True iff every supplied bound is satisfied by `outcome`.
    pub fn matches(&self, outcome: &Outcome) -> bool {
        let within = |value: u32, min: Option<u32>, max: Option<u32>| {
            min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
        };
        within(outcome.hits, self.min_hits, self.max_hits)
            && within(outcome.damage, self.min_damage, self.max_damage)
            && within(outcome.keys, self.min_keys, self.max_keys)
            && within(
                outcome.building_hits,
                self.min_building_hits,
                self.max_building_hits,
            )
    }

    /// True when no bound is supplied (every outcome matches).
    pub fn is_unconstrained(&self) -> bool {
        *self == Bounds::default()
    }

    /// Human-readable description of the active bounds, joined with " and ".
    ///
    /// Every bound field has a fixed phrase; an unconstrained record reads
    /// "any outcome".
    pub fn describe(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(n) = self.min_hits {
            conditions.push(format!("hitting at least {n} times"));
        }
        if let Some(n) = self.max_hits {
            conditions.push(format!("hitting no more than {n} times"));
        }
        if let Some(n) = self.min_damage {
            conditions.push(format!("taking at least {n} damage"));
        }
        if let Some(n) = self.max_damage {
            conditions.push(format!("taking no more than {n} damage"));
        }
        if let Some(n) = self.min_keys {
            conditions.push(format!("getting at least {n} keys"));
        }
        if let Some(n) = self.max_keys {
            conditions.push(format!("getting no more than {n} keys"));
        }
        if let Some(n) = self.min_building_hits {
            conditions.push(format!("hitting buildings at least {n} times"));
        }
        if let Some(n) = self.max_building_hits {
            conditions.push(format!("hitting buildings no more than {n} times"));
        }
        if conditions.is_empty() {
            return "any outcome".to_string();
        }
        conditions.join(" and ")
    }
}

/// Sum the probability of all macrostates satisfying `bounds`, with a
/// description of the condition evaluated.
pub fn probability_matching(pmf: &Pmf, bounds: &Bounds) -> (f64, String) {
    let matched = pmf
        .iter()
        .filter(|(outcome, _)| bounds.matches(outcome))
        .map(|(_, prob)| prob)
        .sum();
    (matched, bounds.describe())
}
