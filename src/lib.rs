//! # arcs-dice — exact Arcs dice-pool probabilities
//!
//! Computes the exact probability of every distinguishable outcome of rolling
//! a pool of Arcs combat dice (skirmish, assault, raid) by **weighted
//! enumeration of unordered face combinations** instead of brute-forcing all
//! `2^s · 6^(a+r)` ordered rolls.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`dice`] | Static face tables per die kind, deduplicated into reduced faces with physical frequencies |
//! | 2 | [`outcome`] | Symbol resolution (single-intercept rule, fresh-target conversion) and the textual outcome key |
//! | 3 | [`enumerate`] | Combinations-with-replacement per pool, adjusted multinomial microstate counts, cross-product fold into a PMF |
//! | 4 | [`query`], [`table`] | Min/max bound queries, joint-table expansion, marginalization, JSON persistence |
//!
//! ## Counting
//!
//! Each unordered combination of reduced faces stands for
//! `N!/∏kᵢ! · ∏freqᵢ^kᵢ` ordered die rolls (the *adjusted multinomial
//! coefficient*). Summing these weights over the cross product of the three
//! pools must reproduce the full microstate count `2^s · 6^(a+r)` exactly —
//! the enumerator verifies this identity in integer arithmetic on every call
//! before normalizing to probabilities.
//!
//! The computation is pure and deterministic: same configuration, same PMF,
//! same order (ascending probability, ties broken by textual key).

pub mod dice;
pub mod enumerate;
pub mod error;
pub mod outcome;
pub mod query;
pub mod sampling;
pub mod table;

pub use dice::{DieKind, Face, Symbol};
pub use enumerate::{compute_pmf, compute_pmf_with_stats, EnumerationStats, Pmf, RollConfig};
pub use error::Error;
pub use outcome::Outcome;
pub use query::{probability_matching, Bounds};
pub use table::{from_json, marginalize, to_json, to_table, OutcomeRow, TableField};
