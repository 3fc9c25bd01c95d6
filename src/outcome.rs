//! Symbol resolution and the textual outcome key.
//!
//! An [`Outcome`] is both the accumulator a roll's symbols fold into and the
//! aggregation key of the PMF: two rolls that resolve to equal field values
//! are the same macrostate. The textual form (`"2H1D"`, `"1B2KI"`, `"0"`) is
//! produced only at the boundary and parses back losslessly.
//!
//! Resolution rules:
//! - every `hit`, `flame`, `building-hit`, `key` symbol increments its
//!   counter; blanks count for nothing;
//! - at most one intercept per roll takes effect, no matter how many
//!   intercept faces were drawn;
//! - when conversion is enabled, that one intercept becomes `fresh_targets`
//!   self-damage and leaves no marker; otherwise the key carries a trailing
//!   `I` so the caller can see the roll is not fully resolved.

use std::fmt;

use crate::dice::{Face, Symbol};
use crate::error::Error;

/// A resolved macrostate: symbol counters plus the intercept flag.
///
/// Field order matches key emission order (H, B, D, K).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub hits: u32,
    pub building_hits: u32,
    pub damage: u32,
    pub keys: u32,
    /// An intercept was drawn and has not been converted to damage.
    pub intercept: bool,
}

impl Outcome {
    /// Fold one drawn face's symbols into the accumulator.
    ///
    /// Intercepts only set the flag here; the at-most-once effect is applied
    /// by [`finish`](Self::finish) so that merging partial accumulators stays
    /// a plain field-wise sum.
    pub fn absorb_face(&mut self, face: Face) {
        for &symbol in face {
            match symbol {
                Symbol::Hit => self.hits += 1,
                Symbol::Flame => self.damage += 1,
                Symbol::Intercept => self.intercept = true,
                Symbol::Blank => {}
                Symbol::BuildingHit => self.building_hits += 1,
                Symbol::Key => self.keys += 1,
            }
        }
    }

    /// Merge two partial accumulators: counters add, intercept flags OR.
    pub fn merged(&self, other: &Outcome) -> Outcome {
        Outcome {
            hits: self.hits + other.hits,
            building_hits: self.building_hits + other.building_hits,
            damage: self.damage + other.damage,
            keys: self.keys + other.keys,
            intercept: self.intercept || other.intercept,
        }
    }

    /// Apply the at-most-once intercept effect.
    ///
    /// `conversion` is `Some(fresh_targets)` when intercepts convert to
    /// self-damage, `None` when an unresolved intercept stays on the record
    /// as the `I` marker. Callers that take the raw `(fresh_targets,
    /// convert_intercepts)` pair should go through [`resolve_faces`], which
    /// validates the combination first.
    pub fn finish(mut self, conversion: Option<u32>) -> Outcome {
        if self.intercept {
            if let Some(fresh_targets) = conversion {
                self.damage += fresh_targets;
                self.intercept = false;
            }
        }
        self
    }

    /// True when every counter is zero and no intercept marker applies.
    pub fn is_zero(&self) -> bool {
        self.hits == 0
            && self.building_hits == 0
            && self.damage == 0
            && self.keys == 0
            && !self.intercept
    }

    /// Render the canonical textual key.
    ///
    /// Nonzero fields only, fixed H, B, D, K order, optional trailing `I`;
    /// the all-zero outcome is the literal `"0"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Parse a textual key back into its field values.
    ///
    /// Accepts exactly what [`key`](Self::key) produces: `(\d+)[HBDK]`
    /// segments plus an optional bare trailing `I`, or the literal `"0"`.
    pub fn parse_key(key: &str) -> Result<Outcome, Error> {
        let malformed = |reason| Error::MalformedKey {
            key: key.to_string(),
            reason,
        };

        if key == "0" {
            return Ok(Outcome::default());
        }
        if key.is_empty() {
            return Err(malformed("empty key"));
        }

        let mut out = Outcome::default();
        let mut pending: Option<u32> = None;
        for c in key.chars() {
            if let Some(d) = c.to_digit(10) {
                let acc = pending.unwrap_or(0);
                pending = Some(
                    acc.checked_mul(10)
                        .and_then(|v| v.checked_add(d))
                        .ok_or_else(|| malformed("count out of range"))?,
                );
                continue;
            }
            if c == 'I' {
                if pending.is_some() {
                    return Err(malformed("intercept marker carries no count"));
                }
                if out.intercept {
                    return Err(malformed("duplicate intercept marker"));
                }
                out.intercept = true;
                continue;
            }
            let count = pending.take().ok_or_else(|| malformed("field without count"))?;
            if count == 0 {
                return Err(malformed("zero-valued fields are omitted, not emitted"));
            }
            let field = match c {
                'H' => &mut out.hits,
                'B' => &mut out.building_hits,
                'D' => &mut out.damage,
                'K' => &mut out.keys,
                _ => return Err(malformed("unknown field letter")),
            };
            if *field != 0 {
                return Err(malformed("duplicate field"));
            }
            *field = count;
        }
        if pending.is_some() {
            return Err(malformed("trailing count without field letter"));
        }
        Ok(out)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (count, letter) in [
            (self.hits, 'H'),
            (self.building_hits, 'B'),
            (self.damage, 'D'),
            (self.keys, 'K'),
        ] {
            if count > 0 {
                write!(f, "{count}{letter}")?;
            }
        }
        if self.intercept {
            write!(f, "I")?;
        }
        Ok(())
    }
}

/// Resolve one drawn face per rolled die into a single macrostate.
///
/// The three slices are the faces drawn from each pool (empty when the pool
/// was not rolled). Fails before touching any symbol if `convert_intercepts`
/// is set without `fresh_targets`.
pub fn resolve_faces(
    skirmish: &[Face],
    assault: &[Face],
    raid: &[Face],
    fresh_targets: Option<u32>,
    convert_intercepts: bool,
) -> Result<Outcome, Error> {
    let conversion = if convert_intercepts {
        Some(fresh_targets.ok_or(Error::FreshTargetsUnset)?)
    } else {
        None
    };

    let mut acc = Outcome::default();
    for &face in skirmish.iter().chain(assault).chain(raid) {
        acc.absorb_face(face);
    }
    let resolved = acc.finish(conversion);

    // Symbols a pool cannot produce must never appear in its resolution.
    if assault.is_empty() && raid.is_empty() {
        debug_assert!(
            resolved.damage == 0 && resolved.building_hits == 0 && resolved.keys == 0,
            "skirmish-only roll resolved to {resolved:?}"
        );
        debug_assert!(!resolved.intercept, "skirmish-only roll saw an intercept");
    }
    if raid.is_empty() {
        debug_assert!(
            resolved.building_hits == 0 && resolved.keys == 0,
            "raid-free roll resolved to {resolved:?}"
        );
    }
    Ok(resolved)
}
