//! Crate error taxonomy.
//!
//! Only caller-facing conditions are `Err`: a configuration that cannot be
//! resolved, or persisted text that does not parse. Internal consistency
//! failures (a microstate total that disagrees with the closed-form count)
//! indicate a bug in the dice tables or the enumerator and panic instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `convert_intercepts` was requested without a fresh-target count.
    /// Rejected before any enumeration work begins.
    #[error("cannot convert intercepts when fresh_targets is unset")]
    FreshTargetsUnset,

    /// A textual outcome key that does not follow the `{count}{letter}`
    /// contract (segments in H, B, D, K order, optional trailing `I`, or the
    /// literal `0`).
    #[error("malformed outcome key {key:?}: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    /// A persisted outcome table that is not valid JSON of `[key, prob]` pairs.
    #[error("malformed outcome table: {0}")]
    MalformedTable(#[from] serde_json::Error),
}
