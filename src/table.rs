//! Joint outcome table: PMF rows expanded into the four semantic fields.
//!
//! Each PMF entry becomes one row of `{hits, damage, building_hits, keys,
//! prob}`. Grouping rows by any subset of the fields and summing probability
//! is itself a probability distribution — the property downstream charting
//! relies on. The module also reads and writes the persisted table format:
//! a JSON array of `[key, prob]` pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enumerate::Pmf;
use crate::error::Error;
use crate::outcome::Outcome;

/// One joint-table row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub hits: u32,
    pub damage: u32,
    pub building_hits: u32,
    pub keys: u32,
    pub prob: f64,
}

/// A groupable field of the joint table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableField {
    Hits,
    Damage,
    BuildingHits,
    Keys,
}

impl TableField {
    fn of(self, row: &OutcomeRow) -> u32 {
        match self {
            TableField::Hits => row.hits,
            TableField::Damage => row.damage,
            TableField::BuildingHits => row.building_hits,
            TableField::Keys => row.keys,
        }
    }
}

/// Expand a PMF into joint-table rows, one per macrostate, in PMF order.
///
/// Macrostates differing only in the unresolved-intercept marker expand to
/// rows with identical field values; marginalization sums them.
pub fn to_table(pmf: &Pmf) -> Vec<OutcomeRow> {
    pmf.iter()
        .map(|(outcome, prob)| OutcomeRow {
            hits: outcome.hits,
            damage: outcome.damage,
            building_hits: outcome.building_hits,
            keys: outcome.keys,
            prob: *prob,
        })
        .collect()
}

/// Group rows by the projection onto `fields` and sum probability.
///
/// Rows come back sorted by projection value, so the marginal distribution is
/// deterministic. Projecting onto no fields collapses everything into a
/// single total (1.0 for a full table).
pub fn marginalize(rows: &[OutcomeRow], fields: &[TableField]) -> Vec<(Vec<u32>, f64)> {
    let mut groups: HashMap<Vec<u32>, f64> = HashMap::new();
    for row in rows {
        let projection: Vec<u32> = fields.iter().map(|f| f.of(row)).collect();
        *groups.entry(projection).or_insert(0.0) += row.prob;
    }
    let mut marginal: Vec<(Vec<u32>, f64)> = groups.into_iter().collect();
    marginal.sort_by(|a, b| a.0.cmp(&b.0));
    marginal
}

/// Serialize a PMF as the persisted table format: `[["1H", 0.4], …]`,
/// in PMF order.
pub fn to_json(pmf: &Pmf) -> String {
    let pairs: Vec<(String, f64)> = pmf.keyed().collect();
    // Strings and finite floats cannot fail to serialize.
    serde_json::to_string(&pairs).expect("outcome table serialization failed")
}

/// Read a persisted `[key, prob]` table back into a PMF.
///
/// Keys are parsed through the textual contract; the entries re-sort into
/// canonical PMF order.
pub fn from_json(json: &str) -> Result<Pmf, Error> {
    let pairs: Vec<(String, f64)> = serde_json::from_str(json)?;
    let entries = pairs
        .into_iter()
        .map(|(key, prob)| Ok((Outcome::parse_key(&key)?, prob)))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Pmf::from_unsorted(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pmf_of(entries: &[(&str, f64)]) -> Pmf {
        Pmf::from_unsorted(
            entries
                .iter()
                .map(|(key, prob)| (Outcome::parse_key(key).unwrap(), *prob))
                .collect(),
        )
    }

    #[test]
    fn test_to_table_expands_fields() {
        let pmf = pmf_of(&[("2H1D", 0.5), ("1B2K", 0.3), ("0", 0.2)]);
        let rows = to_table(&pmf);
        assert_eq!(rows.len(), 3);

        let heavy = rows.iter().find(|r| r.hits == 2).unwrap();
        assert_eq!(heavy.damage, 1);
        assert_eq!(heavy.building_hits, 0);
        assert_eq!(heavy.keys, 0);
        assert!((heavy.prob - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_marginalize_single_field() {
        let pmf = pmf_of(&[("1H", 0.25), ("1H2D", 0.25), ("2H", 0.25), ("0", 0.25)]);
        let rows = to_table(&pmf);
        let marginal = marginalize(&rows, &[TableField::Hits]);
        // 0.25 sums are exact in binary, so direct equality is safe here.
        assert_eq!(
            marginal,
            vec![
                (vec![0], 0.25),
                (vec![1], 0.5),
                (vec![2], 0.25),
            ]
        );
        let total: f64 = marginal.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_marginalize_merges_intercept_variants() {
        // "1H" and "1HI" project onto the same field values.
        let pmf = pmf_of(&[("1H", 0.6), ("1HI", 0.4)]);
        let rows = to_table(&pmf);
        let marginal = marginalize(&rows, &[TableField::Hits, TableField::Damage]);
        assert_eq!(marginal.len(), 1);
        assert!((marginal[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip() {
        let pmf = pmf_of(&[("0", 0.25), ("1H1DI", 0.35), ("2H", 0.4)]);
        let json = to_json(&pmf);
        let restored = from_json(&json).unwrap();
        let before: Vec<_> = pmf.keyed().collect();
        let after: Vec<_> = restored.keyed().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_json_format_is_pair_array() {
        let pmf = pmf_of(&[("0", 0.5), ("1H", 0.5)]);
        assert_eq!(to_json(&pmf), r#"[["0",0.5],["1H",0.5]]"#);
    }

    #[test]
    fn test_from_json_rejects_bad_keys() {
        assert!(matches!(
            from_json(r#"[["1X",1.0]]"#),
            Err(Error::MalformedKey { .. })
        ));
        assert!(matches!(
            from_json("not json"),
            Err(Error::MalformedTable(_))
        ));
    }
}
