//! Vote records and payload decoding
//!
//! The upstream service answers `{ "votes": [...] }` per proposition. Hosts may
//! hand over either that envelope or the bare array. Anything else degrades to
//! an empty dataset so a bad response never takes the chart down.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, Result};

/// One county's result for one proposition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub county_name: String,
    pub yes_count: u64,
    pub no_count: u64,
}

impl VoteRecord {
    pub fn new(county_name: impl Into<String>, yes_count: u64, no_count: u64) -> Self {
        Self {
            county_name: county_name.into(),
            yes_count,
            no_count,
        }
    }

    /// Yes plus no, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.yes_count.saturating_add(self.no_count)
    }
}

/// Statewide yes/no sums over a dataset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoteTotals {
    pub yes: u64,
    pub no: u64,
}

impl VoteTotals {
    pub fn of(records: &[VoteRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            yes: acc.yes.saturating_add(r.yes_count),
            no: acc.no.saturating_add(r.no_count),
        })
    }

    pub fn total(&self) -> u64 {
        self.yes.saturating_add(self.no)
    }

    /// Fraction of votes cast "yes", or `None` when nobody voted.
    pub fn yes_share(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.yes as f64 / total as f64)
    }
}

/// Decode a payload, reporting why it was rejected.
///
/// Elements of an otherwise valid array that are not vote records are skipped
/// (with a warning) rather than failing the whole payload.
pub fn try_parse_votes(json: &str) -> Result<Vec<VoteRecord>> {
    let value: Value = serde_json::from_str(json)?;
    votes_from_value(value)
}

/// Decode an already-parsed payload. See [`try_parse_votes`].
pub fn votes_from_value(value: Value) -> Result<Vec<VoteRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("votes") {
            Some(Value::Array(items)) => items,
            Some(other) => return Err(ChartError::Shape(kind(&other))),
            None => return Err(ChartError::Shape("an object without `votes`")),
        },
        other => return Err(ChartError::Shape(kind(&other))),
    };

    let total = items.len();
    let records: Vec<VoteRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<VoteRecord>(item) {
            Ok(r) if r.yes_count.checked_add(r.no_count).is_none() => {
                tracing::warn!(
                    index = i,
                    county = %r.county_name,
                    "skipping vote record whose total overflows"
                );
                None
            }
            Ok(r) => Some(r),
            Err(err) => {
                tracing::warn!(index = i, %err, "skipping malformed vote record");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            kept = records.len(),
            skipped = total - records.len(),
            "vote payload contained malformed records"
        );
    }
    Ok(records)
}

/// Decode a payload, treating anything malformed as an empty dataset.
pub fn parse_votes(json: &str) -> Vec<VoteRecord> {
    try_parse_votes(json).unwrap_or_else(|err| {
        tracing::warn!(%err, "vote payload rejected; using empty dataset");
        Vec::new()
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_array_and_envelope() {
        let bare = r#"[{"county_name":"Adams","yes_count":10,"no_count":5}]"#;
        let wrapped = r#"{"votes":[{"county_name":"Adams","yes_count":10,"no_count":5}]}"#;
        let expected = vec![VoteRecord::new("Adams", 10, 5)];
        assert_eq!(parse_votes(bare), expected);
        assert_eq!(parse_votes(wrapped), expected);
    }

    #[test]
    fn malformed_payloads_become_empty() {
        assert!(parse_votes("not json").is_empty());
        assert!(parse_votes("42").is_empty());
        assert!(parse_votes(r#"{"votes": "nope"}"#).is_empty());
        assert!(parse_votes(r#"{"rows": []}"#).is_empty());
        assert!(parse_votes("null").is_empty());
    }

    #[test]
    fn strict_parse_reports_shape() {
        let err = try_parse_votes(r#"{"votes": 3}"#).unwrap_err();
        assert!(matches!(err, ChartError::Shape("a number")));
        assert!(matches!(try_parse_votes("{"), Err(ChartError::Json(_))));
    }

    #[test]
    fn skips_individual_bad_records() {
        let json = r#"[
            {"county_name":"A","yes_count":1,"no_count":2},
            {"county_name":"B","yes_count":-4,"no_count":2},
            {"county_name":"C"},
            {"county_name":"D","yes_count":3,"no_count":0}
        ]"#;
        let names: Vec<_> = parse_votes(json)
            .into_iter()
            .map(|r| r.county_name)
            .collect();
        assert_eq!(names, ["A", "D"]);
    }

    #[test]
    fn skips_records_whose_total_overflows() {
        let json = r#"{"votes":[
            {"county_name":"X","yes_count":18446744073709551615,"no_count":1},
            {"county_name":"Y","yes_count":18446744073709551615,"no_count":0}
        ]}"#;
        let records = parse_votes(json);
        assert_eq!(records, vec![VoteRecord::new("Y", u64::MAX, 0)]);
    }

    #[test]
    fn totals_saturate_instead_of_wrapping() {
        let huge = VoteRecord::new("X", u64::MAX, 1);
        assert_eq!(huge.total(), u64::MAX);
        let t = VoteTotals::of(&[VoteRecord::new("A", u64::MAX, 0), VoteRecord::new("B", 5, 7)]);
        assert_eq!((t.yes, t.no, t.total()), (u64::MAX, 7, u64::MAX));
    }

    #[test]
    fn totals_sum_every_county() {
        let records = vec![VoteRecord::new("A", 100, 50), VoteRecord::new("B", 30, 30)];
        let t = VoteTotals::of(&records);
        assert_eq!((t.yes, t.no, t.total()), (130, 80, 210));
        assert!((t.yes_share().unwrap() - 130.0 / 210.0).abs() < 1e-12);
        assert_eq!(VoteTotals::of(&[]).yes_share(), None);
    }
}
