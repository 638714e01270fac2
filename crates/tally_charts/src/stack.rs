use serde::Serialize;

use crate::record::VoteRecord;

/// Stack key; segments are stacked in [`StackKey::ORDER`], bottom first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKey {
    Yes,
    No,
}

impl StackKey {
    pub const ORDER: [StackKey; 2] = [StackKey::Yes, StackKey::No];

    pub fn count(&self, record: &VoteRecord) -> u64 {
        match self {
            StackKey::Yes => record.yes_count,
            StackKey::No => record.no_count,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StackKey::Yes => "yes",
            StackKey::No => "no",
        }
    }
}

/// One key's slice of one county's bar, in vote units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StackedSegment {
    pub county_index: usize,
    pub county_name: String,
    pub key: StackKey,
    pub y0: u64,
    pub y1: u64,
}

impl StackedSegment {
    pub fn value(&self) -> u64 {
        self.y1 - self.y0
    }
}

/// Cumulative segments for every county, county-major.
///
/// Segment `i * ORDER.len() + j` is county `i`, key `ORDER[j]`.
pub fn stack_votes(records: &[VoteRecord]) -> Vec<StackedSegment> {
    let mut out = Vec::with_capacity(records.len() * StackKey::ORDER.len());
    for (county_index, record) in records.iter().enumerate() {
        let mut acc = 0u64;
        for key in StackKey::ORDER {
            let y0 = acc;
            acc = acc.saturating_add(key.count(record));
            out.push(StackedSegment {
                county_index,
                county_name: record.county_name.clone(),
                key,
                y0,
                y1: acc,
            });
        }
    }
    out
}
