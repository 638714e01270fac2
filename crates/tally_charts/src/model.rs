//! Scales and stacked geometry derived from one dataset
//!
//! A [`ScaleModel`] is rebuilt wholesale whenever the vote records change and
//! is never mutated afterwards.

use rustc_hash::FxHashMap;

use crate::config::ChartConfig;
use crate::record::{VoteRecord, VoteTotals};
use crate::scale::{BandScale, LinearScale};
use crate::stack::{stack_votes, StackKey, StackedSegment};

#[derive(Clone, Debug)]
pub struct ScaleModel {
    records: Vec<VoteRecord>,
    index: FxHashMap<String, usize>,
    segments: Vec<StackedSegment>,
    band: BandScale,
    value: LinearScale,
    global_max: u64,
    totals: VoteTotals,
}

impl ScaleModel {
    pub fn new(records: Vec<VoteRecord>, config: &ChartConfig) -> Self {
        let width = config.drawable_width();
        let height = config.drawable_height();

        let mut index = FxHashMap::default();
        for (i, r) in records.iter().enumerate() {
            // Duplicate names keep their own bars; lookups resolve to the first.
            index.entry(r.county_name.clone()).or_insert(i);
        }

        let global_max = records.iter().map(VoteRecord::total).max().unwrap_or(0);
        let band = BandScale::padded(records.len(), 0.0, width, config.band_padding);
        let value = LinearScale::new(0.0, global_max.max(1) as f32, height, 0.0)
            .nice(config.value_ticks);

        Self {
            segments: stack_votes(&records),
            totals: VoteTotals::of(&records),
            records,
            index,
            band,
            value,
            global_max,
        }
    }

    pub fn empty(config: &ChartConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&VoteRecord> {
        self.records.get(index)
    }

    pub fn county_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index_of(&self, county_name: &str) -> Option<usize> {
        self.index.get(county_name).copied()
    }

    /// `yes_count + no_count` for the county at `index`, zero if out of range.
    pub fn total_at(&self, index: usize) -> u64 {
        self.records.get(index).map_or(0, VoteRecord::total)
    }

    pub fn global_max(&self) -> u64 {
        self.global_max
    }

    pub fn totals(&self) -> VoteTotals {
        self.totals
    }

    /// Categorical position scale for the untransformed layout.
    pub fn band(&self) -> &BandScale {
        &self.band
    }

    /// Niced value scale over every county, range `[drawable height, 0]`.
    pub fn value_scale(&self) -> &LinearScale {
        &self.value
    }

    pub fn segments(&self) -> &[StackedSegment] {
        &self.segments
    }

    pub fn segments_for(&self, county_index: usize) -> &[StackedSegment] {
        let n = StackKey::ORDER.len();
        let start = county_index.saturating_mul(n).min(self.segments.len());
        let end = start.saturating_add(n).min(self.segments.len());
        &self.segments[start..end]
    }

    pub fn segment(&self, county_index: usize, key: StackKey) -> Option<&StackedSegment> {
        self.segments_for(county_index).iter().find(|s| s.key == key)
    }
}
