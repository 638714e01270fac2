use crate::model::ScaleModel;
use crate::viewport::ViewportTransform;

/// Slack for float error at the drawable edges, in pixels.
pub const EDGE_EPSILON_PX: f32 = 1e-3;

/// Categories whose transformed position lies inside the drawable width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    indices: Vec<usize>,
    max_total: u64,
}

impl VisibleSet {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Largest visible total, zero when nothing is visible.
    pub fn max_total(&self) -> u64 {
        self.max_total
    }

    /// Value-axis upper bound for this set; never below 1.
    pub fn domain_max(&self) -> f32 {
        self.max_total.max(1) as f32
    }
}

pub fn visible_set(viewport: &ViewportTransform, model: &ScaleModel) -> VisibleSet {
    let scale = viewport.index_scale();
    let lo = -EDGE_EPSILON_PX;
    let hi = viewport.width() + EDGE_EPSILON_PX;

    let mut set = VisibleSet::default();
    for i in 0..model.county_count() {
        let px = scale.map(i as f32);
        if px >= lo && px <= hi {
            set.indices.push(i);
            set.max_total = set.max_total.max(model.total_at(i));
        }
    }
    tracing::trace!(
        visible = set.len(),
        max_total = set.max_total,
        "visible set recomputed"
    );
    set
}
