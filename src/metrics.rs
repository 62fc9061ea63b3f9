use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::HeightAnomaly;
use crate::error::{ConfigError, Result, positive_finite};
use crate::fenwick::Fenwick;

/// A caller-supplied height function.
///
/// Contract: pure, deterministic, side-effect free, returning a finite non-negative height for
/// `index`. Results that break the contract, and calls that panic, are replaced by the estimated
/// item height.
pub type HeightFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// A diagnostic hook fired when a height function result had to be replaced.
pub type HeightAnomalyCallback = Arc<dyn Fn(HeightAnomaly) + Send + Sync>;

/// How item heights are determined.
#[derive(Clone)]
pub enum HeightModel {
    /// Every item has the same height.
    Uniform(f64),
    /// Heights come from a function of the index.
    Variable(HeightFn),
    /// Heights are the estimated item height until the host measures each item.
    Measured,
}

impl HeightModel {
    pub fn variable(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::Variable(Arc::new(f))
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform(_))
    }

    /// Returns `true` if both models would produce the same heights without re-evaluation.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Uniform(a), Self::Uniform(b)) => a == b,
            (Self::Variable(a), Self::Variable(b)) => Arc::ptr_eq(a, b),
            (Self::Measured, Self::Measured) => true,
            _ => false,
        }
    }
}

impl core::fmt::Debug for HeightModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uniform(h) => f.debug_tuple("Uniform").field(h).finish(),
            Self::Variable(_) => f.write_str("Variable(..)"),
            Self::Measured => f.write_str("Measured"),
        }
    }
}

/// Lazily populated per-index heights and cumulative offsets for one list.
///
/// Offsets are cached as a contiguous prefix: `offset_of(i)` walks forward from the furthest
/// cached offset and folds every height it passes into a Fenwick tree. Over the lifetime of a
/// stable height model each height is evaluated at most once, so forward scrolling costs
/// amortized one evaluation per newly revealed index. Re-measuring an item inside the prefix
/// adjusts the sums in `O(log n)` and keeps the prefix.
///
/// The cache belongs to exactly one list. It must be reset whenever the height function changes.
#[derive(Clone)]
pub struct ItemMetricsCache {
    model: HeightModel,
    count: usize,
    estimated_item_height: f64,

    heights: Vec<Option<f64>>, // non-uniform models only
    sums: Fenwick,             // heights of the cached prefix, `sums.len()` items
    evaluations: usize,

    on_anomaly: Option<HeightAnomalyCallback>,
}

impl ItemMetricsCache {
    /// Creates an empty cache for `count` items.
    ///
    /// `estimated_item_height` replaces height function results that are not finite or negative,
    /// and seeds the height of not-yet-measured items when the list is driven by measurement.
    pub fn new(model: HeightModel, count: usize, estimated_item_height: f64) -> Result<Self> {
        if let HeightModel::Uniform(h) = model {
            if !positive_finite(h) {
                return Err(ConfigError::InvalidItemHeight(h));
            }
        }
        if !positive_finite(estimated_item_height) {
            return Err(ConfigError::InvalidEstimatedItemHeight(
                estimated_item_height,
            ));
        }
        vdebug!(count, uniform = model.is_uniform(), "ItemMetricsCache::new");

        let heights = if model.is_uniform() {
            Vec::new()
        } else {
            vec![None; count]
        };
        Ok(Self {
            model,
            count,
            estimated_item_height,
            heights,
            sums: Fenwick::default(),
            evaluations: 0,
            on_anomaly: None,
        })
    }

    pub fn with_on_anomaly(mut self, on_anomaly: Option<HeightAnomalyCallback>) -> Self {
        self.on_anomaly = on_anomaly;
        self
    }

    pub fn set_on_anomaly(&mut self, on_anomaly: Option<HeightAnomalyCallback>) {
        self.on_anomaly = on_anomaly;
    }

    pub fn model(&self) -> &HeightModel {
        &self.model
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn estimated_item_height(&self) -> f64 {
        self.estimated_item_height
    }

    /// Number of height function evaluations since construction or the last reset.
    pub fn height_evaluations(&self) -> usize {
        self.evaluations
    }

    /// Returns the height of `index`, evaluating and caching it on first use.
    ///
    /// Indexes past the end clamp to the last item.
    pub fn height_of(&mut self, index: usize) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let index = index.min(self.count - 1);

        let f = match &self.model {
            HeightModel::Uniform(h) => return *h,
            HeightModel::Measured => {
                return self.heights[index].unwrap_or(self.estimated_item_height);
            }
            HeightModel::Variable(f) => f,
        };
        if let Some(h) = self.heights[index] {
            return h;
        }

        let raw = match panic::catch_unwind(AssertUnwindSafe(|| f(index))) {
            Ok(raw) => raw,
            Err(_) => {
                vwarn!(index, "item height function panicked");
                f64::NAN
            }
        };
        self.evaluations += 1;
        let h = self.sanitize(index, raw);
        self.heights[index] = Some(h);
        h
    }

    /// Returns the cumulative height of all items before `index`.
    ///
    /// `offset_of(count)` is the total height. Indexes past `count` clamp to `count`.
    pub fn offset_of(&mut self, index: usize) -> f64 {
        let index = index.min(self.count);
        if let HeightModel::Uniform(h) = self.model {
            return index as f64 * h;
        }

        while self.sums.len() < index {
            let h = self.height_of(self.sums.len());
            self.sums.push_value(h);
        }
        self.sums.prefix_sum(index)
    }

    /// Largest index whose offset is available without evaluating another height.
    pub fn offset_frontier(&self) -> usize {
        match self.model {
            HeightModel::Uniform(_) => self.count,
            _ => self.sums.len(),
        }
    }

    /// Total height of the list.
    ///
    /// O(1) for the uniform model. Other models evaluate every remaining height once, then
    /// answer from the cached sums.
    pub fn total_height(&mut self) -> f64 {
        match self.known_total_height() {
            Some(total) => total,
            None => self.offset_of(self.count),
        }
    }

    /// The total height if it is known without evaluating any further heights.
    pub fn known_total_height(&self) -> Option<f64> {
        match self.model {
            HeightModel::Uniform(h) => Some(self.count as f64 * h),
            _ => (self.sums.len() == self.count).then(|| self.sums.total()),
        }
    }

    /// Records a measured height for a variable-model item.
    ///
    /// If the item is already part of the cached prefix, the sums are adjusted by the height
    /// difference; nothing is re-walked. Returns `true` if the stored height changed.
    pub fn measure(&mut self, index: usize, height: f64) -> bool {
        if index >= self.count {
            return false;
        }
        if self.model.is_uniform() {
            vwarn!(index, height, "measure ignored: uniform height model");
            return false;
        }

        let height = self.sanitize(index, height);
        if self.heights[index] == Some(height) {
            return false;
        }
        vtrace!(index, height, "measure");
        let previous = (index < self.sums.len()).then(|| self.height_of(index));
        self.heights[index] = Some(height);
        if let Some(previous) = previous {
            self.sums.add(index, height - previous);
        }
        true
    }

    /// Changes the item count.
    ///
    /// Growing keeps every cached entry, since appended items cannot shift earlier offsets.
    /// Shrinking drops the entries past the new end.
    pub fn set_count(&mut self, count: usize) {
        if self.count == count {
            return;
        }
        vdebug!(from = self.count, to = count, "ItemMetricsCache::set_count");
        if !self.model.is_uniform() {
            self.heights.resize(count, None);
            self.sums.truncate(count);
        }
        self.count = count;
    }

    /// Replaces the height model and clears every cached entry.
    pub fn set_model(&mut self, model: HeightModel) -> Result<()> {
        if let HeightModel::Uniform(h) = model {
            if !positive_finite(h) {
                return Err(ConfigError::InvalidItemHeight(h));
            }
        }
        self.model = model;
        self.reset();
        Ok(())
    }

    pub fn set_estimated_item_height(&mut self, height: f64) -> Result<()> {
        if !positive_finite(height) {
            return Err(ConfigError::InvalidEstimatedItemHeight(height));
        }
        if self.estimated_item_height != height {
            self.estimated_item_height = height;
            match self.model {
                // Measurements stay valid; only offsets built from estimates go stale.
                HeightModel::Measured => self.sums.clear(),
                // Fallback values may already be cached.
                _ => self.reset(),
            }
        }
        Ok(())
    }

    /// Clears both mappings.
    pub fn reset(&mut self) {
        vdebug!(
            count = self.count,
            evaluations = self.evaluations,
            "ItemMetricsCache::reset"
        );
        self.heights.clear();
        if !self.model.is_uniform() {
            self.heights.resize(self.count, None);
        }
        self.sums.clear();
        self.evaluations = 0;
    }

    fn sanitize(&self, index: usize, value: f64) -> f64 {
        if value.is_finite() && value >= 0.0 {
            return value;
        }
        let fallback = self.estimated_item_height;
        vwarn!(index, value, fallback, "unusable item height, using estimate");
        if let Some(cb) = &self.on_anomaly {
            cb(HeightAnomaly {
                index,
                value,
                fallback,
            });
        }
        fallback
    }
}

impl core::fmt::Debug for ItemMetricsCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemMetricsCache")
            .field("model", &self.model)
            .field("count", &self.count)
            .field("estimated_item_height", &self.estimated_item_height)
            .field("cached_prefix", &self.sums.len())
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}
