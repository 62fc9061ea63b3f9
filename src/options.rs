use std::sync::Arc;

use crate::HeightAnomaly;
use crate::end_reached::{DEFAULT_END_REACHED_THRESHOLD, EndReachedCallback};
use crate::error::{ConfigError, Result, positive_finite};
use crate::metrics::{HeightAnomalyCallback, HeightFn, HeightModel};
use crate::scroll::{
    DEFAULT_IS_SCROLLING_RESET_DELAY_MS, ScrollRequestCallback, ScrollingChangeCallback,
};

/// Estimated item height used when none is configured.
pub const DEFAULT_ESTIMATED_ITEM_HEIGHT: f64 = 50.0;

/// Default number of extra items resolved beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 1;

/// Configuration for [`crate::VirtualList`].
///
/// This type is designed to be cheap to clone: callbacks are stored in `Arc`s so hosts can
/// update a few fields and call `VirtualList::set_options` without reallocating closures. The
/// list only rebuilds its metrics cache when the height model actually changed (compared with
/// `Arc::ptr_eq` for height functions).
#[derive(Clone)]
pub struct ListOptions {
    pub count: usize,

    /// The height of every item in uniform mode.
    pub item_height: Option<f64>,
    /// Fallback height for items that are not measured yet or whose height function misbehaved.
    pub estimated_item_height: f64,
    /// Selects the variable height model. When `get_item_height` is unset, heights come from
    /// measurement (`VirtualList::measure`) and default to `estimated_item_height`.
    pub variable_height: bool,
    pub get_item_height: Option<HeightFn>,

    /// Size of the viewport in the scroll axis.
    pub viewport_size: f64,
    pub overscan: usize,

    /// Ratio of `(scroll_offset + viewport_size) / total_height` at which `on_end_reached` fires.
    pub end_reached_threshold: f64,

    /// When set, the list requests a scroll to this index on construction and whenever the value
    /// changes through `set_options`.
    pub scroll_to_index: Option<usize>,

    /// Scroll offset the list starts at before the host reports any scroll position.
    pub initial_offset: f64,

    /// Quiet period after the last scroll event before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,

    pub on_end_reached: Option<EndReachedCallback>,
    pub on_scroll_request: Option<ScrollRequestCallback>,
    pub on_scrolling_change: Option<ScrollingChangeCallback>,
    pub on_height_anomaly: Option<HeightAnomalyCallback>,
}

impl ListOptions {
    fn base(count: usize, viewport_size: f64) -> Self {
        Self {
            count,
            item_height: None,
            estimated_item_height: DEFAULT_ESTIMATED_ITEM_HEIGHT,
            variable_height: false,
            get_item_height: None,
            viewport_size,
            overscan: DEFAULT_OVERSCAN,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            scroll_to_index: None,
            initial_offset: 0.0,
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
            on_end_reached: None,
            on_scroll_request: None,
            on_scrolling_change: None,
            on_height_anomaly: None,
        }
    }

    /// Options for a list where every item has the same height.
    pub fn uniform(count: usize, item_height: f64, viewport_size: f64) -> Self {
        let mut options = Self::base(count, viewport_size);
        options.item_height = Some(item_height);
        options
    }

    /// Options for a list whose heights come from `get_item_height(index)`.
    pub fn variable(
        count: usize,
        get_item_height: impl Fn(usize) -> f64 + Send + Sync + 'static,
        viewport_size: f64,
    ) -> Self {
        let mut options = Self::base(count, viewport_size);
        options.variable_height = true;
        options.get_item_height = Some(Arc::new(get_item_height));
        options
    }

    /// Options for a list whose heights are measured by the host after rendering.
    ///
    /// Unmeasured items count as `estimated_item_height`.
    pub fn measured(count: usize, estimated_item_height: f64, viewport_size: f64) -> Self {
        let mut options = Self::base(count, viewport_size);
        options.variable_height = true;
        options.estimated_item_height = estimated_item_height;
        options
    }

    /// Checks the configuration without building a list.
    pub fn validate(&self) -> Result<()> {
        if !positive_finite(self.viewport_size) {
            return Err(ConfigError::InvalidViewportSize(self.viewport_size));
        }
        if !positive_finite(self.estimated_item_height) {
            return Err(ConfigError::InvalidEstimatedItemHeight(
                self.estimated_item_height,
            ));
        }
        let t = self.end_reached_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::InvalidEndReachedThreshold(t));
        }
        self.height_model().map(|_| ())
    }

    /// The height model these options describe.
    pub fn height_model(&self) -> Result<HeightModel> {
        if !self.variable_height {
            let h = self.item_height.ok_or(ConfigError::MissingItemHeight)?;
            if !positive_finite(h) {
                return Err(ConfigError::InvalidItemHeight(h));
            }
            return Ok(HeightModel::Uniform(h));
        }
        Ok(match &self.get_item_height {
            Some(f) => HeightModel::Variable(Arc::clone(f)),
            None => HeightModel::Measured,
        })
    }

    /// Switches to uniform mode with the given height.
    pub fn with_item_height(mut self, item_height: f64) -> Self {
        self.item_height = Some(item_height);
        self.variable_height = false;
        self
    }

    /// Switches to variable mode with the given height function.
    pub fn with_get_item_height(
        mut self,
        get_item_height: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.get_item_height = Some(Arc::new(get_item_height));
        self.variable_height = true;
        self
    }

    pub fn with_variable_height(mut self, variable_height: bool) -> Self {
        self.variable_height = variable_height;
        self
    }

    pub fn with_estimated_item_height(mut self, estimated_item_height: f64) -> Self {
        self.estimated_item_height = estimated_item_height;
        self
    }

    pub fn with_viewport_size(mut self, viewport_size: f64) -> Self {
        self.viewport_size = viewport_size;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_end_reached_threshold(mut self, threshold: f64) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    pub fn with_scroll_to_index(mut self, scroll_to_index: Option<usize>) -> Self {
        self.scroll_to_index = scroll_to_index;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: f64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_on_end_reached(
        mut self,
        on_end_reached: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_end_reached = on_end_reached.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll_request(
        mut self,
        on_scroll_request: Option<impl Fn(f64) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll_request = on_scroll_request.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scrolling_change(
        mut self,
        on_scrolling_change: Option<impl Fn(bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scrolling_change = on_scrolling_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_height_anomaly(
        mut self,
        on_height_anomaly: Option<impl Fn(HeightAnomaly) + Send + Sync + 'static>,
    ) -> Self {
        self.on_height_anomaly = on_height_anomaly.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("count", &self.count)
            .field("item_height", &self.item_height)
            .field("estimated_item_height", &self.estimated_item_height)
            .field("variable_height", &self.variable_height)
            .field("viewport_size", &self.viewport_size)
            .field("overscan", &self.overscan)
            .field("end_reached_threshold", &self.end_reached_threshold)
            .field("scroll_to_index", &self.scroll_to_index)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
