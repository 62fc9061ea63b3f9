
use crate::end_reached::{EndReachedDetector, end_reached_ratio};
use crate::error::{ConfigError, Result, positive_finite};
use crate::metrics::ItemMetricsCache;
use crate::scroll::ScrollController;
use crate::window::{self, max_scroll_offset};
use crate::{
    Align, FrameState, ListOptions, ScrollDirection, ScrollState, VirtualItem, WindowRange,
};

/// A headless windowing engine for one list.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - The host drives it with viewport geometry, scroll offsets and a millisecond clock.
/// - Rendering is exposed as a resolved [`WindowRange`] plus per-item placement
///   (`for_each_item`).
///
/// Item metrics are computed lazily, so queries that may reveal new items take `&mut self`.
/// Each list owns its metrics cache; two lists never share one.
pub struct VirtualList {
    options: ListOptions,
    metrics: ItemMetricsCache,
    scroll: ScrollController,
    end_reached: EndReachedDetector,
}

impl VirtualList {
    /// Creates a list from options.
    ///
    /// Invalid configuration is rejected here. If `options.scroll_to_index` is set, the scroll
    /// request is issued immediately; the end-reached check also runs once, so a list too short
    /// to scroll asks for more data right away.
    pub fn new(options: ListOptions) -> Result<Self> {
        options.validate()?;
        let metrics = ItemMetricsCache::new(
            options.height_model()?,
            options.count,
            options.estimated_item_height,
        )?
        .with_on_anomaly(options.on_height_anomaly.clone());
        let scroll = ScrollController::new(options.is_scrolling_reset_delay_ms)
            .with_initial_offset(options.initial_offset)
            .with_on_scroll_request(options.on_scroll_request.clone())
            .with_on_scrolling_change(options.on_scrolling_change.clone());
        let end_reached = EndReachedDetector::new(options.end_reached_threshold)
            .with_callback(options.on_end_reached.clone());
        vdebug!(
            count = options.count,
            variable_height = options.variable_height,
            overscan = options.overscan,
            "VirtualList::new"
        );

        let mut list = Self {
            options,
            metrics,
            scroll,
            end_reached,
        };
        if let Some(index) = list.options.scroll_to_index {
            list.scroll_to_index(index);
        }
        list.check_end_reached();
        Ok(list)
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Replaces the options, rebuilding only what changed.
    ///
    /// The metrics cache is reset when the height model changes. A count change keeps cached
    /// entries for the items that remain. On error the list is left untouched.
    pub fn set_options(&mut self, options: ListOptions) -> Result<()> {
        options.validate()?;
        let model = options.height_model()?;
        let prev = core::mem::replace(&mut self.options, options);
        vtrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "VirtualList::set_options"
        );

        let model_changed = !model.same_as(self.metrics.model());
        self.metrics.set_count(self.options.count);
        if model_changed {
            self.metrics.set_model(model)?;
        }
        self.metrics
            .set_estimated_item_height(self.options.estimated_item_height)?;
        self.metrics
            .set_on_anomaly(self.options.on_height_anomaly.clone());

        self.scroll
            .set_quiet_period_ms(self.options.is_scrolling_reset_delay_ms);
        self.scroll
            .set_on_scroll_request(self.options.on_scroll_request.clone());
        self.scroll
            .set_on_scrolling_change(self.options.on_scrolling_change.clone());

        self.end_reached
            .set_threshold(self.options.end_reached_threshold);
        self.end_reached
            .set_callback(self.options.on_end_reached.clone());

        if self.options.scroll_to_index != prev.scroll_to_index {
            if let Some(index) = self.options.scroll_to_index {
                self.scroll_to_index(index);
            }
        }

        let layout_changed = model_changed
            || prev.count != self.options.count
            || prev.viewport_size != self.options.viewport_size
            || prev.estimated_item_height != self.options.estimated_item_height;
        if layout_changed {
            self.check_end_reached();
        }
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions)) -> Result<()> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    /// Changes the item count, e.g. after a page of items was appended.
    ///
    /// Cached metrics of the remaining items are kept. Runs the end-reached check, since a page
    /// that still leaves the viewport near the end should request the next one.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.metrics.set_count(count);
        self.check_end_reached();
    }

    pub fn viewport_size(&self) -> f64 {
        self.options.viewport_size
    }

    pub fn set_viewport_size(&mut self, viewport_size: f64) -> Result<()> {
        if !positive_finite(viewport_size) {
            return Err(ConfigError::InvalidViewportSize(viewport_size));
        }
        if self.options.viewport_size == viewport_size {
            return Ok(());
        }
        self.options.viewport_size = viewport_size;
        self.check_end_reached();
        Ok(())
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    pub fn metrics(&self) -> &ItemMetricsCache {
        &self.metrics
    }

    /// Applies a scroll position reported by the host (wheel, drag, fling, or the outcome of a
    /// scroll request) and marks the list as scrolling.
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        self.scroll.on_scroll(offset, now_ms);
        self.check_end_reached();
    }

    /// Advances the host clock. Returns `true` if `is_scrolling` was cleared by this call.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.scroll.tick(now_ms)
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll.scroll_direction()
    }

    /// See [`ScrollController::quiet_deadline`].
    pub fn quiet_deadline(&self) -> Option<u64> {
        self.scroll.quiet_deadline()
    }

    /// Returns a lightweight snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.scroll_state()
    }

    /// Returns a combined snapshot of viewport + scroll state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport_size: self.options.viewport_size,
            scroll: self.scroll_state(),
        }
    }

    /// Restores a previously captured snapshot.
    ///
    /// When `frame.scroll.is_scrolling` is `true`, the quiet timer is re-armed as if a scroll
    /// event happened at `now_ms`. The end-reached check runs once, against the restored
    /// position.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) -> Result<()> {
        if !positive_finite(frame.viewport_size) {
            return Err(ConfigError::InvalidViewportSize(frame.viewport_size));
        }
        self.options.viewport_size = frame.viewport_size;
        self.scroll.restore_scroll_state(frame.scroll, now_ms);
        self.check_end_reached();
        Ok(())
    }

    /// The overscanned window for the current scroll offset.
    pub fn virtual_range(&mut self) -> Option<WindowRange> {
        self.virtual_range_for(self.scroll.offset(), self.options.viewport_size)
    }

    pub fn virtual_range_for(
        &mut self,
        scroll_offset: f64,
        viewport_size: f64,
    ) -> Option<WindowRange> {
        window::compute_range(
            scroll_offset,
            viewport_size,
            self.options.overscan,
            &mut self.metrics,
        )
    }

    /// The window for the current scroll offset, without overscan.
    pub fn visible_range(&mut self) -> Option<WindowRange> {
        self.visible_range_for(self.scroll.offset(), self.options.viewport_size)
    }

    pub fn visible_range_for(
        &mut self,
        scroll_offset: f64,
        viewport_size: f64,
    ) -> Option<WindowRange> {
        window::compute_visible_range(scroll_offset, viewport_size, &mut self.metrics)
    }

    /// Calls `f` with the placement of every item in the overscanned window, in index order.
    pub fn for_each_item(&mut self, mut f: impl FnMut(VirtualItem)) {
        let Some(range) = self.virtual_range() else {
            return;
        };
        for index in range.indexes() {
            f(self.placement(index));
        }
    }

    /// Collects the overscanned window's items into `out` (clears `out` first).
    ///
    /// This is a convenience wrapper around [`Self::for_each_item`]. For maximum performance,
    /// prefer `for_each_item` and reuse a scratch buffer in your host.
    pub fn collect_items(&mut self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_item(|item| out.push(item));
    }

    pub fn item(&mut self, index: usize) -> Option<VirtualItem> {
        (index < self.options.count).then(|| self.placement(index))
    }

    pub fn item_offset(&mut self, index: usize) -> Option<f64> {
        (index < self.options.count).then(|| self.metrics.offset_of(index))
    }

    pub fn item_height(&mut self, index: usize) -> Option<f64> {
        (index < self.options.count).then(|| self.metrics.height_of(index))
    }

    /// Total height of all items. See [`ItemMetricsCache::total_height`] for the cost.
    pub fn total_height(&mut self) -> f64 {
        self.metrics.total_height()
    }

    pub fn max_scroll_offset(&mut self) -> f64 {
        max_scroll_offset(self.metrics.total_height(), self.options.viewport_size)
    }

    /// Requests a scroll to the leading edge of `index` through `on_scroll_request`.
    ///
    /// This is a request, not a guarantee: `scroll_offset` only changes once the host reports
    /// the resulting position through [`Self::on_scroll`]. A user gesture in flight may override
    /// it. Returns the requested offset.
    pub fn scroll_to_index(&mut self, index: usize) -> f64 {
        self.scroll.scroll_to_index(index, &mut self.metrics)
    }

    /// Like [`Self::scroll_to_index`], aligning the item inside the viewport.
    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) -> f64 {
        self.scroll.scroll_to_index_aligned(
            index,
            align,
            self.options.viewport_size,
            &mut self.metrics,
        )
    }

    /// Requests a scroll to an absolute offset through `on_scroll_request`.
    pub fn scroll_to_offset(&mut self, offset: f64) {
        self.scroll.request(offset);
    }

    /// Records a measured height for `index` (variable height mode only).
    ///
    /// Returns `true` if the stored height changed.
    pub fn measure(&mut self, index: usize, height: f64) -> bool {
        self.metrics.measure(index, height)
    }

    /// Records several measurements at once.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, f64)>) -> usize {
        let mut changed = 0usize;
        for (index, height) in measurements {
            if self.metrics.measure(index, height) {
                changed += 1;
            }
        }
        changed
    }

    /// Drops every cached height and offset.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// `(scroll_offset + viewport_size) / total_height`, or `1.0` when nothing can scroll.
    pub fn end_reached_ratio(&mut self) -> f64 {
        end_reached_ratio(
            self.scroll.offset(),
            self.options.viewport_size,
            self.metrics.total_height(),
        )
    }

    /// Runs the end-reached check for the current offset, firing `on_end_reached` if the
    /// threshold is met.
    ///
    /// Without a registered callback this does nothing and returns `false`, so lists that do not
    /// paginate never pay for a full height evaluation.
    pub fn check_end_reached(&mut self) -> bool {
        if !self.end_reached.has_callback() {
            return false;
        }
        let total = self.metrics.total_height();
        self.end_reached
            .check(self.scroll.offset(), self.options.viewport_size, total)
    }

    /// Tears the list down: the quiet timer is cancelled and the metrics cache released.
    pub fn dispose(self) {
        vdebug!(count = self.options.count, "VirtualList::dispose");
        drop(self);
    }

    fn placement(&mut self, index: usize) -> VirtualItem {
        VirtualItem {
            index,
            offset: self.metrics.offset_of(index),
            height: self.metrics.height_of(index),
        }
    }
}

impl core::fmt::Debug for VirtualList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("options", &self.options)
            .field("metrics", &self.metrics)
            .field("scroll", &self.scroll)
            .field("end_reached", &self.end_reached)
            .finish()
    }
}
