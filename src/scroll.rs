use std::sync::Arc;
use core::cmp;

use crate::metrics::ItemMetricsCache;
use crate::window::non_negative;
use crate::{Align, ScrollDirection, ScrollState};

/// Default quiet period after the last scroll event before `is_scrolling` resets.
pub const DEFAULT_IS_SCROLLING_RESET_DELAY_MS: u64 = 150;

/// Outbound request asking the host's scroll surface to move to an offset.
pub type ScrollRequestCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Fired when the is-scrolling flag flips. The argument is the new value.
pub type ScrollingChangeCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// A single restartable deadline driven by the host's millisecond clock.
///
/// At most one deadline is outstanding: arming again replaces the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuietTimer {
    deadline_ms: Option<u64>,
}

impl QuietTimer {
    /// Cancels any pending deadline and arms a new one `delay_ms` after `now_ms`.
    pub fn restart(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
    }

    /// Cancels the pending deadline. Returns `true` if one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Disarms and returns `true` if the deadline has passed at `now_ms`.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Owns the authoritative scroll offset and the debounced is-scrolling flag.
///
/// The host reports every scroll position through [`Self::on_scroll`] and advances time with
/// [`Self::tick`]. Only the most recent offset is kept. Programmatic scrolling is a request to
/// the host; the offset changes once the host reports the resulting position back.
///
/// Dropping the controller cancels the quiet timer, so no scrolling-change notification can
/// fire afterwards.
pub struct ScrollController {
    offset: f64,
    is_scrolling: bool,
    direction: Option<ScrollDirection>,
    quiet: QuietTimer,
    quiet_period_ms: u64,
    last_request: Option<f64>,

    on_scroll_request: Option<ScrollRequestCallback>,
    on_scrolling_change: Option<ScrollingChangeCallback>,
}

impl ScrollController {
    pub fn new(quiet_period_ms: u64) -> Self {
        Self {
            offset: 0.0,
            is_scrolling: false,
            direction: None,
            quiet: QuietTimer::default(),
            quiet_period_ms,
            last_request: None,
            on_scroll_request: None,
            on_scrolling_change: None,
        }
    }

    pub fn with_initial_offset(mut self, offset: f64) -> Self {
        self.offset = non_negative(offset);
        self
    }

    pub fn with_on_scroll_request(mut self, f: Option<ScrollRequestCallback>) -> Self {
        self.on_scroll_request = f;
        self
    }

    pub fn with_on_scrolling_change(mut self, f: Option<ScrollingChangeCallback>) -> Self {
        self.on_scrolling_change = f;
        self
    }

    pub fn set_on_scroll_request(&mut self, f: Option<ScrollRequestCallback>) {
        self.on_scroll_request = f;
    }

    pub fn set_on_scrolling_change(&mut self, f: Option<ScrollingChangeCallback>) {
        self.on_scrolling_change = f;
    }

    pub fn set_quiet_period_ms(&mut self, quiet_period_ms: u64) {
        self.quiet_period_ms = quiet_period_ms;
    }

    pub fn quiet_period_ms(&self) -> u64 {
        self.quiet_period_ms
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// When the is-scrolling flag will reset if no further scroll event arrives.
    ///
    /// Hosts can schedule a single wake-up for this instant instead of ticking every frame.
    pub fn quiet_deadline(&self) -> Option<u64> {
        self.quiet.deadline()
    }

    /// The most recent programmatic scroll request, if any.
    pub fn last_request(&self) -> Option<f64> {
        self.last_request
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.offset,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Records a scroll position reported by the host.
    ///
    /// Negative and NaN offsets clamp to `0`. Offsets past the end are kept as reported and
    /// clamped when the window is resolved.
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        let offset = non_negative(offset);
        vtrace!(offset, now_ms, "on_scroll");

        self.direction = match offset.partial_cmp(&self.offset) {
            Some(cmp::Ordering::Greater) => Some(ScrollDirection::Forward),
            Some(cmp::Ordering::Less) => Some(ScrollDirection::Backward),
            _ => self.direction,
        };
        self.offset = offset;
        self.quiet.restart(now_ms, self.quiet_period_ms);
        self.set_scrolling(true);
    }

    /// Advances the controller clock, clearing `is_scrolling` once the quiet period has elapsed.
    ///
    /// Returns `true` if the flag was cleared by this call.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.quiet.expire(now_ms) {
            return false;
        }
        vtrace!(now_ms, "quiet period elapsed");
        self.set_scrolling(false);
        true
    }

    /// Restores a snapshot. A snapshot taken mid-scroll re-arms the quiet timer at `now_ms`.
    pub fn restore_scroll_state(&mut self, state: ScrollState, now_ms: u64) {
        if state.is_scrolling {
            self.on_scroll(state.offset, now_ms);
            return;
        }
        self.offset = non_negative(state.offset);
        self.quiet.cancel();
        self.set_scrolling(false);
    }

    /// Requests a scroll to the leading edge of `index`.
    ///
    /// Returns the requested offset. Indexes past the end clamp to the last item.
    pub fn scroll_to_index(&mut self, index: usize, metrics: &mut ItemMetricsCache) -> f64 {
        let index = index.min(metrics.count().saturating_sub(1));
        let offset = metrics.offset_of(index);
        self.request(offset);
        offset
    }

    /// Requests a scroll that brings `index` into view with the given alignment.
    pub fn scroll_to_index_aligned(
        &mut self,
        index: usize,
        align: Align,
        viewport_size: f64,
        metrics: &mut ItemMetricsCache,
    ) -> f64 {
        let index = index.min(metrics.count().saturating_sub(1));
        let start = metrics.offset_of(index);
        let end = start + metrics.height_of(index);
        let view = non_negative(viewport_size);

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + (end - start) / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.offset;
                if start >= cur && end <= cur + view {
                    cur
                } else if start < cur {
                    start
                } else {
                    end - view
                }
            }
        };
        let target = non_negative(target);
        self.request(target);
        target
    }

    /// Issues a scroll-to-offset request to the host.
    pub fn request(&mut self, offset: f64) {
        let offset = non_negative(offset);
        vdebug!(offset, "scroll request");
        self.last_request = Some(offset);
        if let Some(cb) = &self.on_scroll_request {
            cb(offset);
        }
    }

    fn set_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.direction = None;
        }
        if let Some(cb) = &self.on_scrolling_change {
            cb(is_scrolling);
        }
    }
}

impl Drop for ScrollController {
    fn drop(&mut self) {
        if self.quiet.cancel() {
            vtrace!("quiet timer cancelled on drop");
        }
    }
}

impl core::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollController")
            .field("offset", &self.offset)
            .field("is_scrolling", &self.is_scrolling)
            .field("direction", &self.direction)
            .field("quiet", &self.quiet)
            .field("quiet_period_ms", &self.quiet_period_ms)
            .field("last_request", &self.last_request)
            .finish_non_exhaustive()
    }
}
