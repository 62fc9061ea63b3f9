use std::sync::Arc;

use crate::window::non_negative;

/// Default ratio of scrolled content at which the end is considered reached.
pub const DEFAULT_END_REACHED_THRESHOLD: f64 = 0.8;

/// A callback fired when the scroll position crosses the end-reached threshold.
pub type EndReachedCallback = Arc<dyn Fn() + Send + Sync>;

/// Returns `(scroll_offset + viewport_size) / total_height`.
///
/// When nothing can scroll (`total_height <= viewport_size`) the whole list is visible and the
/// ratio is `1.0`; this also avoids dividing by a zero total.
pub fn end_reached_ratio(scroll_offset: f64, viewport_size: f64, total_height: f64) -> f64 {
    let viewport_size = non_negative(viewport_size);
    let total_height = non_negative(total_height);
    if total_height <= viewport_size {
        return 1.0;
    }
    (non_negative(scroll_offset) + viewport_size) / total_height
}

/// Fires an end-reached callback when the scroll ratio meets a threshold.
///
/// `check` is stateless per call: it fires on every call whose ratio is at or above the
/// threshold. Gating repeated loads (e.g. "a page is already in flight") is up to the caller.
/// The one exception is a list too short to scroll, which fires once and then stays quiet until
/// the list becomes scrollable again.
#[derive(Clone)]
pub struct EndReachedDetector {
    threshold: f64,
    callback: Option<EndReachedCallback>,
    fired_while_unscrollable: bool,
}

impl EndReachedDetector {
    /// `threshold` is expected in `(0, 1]`; list options validate it before it gets here.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            callback: None,
            fired_while_unscrollable: false,
        }
    }

    pub fn with_callback(mut self, callback: Option<EndReachedCallback>) -> Self {
        self.callback = callback;
        self
    }

    pub fn set_callback(&mut self, callback: Option<EndReachedCallback>) {
        self.callback = callback;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Returns `true` (and invokes the callback, if any) when the end is reached.
    pub fn check(&mut self, scroll_offset: f64, viewport_size: f64, total_height: f64) -> bool {
        let unscrollable = non_negative(total_height) <= non_negative(viewport_size);
        if unscrollable {
            if self.fired_while_unscrollable {
                return false;
            }
            self.fired_while_unscrollable = true;
        } else {
            self.fired_while_unscrollable = false;
        }

        let ratio = end_reached_ratio(scroll_offset, viewport_size, total_height);
        if ratio < self.threshold {
            return false;
        }
        vtrace!(ratio, threshold = self.threshold, "end reached");
        if let Some(cb) = &self.callback {
            cb();
        }
        true
    }
}

impl core::fmt::Debug for EndReachedDetector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EndReachedDetector")
            .field("threshold", &self.threshold)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
