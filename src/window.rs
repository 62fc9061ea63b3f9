//! Offset → index range resolution.
//!
//! Uniform lists resolve in O(1). Variable lists binary search the cached offset prefix for the
//! first visible item, then walk forward to the viewport's bottom edge. The walk is bounded by
//! the number of visible items plus one.

use crate::WindowRange;
use crate::metrics::{HeightModel, ItemMetricsCache};

/// Resolves the overscanned window for a scroll offset.
///
/// Returns `None` for an empty list. Transient out-of-range input (negative or NaN offsets,
/// offsets past the end) is clamped, never rejected.
pub fn compute_range(
    scroll_offset: f64,
    viewport_size: f64,
    overscan: usize,
    metrics: &mut ItemMetricsCache,
) -> Option<WindowRange> {
    let last = metrics.count().checked_sub(1)?;
    let range = compute_visible_range(scroll_offset, viewport_size, metrics)?;
    Some(range.expand(overscan, last))
}

/// Resolves the window without overscan.
///
/// Every item whose `[offset, offset + height)` overlaps
/// `[scroll_offset, scroll_offset + viewport_size)` is included. The bottom edge is inclusive:
/// an item starting exactly at `scroll_offset + viewport_size` is part of the window.
pub fn compute_visible_range(
    scroll_offset: f64,
    viewport_size: f64,
    metrics: &mut ItemMetricsCache,
) -> Option<WindowRange> {
    let last = metrics.count().checked_sub(1)?;
    let viewport_size = non_negative(viewport_size);
    let scroll_offset = clamp_scroll_offset(scroll_offset, viewport_size, metrics);

    let uniform = match metrics.model() {
        HeightModel::Uniform(h) => Some(*h),
        HeightModel::Variable(_) | HeightModel::Measured => None,
    };
    let range = match uniform {
        Some(h) => uniform_range(scroll_offset, viewport_size, h, last),
        None => variable_range(scroll_offset, viewport_size, metrics, last),
    };
    vtrace!(
        scroll_offset,
        viewport_size,
        start = range.start,
        end = range.end,
        "compute_visible_range"
    );
    Some(range)
}

/// Clamps `scroll_offset` into `[0, total_height - viewport_size]`.
///
/// NaN maps to `0`. The upper bound is only applied when the total height is already known,
/// so this never forces a full height evaluation.
pub fn clamp_scroll_offset(
    scroll_offset: f64,
    viewport_size: f64,
    metrics: &ItemMetricsCache,
) -> f64 {
    let scroll_offset = non_negative(scroll_offset);
    match metrics.known_total_height() {
        Some(total) => scroll_offset.min(max_scroll_offset(total, viewport_size)),
        None => scroll_offset,
    }
}

pub(crate) fn max_scroll_offset(total_height: f64, viewport_size: f64) -> f64 {
    (total_height - non_negative(viewport_size)).max(0.0)
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

fn uniform_range(scroll_offset: f64, viewport_size: f64, h: f64, last: usize) -> WindowRange {
    // `as` saturates, so huge quotients clamp instead of wrapping.
    let start = (scroll_offset / h).floor() as usize;
    let end = ((scroll_offset + viewport_size) / h).ceil() as usize;
    WindowRange {
        start: start.min(last),
        end: end.min(last),
    }
}

fn variable_range(
    scroll_offset: f64,
    viewport_size: f64,
    metrics: &mut ItemMetricsCache,
    last: usize,
) -> WindowRange {
    let mut scroll_offset = scroll_offset;
    let mut range = resolve_variable(scroll_offset, viewport_size, metrics, last);
    if range.end == last {
        // The walk reached the tail, so the total is a few evaluations away at most.
        let max = max_scroll_offset(metrics.total_height(), viewport_size);
        if scroll_offset > max {
            scroll_offset = max;
            range = resolve_variable(max, viewport_size, metrics, last);
        }
    }
    if let Some(total) = metrics.known_total_height() {
        if scroll_offset >= max_scroll_offset(total, viewport_size) {
            range.end = last;
        }
    }
    range
}

fn resolve_variable(
    scroll_offset: f64,
    viewport_size: f64,
    metrics: &mut ItemMetricsCache,
    last: usize,
) -> WindowRange {
    let start = match lower_bound(scroll_offset, metrics, last) {
        // Item `i` starts below the viewport top, so its predecessor straddles the edge.
        Some(i) if i > 0 => {
            if metrics.offset_of(i) > scroll_offset {
                i - 1
            } else {
                i
            }
        }
        Some(i) => i,
        None => last,
    };

    let bottom = scroll_offset + viewport_size;
    let mut end = start;
    while end < last && metrics.offset_of(end) < bottom {
        end += 1;
    }

    WindowRange { start, end }
}

/// Smallest index in `0..=last` whose offset is `>= target`, or `None` if every offset is
/// smaller. Ties resolve to the smaller index.
fn lower_bound(target: f64, metrics: &mut ItemMetricsCache, last: usize) -> Option<usize> {
    // Extend the cached prefix until it covers `target`; each step evaluates one new height.
    let mut hi = metrics.offset_frontier().min(last);
    while hi < last && metrics.offset_of(hi) < target {
        hi += 1;
    }
    if metrics.offset_of(hi) < target {
        return None;
    }

    let mut lo = 0usize;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if metrics.offset_of(mid) >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}
