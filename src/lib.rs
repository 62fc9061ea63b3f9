//! A headless list windowing engine.
//!
//! This crate resolves which slice of a large ordered collection intersects a scrollable
//! viewport, so hosts render O(visible items) per frame instead of O(collection size):
//! lazily cached item offsets, offset → index range resolution (O(1) for uniform heights,
//! binary search for variable heights), overscan, debounced is-scrolling state,
//! scroll-to-index requests and end-reached detection for incremental loading.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the viewport size
//! - scroll offsets as the user scrolls, plus a millisecond clock
//! - either a uniform item height, a height function, or measurements after layout
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod end_reached;
mod error;
mod fenwick;
mod list;
mod metrics;
mod options;
mod scroll;
mod state;
mod types;
pub mod window;


pub use end_reached::{
    DEFAULT_END_REACHED_THRESHOLD, EndReachedCallback, EndReachedDetector, end_reached_ratio,
};
pub use error::{ConfigError, Result};
pub use list::VirtualList;
pub use metrics::{HeightAnomalyCallback, HeightFn, HeightModel, ItemMetricsCache};
pub use options::{DEFAULT_ESTIMATED_ITEM_HEIGHT, DEFAULT_OVERSCAN, ListOptions};
pub use scroll::{
    DEFAULT_IS_SCROLLING_RESET_DELAY_MS, QuietTimer, ScrollController, ScrollRequestCallback,
    ScrollingChangeCallback,
};
pub use state::{FrameState, ScrollState};
pub use types::{Align, HeightAnomaly, ScrollDirection, VirtualItem, WindowRange};
pub use window::{compute_range, compute_visible_range};
