#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive index range `[start, end]` of items that must be materialized.
///
/// Empty collections never produce a range; queries return `None` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub start: usize,
    pub end: usize, // inclusive
}

impl WindowRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn indexes(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Expands the range by `overscan` on both sides, clamped to `[0, last]`.
    pub fn expand(self, overscan: usize, last: usize) -> Self {
        Self {
            start: self.start.saturating_sub(overscan),
            end: self.end.saturating_add(overscan).min(last),
        }
    }
}

/// Placement of one materialized item, handed to the host for absolute positioning.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Cumulative offset of the item's leading edge in the scroll axis.
    pub offset: f64,
    /// Size in the scroll axis.
    pub height: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.offset + self.height
    }
}

/// A height value the height function produced that could not be used.
///
/// The engine substitutes the estimated item height for the index and keeps windowing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightAnomaly {
    pub index: usize,
    /// The rejected value (non-finite or negative). `NaN` when the height function panicked.
    pub value: f64,
    /// The value used in its place.
    pub fallback: f64,
}
