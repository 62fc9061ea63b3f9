//! Configuration errors.
//!
//! Only configuration is fallible. Transient out-of-range scroll input is clamped and height
//! function anomalies are reported through a diagnostic callback instead.

/// Errors raised when a [`crate::ListOptions`] value cannot drive a list.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Uniform mode was requested without an item height.
    #[error("uniform height mode requires `item_height`")]
    MissingItemHeight,

    /// The uniform item height is zero, negative or not finite.
    #[error("item height must be a positive finite number, got {0}")]
    InvalidItemHeight(f64),

    /// The estimated item height is zero, negative or not finite.
    #[error("estimated item height must be a positive finite number, got {0}")]
    InvalidEstimatedItemHeight(f64),

    /// The viewport size is zero, negative or not finite.
    #[error("viewport size must be a positive finite number, got {0}")]
    InvalidViewportSize(f64),

    /// The end-reached threshold lies outside `(0, 1]`.
    #[error("end-reached threshold must be in (0, 1], got {0}")]
    InvalidEndReachedThreshold(f64),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ConfigError>;

pub(crate) fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
