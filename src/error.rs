//! Error types for ABI deduction.
//!
//! Shape errors of the typed API (mismatched bit-cast sizes, out-of-range
//! part indices, unsupported lane counts) are rejected at compile time and
//! never reach this module. What remains are the failures of the value-level
//! deduction API, which can be asked about any `(kind, lanes)` pair at run
//! time and answers with a [`Result`].
//!
//! This file is also compiled into the build script, so it only depends on
//! `core` and `thiserror`.

use thiserror::Error;

/// Errors that can occur when deducing a storage ABI.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiError {
    /// A zero-lane vector was requested while the zero-width policy is off.
    #[error("zero-width vectors are disabled in this build (enable the `zero-width` feature)")]
    ZeroWidth,
    /// The requested lane count is larger than any representable ABI.
    #[error("{lanes} lanes exceeds the supported maximum of {max}")]
    TooManyLanes {
        /// The lane count that was requested.
        lanes: usize,
        /// The largest supported lane count.
        max: usize,
    },
    /// The element kind is outside the vectorizable set.
    #[error("element type `{name}` is not vectorizable")]
    NotVectorizable {
        /// Name of the rejected element kind.
        name: &'static str,
    },
}

/// Result type alias for ABI deduction.
pub type Result<T> = core::result::Result<T, AbiError>;

/// Creates a lane-count error.
pub const fn too_many_lanes(lanes: usize, max: usize) -> AbiError {
    AbiError::TooManyLanes { lanes, max }
}

/// Creates an error for a rejected element kind.
pub const fn not_vectorizable(name: &'static str) -> AbiError {
    AbiError::NotVectorizable { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_display() {
        let display = format!("{}", AbiError::ZeroWidth);
        assert!(display.contains("zero-width"));
        assert!(display.contains("`zero-width` feature"));
    }

    #[test]
    fn test_too_many_lanes_display() {
        let display = format!("{}", too_many_lanes(65, 64));
        assert!(display.contains("65 lanes"));
        assert!(display.contains("maximum of 64"));
    }

    #[test]
    fn test_not_vectorizable_display() {
        let display = format!("{}", not_vectorizable("f16"));
        assert!(display.contains("`f16`"));
        assert!(display.contains("not vectorizable"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(too_many_lanes(65, 64), too_many_lanes(65, 64));
        assert_ne!(too_many_lanes(65, 64), too_many_lanes(128, 64));
        assert_ne!(AbiError::ZeroWidth, too_many_lanes(0, 64));
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = AbiError::ZeroWidth;
        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
