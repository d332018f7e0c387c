//! The generated `(T, N) -> ABI` table.
//!
//! The build script runs [`deduce_abi`](super::deduce::deduce_abi) for every
//! vectorizable type and every lane count on the build target's feature set
//! and writes one `AbiFor<N>` impl per pair. Lane counts outside
//! `1..=64` have no impl and do not compile:
//!
//! ```compile_fail
//! use simdabi::simd::table::AbiOf;
//!
//! type TooWide = AbiOf<f32, 65>;
//! let _ = <TooWide as simdabi::simd::abi::Abi>::LANES;
//! ```
//!
//! Zero lanes get an impl only with the `zero-width` feature.
#![cfg_attr(
    not(feature = "zero-width"),
    doc = r#"
```compile_fail
use simdabi::simd::surface::Simd;

let empty = Simd::<f32, 0>::splat(1.0);
```
"#
)]
#![cfg_attr(
    feature = "zero-width",
    doc = r#"
```rust
use simdabi::simd::surface::Simd;

let empty = Simd::<f32, 0>::splat(1.0);
assert!(empty.to_array().is_empty());
```
"#
)]

use super::abi::Abi;
use super::deduce::AbiConfig;
use super::target::TargetFeatures;
use super::traits::Vectorizable;

/// Selects the storage ABI of `N` lanes of `Self` on the build target.
pub trait AbiFor<const N: usize>: Vectorizable {
    type Abi: Abi;
}

/// The ABI marker of `N` lanes of `T`.
pub type AbiOf<T, const N: usize> = <T as AbiFor<N>>::Abi;

include!(concat!(env!("OUT_DIR"), "/abi_table.rs"));

impl TargetFeatures {
    /// Feature set of the build target, as seen by the build script.
    pub const BUILD: TargetFeatures = BUILD_FEATURES;
}

impl AbiConfig {
    /// Configuration the generated table was deduced with.
    pub const BUILD: AbiConfig = AbiConfig {
        features: BUILD_FEATURES,
        zero_width: cfg!(feature = "zero-width"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::deduce::{deduce_abi, AbiTag};

    fn agrees<T: AbiFor<N>, const N: usize>() -> bool {
        deduce_abi(T::KIND, N, &AbiConfig::BUILD) == Ok(<AbiOf<T, N> as Abi>::TAG)
    }

    #[test]
    fn test_build_config() {
        assert_eq!(AbiConfig::BUILD.features, TargetFeatures::BUILD);
        assert_eq!(AbiConfig::BUILD.zero_width, cfg!(feature = "zero-width"));
        if cfg!(feature = "force-scalar") {
            assert!(TargetFeatures::BUILD.is_scalar());
        }
    }

    #[test]
    fn test_table_matches_deduction() {
        assert!(agrees::<f32, 1>());
        assert!(agrees::<f32, 7>());
        assert!(agrees::<i8, 63>());
        assert!(agrees::<u64, 64>());
        assert!(agrees::<usize, 3>());
        assert!(agrees::<f64, 17>());
    }

    #[test]
    fn test_lane_counts() {
        assert_eq!(<AbiOf<u16, 9> as Abi>::LANES, 9);
        assert!(<AbiOf<u16, 9> as Abi>::CAPACITY >= 9);
        assert_eq!(<AbiOf<f32, 1> as Abi>::TAG, AbiTag::Scalar);
    }
}
