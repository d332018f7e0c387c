//! Compile-time SIMD ABI deduction.
//!
//! For a vectorizable element type `T` and a lane count `N`, `simdabi`
//! picks the storage a logical `N`-lane vector gets on the build target:
//! a scalar, one (possibly partially filled) register, an array of equal
//! registers, or a combination of differently sized parts. The choice is
//! made once at build time and exposed both as a value ([`AbiTag`], from
//! [`deduce_abi`]) and as a type ([`AbiOf<T, N>`](simd::AbiOf)), and the two
//! always agree.
//!
//! ```rust
//! use simdabi::simd::{deduce_abi, AbiConfig, ElementKind, TargetFeatures};
//! use simdabi::simd::deduce::{AbiTag, NativeRegister};
//! use simdabi::simd::target::MaskKind;
//!
//! let config = AbiConfig::new(TargetFeatures::AVX2);
//! let tag = deduce_abi(ElementKind::I32, 7, &config)?;
//! assert_eq!(
//!     tag,
//!     AbiTag::Native(NativeRegister { lanes: 7, width: 8, mask: MaskKind::Vector })
//! );
//! # Ok::<(), simdabi::AbiError>(())
//! ```
//!
//! Values and masks built on the deduced storage live in
//! [`simd::surface`]; the primitives they are made of live in
//! [`simd::vector`] and [`simd::mask`].

pub mod error;
pub mod report;
pub mod simd;

pub use error::{AbiError, Result};
pub use simd::{deduce_abi, AbiConfig, AbiTag, Simd, SimdMask, TargetFeatures};
