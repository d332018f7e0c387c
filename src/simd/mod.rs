//! Portable SIMD storage selection.
//!
//! Bottom-up, the layers are:
//!
//! - [`element`] and [`traits`]: which element types and register widths exist,
//! - [`target`]: which registers the build target has,
//! - [`deduce`]: the storage layout for `N` lanes of `T` as a value,
//! - [`vector`] and [`mask`]: physical registers and their masks,
//! - [`abi`] and [`table`]: the same layout as a type, one marker per `(T, N)`,
//! - [`surface`]: `Simd<T, N>` and `SimdMask<T, N>` on top of the marker.

pub mod abi;
pub mod deduce;
pub mod element;
pub mod mask;
pub mod surface;
pub mod table;
pub mod target;
pub mod traits;
pub mod vector;

pub use abi::Abi;
pub use deduce::{deduce_abi, AbiConfig, AbiTag};
pub use element::ElementKind;
pub use surface::{Simd, SimdMask};
pub use table::{AbiFor, AbiOf};
pub use target::TargetFeatures;
pub use traits::Vectorizable;
pub use vector::PhysicalVector;
