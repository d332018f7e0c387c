//! Compile-time registry of vectorizable element types and lane counts.
//!
//! [`Vectorizable`] is sealed and implemented for exactly the fixed-width
//! integers, the pointer-sized integers and the two IEEE float types. Any
//! vector, mask or ABI instantiated with another element type fails to
//! compile:
//!
//! ```compile_fail
//! use simdabi::simd::vector::PhysicalVector;
//!
//! let v = PhysicalVector::<bool, 4>::splat(true);
//! ```
//!
//! ```compile_fail
//! use simdabi::simd::vector::PhysicalVector;
//!
//! let v = PhysicalVector::<char, 4>::splat('a');
//! ```
//!
//! [`Lanes<W>`] implements [`SupportedLanes`] for powers of two from 1 to
//! 128. Other register widths do not exist:
//!
//! ```compile_fail
//! use simdabi::simd::vector::PhysicalVector;
//!
//! let v = PhysicalVector::<f32, 3>::splat(1.0);
//! ```

use core::fmt::Debug;
use core::hash::Hash;

use num::PrimInt;

use super::element::ElementKind;

mod private {
    pub trait Sealed {}
}

/// A register width in lanes.
pub struct Lanes<const W: usize>;

/// Implemented by [`Lanes<W>`] for every power of two `W` in `1..=128`.
pub trait SupportedLanes: private::Sealed {
    /// Smallest unsigned word with at least `W` bits, used by bit masks.
    type BitWord: PrimInt + Debug + Default + Hash + Send + Sync + 'static;
    /// Alignment of a `W`-lane register of 1-byte elements.
    type AlignX1: Copy + Debug + Default + Send + Sync + 'static;
    /// Alignment of a `W`-lane register of 2-byte elements.
    type AlignX2: Copy + Debug + Default + Send + Sync + 'static;
    /// Alignment of a `W`-lane register of 4-byte elements.
    type AlignX4: Copy + Debug + Default + Send + Sync + 'static;
    /// Alignment of a `W`-lane register of 8-byte elements.
    type AlignX8: Copy + Debug + Default + Send + Sync + 'static;
}

macro_rules! align_markers {
    ($($name:ident => $align:literal),* $(,)?) => {
        $(
            #[doc = concat!("Zero-sized marker aligned to ", stringify!($align), " bytes.")]
            #[repr(align($align))]
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
            pub struct $name;
        )*
    };
}

align_markers! {
    Align1 => 1,
    Align2 => 2,
    Align4 => 4,
    Align8 => 8,
    Align16 => 16,
    Align32 => 32,
    Align64 => 64,
}

macro_rules! supported_lanes {
    ($($w:literal => $word:ty, [$x1:ident, $x2:ident, $x4:ident, $x8:ident];)*) => {
        $(
            impl private::Sealed for Lanes<$w> {}

            impl SupportedLanes for Lanes<$w> {
                type BitWord = $word;
                type AlignX1 = $x1;
                type AlignX2 = $x2;
                type AlignX4 = $x4;
                type AlignX8 = $x8;
            }
        )*
    };
}

// Register alignment is min(W * size_of::<T>(), 64).
supported_lanes! {
    1 => u8, [Align1, Align2, Align4, Align8];
    2 => u8, [Align2, Align4, Align8, Align16];
    4 => u8, [Align4, Align8, Align16, Align32];
    8 => u8, [Align8, Align16, Align32, Align64];
    16 => u16, [Align16, Align32, Align64, Align64];
    32 => u32, [Align32, Align64, Align64, Align64];
    64 => u64, [Align64, Align64, Align64, Align64];
    128 => u128, [Align64, Align64, Align64, Align64];
}

/// An element type that can live in a SIMD lane.
///
/// Sealed: implemented for `i8 u8 i16 u16 i32 u32 i64 u64 isize usize f32
/// f64` only.
pub trait Vectorizable:
    private::Sealed + Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// Value-level description of this type.
    const KIND: ElementKind;
    /// All bits clear.
    const ZERO: Self;

    /// Same-size unsigned integer used for bitwise operations.
    type Bits: Vectorizable + PrimInt;
    /// Same-size signed integer used as vector-mask lane.
    type Int: Vectorizable + PrimInt;
    /// Alignment marker of a `W`-lane register of this type.
    type Align<const W: usize>: Copy + Debug + Default + Send + Sync + 'static
    where
        Lanes<W>: SupportedLanes;

    /// Reinterprets the value as its bit pattern.
    fn to_bits(self) -> Self::Bits;

    /// Reinterprets a bit pattern as a value.
    fn from_bits(bits: Self::Bits) -> Self;
}

macro_rules! impl_vectorizable_int {
    ($($ty:ty => $kind:expr, $bits:ty, $int:ty, $align:ident;)*) => {
        $(
            impl private::Sealed for $ty {}

            impl Vectorizable for $ty {
                const KIND: ElementKind = $kind;
                const ZERO: Self = 0;

                type Bits = $bits;
                type Int = $int;
                type Align<const W: usize> = <Lanes<W> as SupportedLanes>::$align
                where
                    Lanes<W>: SupportedLanes;

                #[inline(always)]
                fn to_bits(self) -> $bits {
                    self as $bits
                }

                #[inline(always)]
                fn from_bits(bits: $bits) -> Self {
                    bits as Self
                }
            }
        )*
    };
}

macro_rules! impl_vectorizable_float {
    ($($ty:ty => $kind:expr, $bits:ty, $int:ty, $align:ident;)*) => {
        $(
            impl private::Sealed for $ty {}

            impl Vectorizable for $ty {
                const KIND: ElementKind = $kind;
                const ZERO: Self = 0.0;

                type Bits = $bits;
                type Int = $int;
                type Align<const W: usize> = <Lanes<W> as SupportedLanes>::$align
                where
                    Lanes<W>: SupportedLanes;

                #[inline(always)]
                fn to_bits(self) -> $bits {
                    <$ty>::to_bits(self)
                }

                #[inline(always)]
                fn from_bits(bits: $bits) -> Self {
                    <$ty>::from_bits(bits)
                }
            }
        )*
    };
}

impl_vectorizable_int! {
    i8 => ElementKind::I8, u8, i8, AlignX1;
    u8 => ElementKind::U8, u8, i8, AlignX1;
    i16 => ElementKind::I16, u16, i16, AlignX2;
    u16 => ElementKind::U16, u16, i16, AlignX2;
    i32 => ElementKind::I32, u32, i32, AlignX4;
    u32 => ElementKind::U32, u32, i32, AlignX4;
    i64 => ElementKind::I64, u64, i64, AlignX8;
    u64 => ElementKind::U64, u64, i64, AlignX8;
}

#[cfg(target_pointer_width = "64")]
impl_vectorizable_int! {
    isize => ElementKind::I64, u64, i64, AlignX8;
    usize => ElementKind::U64, u64, i64, AlignX8;
}

#[cfg(target_pointer_width = "32")]
impl_vectorizable_int! {
    isize => ElementKind::I32, u32, i32, AlignX4;
    usize => ElementKind::U32, u32, i32, AlignX4;
}

#[cfg(target_pointer_width = "16")]
impl_vectorizable_int! {
    isize => ElementKind::I16, u16, i16, AlignX2;
    usize => ElementKind::U16, u16, i16, AlignX2;
}

impl_vectorizable_float! {
    f32 => ElementKind::F32, u32, i32, AlignX4;
    f64 => ElementKind::F64, u64, i64, AlignX8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{align_of, size_of};

    fn kind_matches_layout<T: Vectorizable>() {
        assert_eq!(T::KIND.bytes(), size_of::<T>());
        assert_eq!(size_of::<T::Bits>(), size_of::<T>());
        assert_eq!(size_of::<T::Int>(), size_of::<T>());
        assert!(T::KIND.is_vectorizable());
        assert_eq!(T::ZERO, T::default());
    }

    #[test]
    fn test_kind_matches_layout() {
        kind_matches_layout::<i8>();
        kind_matches_layout::<u8>();
        kind_matches_layout::<i16>();
        kind_matches_layout::<u16>();
        kind_matches_layout::<i32>();
        kind_matches_layout::<u32>();
        kind_matches_layout::<i64>();
        kind_matches_layout::<u64>();
        kind_matches_layout::<isize>();
        kind_matches_layout::<usize>();
        kind_matches_layout::<f32>();
        kind_matches_layout::<f64>();
    }

    #[test]
    fn test_bits_round_trip() {
        assert_eq!((-1i8).to_bits(), 0xff);
        assert_eq!(i8::from_bits(0x80), i8::MIN);
        assert_eq!(Vectorizable::to_bits(1.0f32), 0x3f80_0000);
        assert_eq!(<f64 as Vectorizable>::from_bits(0), 0.0);
        assert!(<f32 as Vectorizable>::from_bits(u32::MAX).is_nan());
    }

    #[test]
    fn test_register_alignment() {
        assert_eq!(align_of::<<f32 as Vectorizable>::Align<1>>(), 4);
        assert_eq!(align_of::<<f32 as Vectorizable>::Align<8>>(), 32);
        assert_eq!(align_of::<<u8 as Vectorizable>::Align<16>>(), 16);
        assert_eq!(align_of::<<f64 as Vectorizable>::Align<16>>(), 64);
        assert_eq!(align_of::<<u8 as Vectorizable>::Align<128>>(), 64);
        assert_eq!(align_of::<<i16 as Vectorizable>::Align<4>>(), 8);
        assert_eq!(size_of::<<i16 as Vectorizable>::Align<4>>(), 0);
    }

    #[test]
    fn test_bit_words() {
        assert_eq!(size_of::<<Lanes<2> as SupportedLanes>::BitWord>(), 1);
        assert_eq!(size_of::<<Lanes<8> as SupportedLanes>::BitWord>(), 1);
        assert_eq!(size_of::<<Lanes<16> as SupportedLanes>::BitWord>(), 2);
        assert_eq!(size_of::<<Lanes<64> as SupportedLanes>::BitWord>(), 8);
        assert_eq!(size_of::<<Lanes<128> as SupportedLanes>::BitWord>(), 16);
    }
}
