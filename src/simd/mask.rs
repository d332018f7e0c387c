//! Mask representations.
//!
//! Three storage forms share one truth table through [`MaskBits`]:
//!
//! - `bool` for scalar ABIs,
//! - [`VectorMask<I, W>`]: a register of signed lanes that are all-zero or
//!   all-one, the form compare instructions produce on SSE, AVX, NEON and
//!   WASM,
//! - [`BitMask<W>`]: one bit per lane in the smallest word that holds `W`
//!   bits, the AVX-512 `k` register form.
//!
//! A default-constructed mask is all false.

use core::fmt;

use num::traits::{One, PrimInt, Zero};

use super::traits::{Lanes, SupportedLanes, Vectorizable};
use super::vector::PhysicalVector;

/// Bit-mask word of a `W`-lane register.
pub type Word<const W: usize> = <Lanes<W> as SupportedLanes>::BitWord;

/// Integer with every bit set.
#[inline(always)]
pub fn all_ones<I: PrimInt>() -> I {
    !I::zero()
}

/// Boolean lanes with a fixed width.
///
/// Implementations agree lane by lane: the same sequence of operations on
/// any two of them yields the same [`test`](MaskBits::test) results.
pub trait MaskBits: Copy + fmt::Debug + PartialEq {
    /// Number of lanes, padding included.
    const WIDTH: usize;

    fn splat(value: bool) -> Self;

    /// Builds a mask from `f(0), .., f(WIDTH - 1)`, called in that order.
    fn from_fn<F: FnMut(usize) -> bool>(f: F) -> Self;

    /// The first `n` lanes true, the rest false.
    #[inline]
    fn with_n_true(n: usize) -> Self {
        Self::from_fn(|i| i < n)
    }

    /// # Panics
    ///
    /// Panics if `index >= WIDTH`.
    fn test(&self, index: usize) -> bool;

    /// # Panics
    ///
    /// Panics if `index >= WIDTH`.
    fn set(&mut self, index: usize, value: bool);

    fn and(self, other: Self) -> Self;

    fn or(self, other: Self) -> Self;

    fn xor(self, other: Self) -> Self;

    fn not(self) -> Self;

    fn count_true(&self) -> usize;
}

impl MaskBits for bool {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        value
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> bool>(mut f: F) -> Self {
        f(0)
    }

    #[inline(always)]
    fn test(&self, index: usize) -> bool {
        assert!(index == 0, "lane index out of range");
        *self
    }

    #[inline(always)]
    fn set(&mut self, index: usize, value: bool) {
        assert!(index == 0, "lane index out of range");
        *self = value;
    }

    #[inline(always)]
    fn and(self, other: Self) -> Self {
        self & other
    }

    #[inline(always)]
    fn or(self, other: Self) -> Self {
        self | other
    }

    #[inline(always)]
    fn xor(self, other: Self) -> Self {
        self ^ other
    }

    #[inline(always)]
    fn not(self) -> Self {
        !self
    }

    #[inline(always)]
    fn count_true(&self) -> usize {
        *self as usize
    }
}

/// One bit per lane; bits at or above `W` are always clear.
pub struct BitMask<const W: usize>
where
    Lanes<W>: SupportedLanes,
{
    bits: Word<W>,
}

impl<const W: usize> Clone for BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<const W: usize> Copy for BitMask<W> where Lanes<W>: SupportedLanes {}

impl<const W: usize> PartialEq for BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<const W: usize> Eq for BitMask<W> where Lanes<W>: SupportedLanes {}

impl<const W: usize> Default for BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn default() -> Self {
        Self::splat(false)
    }
}

impl<const W: usize> fmt::Debug for BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitMask<{W}>(")?;
        for i in 0..W {
            f.write_str(if self.test(i) { "1" } else { "0" })?;
        }
        f.write_str(")")
    }
}

impl<const W: usize> BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    /// Word with the low `W` bits set.
    #[inline(always)]
    pub fn lane_bits() -> Word<W> {
        let word_bits = core::mem::size_of::<Word<W>>() * 8;
        if W >= word_bits {
            all_ones()
        } else {
            (Word::<W>::one() << W) - Word::<W>::one()
        }
    }

    /// Wraps a raw word, clearing bits at or above `W`.
    #[inline(always)]
    pub fn from_bits(bits: Word<W>) -> Self {
        Self {
            bits: bits & Self::lane_bits(),
        }
    }

    #[inline(always)]
    pub fn to_bits(self) -> Word<W> {
        self.bits
    }

    /// Expands to a vector of all-one / all-zero lanes.
    #[inline]
    pub fn to_vector<I: Vectorizable + PrimInt>(self) -> PhysicalVector<I, W> {
        PhysicalVector::generate(|i| if self.test(i) { all_ones() } else { I::zero() })
    }

    /// Compresses a vector; any non-zero lane is true.
    #[inline]
    pub fn from_vector<I: Vectorizable + PrimInt>(vector: PhysicalVector<I, W>) -> Self {
        Self::from_fn(|i| vector[i] != I::zero())
    }
}

impl<const W: usize> MaskBits for BitMask<W>
where
    Lanes<W>: SupportedLanes,
{
    const WIDTH: usize = W;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        let bits = if value {
            Self::lane_bits()
        } else {
            Word::<W>::zero()
        };
        Self { bits }
    }

    #[inline]
    fn from_fn<F: FnMut(usize) -> bool>(mut f: F) -> Self {
        let one = Word::<W>::one();
        let mut bits = Word::<W>::zero();
        for i in 0..W {
            if f(i) {
                bits = bits | (one << i);
            }
        }
        Self { bits }
    }

    #[inline(always)]
    fn test(&self, index: usize) -> bool {
        assert!(index < W, "lane index out of range");
        let one = Word::<W>::one();
        (self.bits >> index) & one == one
    }

    #[inline(always)]
    fn set(&mut self, index: usize, value: bool) {
        assert!(index < W, "lane index out of range");
        let bit = Word::<W>::one() << index;
        self.bits = if value { self.bits | bit } else { self.bits & !bit };
    }

    #[inline(always)]
    fn and(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    #[inline(always)]
    fn or(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[inline(always)]
    fn xor(self, other: Self) -> Self {
        Self {
            bits: self.bits ^ other.bits,
        }
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_bits(!self.bits)
    }

    #[inline(always)]
    fn count_true(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// A register of signed lanes, each all-zero (false) or all-one (true).
pub struct VectorMask<I: Vectorizable + PrimInt, const W: usize>(PhysicalVector<I, W>)
where
    Lanes<W>: SupportedLanes;

impl<I: Vectorizable + PrimInt, const W: usize> Clone for VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: Vectorizable + PrimInt, const W: usize> Copy for VectorMask<I, W> where
    Lanes<W>: SupportedLanes
{
}

impl<I: Vectorizable + PrimInt, const W: usize> PartialEq for VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<I: Vectorizable + PrimInt, const W: usize> Default for VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn default() -> Self {
        Self(PhysicalVector::zeroed())
    }
}

impl<I: Vectorizable + PrimInt, const W: usize> fmt::Debug for VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VectorMask").field(self.0.as_array()).finish()
    }
}

impl<I: Vectorizable + PrimInt, const W: usize> VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline(always)]
    pub fn to_vector(self) -> PhysicalVector<I, W> {
        self.0
    }

    /// Normalizes a vector: any non-zero lane becomes all-one.
    #[inline]
    pub fn from_vector(vector: PhysicalVector<I, W>) -> Self {
        Self::from_fn(|i| vector[i] != I::zero())
    }
}

impl<I: Vectorizable + PrimInt, const W: usize> MaskBits for VectorMask<I, W>
where
    Lanes<W>: SupportedLanes,
{
    const WIDTH: usize = W;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self(PhysicalVector::splat(if value { all_ones() } else { I::zero() }))
    }

    #[inline]
    fn from_fn<F: FnMut(usize) -> bool>(mut f: F) -> Self {
        Self(PhysicalVector::generate(|i| {
            if f(i) {
                all_ones()
            } else {
                I::zero()
            }
        }))
    }

    #[inline(always)]
    fn test(&self, index: usize) -> bool {
        self.0.get(index) != I::zero()
    }

    #[inline(always)]
    fn set(&mut self, index: usize, value: bool) {
        self.0.set(index, if value { all_ones() } else { I::zero() });
    }

    #[inline(always)]
    fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[inline(always)]
    fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(!self.0)
    }

    #[inline]
    fn count_true(&self) -> usize {
        self.0.as_array().iter().filter(|&&lane| lane != I::zero()).count()
    }
}
