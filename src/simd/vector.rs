//! Fixed-width physical vectors and their primitive operations.
//!
//! A [`PhysicalVector<T, W>`] is `W` contiguous lanes of `T`, laid out like
//! `[T; W]` and aligned like a hardware register of the same size
//! (`min(W * size_of::<T>(), 64)` bytes). It is the building block every
//! ABI stores its values and vector masks in.
//!
//! # Supported Operations
//!
//! - **Construction**: `from_array`, `splat`, `zeroed`, `broadcast`, `generate`
//! - **Lane access**: `get`, `set`, `with_lane`, `get_unchecked`, `set_unchecked`
//! - **Reinterpretation**: `bitcast`, `convert`, `convert_all`, `convert_split`
//! - **Parts**: `extract_part`, `split`, `concat`, `concat_all`, `truncated`
//! - **Permutation**: `shuffle`, `shuffle2` (with the [`ZERO_LANE`](PhysicalVector::ZERO_LANE) sentinel)
//! - **Bitwise**: `and`, `or`, `xor`, `not`, `andnot` and the matching operators
//!
//! Shape mismatches (bit-casts between different sizes, parts outside the
//! vector, concatenations that do not fit) are rejected at compile time.
//!
//! Every operation except `generate` and the `convert` family is a
//! `const fn` and gives the same lanes in a constant as at run time.
//!
//! # Examples
//!
//! ```rust
//! use simdabi::simd::vector::PhysicalVector;
//!
//! const HEAD: PhysicalVector<i32, 8> = PhysicalVector::broadcast(7, 3);
//! assert_eq!(HEAD.to_array(), [7, 7, 7, 0, 0, 0, 0, 0]);
//!
//! let [lo, hi] = HEAD.split::<4, 2>();
//! assert_eq!(lo.concat::<8>(hi), HEAD);
//! ```

use core::fmt;
use core::mem::size_of;
use core::ops::{BitAnd, BitOr, BitXor, Index, Not};

use num::traits::AsPrimitive;

use super::traits::{Lanes, SupportedLanes, Vectorizable};

/// Shuffle index producing a zero lane.
pub const ZERO_LANE: usize = usize::MAX;

/// `W` lanes of `T` with register alignment.
#[repr(C)]
pub struct PhysicalVector<T: Vectorizable, const W: usize>
where
    Lanes<W>: SupportedLanes,
{
    _align: [T::Align<W>; 0],
    lanes: [T; W],
}

impl<T: Vectorizable, const W: usize> Clone for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Vectorizable, const W: usize> Copy for PhysicalVector<T, W> where Lanes<W>: SupportedLanes {}

impl<T: Vectorizable, const W: usize> fmt::Debug for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhysicalVector").field(&self.lanes).finish()
    }
}

impl<T: Vectorizable, const W: usize> PartialEq for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: Vectorizable, const W: usize> Default for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Vectorizable, const W: usize> From<[T; W]> for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    #[inline]
    fn from(lanes: [T; W]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Vectorizable, const W: usize> Index<usize> for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.lanes[index]
    }
}

impl<T: Vectorizable, const W: usize> PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    /// Number of lanes.
    pub const WIDTH: usize = W;

    /// Size of the vector in bytes.
    pub const BYTES: usize = W * size_of::<T>();

    /// Shuffle index producing a zero lane.
    pub const ZERO_LANE: usize = ZERO_LANE;

    #[inline(always)]
    pub const fn from_array(lanes: [T; W]) -> Self {
        Self { _align: [], lanes }
    }

    #[inline(always)]
    pub const fn splat(value: T) -> Self {
        Self::from_array([value; W])
    }

    #[inline(always)]
    pub const fn zeroed() -> Self {
        Self::splat(T::ZERO)
    }

    /// Sets the first `n` lanes to `value` and the rest to zero.
    ///
    /// # Panics
    ///
    /// Panics if `n > W`.
    pub const fn broadcast(value: T, n: usize) -> Self {
        assert!(n <= W, "broadcast count exceeds the vector width");
        let mut lanes = [T::ZERO; W];
        let mut i = 0;
        while i < n {
            lanes[i] = value;
            i += 1;
        }
        Self::from_array(lanes)
    }

    /// Builds a vector from `f(0), f(1), .., f(W - 1)`, called in that order.
    #[inline]
    pub fn generate<F: FnMut(usize) -> T>(f: F) -> Self {
        Self::from_array(core::array::from_fn(f))
    }

    #[inline(always)]
    pub const fn to_array(self) -> [T; W] {
        self.lanes
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[T; W] {
        &self.lanes
    }

    /// # Panics
    ///
    /// Panics if `index >= W`.
    #[inline(always)]
    pub const fn get(&self, index: usize) -> T {
        assert!(index < W, "lane index out of range");
        self.lanes[index]
    }

    /// # Panics
    ///
    /// Panics if `index >= W`.
    #[inline(always)]
    pub const fn set(&mut self, index: usize, value: T) {
        assert!(index < W, "lane index out of range");
        self.lanes[index] = value;
    }

    /// Returns a copy with lane `index` replaced.
    #[inline(always)]
    pub const fn with_lane(mut self, index: usize, value: T) -> Self {
        self.set(index, value);
        self
    }

    /// Reads a lane without bounds checking in release builds.
    ///
    /// # Safety
    ///
    /// `index` must be less than `W`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        debug_assert!(index < W, "Index must be < {W}");
        unsafe { *self.lanes.get_unchecked(index) }
    }

    /// Writes a lane without bounds checking in release builds.
    ///
    /// # Safety
    ///
    /// `index` must be less than `W`.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        debug_assert!(index < W, "Index must be < {W}");
        unsafe { *self.lanes.get_unchecked_mut(index) = value }
    }

    /// Reinterprets the bytes of `self` as a vector of `V` lanes of `U`.
    ///
    /// Both vectors must have the same size; anything else fails to compile.
    #[inline(always)]
    pub const fn bitcast<U: Vectorizable, const V: usize>(self) -> PhysicalVector<U, V>
    where
        Lanes<V>: SupportedLanes,
    {
        const {
            assert!(
                W * size_of::<T>() == V * size_of::<U>(),
                "bitcast between vectors of different sizes"
            )
        };
        // SAFETY: both types are plain arrays of integers or floats of the
        // same size, and every bit pattern is a valid value for them.
        unsafe { Reinterpret::<Self, PhysicalVector<U, V>> { from: self }.to }
    }

    /// Lane-wise `as` conversion. Lanes past `min(W, V)` are zero.
    #[inline]
    pub fn convert<U: Vectorizable, const V: usize>(self) -> PhysicalVector<U, V>
    where
        T: AsPrimitive<U>,
        Lanes<V>: SupportedLanes,
    {
        PhysicalVector::generate(|i| if i < W { self.lanes[i].as_() } else { U::ZERO })
    }

    /// Converts `K` vectors and lays the results out back to back.
    ///
    /// Lane `j` of the result is lane `j % W` of `parts[j / W]`; lanes past
    /// `K * W` are zero and lanes past `V` are dropped.
    pub fn convert_all<U: Vectorizable, const K: usize, const V: usize>(
        parts: [Self; K],
    ) -> PhysicalVector<U, V>
    where
        T: AsPrimitive<U>,
        Lanes<V>: SupportedLanes,
    {
        PhysicalVector::generate(|j| {
            if j < K * W {
                parts[j / W].lanes[j % W].as_()
            } else {
                U::ZERO
            }
        })
    }

    /// Converts `self` into `K` consecutive vectors of `V` lanes.
    ///
    /// Output `p` holds lanes `p * V .. (p + 1) * V`; lanes past `W` are zero.
    pub fn convert_split<U: Vectorizable, const V: usize, const K: usize>(
        self,
    ) -> [PhysicalVector<U, V>; K]
    where
        T: AsPrimitive<U>,
        Lanes<V>: SupportedLanes,
    {
        core::array::from_fn(|p| {
            PhysicalVector::generate(|j| {
                let lane = p * V + j;
                if lane < W {
                    self.lanes[lane].as_()
                } else {
                    U::ZERO
                }
            })
        })
    }

    /// Extracts `COMBINE` contiguous parts out of `TOTAL` equal parts,
    /// starting at part `INDEX`.
    ///
    /// The result starts at lane `INDEX * (W / TOTAL)` and holds
    /// `COMBINE * (W / TOTAL)` lanes followed by zeros up to `V`.
    #[inline]
    pub const fn extract_part<
        const INDEX: usize,
        const TOTAL: usize,
        const COMBINE: usize,
        const V: usize,
    >(
        self,
    ) -> PhysicalVector<T, V>
    where
        Lanes<V>: SupportedLanes,
    {
        const {
            assert!(TOTAL > 0 && W % TOTAL == 0, "W must split into TOTAL equal parts");
            assert!(COMBINE > 0, "at least one part must be extracted");
            assert!((INDEX + COMBINE) * (W / TOTAL) <= W, "part range exceeds the vector");
            assert!(COMBINE * (W / TOTAL) <= V, "extracted parts do not fit the result");
        };
        let start = INDEX * (W / TOTAL);
        let len = COMBINE * (W / TOTAL);
        let mut out = PhysicalVector::<T, V>::zeroed();
        let mut i = 0;
        while i < len {
            out.lanes[i] = self.lanes[start + i];
            i += 1;
        }
        out
    }

    /// Splits `self` into `K` vectors of `V` lanes covering it exactly.
    #[inline]
    pub const fn split<const V: usize, const K: usize>(self) -> [PhysicalVector<T, V>; K]
    where
        Lanes<V>: SupportedLanes,
    {
        const { assert!(V * K == W, "split must cover the vector exactly") };
        let mut out = [PhysicalVector::<T, V>::zeroed(); K];
        let mut lane = 0;
        while lane < W {
            out[lane / V].lanes[lane % V] = self.lanes[lane];
            lane += 1;
        }
        out
    }

    /// Joins `self` and `other`, `self` in the low lanes.
    #[inline]
    pub const fn concat<const V: usize>(self, other: Self) -> PhysicalVector<T, V>
    where
        Lanes<V>: SupportedLanes,
    {
        const { assert!(V == 2 * W, "concat of two vectors must double the width") };
        Self::concat_all::<2, V>([self, other])
    }

    /// Joins `K` vectors in argument order. Lanes past `K * W` are zero.
    ///
    /// Equivalent to concatenating pairs left to right, then pairs of pairs.
    pub const fn concat_all<const K: usize, const V: usize>(
        parts: [Self; K],
    ) -> PhysicalVector<T, V>
    where
        Lanes<V>: SupportedLanes,
    {
        const { assert!(K * W <= V, "concatenated parts do not fit the result") };
        let mut out = PhysicalVector::<T, V>::zeroed();
        let mut j = 0;
        while j < K * W {
            out.lanes[j] = parts[j / W].lanes[j % W];
            j += 1;
        }
        out
    }

    /// Picks lanes of `self` by index. [`Self::ZERO_LANE`] yields zero.
    ///
    /// # Panics
    ///
    /// Panics if an index is neither `ZERO_LANE` nor less than `W`.
    pub const fn shuffle<const V: usize>(self, indices: [usize; V]) -> PhysicalVector<T, V>
    where
        Lanes<V>: SupportedLanes,
    {
        let mut out = PhysicalVector::<T, V>::zeroed();
        let mut i = 0;
        while i < V {
            match indices[i] {
                ZERO_LANE => {}
                index => {
                    assert!(index < W, "shuffle index out of range");
                    out.lanes[i] = self.lanes[index];
                }
            }
            i += 1;
        }
        out
    }

    /// Picks lanes of `self` (`0..W`) and `other` (`W..2W`) by index.
    ///
    /// # Panics
    ///
    /// Panics if an index is neither `ZERO_LANE` nor less than `2 * W`.
    pub const fn shuffle2<const V: usize>(
        self,
        other: Self,
        indices: [usize; V],
    ) -> PhysicalVector<T, V>
    where
        Lanes<V>: SupportedLanes,
    {
        let mut out = PhysicalVector::<T, V>::zeroed();
        let mut i = 0;
        while i < V {
            match indices[i] {
                ZERO_LANE => {}
                index if index < W => out.lanes[i] = self.lanes[index],
                index => {
                    assert!(index < 2 * W, "shuffle index out of range");
                    out.lanes[i] = other.lanes[index - W];
                }
            }
            i += 1;
        }
        out
    }

    /// Zeroes every lane from `n` on.
    #[inline]
    pub const fn truncated(mut self, n: usize) -> Self {
        let mut i = n;
        while i < W {
            self.lanes[i] = T::ZERO;
            i += 1;
        }
        self
    }

    /// Combines the bytes of `self` and `other` one at a time.
    #[inline(always)]
    const fn zip_bytes(mut self, other: Self, op: ByteOp) -> Self {
        let dst = (&mut self.lanes as *mut [T; W]).cast::<u8>();
        let src = (&other.lanes as *const [T; W]).cast::<u8>();
        let mut i = 0;
        while i < Self::BYTES {
            // SAFETY: `lanes` is `BYTES` bytes of integers or floats without
            // padding, so every byte is initialized and any value is valid.
            unsafe {
                let (a, b) = (*dst.add(i), *src.add(i));
                *dst.add(i) = match op {
                    ByteOp::And => a & b,
                    ByteOp::Or => a | b,
                    ByteOp::Xor => a ^ b,
                    ByteOp::AndNot => !a & b,
                    ByteOp::Not => !a,
                };
            }
            i += 1;
        }
        self
    }

    #[inline(always)]
    pub const fn and(self, other: Self) -> Self {
        self.zip_bytes(other, ByteOp::And)
    }

    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        self.zip_bytes(other, ByteOp::Or)
    }

    #[inline(always)]
    pub const fn xor(self, other: Self) -> Self {
        self.zip_bytes(other, ByteOp::Xor)
    }

    /// `!self & other`, lane by lane.
    #[inline(always)]
    pub const fn andnot(self, other: Self) -> Self {
        self.zip_bytes(other, ByteOp::AndNot)
    }

    #[inline(always)]
    pub const fn not(self) -> Self {
        self.zip_bytes(self, ByteOp::Not)
    }
}

#[derive(Clone, Copy)]
enum ByteOp {
    And,
    Or,
    Xor,
    AndNot,
    Not,
}

#[repr(C)]
union Reinterpret<A: Copy, B: Copy> {
    from: A,
    to: B,
}

impl<T: Vectorizable, const W: usize> BitAnd for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<T: Vectorizable, const W: usize> BitOr for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl<T: Vectorizable, const W: usize> BitXor for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        self.xor(rhs)
    }
}

impl<T: Vectorizable, const W: usize> Not for PhysicalVector<T, W>
where
    Lanes<W>: SupportedLanes,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        PhysicalVector::not(self)
    }
}
