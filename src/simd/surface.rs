//! `Simd<T, N>` and `SimdMask<T, N>`: logical vectors over the deduced ABI.
//!
//! Every shape decision is made by the marker `AbiOf<T, N>`; these wrappers
//! only route lane operations to it.
//!
//! # Examples
//!
//! ```rust
//! use simdabi::simd::surface::{Simd, SimdMask};
//!
//! let data = [1.0f32, -2.0, 3.0, -4.0, 5.0];
//! let v = Simd::<f32, 5>::from_slice(&data);
//! let negative = v.simd_lt(Simd::splat(0.0));
//! assert_eq!(negative.count_true(), 2);
//!
//! let clamped = negative.select(Simd::splat(0.0), v);
//! assert_eq!(clamped.to_array(), [1.0, 0.0, 3.0, 0.0, 5.0]);
//!
//! let head = Simd::<i32, 7>::load_partial(&[1, 2, 3]);
//! assert_eq!(head.to_array(), [1, 2, 3, 0, 0, 0, 0]);
//! assert_eq!(SimdMask::<i32, 7>::with_n_true(3).to_int().to_array(), [-1, -1, -1, 0, 0, 0, 0]);
//! ```

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use num::traits::{AsPrimitive, Zero};

use super::abi::Abi;
use super::deduce::AbiTag;
use super::mask::all_ones;
use super::table::{AbiFor, AbiOf};

type Storage<T, const N: usize> = <AbiOf<T, N> as Abi>::Storage<T>;
type MaskStorage<T, const N: usize> = <AbiOf<T, N> as Abi>::Mask<T>;

/// `N` lanes of `T`.
pub struct Simd<T: AbiFor<N>, const N: usize> {
    storage: Storage<T, N>,
}

/// `N` boolean lanes matching `Simd<T, N>`.
pub struct SimdMask<T: AbiFor<N>, const N: usize> {
    storage: MaskStorage<T, N>,
}

impl<T: AbiFor<N>, const N: usize> Clone for Simd<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: AbiFor<N>, const N: usize> Copy for Simd<T, N> {}

impl<T: AbiFor<N>, const N: usize> Simd<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// The storage layout chosen for `(T, N)` on the build target.
    pub const ABI: AbiTag = <AbiOf<T, N> as Abi>::TAG;

    #[inline]
    pub fn splat(value: T) -> Self {
        Self::wrap(AbiOf::<T, N>::splat::<T>(value))
    }

    /// Builds a vector from `f(0), .., f(N - 1)`, called in that order.
    #[inline]
    pub fn generate<F: FnMut(usize) -> T>(f: F) -> Self {
        Self::wrap(AbiOf::<T, N>::generate::<T, F>(f))
    }

    #[inline]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self::generate(|i| lanes[i])
    }

    /// Loads the first `N` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `N`.
    #[inline]
    pub fn from_slice(slice: &[T]) -> Self {
        assert!(
            slice.len() >= N,
            "slice of length {} is shorter than {N} lanes",
            slice.len()
        );
        Self::generate(|i| slice[i])
    }

    /// Loads `slice` into the leading lanes; the rest are zero.
    ///
    /// Lanes are selected by `SimdMask::with_n_true(slice.len())`. Elements
    /// past `N` are ignored.
    #[inline]
    pub fn load_partial(slice: &[T]) -> Self {
        debug_assert!(slice.len() <= N, "Size must be <= {N}");
        let mask = SimdMask::<T, N>::with_n_true(slice.len());
        Self::generate(|i| if mask.get(i) { slice[i] } else { T::ZERO })
    }

    /// Stores the leading `out.len()` lanes into `out`.
    #[inline]
    pub fn store_partial(&self, out: &mut [T]) {
        debug_assert!(out.len() <= N, "Size must be <= {N}");
        let mask = SimdMask::<T, N>::with_n_true(out.len());
        for (i, slot) in out.iter_mut().enumerate().take(N) {
            if mask.get(i) {
                *slot = self.get(i);
            }
        }
    }

    /// Stores all lanes into the front of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `N`.
    #[inline]
    pub fn copy_to_slice(&self, out: &mut [T]) {
        assert!(
            out.len() >= N,
            "slice of length {} is shorter than {N} lanes",
            out.len()
        );
        self.store_partial(&mut out[..N]);
    }

    #[inline]
    pub fn to_array(&self) -> [T; N] {
        core::array::from_fn(|i| self.get(i))
    }

    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        assert!(index < N, "lane index {index} out of range for {N} lanes");
        AbiOf::<T, N>::get::<T>(&self.storage, index)
    }

    /// Reads a lane; the lane check is a debug assertion.
    ///
    /// # Safety
    ///
    /// `index` must be less than `N`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        debug_assert!(index < N, "Index must be < {N}");
        AbiOf::<T, N>::get::<T>(&self.storage, index)
    }

    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < N, "lane index {index} out of range for {N} lanes");
        AbiOf::<T, N>::set::<T>(&mut self.storage, index, value);
    }

    /// Lane-wise `as` conversion of values that `U` can represent.
    ///
    /// In debug builds every lane must convert back to the value it started
    /// from (NaN counts as equal to NaN); use
    /// [`convert_lossy`](Self::convert_lossy) to truncate or saturate.
    #[inline]
    pub fn convert<U>(self) -> Simd<U, N>
    where
        U: AbiFor<N> + AsPrimitive<T>,
        T: AsPrimitive<U>,
    {
        let out = self.convert_lossy::<U>();
        debug_assert!(
            (0..N).all(|i| {
                let (lane, back): (T, T) = (self.get(i), out.get(i).as_());
                #[allow(clippy::eq_op)]
                let both_nan = lane != lane && back != back;
                lane == back || both_nan
            }),
            "conversion from {} to {} is not value-preserving",
            T::KIND,
            U::KIND
        );
        out
    }

    /// Lane-wise `as` conversion with `as` semantics for every lane.
    #[inline]
    pub fn convert_lossy<U>(self) -> Simd<U, N>
    where
        U: AbiFor<N>,
        T: AsPrimitive<U>,
    {
        Simd::generate(|i| self.get(i).as_())
    }

    #[inline]
    pub fn simd_eq(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) == other.get(i))
    }

    #[inline]
    pub fn simd_ne(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) != other.get(i))
    }

    #[inline]
    pub fn simd_lt(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) < other.get(i))
    }

    #[inline]
    pub fn simd_le(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) <= other.get(i))
    }

    #[inline]
    pub fn simd_gt(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) > other.get(i))
    }

    #[inline]
    pub fn simd_ge(self, other: Self) -> SimdMask<T, N> {
        SimdMask::generate(|i| self.get(i) >= other.get(i))
    }

    /// `!self & other`, on the bit patterns.
    #[inline]
    pub fn and_not(self, other: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::andnot::<T>(self.storage, other.storage))
    }

    #[inline(always)]
    fn wrap(storage: Storage<T, N>) -> Self {
        Self { storage }
    }

    /// Wraps raw storage, zeroing any padding lanes it carries.
    #[inline]
    pub fn from_storage(storage: Storage<T, N>) -> Self {
        Self::wrap(AbiOf::<T, N>::normalize::<T>(storage))
    }

    #[inline(always)]
    pub fn storage(&self) -> &Storage<T, N> {
        &self.storage
    }

    #[inline(always)]
    pub fn into_storage(self) -> Storage<T, N> {
        self.storage
    }
}

impl<T: AbiFor<N>, const N: usize> Default for Simd<T, N> {
    #[inline]
    fn default() -> Self {
        Self::splat(T::ZERO)
    }
}

impl<T: AbiFor<N>, const N: usize> From<[T; N]> for Simd<T, N> {
    #[inline]
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: AbiFor<N>, const N: usize> From<Simd<T, N>> for [T; N] {
    #[inline]
    fn from(vector: Simd<T, N>) -> Self {
        vector.to_array()
    }
}

impl<T: AbiFor<N>, const N: usize> PartialEq for Simd<T, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl<T: AbiFor<N>, const N: usize> fmt::Debug for Simd<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Simd").field(&self.to_array()).finish()
    }
}

impl<T: AbiFor<N>, const N: usize> BitAnd for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::bitand::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> BitOr for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::bitor::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> BitXor for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::bitxor::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> Not for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::wrap(AbiOf::<T, N>::not::<T>(self.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> Clone for SimdMask<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: AbiFor<N>, const N: usize> Copy for SimdMask<T, N> {}

impl<T: AbiFor<N>, const N: usize> SimdMask<T, N> {
    pub const LANES: usize = N;

    #[inline]
    pub fn splat(value: bool) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_splat::<T>(value))
    }

    /// Builds a mask from `f(0), .., f(N - 1)`, called in that order.
    #[inline]
    pub fn generate<F: FnMut(usize) -> bool>(f: F) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_generate::<T, F>(f))
    }

    #[inline]
    pub fn from_array(lanes: [bool; N]) -> Self {
        Self::generate(|i| lanes[i])
    }

    /// The first `n` lanes true, the rest false.
    #[inline]
    pub fn with_n_true(n: usize) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_with_n_true::<T>(n))
    }

    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < N, "lane index {index} out of range for {N} lanes");
        AbiOf::<T, N>::mask_get::<T>(&self.storage, index)
    }

    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < N, "lane index {index} out of range for {N} lanes");
        AbiOf::<T, N>::mask_set::<T>(&mut self.storage, index, value);
    }

    #[inline]
    pub fn to_array(&self) -> [bool; N] {
        core::array::from_fn(|i| self.get(i))
    }

    #[inline]
    pub fn count_true(&self) -> usize {
        AbiOf::<T, N>::mask_count::<T>(&self.storage)
    }

    #[inline]
    pub fn all(&self) -> bool {
        self.count_true() == N
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.count_true() > 0
    }

    #[inline]
    pub fn none(&self) -> bool {
        self.count_true() == 0
    }

    /// Lane-wise `self ? a : b`.
    #[inline]
    pub fn select(self, a: Simd<T, N>, b: Simd<T, N>) -> Simd<T, N> {
        Simd::wrap(AbiOf::<T, N>::select::<T>(
            &self.storage,
            a.storage,
            b.storage,
        ))
    }

    /// Same-layout integer lanes: all-one for true, zero for false.
    #[inline]
    pub fn to_int_storage(&self) -> <AbiOf<T, N> as Abi>::Storage<T::Int> {
        AbiOf::<T, N>::mask_to_vector::<T>(&self.storage)
    }

    /// Inverse of [`to_int_storage`](Self::to_int_storage); non-zero is true.
    #[inline]
    pub fn from_int_storage(storage: &<AbiOf<T, N> as Abi>::Storage<T::Int>) -> Self {
        Self::wrap(AbiOf::<T, N>::vector_to_mask::<T>(storage))
    }

    /// The mask as a vector of same-size signed lanes, `-1` for true.
    #[inline]
    pub fn to_int(&self) -> Simd<T::Int, N>
    where
        T::Int: AbiFor<N>,
    {
        Simd::generate(|i| if self.get(i) { all_ones() } else { T::Int::zero() })
    }

    /// Any non-zero lane is true.
    #[inline]
    pub fn from_int(vector: Simd<T::Int, N>) -> Self
    where
        T::Int: AbiFor<N>,
    {
        Self::generate(|i| !vector.get(i).is_zero())
    }

    #[inline(always)]
    fn wrap(storage: MaskStorage<T, N>) -> Self {
        Self { storage }
    }

    /// Wraps raw mask storage; padding lanes are cleared.
    #[inline]
    pub fn from_storage(storage: MaskStorage<T, N>) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_normalize::<T>(storage))
    }

    #[inline(always)]
    pub fn storage(&self) -> &MaskStorage<T, N> {
        &self.storage
    }
}

impl<T: AbiFor<N>, const N: usize> Default for SimdMask<T, N> {
    #[inline]
    fn default() -> Self {
        Self::splat(false)
    }
}

impl<T: AbiFor<N>, const N: usize> From<[bool; N]> for SimdMask<T, N> {
    #[inline]
    fn from(lanes: [bool; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: AbiFor<N>, const N: usize> PartialEq for SimdMask<T, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl<T: AbiFor<N>, const N: usize> fmt::Debug for SimdMask<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimdMask").field(&self.to_array()).finish()
    }
}

impl<T: AbiFor<N>, const N: usize> BitAnd for SimdMask<T, N> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_and::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> BitOr for SimdMask<T, N> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_or::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> BitXor for SimdMask<T, N> {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_xor::<T>(self.storage, rhs.storage))
    }
}

impl<T: AbiFor<N>, const N: usize> Not for SimdMask<T, N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::wrap(AbiOf::<T, N>::mask_not::<T>(self.storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod simd_tests {
        use super::*;

        #[test]
        fn test_round_trip_through_abi() {
            let v = Simd::<u16, 11>::generate(|i| i as u16 * 3);
            assert_eq!(v.to_array(), core::array::from_fn(|i| i as u16 * 3));
            assert_eq!(Simd::from_array(v.to_array()), v);
            assert_eq!(Simd::<u16, 11>::ABI.lanes(), 11);
        }

        #[test]
        fn test_set_get() {
            let mut v = Simd::<f64, 3>::default();
            v.set(2, 1.5);
            assert_eq!(v.get(2), 1.5);
            assert_eq!(unsafe { v.get_unchecked(0) }, 0.0);
        }

        #[test]
        #[should_panic(expected = "lane index 3 out of range for 3 lanes")]
        fn test_get_out_of_range() {
            Simd::<f64, 3>::default().get(3);
        }

        #[test]
        fn test_storage_round_trip() {
            let v = Simd::<i32, 9>::generate(|i| i as i32 - 4);
            let again = Simd::<i32, 9>::from_storage(v.into_storage());
            assert_eq!(again, v);
            assert_eq!(again.storage(), v.storage());

            let m = SimdMask::<i32, 9>::with_n_true(5);
            assert_eq!(SimdMask::<i32, 9>::from_storage(*m.storage()), m);
        }

        #[test]
        fn test_lossy_conversion() {
            let v = Simd::<f32, 4>::from_array([1.5, -2.75, 300.0, f32::NAN]);
            assert_eq!(v.convert_lossy::<i32>().to_array(), [1, -2, 300, 0]);
            assert_eq!(v.convert_lossy::<u8>().to_array(), [1, 0, 255, 0]);

            let exact = Simd::<f32, 4>::from_array([0.5, -1.0, f32::NAN, f32::INFINITY]);
            let wide = exact.convert::<f64>();
            assert!(wide.get(2).is_nan());
            assert_eq!(wide.get(3), f64::INFINITY);
        }

        #[test]
        fn test_partial_store() {
            let v = Simd::<i8, 6>::from_array([1, 2, 3, 4, 5, 6]);
            let mut out = [0i8; 4];
            v.store_partial(&mut out);
            assert_eq!(out, [1, 2, 3, 4]);

            let mut full = [0i8; 8];
            v.copy_to_slice(&mut full);
            assert_eq!(full, [1, 2, 3, 4, 5, 6, 0, 0]);
        }
    }

    #[cfg(debug_assertions)]
    mod debug_assertion_tests {
        use super::*;

        #[test]
        #[should_panic(expected = "conversion from f32 to i32 is not value-preserving")]
        fn test_convert_rejects_fraction() {
            let _ = Simd::<f32, 5>::splat(1.5).convert::<i32>();
        }

        #[test]
        #[should_panic(expected = "conversion from i32 to u8 is not value-preserving")]
        fn test_convert_rejects_out_of_range() {
            let _ = Simd::<i32, 3>::from_array([1, 2, 256]).convert::<u8>();
        }

        #[test]
        #[should_panic(expected = "Size must be <= 4")]
        fn test_load_partial_rejects_long_slice() {
            let _ = Simd::<u16, 4>::load_partial(&[1, 2, 3, 4, 5]);
        }
    }

    mod mask_tests {
        use super::*;

        #[test]
        fn test_queries() {
            let m = SimdMask::<f32, 5>::from_array([true, false, true, false, false]);
            assert_eq!(m.count_true(), 2);
            assert!(m.any());
            assert!(!m.all());
            assert!(!m.none());
            assert!((!m | m).all());
            assert!((m ^ m).none());
        }

        #[test]
        fn test_default_is_all_false() {
            assert!(SimdMask::<u64, 33>::default().none());
        }
    }
}
