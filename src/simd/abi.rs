//! Type-level ABI markers.
//!
//! An [`Abi`] marker fixes how `LANES` logical lanes of any vectorizable
//! `T` are stored, and how the matching mask is stored. The generated
//! [`AbiFor`](super::table::AbiFor) table picks the marker for each
//! `(T, N)`; values and masks are then built from the primitives of
//! [`vector`](super::vector) and [`mask`](super::mask).
//!
//! | Marker              | Value storage                 | Mask storage              |
//! |---------------------|-------------------------------|---------------------------|
//! | [`Scalar`]          | `T`                           | `bool`                    |
//! | [`VecBuiltin<L, W>`]| `PhysicalVector<T, W>`        | `VectorMask<T::Int, W>`   |
//! | [`VecBitmask<L, W>`]| `PhysicalVector<T, W>`        | `BitMask<W>`              |
//! | [`ArrayAbi<A, K>`]  | `[A::Storage<T>; K]`          | `[A::Mask<T>; K]`         |
//! | [`Combined<A, B>`]  | `Pair<A::Storage<T>, B::..>`  | `Pair<A::Mask<T>, B::..>` |
//! | [`ZeroAbi`]         | `()`                          | `()`                      |
//!
//! Every operation keeps padding value lanes (`LANES..CAPACITY`) zero and
//! padding mask lanes false.

use core::fmt::Debug;
use core::marker::PhantomData;

use num::traits::Zero;

use super::deduce::{AbiTag, Chunk, NativeRegister};
use super::mask::{all_ones, BitMask, MaskBits, VectorMask};
use super::target::MaskKind;
use super::traits::{Lanes, SupportedLanes, Vectorizable};
use super::vector::PhysicalVector;

/// Storage layout of a logical vector, independent of its element type.
pub trait Abi: Copy + Debug + Default + Send + Sync + 'static {
    /// Logical lane count.
    const LANES: usize;
    /// Physical lane count, padding included.
    const CAPACITY: usize;
    /// Value-level description of this layout.
    const TAG: AbiTag;

    /// Value storage for lanes of `T`.
    type Storage<T: Vectorizable>: Copy + Debug + PartialEq;
    /// Mask storage for lanes of `T`.
    type Mask<T: Vectorizable>: Copy + Debug + PartialEq;

    fn splat<T: Vectorizable>(value: T) -> Self::Storage<T>;

    /// Builds storage from `f(0), .., f(LANES - 1)`, called in that order.
    fn generate<T: Vectorizable, F: FnMut(usize) -> T>(f: F) -> Self::Storage<T>;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn get<T: Vectorizable>(storage: &Self::Storage<T>, index: usize) -> T;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn set<T: Vectorizable>(storage: &mut Self::Storage<T>, index: usize, value: T);

    fn bitand<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T>;

    fn bitor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T>;

    fn bitxor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T>;

    /// `!a & b`.
    fn andnot<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T>;

    fn not<T: Vectorizable>(a: Self::Storage<T>) -> Self::Storage<T>;

    /// Lane-wise `mask ? a : b`.
    fn select<T: Vectorizable>(
        mask: &Self::Mask<T>,
        a: Self::Storage<T>,
        b: Self::Storage<T>,
    ) -> Self::Storage<T>;

    fn mask_splat<T: Vectorizable>(value: bool) -> Self::Mask<T>;

    /// Builds a mask from `f(0), .., f(LANES - 1)`, called in that order.
    fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(f: F) -> Self::Mask<T>;

    /// The first `n` lanes true, the rest false.
    fn mask_with_n_true<T: Vectorizable>(n: usize) -> Self::Mask<T>;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn mask_get<T: Vectorizable>(mask: &Self::Mask<T>, index: usize) -> bool;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn mask_set<T: Vectorizable>(mask: &mut Self::Mask<T>, index: usize, value: bool);

    fn mask_and<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T>;

    fn mask_or<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T>;

    fn mask_xor<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T>;

    fn mask_not<T: Vectorizable>(a: Self::Mask<T>) -> Self::Mask<T>;

    fn mask_count<T: Vectorizable>(mask: &Self::Mask<T>) -> usize;

    /// Expands a mask into all-one / all-zero signed lanes.
    fn mask_to_vector<T: Vectorizable>(mask: &Self::Mask<T>) -> Self::Storage<T::Int>;

    /// Compresses signed lanes into a mask; any non-zero lane is true.
    fn vector_to_mask<T: Vectorizable>(vector: &Self::Storage<T::Int>) -> Self::Mask<T>;

    /// Zeroes the padding lanes of storage that came from outside.
    fn normalize<T: Vectorizable>(storage: Self::Storage<T>) -> Self::Storage<T>;

    /// Clears the padding lanes of a mask that came from outside.
    fn mask_normalize<T: Vectorizable>(mask: Self::Mask<T>) -> Self::Mask<T>;
}

/// One lane in a plain scalar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scalar;

impl Abi for Scalar {
    const LANES: usize = 1;
    const CAPACITY: usize = 1;
    const TAG: AbiTag = AbiTag::Scalar;

    type Storage<T: Vectorizable> = T;
    type Mask<T: Vectorizable> = bool;

    #[inline(always)]
    fn splat<T: Vectorizable>(value: T) -> T {
        value
    }

    #[inline(always)]
    fn generate<T: Vectorizable, F: FnMut(usize) -> T>(mut f: F) -> T {
        f(0)
    }

    #[inline(always)]
    fn get<T: Vectorizable>(storage: &T, index: usize) -> T {
        assert!(index == 0, "lane index out of range");
        *storage
    }

    #[inline(always)]
    fn set<T: Vectorizable>(storage: &mut T, index: usize, value: T) {
        assert!(index == 0, "lane index out of range");
        *storage = value;
    }

    #[inline(always)]
    fn bitand<T: Vectorizable>(a: T, b: T) -> T {
        T::from_bits(a.to_bits() & b.to_bits())
    }

    #[inline(always)]
    fn bitor<T: Vectorizable>(a: T, b: T) -> T {
        T::from_bits(a.to_bits() | b.to_bits())
    }

    #[inline(always)]
    fn bitxor<T: Vectorizable>(a: T, b: T) -> T {
        T::from_bits(a.to_bits() ^ b.to_bits())
    }

    #[inline(always)]
    fn andnot<T: Vectorizable>(a: T, b: T) -> T {
        T::from_bits(!a.to_bits() & b.to_bits())
    }

    #[inline(always)]
    fn not<T: Vectorizable>(a: T) -> T {
        T::from_bits(!a.to_bits())
    }

    #[inline(always)]
    fn select<T: Vectorizable>(mask: &bool, a: T, b: T) -> T {
        if *mask {
            a
        } else {
            b
        }
    }

    #[inline(always)]
    fn mask_splat<T: Vectorizable>(value: bool) -> bool {
        value
    }

    #[inline(always)]
    fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(mut f: F) -> bool {
        f(0)
    }

    #[inline(always)]
    fn mask_with_n_true<T: Vectorizable>(n: usize) -> bool {
        n > 0
    }

    #[inline(always)]
    fn mask_get<T: Vectorizable>(mask: &bool, index: usize) -> bool {
        MaskBits::test(mask, index)
    }

    #[inline(always)]
    fn mask_set<T: Vectorizable>(mask: &mut bool, index: usize, value: bool) {
        MaskBits::set(mask, index, value);
    }

    #[inline(always)]
    fn mask_and<T: Vectorizable>(a: bool, b: bool) -> bool {
        a & b
    }

    #[inline(always)]
    fn mask_or<T: Vectorizable>(a: bool, b: bool) -> bool {
        a | b
    }

    #[inline(always)]
    fn mask_xor<T: Vectorizable>(a: bool, b: bool) -> bool {
        a ^ b
    }

    #[inline(always)]
    fn mask_not<T: Vectorizable>(a: bool) -> bool {
        !a
    }

    #[inline(always)]
    fn mask_count<T: Vectorizable>(mask: &bool) -> usize {
        *mask as usize
    }

    #[inline(always)]
    fn mask_to_vector<T: Vectorizable>(mask: &bool) -> T::Int {
        if *mask {
            all_ones()
        } else {
            T::Int::zero()
        }
    }

    #[inline(always)]
    fn vector_to_mask<T: Vectorizable>(vector: &T::Int) -> bool {
        !vector.is_zero()
    }

    #[inline(always)]
    fn normalize<T: Vectorizable>(storage: T) -> T {
        storage
    }

    #[inline(always)]
    fn mask_normalize<T: Vectorizable>(mask: bool) -> bool {
        mask
    }
}

/// `L` lanes in one `W`-lane register with a vector mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VecBuiltin<const L: usize, const W: usize>;

/// `L` lanes in one `W`-lane register with a bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VecBitmask<const L: usize, const W: usize>;

macro_rules! impl_native_abi {
    ($marker:ident, $mask_kind:expr, $mask:ty) => {
        impl<const L: usize, const W: usize> Abi for $marker<L, W>
        where
            Lanes<W>: SupportedLanes,
        {
            const LANES: usize = {
                assert!(L > 1 && L <= W, "a register holds between 2 and W lanes");
                L
            };
            const CAPACITY: usize = W;
            const TAG: AbiTag = AbiTag::Native(NativeRegister {
                lanes: L,
                width: W,
                mask: $mask_kind,
            });

            type Storage<T: Vectorizable> = PhysicalVector<T, W>;
            type Mask<T: Vectorizable> = $mask;

            #[inline(always)]
            fn splat<T: Vectorizable>(value: T) -> PhysicalVector<T, W> {
                PhysicalVector::broadcast(value, Self::LANES)
            }

            #[inline]
            fn generate<T: Vectorizable, F: FnMut(usize) -> T>(
                mut f: F,
            ) -> PhysicalVector<T, W> {
                PhysicalVector::generate(|i| if i < Self::LANES { f(i) } else { T::ZERO })
            }

            #[inline(always)]
            fn get<T: Vectorizable>(storage: &PhysicalVector<T, W>, index: usize) -> T {
                assert!(index < Self::LANES, "lane index out of range");
                storage.get(index)
            }

            #[inline(always)]
            fn set<T: Vectorizable>(storage: &mut PhysicalVector<T, W>, index: usize, value: T) {
                assert!(index < Self::LANES, "lane index out of range");
                storage.set(index, value);
            }

            #[inline(always)]
            fn bitand<T: Vectorizable>(
                a: PhysicalVector<T, W>,
                b: PhysicalVector<T, W>,
            ) -> PhysicalVector<T, W> {
                a & b
            }

            #[inline(always)]
            fn bitor<T: Vectorizable>(
                a: PhysicalVector<T, W>,
                b: PhysicalVector<T, W>,
            ) -> PhysicalVector<T, W> {
                a | b
            }

            #[inline(always)]
            fn bitxor<T: Vectorizable>(
                a: PhysicalVector<T, W>,
                b: PhysicalVector<T, W>,
            ) -> PhysicalVector<T, W> {
                a ^ b
            }

            #[inline(always)]
            fn andnot<T: Vectorizable>(
                a: PhysicalVector<T, W>,
                b: PhysicalVector<T, W>,
            ) -> PhysicalVector<T, W> {
                a.andnot(b)
            }

            #[inline(always)]
            fn not<T: Vectorizable>(a: PhysicalVector<T, W>) -> PhysicalVector<T, W> {
                (!a).truncated(Self::LANES)
            }

            #[inline]
            fn select<T: Vectorizable>(
                mask: &$mask,
                a: PhysicalVector<T, W>,
                b: PhysicalVector<T, W>,
            ) -> PhysicalVector<T, W> {
                PhysicalVector::generate(|i| if mask.test(i) { a[i] } else { b[i] })
            }

            #[inline(always)]
            fn mask_splat<T: Vectorizable>(value: bool) -> $mask {
                if value {
                    MaskBits::with_n_true(Self::LANES)
                } else {
                    MaskBits::splat(false)
                }
            }

            #[inline]
            fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(mut f: F) -> $mask {
                MaskBits::from_fn(|i| i < Self::LANES && f(i))
            }

            #[inline(always)]
            fn mask_with_n_true<T: Vectorizable>(n: usize) -> $mask {
                MaskBits::with_n_true(n.min(Self::LANES))
            }

            #[inline(always)]
            fn mask_get<T: Vectorizable>(mask: &$mask, index: usize) -> bool {
                assert!(index < Self::LANES, "lane index out of range");
                mask.test(index)
            }

            #[inline(always)]
            fn mask_set<T: Vectorizable>(mask: &mut $mask, index: usize, value: bool) {
                assert!(index < Self::LANES, "lane index out of range");
                MaskBits::set(mask, index, value);
            }

            #[inline(always)]
            fn mask_and<T: Vectorizable>(a: $mask, b: $mask) -> $mask {
                MaskBits::and(a, b)
            }

            #[inline(always)]
            fn mask_or<T: Vectorizable>(a: $mask, b: $mask) -> $mask {
                MaskBits::or(a, b)
            }

            #[inline(always)]
            fn mask_xor<T: Vectorizable>(a: $mask, b: $mask) -> $mask {
                MaskBits::xor(a, b)
            }

            #[inline(always)]
            fn mask_not<T: Vectorizable>(a: $mask) -> $mask {
                MaskBits::and(MaskBits::not(a), MaskBits::with_n_true(Self::LANES))
            }

            #[inline(always)]
            fn mask_count<T: Vectorizable>(mask: &$mask) -> usize {
                mask.count_true()
            }

            #[inline(always)]
            fn mask_to_vector<T: Vectorizable>(mask: &$mask) -> PhysicalVector<T::Int, W> {
                mask.to_vector()
            }

            #[inline(always)]
            fn vector_to_mask<T: Vectorizable>(vector: &PhysicalVector<T::Int, W>) -> $mask {
                MaskBits::and(
                    <$mask>::from_vector(*vector),
                    MaskBits::with_n_true(Self::LANES),
                )
            }

            #[inline(always)]
            fn normalize<T: Vectorizable>(storage: PhysicalVector<T, W>) -> PhysicalVector<T, W> {
                storage.truncated(Self::LANES)
            }

            #[inline(always)]
            fn mask_normalize<T: Vectorizable>(mask: $mask) -> $mask {
                MaskBits::and(mask, MaskBits::with_n_true(Self::LANES))
            }
        }
    };
}

impl_native_abi!(VecBuiltin, MaskKind::Vector, VectorMask<T::Int, W>);
impl_native_abi!(VecBitmask, MaskKind::Bit, BitMask<W>);

/// `K` copies of the same full-register ABI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayAbi<A: Abi, const K: usize>(PhantomData<A>);

impl<A: Abi, const K: usize> Abi for ArrayAbi<A, K> {
    const LANES: usize = {
        assert!(K > 1, "an array ABI holds at least two parts");
        A::LANES * K
    };
    const CAPACITY: usize = A::CAPACITY * K;
    const TAG: AbiTag = AbiTag::from_chunk(Chunk {
        part: A::TAG.as_part(),
        count: K,
    });

    type Storage<T: Vectorizable> = [A::Storage<T>; K];
    type Mask<T: Vectorizable> = [A::Mask<T>; K];

    #[inline]
    fn splat<T: Vectorizable>(value: T) -> Self::Storage<T> {
        [A::splat::<T>(value); K]
    }

    #[inline]
    fn generate<T: Vectorizable, F: FnMut(usize) -> T>(mut f: F) -> Self::Storage<T> {
        core::array::from_fn(|p| A::generate::<T, _>(|j| f(p * A::LANES + j)))
    }

    #[inline]
    fn get<T: Vectorizable>(storage: &Self::Storage<T>, index: usize) -> T {
        assert!(index < Self::LANES, "lane index out of range");
        A::get::<T>(&storage[index / A::LANES], index % A::LANES)
    }

    #[inline]
    fn set<T: Vectorizable>(storage: &mut Self::Storage<T>, index: usize, value: T) {
        assert!(index < Self::LANES, "lane index out of range");
        A::set::<T>(&mut storage[index / A::LANES], index % A::LANES, value);
    }

    #[inline]
    fn bitand<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        core::array::from_fn(|p| A::bitand::<T>(a[p], b[p]))
    }

    #[inline]
    fn bitor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        core::array::from_fn(|p| A::bitor::<T>(a[p], b[p]))
    }

    #[inline]
    fn bitxor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        core::array::from_fn(|p| A::bitxor::<T>(a[p], b[p]))
    }

    #[inline]
    fn andnot<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        core::array::from_fn(|p| A::andnot::<T>(a[p], b[p]))
    }

    #[inline]
    fn not<T: Vectorizable>(a: Self::Storage<T>) -> Self::Storage<T> {
        core::array::from_fn(|p| A::not::<T>(a[p]))
    }

    #[inline]
    fn select<T: Vectorizable>(
        mask: &Self::Mask<T>,
        a: Self::Storage<T>,
        b: Self::Storage<T>,
    ) -> Self::Storage<T> {
        core::array::from_fn(|p| A::select::<T>(&mask[p], a[p], b[p]))
    }

    #[inline]
    fn mask_splat<T: Vectorizable>(value: bool) -> Self::Mask<T> {
        [A::mask_splat::<T>(value); K]
    }

    #[inline]
    fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(mut f: F) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_generate::<T, _>(|j| f(p * A::LANES + j)))
    }

    #[inline]
    fn mask_with_n_true<T: Vectorizable>(n: usize) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_with_n_true::<T>(n.saturating_sub(p * A::LANES)))
    }

    #[inline]
    fn mask_get<T: Vectorizable>(mask: &Self::Mask<T>, index: usize) -> bool {
        assert!(index < Self::LANES, "lane index out of range");
        A::mask_get::<T>(&mask[index / A::LANES], index % A::LANES)
    }

    #[inline]
    fn mask_set<T: Vectorizable>(mask: &mut Self::Mask<T>, index: usize, value: bool) {
        assert!(index < Self::LANES, "lane index out of range");
        A::mask_set::<T>(&mut mask[index / A::LANES], index % A::LANES, value);
    }

    #[inline]
    fn mask_and<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_and::<T>(a[p], b[p]))
    }

    #[inline]
    fn mask_or<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_or::<T>(a[p], b[p]))
    }

    #[inline]
    fn mask_xor<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_xor::<T>(a[p], b[p]))
    }

    #[inline]
    fn mask_not<T: Vectorizable>(a: Self::Mask<T>) -> Self::Mask<T> {
        core::array::from_fn(|p| A::mask_not::<T>(a[p]))
    }

    #[inline]
    fn mask_count<T: Vectorizable>(mask: &Self::Mask<T>) -> usize {
        mask.iter().map(|part| A::mask_count::<T>(part)).sum()
    }

    #[inline]
    fn mask_to_vector<T: Vectorizable>(mask: &Self::Mask<T>) -> Self::Storage<T::Int> {
        core::array::from_fn(|p| A::mask_to_vector::<T>(&mask[p]))
    }

    #[inline]
    fn vector_to_mask<T: Vectorizable>(vector: &Self::Storage<T::Int>) -> Self::Mask<T> {
        core::array::from_fn(|p| A::vector_to_mask::<T>(&vector[p]))
    }

    #[inline]
    fn normalize<T: Vectorizable>(storage: Self::Storage<T>) -> Self::Storage<T> {
        storage.map(A::normalize::<T>)
    }

    #[inline]
    fn mask_normalize<T: Vectorizable>(mask: Self::Mask<T>) -> Self::Mask<T> {
        mask.map(A::mask_normalize::<T>)
    }
}

/// Storage of a combined ABI: the head chunk, then everything after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pair<H, T> {
    pub head: H,
    pub tail: T,
}

/// Lanes `0..A::LANES` in `A`, the rest in `B`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Combined<A: Abi, B: Abi>(PhantomData<(A, B)>);

impl<A: Abi, B: Abi> Abi for Combined<A, B> {
    const LANES: usize = A::LANES + B::LANES;
    const CAPACITY: usize = A::CAPACITY + B::CAPACITY;
    const TAG: AbiTag = AbiTag::combine(A::TAG, B::TAG);

    type Storage<T: Vectorizable> = Pair<A::Storage<T>, B::Storage<T>>;
    type Mask<T: Vectorizable> = Pair<A::Mask<T>, B::Mask<T>>;

    #[inline]
    fn splat<T: Vectorizable>(value: T) -> Self::Storage<T> {
        Pair {
            head: A::splat::<T>(value),
            tail: B::splat::<T>(value),
        }
    }

    #[inline]
    fn generate<T: Vectorizable, F: FnMut(usize) -> T>(mut f: F) -> Self::Storage<T> {
        let head = A::generate::<T, _>(&mut f);
        let tail = B::generate::<T, _>(|i| f(A::LANES + i));
        Pair { head, tail }
    }

    #[inline]
    fn get<T: Vectorizable>(storage: &Self::Storage<T>, index: usize) -> T {
        if index < A::LANES {
            A::get::<T>(&storage.head, index)
        } else {
            assert!(index < Self::LANES, "lane index out of range");
            B::get::<T>(&storage.tail, index - A::LANES)
        }
    }

    #[inline]
    fn set<T: Vectorizable>(storage: &mut Self::Storage<T>, index: usize, value: T) {
        if index < A::LANES {
            A::set::<T>(&mut storage.head, index, value);
        } else {
            assert!(index < Self::LANES, "lane index out of range");
            B::set::<T>(&mut storage.tail, index - A::LANES, value);
        }
    }

    #[inline]
    fn bitand<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::bitand::<T>(a.head, b.head),
            tail: B::bitand::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn bitor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::bitor::<T>(a.head, b.head),
            tail: B::bitor::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn bitxor<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::bitxor::<T>(a.head, b.head),
            tail: B::bitxor::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn andnot<T: Vectorizable>(a: Self::Storage<T>, b: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::andnot::<T>(a.head, b.head),
            tail: B::andnot::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn not<T: Vectorizable>(a: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::not::<T>(a.head),
            tail: B::not::<T>(a.tail),
        }
    }

    #[inline]
    fn select<T: Vectorizable>(
        mask: &Self::Mask<T>,
        a: Self::Storage<T>,
        b: Self::Storage<T>,
    ) -> Self::Storage<T> {
        Pair {
            head: A::select::<T>(&mask.head, a.head, b.head),
            tail: B::select::<T>(&mask.tail, a.tail, b.tail),
        }
    }

    #[inline]
    fn mask_splat<T: Vectorizable>(value: bool) -> Self::Mask<T> {
        Pair {
            head: A::mask_splat::<T>(value),
            tail: B::mask_splat::<T>(value),
        }
    }

    #[inline]
    fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(mut f: F) -> Self::Mask<T> {
        let head = A::mask_generate::<T, _>(&mut f);
        let tail = B::mask_generate::<T, _>(|i| f(A::LANES + i));
        Pair { head, tail }
    }

    #[inline]
    fn mask_with_n_true<T: Vectorizable>(n: usize) -> Self::Mask<T> {
        Pair {
            head: A::mask_with_n_true::<T>(n),
            tail: B::mask_with_n_true::<T>(n.saturating_sub(A::LANES)),
        }
    }

    #[inline]
    fn mask_get<T: Vectorizable>(mask: &Self::Mask<T>, index: usize) -> bool {
        if index < A::LANES {
            A::mask_get::<T>(&mask.head, index)
        } else {
            assert!(index < Self::LANES, "lane index out of range");
            B::mask_get::<T>(&mask.tail, index - A::LANES)
        }
    }

    #[inline]
    fn mask_set<T: Vectorizable>(mask: &mut Self::Mask<T>, index: usize, value: bool) {
        if index < A::LANES {
            A::mask_set::<T>(&mut mask.head, index, value);
        } else {
            assert!(index < Self::LANES, "lane index out of range");
            B::mask_set::<T>(&mut mask.tail, index - A::LANES, value);
        }
    }

    #[inline]
    fn mask_and<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        Pair {
            head: A::mask_and::<T>(a.head, b.head),
            tail: B::mask_and::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn mask_or<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        Pair {
            head: A::mask_or::<T>(a.head, b.head),
            tail: B::mask_or::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn mask_xor<T: Vectorizable>(a: Self::Mask<T>, b: Self::Mask<T>) -> Self::Mask<T> {
        Pair {
            head: A::mask_xor::<T>(a.head, b.head),
            tail: B::mask_xor::<T>(a.tail, b.tail),
        }
    }

    #[inline]
    fn mask_not<T: Vectorizable>(a: Self::Mask<T>) -> Self::Mask<T> {
        Pair {
            head: A::mask_not::<T>(a.head),
            tail: B::mask_not::<T>(a.tail),
        }
    }

    #[inline]
    fn mask_count<T: Vectorizable>(mask: &Self::Mask<T>) -> usize {
        A::mask_count::<T>(&mask.head) + B::mask_count::<T>(&mask.tail)
    }

    #[inline]
    fn mask_to_vector<T: Vectorizable>(mask: &Self::Mask<T>) -> Self::Storage<T::Int> {
        Pair {
            head: A::mask_to_vector::<T>(&mask.head),
            tail: B::mask_to_vector::<T>(&mask.tail),
        }
    }

    #[inline]
    fn vector_to_mask<T: Vectorizable>(vector: &Self::Storage<T::Int>) -> Self::Mask<T> {
        Pair {
            head: A::vector_to_mask::<T>(&vector.head),
            tail: B::vector_to_mask::<T>(&vector.tail),
        }
    }

    #[inline]
    fn normalize<T: Vectorizable>(storage: Self::Storage<T>) -> Self::Storage<T> {
        Pair {
            head: A::normalize::<T>(storage.head),
            tail: B::normalize::<T>(storage.tail),
        }
    }

    #[inline]
    fn mask_normalize<T: Vectorizable>(mask: Self::Mask<T>) -> Self::Mask<T> {
        Pair {
            head: A::mask_normalize::<T>(mask.head),
            tail: B::mask_normalize::<T>(mask.tail),
        }
    }
}

/// No lanes. Only reachable through the `zero-width` feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroAbi;

impl ZeroAbi {
    fn no_lanes(index: usize) -> ! {
        panic!("lane index {index} out of range for a zero-width vector")
    }
}

impl Abi for ZeroAbi {
    const LANES: usize = 0;
    const CAPACITY: usize = 0;
    const TAG: AbiTag = AbiTag::Zero;

    type Storage<T: Vectorizable> = ();
    type Mask<T: Vectorizable> = ();

    fn splat<T: Vectorizable>(_value: T) {}

    fn generate<T: Vectorizable, F: FnMut(usize) -> T>(_f: F) {}

    fn get<T: Vectorizable>(_storage: &(), index: usize) -> T {
        Self::no_lanes(index)
    }

    fn set<T: Vectorizable>(_storage: &mut (), index: usize, _value: T) {
        Self::no_lanes(index)
    }

    fn bitand<T: Vectorizable>(_a: (), _b: ()) {}

    fn bitor<T: Vectorizable>(_a: (), _b: ()) {}

    fn bitxor<T: Vectorizable>(_a: (), _b: ()) {}

    fn andnot<T: Vectorizable>(_a: (), _b: ()) {}

    fn not<T: Vectorizable>(_a: ()) {}

    fn select<T: Vectorizable>(_mask: &(), _a: (), _b: ()) {}

    fn mask_splat<T: Vectorizable>(_value: bool) {}

    fn mask_generate<T: Vectorizable, F: FnMut(usize) -> bool>(_f: F) {}

    fn mask_with_n_true<T: Vectorizable>(_n: usize) {}

    fn mask_get<T: Vectorizable>(_mask: &(), index: usize) -> bool {
        Self::no_lanes(index)
    }

    fn mask_set<T: Vectorizable>(_mask: &mut (), index: usize, _value: bool) {
        Self::no_lanes(index)
    }

    fn mask_and<T: Vectorizable>(_a: (), _b: ()) {}

    fn mask_or<T: Vectorizable>(_a: (), _b: ()) {}

    fn mask_xor<T: Vectorizable>(_a: (), _b: ()) {}

    fn mask_not<T: Vectorizable>(_a: ()) {}

    fn mask_count<T: Vectorizable>(_mask: &()) -> usize {
        0
    }

    fn mask_to_vector<T: Vectorizable>(_mask: &()) {}

    fn vector_to_mask<T: Vectorizable>(_vector: &()) {}

    fn normalize<T: Vectorizable>(_storage: ()) {}

    fn mask_normalize<T: Vectorizable>(_mask: ()) {}
}
