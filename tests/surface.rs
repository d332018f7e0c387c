//! `Simd` and `SimdMask` behave the same whatever storage the build target
//! picked for them.

use simdabi::simd::deduce::deduce_abi;
use simdabi::simd::surface::{Simd, SimdMask};
use simdabi::simd::table::AbiFor;
use simdabi::simd::traits::Vectorizable;
use simdabi::AbiConfig;

fn check_lanes<const N: usize>()
where
    i32: AbiFor<N>,
    f32: AbiFor<N>,
{
    let data: Vec<i32> = (0..N as i32).map(|i| i * 7 - 20).collect();

    let v = Simd::<i32, N>::from_slice(&data);
    assert_eq!(v.to_array().to_vec(), data, "{N} lanes");
    assert_eq!(Simd::<i32, N>::ABI, deduce_abi(i32::KIND, N, &AbiConfig::BUILD).unwrap());

    let mut out = vec![0; N + 3];
    v.copy_to_slice(&mut out);
    assert_eq!(&out[..N], &data[..]);
    assert_eq!(&out[N..], &[0, 0, 0]);

    let negative = v.simd_lt(Simd::splat(0));
    let expected = data.iter().filter(|x| **x < 0).count();
    assert_eq!(negative.count_true(), expected, "{N} lanes");

    let floats = v.convert::<f32>();
    assert_eq!(floats.get(N - 1), data[N - 1] as f32);
    assert_eq!(floats.convert::<i32>(), v);

    let zero = Simd::<i32, N>::default();
    assert_eq!(v ^ v, zero);
    assert_eq!(v & !v, zero);
    assert_eq!((v | zero), v);
    assert_eq!(v.and_not(v), zero);

    let half = SimdMask::<f32, N>::with_n_true(N / 2);
    let picked = half.select(Simd::splat(1.0), Simd::splat(-1.0));
    for i in 0..N {
        assert_eq!(picked.get(i), if i < N / 2 { 1.0 } else { -1.0 });
    }
}

#[test]
fn test_lane_counts_across_layouts() {
    check_lanes::<1>();
    check_lanes::<2>();
    check_lanes::<3>();
    check_lanes::<7>();
    check_lanes::<8>();
    check_lanes::<9>();
    check_lanes::<16>();
    check_lanes::<20>();
    check_lanes::<33>();
    check_lanes::<63>();
    check_lanes::<64>();
}

#[test]
fn test_partial_load_and_store() {
    let v = Simd::<u8, 19>::load_partial(&[9, 8, 7, 6]);
    assert_eq!(&v.to_array()[..5], &[9, 8, 7, 6, 0]);
    assert!(v.to_array()[4..].iter().all(|x| *x == 0));

    let mut out = [0xaa; 6];
    Simd::<u8, 19>::generate(|i| i as u8).store_partial(&mut out[..4]);
    assert_eq!(out, [0, 1, 2, 3, 0xaa, 0xaa]);
}

#[test]
#[should_panic(expected = "shorter than 5 lanes")]
fn test_from_slice_rejects_short_input() {
    let _ = Simd::<f64, 5>::from_slice(&[1.0, 2.0]);
}

#[test]
#[should_panic(expected = "lane index 6 out of range for 6 lanes")]
fn test_get_rejects_out_of_range_lane() {
    let v = Simd::<i16, 6>::splat(3);
    let _ = v.get(6);
}

#[test]
fn test_set_and_comparisons() {
    let mut v = Simd::<f64, 3>::splat(2.0);
    v.set(1, -4.5);

    assert_eq!(v.to_array(), [2.0, -4.5, 2.0]);
    assert_eq!(v.simd_eq(Simd::splat(2.0)).to_array(), [true, false, true]);
    assert_eq!(v.simd_ne(Simd::splat(2.0)).to_array(), [false, true, false]);
    assert_eq!(v.simd_le(Simd::splat(2.0)).count_true(), 3);
    assert_eq!(v.simd_ge(Simd::splat(2.0)).count_true(), 2);
    assert!(v.simd_gt(Simd::splat(2.0)).none());
}

#[test]
fn test_conversions_and_debug() {
    let v: Simd<u32, 3> = [1, 2, 3].into();
    let back: [u32; 3] = v.into();
    assert_eq!(back, [1, 2, 3]);
    assert_eq!(format!("{v:?}"), "Simd([1, 2, 3])");

    let mask: SimdMask<u32, 3> = [true, false, true].into();
    assert_eq!(mask.to_array(), [true, false, true]);
    assert_eq!(SimdMask::<u32, 3>::default().count_true(), 0);
}

#[test]
fn test_mask_set_get() {
    let mut mask = SimdMask::<i64, 10>::splat(false);
    mask.set(9, true);
    mask.set(0, true);
    assert!(mask.get(9) && mask.get(0) && !mask.get(5));
    assert_eq!(mask.count_true(), 2);

    let generated = SimdMask::<i64, 10>::generate(|i| i == 0 || i == 9);
    assert_eq!(mask, generated);
}

#[test]
fn test_storage_round_trips_keep_lanes() {
    let v = Simd::<u8, 21>::generate(|i| i as u8 * 5);
    let storage = v.into_storage();
    assert_eq!(Simd::<u8, 21>::from_storage(storage), v);

    let mask = SimdMask::<f64, 5>::from_array([true, true, false, true, false]);
    let again = SimdMask::<f64, 5>::from_storage(*mask.storage());
    assert_eq!(again, mask);
    assert_eq!(again.count_true(), 3);
}

#[cfg(all(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    not(feature = "force-scalar"),
    not(target_feature = "avx512vl")
))]
mod padded_storage {
    use simdabi::simd::mask::{MaskBits, VectorMask};
    use simdabi::simd::vector::PhysicalVector;

    use super::*;

    #[test]
    fn test_dirty_padding_is_cleared() {
        let v = Simd::<i32, 3>::from_storage(PhysicalVector::splat(1));
        assert_eq!(v, Simd::splat(1));
        assert_eq!(v.into_storage().to_array(), [1, 1, 1, 0]);
        assert_eq!((!v).into_storage().to_array()[3], 0);

        let mask = SimdMask::<i32, 3>::from_storage(VectorMask::splat(true));
        assert_eq!(mask.to_array(), [true; 3]);
        assert_eq!(mask.count_true(), 3);
        assert!(mask.all());
        assert_eq!(mask, SimdMask::splat(true));
        assert!((!mask).none());
    }
}
