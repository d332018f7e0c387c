//! Mask semantics: every storage form answers the same truth table, and
//! padding lanes never become visible.

use simdabi::simd::abi::{Abi, ArrayAbi, Combined, Scalar, VecBitmask, VecBuiltin};
use simdabi::simd::mask::{BitMask, MaskBits, VectorMask};
use simdabi::simd::surface::{Simd, SimdMask};

#[test]
fn test_mask_to_int_lanes() {
    let mask = SimdMask::<i32, 7>::generate(|i| i < 3);
    assert_eq!(mask.to_int().to_array(), [-1, -1, -1, 0, 0, 0, 0]);

    let floats = SimdMask::<f64, 5>::from_array([false, true, false, true, true]);
    assert_eq!(floats.to_int().to_array(), [0, -1, 0, -1, -1]);
}

#[test]
fn test_with_n_true() {
    for n in 0..=9 {
        let mask = SimdMask::<u16, 9>::with_n_true(n);
        assert_eq!(mask.count_true(), n);
        assert_eq!(mask.to_array(), core::array::from_fn(|i| i < n));
    }
    assert!(SimdMask::<u16, 9>::with_n_true(9).all());
    assert!(SimdMask::<u16, 9>::with_n_true(0).none());
}

#[test]
fn test_int_round_trips() {
    let mask = SimdMask::<f32, 13>::generate(|i| i % 3 == 0);
    assert_eq!(SimdMask::<f32, 13>::from_int(mask.to_int()), mask);
    assert_eq!(
        SimdMask::<f32, 13>::from_int_storage(&mask.to_int_storage()),
        mask
    );

    let ints = Simd::<i32, 13>::generate(|i| if i % 3 == 0 { 7 } else { 0 });
    assert_eq!(SimdMask::<f32, 13>::from_int(ints), mask);
}

#[test]
fn test_logic_matches_bool_arrays() {
    let a = [true, false, true, true, false, false, true, false, true, true, false];
    let b = [false, false, true, false, true, false, true, true, false, true, true];
    let ma = SimdMask::<i8, 11>::from_array(a);
    let mb = SimdMask::<i8, 11>::from_array(b);

    assert_eq!((ma & mb).to_array(), core::array::from_fn(|i| a[i] & b[i]));
    assert_eq!((ma | mb).to_array(), core::array::from_fn(|i| a[i] | b[i]));
    assert_eq!((ma ^ mb).to_array(), core::array::from_fn(|i| a[i] ^ b[i]));
    assert_eq!((!ma).to_array(), a.map(|x| !x));
    assert_eq!((!ma).count_true(), a.iter().filter(|x| !**x).count());
}

#[test]
fn test_storage_forms_agree() {
    let pattern = |i: usize| i % 3 != 1;

    let vector = VectorMask::<i16, 8>::with_n_true(5)
        .xor(VectorMask::from_fn(pattern))
        .not();
    let bits = BitMask::<8>::with_n_true(5)
        .xor(BitMask::from_fn(pattern))
        .not();

    for i in 0..8 {
        assert_eq!(vector.test(i), bits.test(i), "lane {i}");
    }
    assert_eq!(vector.count_true(), bits.count_true());
}

#[test]
fn test_bitmask_words() {
    assert_eq!(BitMask::<4>::from_bits(0xff).to_bits(), 0x0f);
    assert_eq!(BitMask::<16>::with_n_true(10).to_bits(), 0x03ff);
    assert_eq!(BitMask::<64>::splat(true).to_bits(), u64::MAX);

    let vector = BitMask::<8>::from_bits(0b1010_0001).to_vector::<i32>();
    assert_eq!(vector.to_array(), [-1, 0, 0, 0, 0, -1, 0, -1]);
    assert_eq!(BitMask::<8>::from_vector(vector).to_bits(), 0b1010_0001);
}

#[test]
fn test_partial_register_padding_stays_false() {
    type Partial = VecBuiltin<7, 8>;

    let all = Partial::mask_not::<i32>(Partial::mask_splat::<i32>(false));
    assert_eq!(Partial::mask_count::<i32>(&all), 7);
    assert_eq!(Partial::mask_to_vector::<i32>(&all)[7], 0);

    let ones = Partial::mask_splat::<i32>(true);
    assert_eq!(Partial::mask_count::<i32>(&ones), 7);

    type PartialBits = VecBitmask<5, 8>;
    let all = PartialBits::mask_not::<f32>(PartialBits::mask_with_n_true::<f32>(0));
    assert_eq!(all.to_bits(), 0b1_1111);
}

#[test]
fn test_partial_register_values_stay_zero() {
    type Partial = VecBuiltin<3, 4>;

    let v = Partial::not::<u32>(Partial::splat::<u32>(0));
    assert_eq!(v.to_array(), [u32::MAX, u32::MAX, u32::MAX, 0]);

    let w = Partial::andnot::<u32>(Partial::splat::<u32>(1), Partial::splat::<u32>(3));
    assert_eq!(w.to_array(), [2, 2, 2, 0]);
}

#[test]
fn test_composite_masks() {
    type Split = Combined<ArrayAbi<VecBuiltin<4, 4>, 2>, Scalar>;

    let mask = Split::mask_generate::<i32, _>(|i| i == 0 || i == 8);
    assert_eq!(Split::mask_count::<i32>(&mask), 2);
    assert!(Split::mask_get::<i32>(&mask, 8));
    assert!(!Split::mask_get::<i32>(&mask, 4));

    let flipped = Split::mask_not::<i32>(mask);
    assert_eq!(Split::mask_count::<i32>(&flipped), 7);

    let picked = Split::select::<i32>(
        &mask,
        Split::splat::<i32>(1),
        Split::generate::<i32, _>(|i| -(i as i32)),
    );
    assert_eq!(Split::get::<i32>(&picked, 0), 1);
    assert_eq!(Split::get::<i32>(&picked, 5), -5);
    assert_eq!(Split::get::<i32>(&picked, 8), 1);
}

#[test]
fn test_select_on_surface() {
    let v = Simd::<i64, 6>::from_array([3, -1, 4, -1, 5, -9]);
    let positive = v.simd_gt(Simd::splat(0));
    assert_eq!(positive.to_array(), [true, false, true, false, true, false]);
    assert!(positive.any() && !positive.all());
    assert_eq!(positive.select(v, Simd::splat(0)).to_array(), [3, 0, 4, 0, 5, 0]);
}
