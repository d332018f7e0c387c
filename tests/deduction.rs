//! Value-level ABI deduction across target presets, and its agreement with
//! the generated type table.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdabi::simd::abi::Abi;
use simdabi::simd::deduce::{
    deduce_abi, AbiConfig, AbiTag, Chunk, NativeRegister, Part, MAX_CHUNKS, MAX_LANES,
};
use simdabi::simd::element::ElementKind;
use simdabi::simd::table::{AbiFor, AbiOf};
use simdabi::simd::target::{MaskKind, TargetFeatures};
use simdabi::simd::traits::Vectorizable;
use simdabi::AbiError;

const PRESETS: [(&str, TargetFeatures); 9] = [
    ("scalar", TargetFeatures::SCALAR),
    ("sse2", TargetFeatures::SSE2),
    ("avx", TargetFeatures::AVX),
    ("avx2", TargetFeatures::AVX2),
    ("avx512f", TargetFeatures::AVX512F),
    ("avx512", TargetFeatures::AVX512),
    ("neon-armv7", TargetFeatures::NEON_ARMV7),
    ("neon-aarch64", TargetFeatures::NEON_AARCH64),
    ("wasm", TargetFeatures::WASM_SIMD128),
];

fn deduce(kind: ElementKind, lanes: usize, features: TargetFeatures) -> AbiTag {
    deduce_abi(kind, lanes, &AbiConfig::new(features)).expect("deducible lane count")
}

fn native(lanes: usize, width: usize, mask: MaskKind) -> Part {
    Part::Native(NativeRegister { lanes, width, mask })
}

#[test]
fn test_documented_scenarios() {
    let cases = [
        (ElementKind::I32, 7, TargetFeatures::AVX2, "native(7/8, vector)"),
        (ElementKind::F32, 16, TargetFeatures::AVX, "[native(8/8, vector); 2]"),
        (
            ElementKind::I32,
            7,
            TargetFeatures::SSE2,
            "combined(native(4/4, vector), native(3/4, vector))",
        ),
        (
            ElementKind::I32,
            9,
            TargetFeatures::SSE2,
            "combined([native(4/4, vector); 2], scalar)",
        ),
        (ElementKind::I32, 16, TargetFeatures::AVX512, "native(16/16, bit)"),
        (ElementKind::I32, 4, TargetFeatures::AVX512F, "native(4/4, vector)"),
        (ElementKind::F32, 5, TargetFeatures::SCALAR, "[scalar; 5]"),
        (ElementKind::F64, 4, TargetFeatures::NEON_ARMV7, "[scalar; 4]"),
        (
            ElementKind::F32,
            20,
            TargetFeatures::AVX,
            "combined([native(8/8, vector); 2], native(4/4, vector))",
        ),
        (
            ElementKind::U8,
            63,
            TargetFeatures::AVX2,
            "combined(native(32/32, vector), native(31/32, vector))",
        ),
    ];

    for (kind, lanes, features, expected) in cases {
        let tag = deduce(kind, lanes, features);
        assert_eq!(tag.to_string(), expected, "{kind} x {lanes} on {features}");
    }
}

#[test]
fn test_structured_scenario() {
    let tag = deduce(ElementKind::F32, 20, TargetFeatures::AVX);
    assert_eq!(
        tag.chunks(),
        vec![
            Chunk {
                part: native(8, 8, MaskKind::Vector),
                count: 2
            },
            Chunk {
                part: native(4, 4, MaskKind::Vector),
                count: 1
            },
        ]
    );
    assert_eq!(tag.registers(), 3);
    assert_eq!(tag.capacity(), 20);
    assert!(!tag.is_partial());
}

#[test]
fn test_errors() {
    let config = AbiConfig::new(TargetFeatures::AVX2);
    assert_eq!(deduce_abi(ElementKind::F32, 0, &config), Err(AbiError::ZeroWidth));
    assert_eq!(
        deduce_abi(ElementKind::F32, MAX_LANES + 1, &config),
        Err(AbiError::TooManyLanes {
            lanes: MAX_LANES + 1,
            max: MAX_LANES
        })
    );
    assert!(matches!(
        deduce_abi(ElementKind::float(2), 4, &config),
        Err(AbiError::NotVectorizable { .. })
    ));
    assert_eq!(
        deduce_abi(ElementKind::F32, 0, &config.with_zero_width(true)),
        Ok(AbiTag::Zero)
    );
}

#[test]
fn test_layout_properties_hold_everywhere() {
    for (name, features) in PRESETS {
        for kind in ElementKind::ALL {
            for lanes in 1..=MAX_LANES {
                let tag = deduce(kind, lanes, features);
                let chunks = tag.chunks();
                let context = format!("{kind} x {lanes} on {name}: {tag}");

                assert_eq!(tag.lanes(), lanes, "{context}");
                assert!(tag.capacity() >= lanes, "{context}");
                assert!(tag.storage_bytes(kind) >= lanes * kind.bytes(), "{context}");
                assert!(!chunks.is_empty() && chunks.len() <= MAX_CHUNKS, "{context}");

                // Widest chunk first, and only the last chunk may be partial.
                assert!(
                    chunks.windows(2).all(|w| w[0].part.width() >= w[1].part.width()),
                    "{context}"
                );
                assert!(
                    chunks[..chunks.len() - 1].iter().all(|c| !c.part.is_partial()),
                    "{context}"
                );

                if features.is_scalar() {
                    assert!(chunks.iter().all(|c| c.part == Part::Scalar), "{context}");
                }
            }
        }
    }
}

#[test]
fn test_deduction_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0x51_3d);
    for _ in 0..500 {
        let (_, features) = PRESETS[rng.random_range(0..PRESETS.len())];
        let kind = ElementKind::ALL[rng.random_range(0..ElementKind::ALL.len())];
        let lanes = rng.random_range(1..=MAX_LANES);

        let first = deduce(kind, lanes, features);
        let second = deduce(kind, lanes, features);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}

#[test]
fn test_const_evaluation() {
    const CONFIG: AbiConfig = AbiConfig::new(TargetFeatures::AVX2);
    const TAG: AbiTag = match deduce_abi(ElementKind::I16, 24, &CONFIG) {
        Ok(tag) => tag,
        Err(_) => AbiTag::Zero,
    };
    assert_eq!(TAG, deduce(ElementKind::I16, 24, TargetFeatures::AVX2));
    assert_eq!(TAG.lanes(), 24);
}

fn assert_agrees<T: AbiFor<N>, const N: usize>() {
    let tag = <AbiOf<T, N> as Abi>::TAG;
    assert_eq!(
        deduce_abi(T::KIND, N, &AbiConfig::BUILD),
        Ok(tag),
        "{} x {N}",
        T::KIND
    );
    assert_eq!(<AbiOf<T, N> as Abi>::LANES, N);
    assert_eq!(<AbiOf<T, N> as Abi>::CAPACITY, tag.capacity());
}

macro_rules! agrees_for {
    ($t:ty; $($n:literal)*) => {
        $( assert_agrees::<$t, $n>(); )*
    };
}

macro_rules! agrees_for_every_lane_count {
    ($($t:ty),*) => {
        $(
            agrees_for!($t;
                1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
                17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
                33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48
                49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64
            );
        )*
    };
}

#[test]
fn test_type_table_agrees_with_deduction() {
    agrees_for_every_lane_count!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64);
}

#[test]
fn test_build_kinds_match_types() {
    assert_eq!(<f32 as Vectorizable>::KIND, ElementKind::F32);
    assert_eq!(<u8 as Vectorizable>::KIND, ElementKind::U8);
    assert_eq!(
        <usize as Vectorizable>::KIND.bytes(),
        core::mem::size_of::<usize>()
    );
}
