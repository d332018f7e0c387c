use std::cmp::Ordering;
use std::env;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

#[allow(dead_code, unused_imports)]
#[path = "src/error.rs"]
mod error;

#[allow(dead_code, unused_imports)]
#[path = "src/simd"]
mod simd {
    pub mod deduce;
    pub mod element;
    pub mod target;
}

use simd::deduce::{deduce_abi, AbiConfig, AbiTag, Chunk, Part, MAX_LANES};
use simd::element::ElementKind;
use simd::target::{MaskKind, TargetFeatures};

// SIMD families of the build target, ranked for the "applying" line
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    family: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "avx" => 2,
            "sse2" => 3,
            "neon" => 4,
            "simd128" => 5,
            _ => usize::MAX,
        }
    }

    fn features(target: &TargetFeatures) -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse2",
                family: "sse",
                detected: target.sse2,
            },
            CpuFeature {
                name: "avx",
                family: "avx",
                detected: target.avx,
            },
            CpuFeature {
                name: "avx2",
                family: "avx2",
                detected: target.avx2,
            },
            CpuFeature {
                name: "avx512f",
                family: "avx512",
                detected: target.avx512f,
            },
            CpuFeature {
                name: "neon",
                family: "neon",
                detected: target.neon,
            },
            CpuFeature {
                name: "simd128",
                family: "wasm-simd128",
                detected: target.simd128,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Everything the table depends on, read from cargo's environment
struct BuildTarget {
    features: TargetFeatures,
    pointer_bytes: usize,
    zero_width: bool,
}

impl BuildTarget {
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let names: Vec<String> = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(str::to_string)
            .collect();

        let features = if env::var_os("CARGO_FEATURE_FORCE_SCALAR").is_some() {
            TargetFeatures::SCALAR
        } else {
            TargetFeatures::from_target_features(&arch, names.as_slice())
        };

        let pointer_bits = env::var("CARGO_CFG_TARGET_POINTER_WIDTH")
            .ok()
            .and_then(|width| width.parse::<usize>().ok())
            .unwrap_or(usize::BITS as usize);

        Self {
            features,
            pointer_bytes: pointer_bits / 8,
            zero_width: env::var_os("CARGO_FEATURE_ZERO_WIDTH").is_some(),
        }
    }

    fn config(&self) -> AbiConfig {
        AbiConfig::new(self.features).with_zero_width(self.zero_width)
    }

    fn element_types(&self) -> Vec<(&'static str, ElementKind)> {
        vec![
            ("i8", ElementKind::I8),
            ("u8", ElementKind::U8),
            ("i16", ElementKind::I16),
            ("u16", ElementKind::U16),
            ("i32", ElementKind::I32),
            ("u32", ElementKind::U32),
            ("i64", ElementKind::I64),
            ("u64", ElementKind::U64),
            ("isize", ElementKind::signed(self.pointer_bytes)),
            ("usize", ElementKind::unsigned(self.pointer_bytes)),
            ("f32", ElementKind::F32),
            ("f64", ElementKind::F64),
        ]
    }

    fn apply(&self) {
        let mut families = CpuFeature::features(&self.features);
        families.sort();

        let family = families
            .iter()
            .find(|cpu_feature| cpu_feature.detected)
            .map(|cpu_feature| cpu_feature.family)
            .unwrap_or("scalar");

        println!("applying: {family}");
    }
}

// Type-level spelling of a deduced ABI
struct AbiTableGenerator;

impl AbiTableGenerator {
    const ABI_PATH: &'static str = "crate::simd::abi";

    fn part(part: &Part) -> String {
        match part {
            Part::Scalar => format!("{}::Scalar", Self::ABI_PATH),
            Part::Native(register) => {
                let marker = match register.mask {
                    MaskKind::Bit => "VecBitmask",
                    MaskKind::Vector | MaskKind::Bool => "VecBuiltin",
                };
                format!(
                    "{}::{marker}<{}, {}>",
                    Self::ABI_PATH,
                    register.lanes,
                    register.width
                )
            }
        }
    }

    fn chunk(chunk: &Chunk) -> String {
        if chunk.count == 1 {
            Self::part(&chunk.part)
        } else {
            format!(
                "{}::ArrayAbi<{}, {}>",
                Self::ABI_PATH,
                Self::part(&chunk.part),
                chunk.count
            )
        }
    }

    fn marker(tag: &AbiTag) -> String {
        match tag {
            AbiTag::Zero => format!("{}::ZeroAbi", Self::ABI_PATH),
            _ => {
                // Combined chunks nest to the right: Combined<a, Combined<b, c>>
                let mut chunks = tag.chunks().into_iter().rev();
                let last = chunks
                    .next()
                    .map(|chunk| Self::chunk(&chunk))
                    .unwrap_or_default();
                chunks.fold(last, |tail, head| {
                    format!("{}::Combined<{}, {tail}>", Self::ABI_PATH, Self::chunk(&head))
                })
            }
        }
    }

    fn features(features: &TargetFeatures) -> String {
        format!(
            "crate::simd::target::TargetFeatures {{ sse: {}, sse2: {}, avx: {}, avx2: {}, \
             avx512f: {}, avx512bw: {}, avx512vl: {}, neon: {}, neon_fp64: {}, simd128: {} }}",
            features.sse,
            features.sse2,
            features.avx,
            features.avx2,
            features.avx512f,
            features.avx512bw,
            features.avx512vl,
            features.neon,
            features.neon_fp64,
            features.simd128,
        )
    }

    fn generate(target: &BuildTarget) -> Result<String, Box<dyn Error>> {
        let config = target.config();
        let mut out = String::new();

        writeln!(out, "// Generated by build.rs for `{}`.", target.features)?;
        writeln!(
            out,
            "pub(crate) const BUILD_FEATURES: crate::simd::target::TargetFeatures = {};",
            Self::features(&target.features)
        )?;

        let first = if target.zero_width { 0 } else { 1 };
        for (name, kind) in target.element_types() {
            writeln!(out)?;
            for lanes in first..=MAX_LANES {
                let tag = deduce_abi(kind, lanes, &config)?;
                writeln!(
                    out,
                    "impl crate::simd::table::AbiFor<{lanes}> for {name} {{ type Abi = {}; }}",
                    Self::marker(&tag)
                )?;
            }
        }

        Ok(out)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/error.rs");
    println!("cargo:rerun-if-changed=src/simd/element.rs");
    println!("cargo:rerun-if-changed=src/simd/target.rs");
    println!("cargo:rerun-if-changed=src/simd/deduce.rs");

    let target = BuildTarget::from_env();
    target.apply();

    let table = AbiTableGenerator::generate(&target)?;
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("abi_table.rs"), table)?;

    Ok(())
}
