//! Native-width oracle.
//!
//! Answers two questions for an element kind on a given feature set: which
//! register sizes are valid, and how wide the widest one is. The feature set
//! is always passed in. The build target's set is generated by the build
//! script as [`TargetFeatures::BUILD`](TargetFeatures); nothing here reads
//! ambient global state.
//!
//! This file is shared with the build script.

use core::fmt;

use super::element::{ElementClass, ElementKind};

/// Largest register size the oracle ever considers, in bytes.
pub const MAX_REGISTER_BYTES: usize = 256;

/// Immutable SIMD capability flags of a compilation target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TargetFeatures {
    pub sse: bool,
    pub sse2: bool,
    pub avx: bool,
    pub avx2: bool,
    pub avx512f: bool,
    pub avx512bw: bool,
    pub avx512vl: bool,
    pub neon: bool,
    /// NEON with double-precision lanes (AArch64 only).
    pub neon_fp64: bool,
    pub simd128: bool,
}

impl TargetFeatures {
    pub const SCALAR: Self = Self {
        sse: false,
        sse2: false,
        avx: false,
        avx2: false,
        avx512f: false,
        avx512bw: false,
        avx512vl: false,
        neon: false,
        neon_fp64: false,
        simd128: false,
    };

    pub const SSE2: Self = Self {
        sse: true,
        sse2: true,
        ..Self::SCALAR
    };

    pub const AVX: Self = Self {
        avx: true,
        ..Self::SSE2
    };

    pub const AVX2: Self = Self {
        avx2: true,
        ..Self::AVX
    };

    /// AVX-512 foundation only: 512-bit registers for 4 and 8 byte lanes, no
    /// sub-512-bit bit-mask registers.
    pub const AVX512F: Self = Self {
        avx512f: true,
        ..Self::AVX2
    };

    /// AVX-512 with the byte/word and vector-length extensions.
    pub const AVX512: Self = Self {
        avx512bw: true,
        avx512vl: true,
        ..Self::AVX512F
    };

    pub const NEON_ARMV7: Self = Self {
        neon: true,
        ..Self::SCALAR
    };

    pub const NEON_AARCH64: Self = Self {
        neon: true,
        neon_fp64: true,
        ..Self::SCALAR
    };

    pub const WASM_SIMD128: Self = Self {
        simd128: true,
        ..Self::SCALAR
    };

    /// Builds a feature set from a `target_feature` name list.
    ///
    /// Unknown names are ignored. Implied features are filled in, so
    /// `["avx2"]` yields the same set as [`TargetFeatures::AVX2`].
    pub fn from_target_features<S: AsRef<str>>(arch: &str, names: &[S]) -> Self {
        let mut features = Self::SCALAR;
        for name in names {
            match name.as_ref().trim() {
                "sse" => features.sse = true,
                "sse2" => features.sse2 = true,
                "avx" => features.avx = true,
                "avx2" => features.avx2 = true,
                "avx512f" => features.avx512f = true,
                "avx512bw" => features.avx512bw = true,
                "avx512vl" => features.avx512vl = true,
                "neon" => features.neon = true,
                "simd128" => features.simd128 = true,
                _ => {}
            }
        }
        features.neon_fp64 = features.neon && arch == "aarch64";
        features.with_implied()
    }

    /// Closes the set under feature implication.
    pub const fn with_implied(mut self) -> Self {
        if self.avx512bw || self.avx512vl {
            self.avx512f = true;
        }
        if self.avx512f {
            self.avx2 = true;
        }
        if self.avx2 {
            self.avx = true;
        }
        if self.avx {
            self.sse2 = true;
        }
        if self.sse2 {
            self.sse = true;
        }
        if self.neon_fp64 {
            self.neon = true;
        }
        self
    }

    /// `true` when no SIMD family is enabled.
    pub const fn is_scalar(&self) -> bool {
        !(self.sse
            || self.sse2
            || self.avx
            || self.avx2
            || self.avx512f
            || self.avx512bw
            || self.avx512vl
            || self.neon
            || self.neon_fp64
            || self.simd128)
    }

    /// Enabled features, in `target_feature` spelling.
    pub fn names(&self) -> Vec<&'static str> {
        let flags = [
            (self.sse, "sse"),
            (self.sse2, "sse2"),
            (self.avx, "avx"),
            (self.avx2, "avx2"),
            (self.avx512f, "avx512f"),
            (self.avx512bw, "avx512bw"),
            (self.avx512vl, "avx512vl"),
            (self.neon, "neon"),
            (self.neon_fp64, "neon-fp64"),
            (self.simd128, "simd128"),
        ];
        flags
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect()
    }
}

impl fmt::Display for TargetFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            f.write_str("scalar")
        } else {
            f.write_str(&self.names().join(","))
        }
    }
}

/// Register family a backend descriptor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    Avx512,
    Avx,
    Sse,
    Neon,
    WasmSimd128,
}

impl BackendFamily {
    pub const fn name(&self) -> &'static str {
        match self {
            BackendFamily::Avx512 => "avx512",
            BackendFamily::Avx => "avx",
            BackendFamily::Sse => "sse",
            BackendFamily::Neon => "neon",
            BackendFamily::WasmSimd128 => "wasm-simd128",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a mask for a given ABI is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskKind {
    /// One `bool` per scalar.
    Bool,
    /// Same-size signed lanes, each all-zero or all-one.
    Vector,
    /// One bit per lane in an integer word.
    Bit,
}

impl MaskKind {
    pub const fn name(&self) -> &'static str {
        match self {
            MaskKind::Bool => "bool",
            MaskKind::Vector => "vector",
            MaskKind::Bit => "bit",
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A register family and what it can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BackendDescriptor {
    pub family: BackendFamily,
    /// Full register size in bytes.
    pub register_bytes: usize,
    /// Mask representation of registers of this family.
    pub mask: MaskKind,
}

/// Every backend, widest register first.
pub const BACKENDS: [BackendDescriptor; 5] = [
    BackendDescriptor {
        family: BackendFamily::Avx512,
        register_bytes: 64,
        mask: MaskKind::Bit,
    },
    BackendDescriptor {
        family: BackendFamily::Avx,
        register_bytes: 32,
        mask: MaskKind::Vector,
    },
    BackendDescriptor {
        family: BackendFamily::Sse,
        register_bytes: 16,
        mask: MaskKind::Vector,
    },
    BackendDescriptor {
        family: BackendFamily::Neon,
        register_bytes: 16,
        mask: MaskKind::Vector,
    },
    BackendDescriptor {
        family: BackendFamily::WasmSimd128,
        register_bytes: 16,
        mask: MaskKind::Vector,
    },
];

impl BackendDescriptor {
    /// Whether a register of `bytes` bytes holding `kind` lanes belongs to
    /// this family on `features`.
    ///
    /// Partial registers (smaller than `register_bytes`, still a power of
    /// two and at least two lanes) are accepted unless a narrower family
    /// owns that size.
    pub const fn accepts(&self, kind: ElementKind, bytes: usize, features: &TargetFeatures) -> bool {
        if !kind.is_vectorizable()
            || !bytes.is_power_of_two()
            || bytes <= kind.bytes()
            || bytes > self.register_bytes
            || bytes <= self.partial_floor(features)
        {
            return false;
        }

        let is_float = matches!(kind.class(), ElementClass::Float);
        match self.family {
            BackendFamily::Avx512 => {
                if kind.bytes() >= 4 {
                    features.avx512f
                } else {
                    features.avx512bw
                }
            }
            BackendFamily::Avx => {
                if is_float {
                    features.avx
                } else {
                    features.avx2
                }
            }
            BackendFamily::Sse => {
                if is_float && kind.bytes() == 4 {
                    features.sse
                } else {
                    features.sse2
                }
            }
            BackendFamily::Neon => {
                if is_float && kind.bytes() == 8 {
                    features.neon_fp64
                } else {
                    features.neon
                }
            }
            BackendFamily::WasmSimd128 => features.simd128,
        }
    }

    /// Register sizes at or below this belong to a narrower family.
    const fn partial_floor(&self, features: &TargetFeatures) -> usize {
        match self.family {
            BackendFamily::Avx512 if features.avx512vl => 0,
            BackendFamily::Avx512 => 32,
            BackendFamily::Avx => 16,
            _ => 0,
        }
    }
}

/// Widest-first lookup of the backend owning a `bytes`-sized register of
/// `kind` lanes.
pub const fn register_backend(
    kind: ElementKind,
    bytes: usize,
    features: &TargetFeatures,
) -> Option<BackendDescriptor> {
    let mut i = 0;
    while i < BACKENDS.len() {
        if BACKENDS[i].accepts(kind, bytes, features) {
            return Some(BACKENDS[i]);
        }
        i += 1;
    }
    None
}

/// Whether a register of `bytes` bytes holding `kind` lanes exists.
pub const fn is_valid_register(kind: ElementKind, bytes: usize, features: &TargetFeatures) -> bool {
    register_backend(kind, bytes, features).is_some()
}

/// Size of the widest valid register for `kind`, or `kind.bytes()` when
/// nothing wider than a scalar exists.
pub const fn native_register_bytes(kind: ElementKind, features: &TargetFeatures) -> usize {
    let mut bytes = MAX_REGISTER_BYTES;
    while bytes > kind.bytes() {
        if is_valid_register(kind, bytes, features) {
            return bytes;
        }
        bytes /= 2;
    }
    kind.bytes()
}

/// Lane count of the widest valid register for `kind`; `1` means scalar.
pub const fn native_lanes(kind: ElementKind, features: &TargetFeatures) -> usize {
    if kind.bytes() == 0 {
        return 1;
    }
    native_register_bytes(kind, features) / kind.bytes()
}
