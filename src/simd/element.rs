//! Value-level description of element types.
//!
//! [`ElementKind`] is what the oracle and the deduction engine reason about:
//! a byte size and a class. The typed side of the registry is the sealed
//! [`Vectorizable`](super::traits::Vectorizable) trait, whose `KIND`
//! constant links every admissible Rust type to one of these values.
//!
//! This file is shared with the build script and must stay free of crate
//! imports other than its siblings.

use core::fmt;

/// Numeric class of an element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    Signed,
    Unsigned,
    Float,
}

/// Byte size and class of an element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementKind {
    class: ElementClass,
    bytes: usize,
}

impl ElementKind {
    pub const I8: Self = Self::signed(1);
    pub const U8: Self = Self::unsigned(1);
    pub const I16: Self = Self::signed(2);
    pub const U16: Self = Self::unsigned(2);
    pub const I32: Self = Self::signed(4);
    pub const U32: Self = Self::unsigned(4);
    pub const I64: Self = Self::signed(8);
    pub const U64: Self = Self::unsigned(8);
    pub const F32: Self = Self::float(4);
    pub const F64: Self = Self::float(8);

    /// Every fixed-width vectorizable kind, narrowest first.
    pub const ALL: [ElementKind; 10] = [
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    pub const fn signed(bytes: usize) -> Self {
        Self {
            class: ElementClass::Signed,
            bytes,
        }
    }

    pub const fn unsigned(bytes: usize) -> Self {
        Self {
            class: ElementClass::Unsigned,
            bytes,
        }
    }

    pub const fn float(bytes: usize) -> Self {
        Self {
            class: ElementClass::Float,
            bytes,
        }
    }

    pub const fn class(&self) -> ElementClass {
        self.class
    }

    pub const fn bytes(&self) -> usize {
        self.bytes
    }

    pub const fn is_float(&self) -> bool {
        matches!(self.class, ElementClass::Float)
    }

    pub const fn is_integral(&self) -> bool {
        !self.is_float()
    }

    pub const fn is_signed(&self) -> bool {
        !matches!(self.class, ElementClass::Unsigned)
    }

    /// The closed vectorizable set: 1, 2, 4 and 8 byte integers, 4 and 8
    /// byte floats.
    pub const fn is_vectorizable(&self) -> bool {
        match self.class {
            ElementClass::Float => matches!(self.bytes, 4 | 8),
            ElementClass::Signed | ElementClass::Unsigned => matches!(self.bytes, 1 | 2 | 4 | 8),
        }
    }

    /// Signed integer kind of the same size, the lane type of vector masks.
    pub const fn mask_lane(&self) -> Self {
        Self::signed(self.bytes)
    }

    pub const fn name(&self) -> &'static str {
        match (self.class, self.bytes) {
            (ElementClass::Signed, 1) => "i8",
            (ElementClass::Signed, 2) => "i16",
            (ElementClass::Signed, 4) => "i32",
            (ElementClass::Signed, 8) => "i64",
            (ElementClass::Unsigned, 1) => "u8",
            (ElementClass::Unsigned, 2) => "u16",
            (ElementClass::Unsigned, 4) => "u32",
            (ElementClass::Unsigned, 8) => "u64",
            (ElementClass::Float, 2) => "f16",
            (ElementClass::Float, 4) => "f32",
            (ElementClass::Float, 8) => "f64",
            (ElementClass::Float, 16) => "f128",
            _ => "unsupported",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
