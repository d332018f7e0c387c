//! Value-level ABI deduction.
//!
//! [`deduce_abi`] maps `(kind, lanes)` on a feature set to an [`AbiTag`]
//! describing the storage layout: a scalar, one native register (possibly
//! partial), an array of equal registers, or a combination of
//! differently sized parts, widest first.
//!
//! The build script runs the same function over every vectorizable type and
//! lane count to generate the type-level table, so both answers agree by
//! construction. This file is shared with the build script.

use core::fmt;

use crate::error::{self, AbiError};

use super::element::ElementKind;
use super::target::{self, MaskKind, TargetFeatures};

/// Largest lane count any ABI can hold.
pub const MAX_LANES: usize = 64;

/// Upper bound on the number of chunks of a combined ABI.
pub const MAX_CHUNKS: usize = 8;

/// Inputs of the deduction besides the element kind and lane count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AbiConfig {
    pub features: TargetFeatures,
    /// Whether zero-lane vectors are legal.
    pub zero_width: bool,
}

impl AbiConfig {
    pub const fn new(features: TargetFeatures) -> Self {
        Self {
            features,
            zero_width: false,
        }
    }

    pub const fn with_zero_width(mut self, zero_width: bool) -> Self {
        self.zero_width = zero_width;
        self
    }
}

/// A single hardware register holding `lanes` live lanes out of `width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeRegister {
    pub lanes: usize,
    pub width: usize,
    pub mask: MaskKind,
}

impl NativeRegister {
    pub const fn is_partial(&self) -> bool {
        self.lanes < self.width
    }

    pub const fn bytes(&self, kind: ElementKind) -> usize {
        self.width * kind.bytes()
    }
}

/// One building block of an array or combined ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    Scalar,
    Native(NativeRegister),
}

impl Part {
    pub const fn lanes(&self) -> usize {
        match self {
            Part::Scalar => 1,
            Part::Native(register) => register.lanes,
        }
    }

    pub const fn width(&self) -> usize {
        match self {
            Part::Scalar => 1,
            Part::Native(register) => register.width,
        }
    }

    pub const fn is_partial(&self) -> bool {
        match self {
            Part::Scalar => false,
            Part::Native(register) => register.is_partial(),
        }
    }

    pub const fn mask_kind(&self) -> MaskKind {
        match self {
            Part::Scalar => MaskKind::Bool,
            Part::Native(register) => register.mask,
        }
    }

    /// Storage size of a mask over this part.
    pub const fn mask_bytes(&self, kind: ElementKind) -> usize {
        match self {
            Part::Scalar => 1,
            Part::Native(register) => match register.mask {
                MaskKind::Bool => register.width,
                MaskKind::Vector => register.width * kind.bytes(),
                MaskKind::Bit => register.width.div_ceil(8),
            },
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Scalar => f.write_str("scalar"),
            Part::Native(register) => write!(
                f,
                "native({}/{}, {})",
                register.lanes, register.width, register.mask
            ),
        }
    }
}

/// `count` consecutive copies of the same part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub part: Part,
    pub count: usize,
}

impl Chunk {
    pub const EMPTY: Chunk = Chunk {
        part: Part::Scalar,
        count: 0,
    };

    pub const fn lanes(&self) -> usize {
        self.part.lanes() * self.count
    }

    pub const fn capacity(&self) -> usize {
        self.part.width() * self.count
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.part)
        } else {
            write!(f, "[{}; {}]", self.part, self.count)
        }
    }
}

/// Flattened chunk list of a combined ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombinedParts {
    chunks: [Chunk; MAX_CHUNKS],
    len: usize,
}

impl CombinedParts {
    const EMPTY: CombinedParts = CombinedParts {
        chunks: [Chunk::EMPTY; MAX_CHUNKS],
        len: 0,
    };

    const fn push(mut self, chunk: Chunk) -> Self {
        assert!(self.len < MAX_CHUNKS, "too many chunks in a combined ABI");
        self.chunks[self.len] = chunk;
        self.len += 1;
        self
    }

    const fn extend(mut self, tag: &AbiTag) -> Self {
        let mut i = 0;
        while i < tag.chunk_count() {
            self = self.push(tag.chunk(i));
            i += 1;
        }
        self
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks[..self.len]
    }
}

/// Storage layout chosen for a `(kind, lanes)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbiTag {
    /// No lanes at all.
    Zero,
    /// One lane held in a plain scalar.
    Scalar,
    /// One register, partially filled when `lanes < width`.
    Native(NativeRegister),
    /// Two or more equal parts.
    Array(Chunk),
    /// Differently sized chunks, widest first.
    Combined(CombinedParts),
}

impl AbiTag {
    /// Tag for a single chunk: the part itself when `count == 1`.
    pub const fn from_chunk(chunk: Chunk) -> Self {
        if chunk.count == 1 {
            match chunk.part {
                Part::Scalar => AbiTag::Scalar,
                Part::Native(register) => AbiTag::Native(register),
            }
        } else {
            AbiTag::Array(chunk)
        }
    }

    /// The part a single-register tag is made of.
    ///
    /// # Panics
    ///
    /// Panics unless `self` is `Scalar` or `Native`.
    pub const fn as_part(&self) -> Part {
        match self {
            AbiTag::Scalar => Part::Scalar,
            AbiTag::Native(register) => Part::Native(*register),
            _ => panic!("only scalar and native ABIs can be array parts"),
        }
    }

    /// Joins two tags into a combined tag, flattening nested combinations.
    pub const fn combine(head: AbiTag, tail: AbiTag) -> Self {
        let parts = CombinedParts::EMPTY.extend(&head).extend(&tail);
        if parts.len == 1 {
            Self::from_chunk(parts.chunks[0])
        } else {
            AbiTag::Combined(parts)
        }
    }

    pub const fn chunk_count(&self) -> usize {
        match self {
            AbiTag::Zero => 0,
            AbiTag::Scalar | AbiTag::Native(_) | AbiTag::Array(_) => 1,
            AbiTag::Combined(parts) => parts.len,
        }
    }

    /// The `index`-th chunk. Panics when out of range.
    pub const fn chunk(&self, index: usize) -> Chunk {
        assert!(index < self.chunk_count(), "chunk index out of range");
        match self {
            AbiTag::Zero => Chunk::EMPTY,
            AbiTag::Scalar => Chunk {
                part: Part::Scalar,
                count: 1,
            },
            AbiTag::Native(register) => Chunk {
                part: Part::Native(*register),
                count: 1,
            },
            AbiTag::Array(chunk) => *chunk,
            AbiTag::Combined(parts) => parts.chunks[index],
        }
    }

    pub fn chunks(&self) -> Vec<Chunk> {
        (0..self.chunk_count()).map(|i| self.chunk(i)).collect()
    }

    /// Logical lane count.
    pub const fn lanes(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.chunk_count() {
            total += self.chunk(i).lanes();
            i += 1;
        }
        total
    }

    /// Physical lane count, padding included.
    pub const fn capacity(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.chunk_count() {
            total += self.chunk(i).capacity();
            i += 1;
        }
        total
    }

    /// Number of scalars plus registers making up the storage.
    pub const fn registers(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.chunk_count() {
            total += self.chunk(i).count;
            i += 1;
        }
        total
    }

    pub const fn is_partial(&self) -> bool {
        let mut i = 0;
        while i < self.chunk_count() {
            if self.chunk(i).part.is_partial() {
                return true;
            }
            i += 1;
        }
        false
    }

    /// Bytes of value storage, padding lanes included.
    pub const fn storage_bytes(&self, kind: ElementKind) -> usize {
        self.capacity() * kind.bytes()
    }

    /// Bytes of mask storage.
    pub const fn mask_bytes(&self, kind: ElementKind) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.chunk_count() {
            let chunk = self.chunk(i);
            total += chunk.part.mask_bytes(kind) * chunk.count;
            i += 1;
        }
        total
    }

    /// Mask representation of each chunk, in storage order.
    pub fn mask_kinds(&self) -> Vec<MaskKind> {
        self.chunks().iter().map(|c| c.part.mask_kind()).collect()
    }
}

impl fmt::Display for AbiTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiTag::Zero => f.write_str("zero"),
            AbiTag::Combined(parts) => {
                f.write_str("combined(")?;
                for (i, chunk) in parts.as_slice().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{chunk}")?;
                }
                f.write_str(")")
            }
            _ => write!(f, "{}", self.chunk(0)),
        }
    }
}

/// Deduces the storage ABI of `lanes` elements of `kind`.
///
/// Errors when `kind` is not vectorizable, when `lanes` is zero and the
/// zero-width policy is off, or when `lanes` exceeds [`MAX_LANES`].
pub const fn deduce_abi(
    kind: ElementKind,
    lanes: usize,
    config: &AbiConfig,
) -> Result<AbiTag, AbiError> {
    if !kind.is_vectorizable() {
        return Err(error::not_vectorizable(kind.name()));
    }
    if lanes == 0 {
        return if config.zero_width {
            Ok(AbiTag::Zero)
        } else {
            Err(AbiError::ZeroWidth)
        };
    }
    if lanes > MAX_LANES {
        return Err(error::too_many_lanes(lanes, MAX_LANES));
    }
    Ok(deduce_lanes(kind, lanes, &config.features))
}

const fn deduce_lanes(kind: ElementKind, lanes: usize, features: &TargetFeatures) -> AbiTag {
    if lanes == 1 {
        return AbiTag::Scalar;
    }

    let native = target::native_lanes(kind, features);
    if lanes <= native {
        let width = lanes.next_power_of_two();
        if let Some(backend) = target::register_backend(kind, width * kind.bytes(), features) {
            return AbiTag::Native(NativeRegister {
                lanes,
                width,
                mask: backend.mask,
            });
        }
    }

    let limit = if lanes < native { lanes } else { native };
    let part = widest_full_part(kind, limit, features);
    let width = part.width();
    let head = AbiTag::from_chunk(Chunk {
        part,
        count: lanes / width,
    });

    let rest = lanes % width;
    if rest == 0 {
        head
    } else {
        AbiTag::combine(head, deduce_lanes(kind, rest, features))
    }
}

/// Widest valid full register of at most `limit` lanes, or a scalar.
const fn widest_full_part(kind: ElementKind, limit: usize, features: &TargetFeatures) -> Part {
    let mut width = bit_floor(limit);
    while width > 1 {
        if let Some(backend) = target::register_backend(kind, width * kind.bytes(), features) {
            return Part::Native(NativeRegister {
                lanes: width,
                width,
                mask: backend.mask,
            });
        }
        width /= 2;
    }
    Part::Scalar
}

const fn bit_floor(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}
