//! Primitive type vocabulary.
//!
//! The parser resolves type names against [`PRIMITIVES`]; the mangler uses the per-type [`PrimitiveInfo::code`]
//! so every primitive encodes as exactly one character.
//!
//! ## Notes
//! - `void` is also a keyword; the parser accepts the keyword token in type position.
//! - Codes are part of the symbol ABI: changing one changes every mangled name that uses the type.
//!
//! ## Examples
//! ```rust
//! use quix_core::lang::types::{self, PrimitiveId};
//!
//! assert_eq!(types::from_str("i32"), Some(PrimitiveId::I32));
//! assert_eq!(types::from_code('i'), Some(PrimitiveId::I32));
//! assert_eq!(types::info_for(PrimitiveId::U16).bits, Some(16));
//! ```

use super::registry::Since;

/// Stable identifier for every primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    String,
    Void,
}

/// Numeric family of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveFamily {
    Unsigned,
    Signed,
    Float,
    Bool,
    Char,
    String,
    Void,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveInfo {
    pub id: PrimitiveId,
    pub spelling: &'static str,
    /// Single-character mangling code.
    pub code: char,
    pub family: PrimitiveFamily,
    /// Storage width for fixed-size scalars.
    pub bits: Option<u8>,
    pub since: Since,
}

impl PrimitiveInfo {
    /// `true` for the signed and unsigned integer types.
    pub const fn is_integer(&self) -> bool {
        matches!(self.family, PrimitiveFamily::Unsigned | PrimitiveFamily::Signed)
    }
}

/// Registry of all primitive types.
pub const PRIMITIVES: &[PrimitiveInfo] = &[
    info(PrimitiveId::U8, "u8", 'h', PrimitiveFamily::Unsigned, Some(8)),
    info(PrimitiveId::U16, "u16", 't', PrimitiveFamily::Unsigned, Some(16)),
    info(PrimitiveId::U32, "u32", 'j', PrimitiveFamily::Unsigned, Some(32)),
    info(PrimitiveId::U64, "u64", 'm', PrimitiveFamily::Unsigned, Some(64)),
    info(PrimitiveId::I8, "i8", 'a', PrimitiveFamily::Signed, Some(8)),
    info(PrimitiveId::I16, "i16", 's', PrimitiveFamily::Signed, Some(16)),
    info(PrimitiveId::I32, "i32", 'i', PrimitiveFamily::Signed, Some(32)),
    info(PrimitiveId::I64, "i64", 'l', PrimitiveFamily::Signed, Some(64)),
    info(PrimitiveId::F32, "f32", 'f', PrimitiveFamily::Float, Some(32)),
    info(PrimitiveId::F64, "f64", 'd', PrimitiveFamily::Float, Some(64)),
    info(PrimitiveId::Bool, "bool", 'b', PrimitiveFamily::Bool, Some(1)),
    info(PrimitiveId::Char, "char", 'c', PrimitiveFamily::Char, Some(8)),
    info(PrimitiveId::String, "string", 'r', PrimitiveFamily::String, None),
    info(PrimitiveId::Void, "void", 'v', PrimitiveFamily::Void, None),
];

/// Canonical spelling of a primitive type.
pub fn as_str(id: PrimitiveId) -> &'static str {
    info_for(id).spelling
}

/// Return the full metadata entry for a primitive type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PrimitiveId) -> &'static PrimitiveInfo {
    PRIMITIVES
        .iter()
        .find(|p| p.id == id)
        .expect("primitive info missing")
}

/// Resolve a type name to a primitive.
pub fn from_str(s: &str) -> Option<PrimitiveId> {
    PRIMITIVES.iter().find(|p| p.spelling == s).map(|p| p.id)
}

/// Resolve a mangling code to a primitive.
pub fn from_code(c: char) -> Option<PrimitiveId> {
    PRIMITIVES.iter().find(|p| p.code == c).map(|p| p.id)
}

/// Smallest signed-agnostic integer width (8/16/32/64) able to hold `magnitude`.
///
/// ## Examples
/// ```rust
/// use quix_core::lang::types::int_width_for;
///
/// assert_eq!(int_width_for(255), 8);
/// assert_eq!(int_width_for(256), 16);
/// assert_eq!(int_width_for(u64::MAX), 64);
/// ```
pub fn int_width_for(magnitude: u64) -> u8 {
    if magnitude <= u64::from(u8::MAX) {
        8
    } else if magnitude <= u64::from(u16::MAX) {
        16
    } else if magnitude <= u64::from(u32::MAX) {
        32
    } else {
        64
    }
}

const fn info(
    id: PrimitiveId,
    spelling: &'static str,
    code: char,
    family: PrimitiveFamily,
    bits: Option<u8>,
) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        spelling,
        code,
        family,
        bits,
        since: Since(0, 1),
    }
}
