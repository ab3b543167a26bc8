//! The parsing machinery: a positional byte reader, a two-phase
//! raw-then-cooked conversion pipeline, and the error type they share.
//!
//! Parsing happens in two passes. First, [`FromReader`] decodes the wire
//! shape of the class file into plain "raw" structs that store constant pool
//! indices as bare `u16`s — no semantic resolution happens yet, because the
//! constant pool itself is still being read. Once the whole class file has
//! been decoded into raw structs (and the pool is therefore complete),
//! [`ClassElement::from_raw`] converts each raw struct into its cooked,
//! fully-resolved counterpart, using a [`Context`] that carries the
//! finished constant pool, the class file version, and the binary name of
//! the class being built.

mod annotation;
mod attribute;
mod class_file;
mod code;
mod constant_pool;
mod field_info;
mod method_info;
mod module;
mod reader;
mod stack_map;

pub(crate) use class_file::parse as parse_class_file;
pub(crate) use reader::{ByteReader, FromReader};

use crate::jvm::constant_pool::ConstantPool;
use std::num::TryFromIntError;

/// Context threaded through the raw-to-cooked conversion of one class file.
pub(crate) struct Context<'a> {
    pub constant_pool: &'a ConstantPool,
    pub class_version: super::class::ClassVersion,
    pub current_class_binary_name: &'a str,
}

/// Converts a raw, wire-shaped value into its cooked, fully-resolved form.
pub(crate) trait ClassElement: Sized {
    /// The raw, wire-shaped representation this type is converted from.
    type Raw;

    /// Resolves `raw` against `ctx`, typically looking up constant pool
    /// entries referenced by index.
    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error>;
}

/// Every way parsing a class file can fail.
///
/// All variants are fatal: a parse either completes or is abandoned with
/// the whole partially-built model discarded. The only tolerated softness
/// is an attribute whose name is not recognized, which degrades to a raw
/// byte blob rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying byte source ended before the expected number of bytes
    /// could be read.
    #[error("unexpected end of input at offset {offset}")]
    ShortRead {
        /// Byte offset at which the read was attempted.
        offset: u64,
        /// The I/O error that triggered the short read, if any.
        #[source]
        source: Option<std::io::Error>,
    },
    /// The first four bytes of the class file were not `CA FE BA BE`.
    #[error("bad magic number: {found:#010X}")]
    BadMagic {
        /// The four bytes that were actually read.
        found: u32,
    },
    /// A literal byte sequence was expected but did not match.
    #[error("expected bytes {expected:02X?} but found {found:02X?} at offset {offset}")]
    UnexpectedBytes {
        /// Byte offset at which the mismatch was detected.
        offset: u64,
        /// The bytes that were expected.
        expected: Vec<u8>,
        /// The bytes that were actually read.
        found: Vec<u8>,
    },
    /// A constant pool index was zero where a non-zero index was required,
    /// was greater than or equal to the pool's entry count, or pointed at
    /// the placeholder slot following a `Long` or `Double` entry.
    #[error("constant pool index {index} is out of range (pool has {pool_count} entries)")]
    PoolIndexOutOfRange {
        /// The offending index.
        index: u16,
        /// The number of entries in the pool, including slot 0.
        pool_count: u16,
    },
    /// A constant pool entry was resolved but was not of the expected
    /// variant.
    #[error("constant pool entry at index {index} is not a {expected}")]
    PoolTypeMismatch {
        /// The offending index.
        index: u16,
        /// The name of the variant that was expected.
        expected: &'static str,
    },
    /// A tagged-dispatch discriminator (pool tag, frame type, element-value
    /// tag, opcode, ...) did not match any registered variant.
    #[error("unknown {kind} tag {tag} at offset {offset}")]
    UnknownTag {
        /// What kind of discriminator this is, e.g. `"constant pool"`.
        kind: &'static str,
        /// The offending tag value.
        tag: u32,
        /// Byte offset at which the tag was read.
        offset: u64,
    },
    /// An attribute's declared `attribute_length` did not match the number
    /// of bytes consumed while parsing its body as a known variant.
    #[error("attribute {name} declared length {declared} but {consumed} bytes were consumed")]
    AttributeLengthMismatch {
        /// The attribute's name.
        name: String,
        /// The declared `attribute_length`.
        declared: u32,
        /// The number of bytes actually consumed.
        consumed: u32,
    },
    /// A descriptor string (field type or method signature) failed to
    /// parse.
    #[error("malformed descriptor: {descriptor:?}")]
    MalformedDescriptor {
        /// The offending descriptor string.
        descriptor: String,
    },
    /// The class file is structurally well-formed at the byte level but
    /// violates a semantic invariant (e.g. a zero `super_class` on a
    /// non-`java/lang/Object`, non-module class).
    #[error("malformed class file: {0}")]
    MalformedClassFile(&'static str),
    /// A numeric conversion between integer widths failed (e.g. a count
    /// field that does not fit where it's used).
    #[error(transparent)]
    IntConversion(#[from] TryFromIntError),
}

impl Error {
    pub(crate) fn short_read(offset: u64, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::ShortRead {
                offset,
                source: None,
            }
        } else {
            Self::ShortRead {
                offset,
                source: Some(source),
            }
        }
    }
}

use crate::jvm::attribute::Attribute;

/// Pulls the single attribute matching `extract` out of `attrs`, if any.
///
/// `extract` returns `Ok` for a matching attribute (consuming it) or `Err`
/// to hand it back unchanged. `context` names the attribute for the error
/// message should more than one match be found — every named attribute in
/// `# 4.4 Attributes` is singular per scope.
pub(crate) fn take_attribute<T>(
    attrs: &mut Vec<Attribute>,
    context: &'static str,
    mut extract: impl FnMut(Attribute) -> Result<T, Attribute>,
) -> Result<Option<T>, Error> {
    let mut found = None;
    let mut remaining = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        match extract(attr) {
            Ok(value) if found.is_none() => found = Some(value),
            Ok(_) => return Err(Error::MalformedClassFile(context)),
            Err(attr) => remaining.push(attr),
        }
    }
    *attrs = remaining;
    Ok(found)
}

/// Removes every attribute matching `is_match` from `attrs` and reports
/// whether at least one was found. Used for marker attributes
/// (`Synthetic`, `Deprecated`) where repetition is harmless.
pub(crate) fn take_marker(attrs: &mut Vec<Attribute>, is_match: impl Fn(&Attribute) -> bool) -> bool {
    let before = attrs.len();
    attrs.retain(|a| !is_match(a));
    attrs.len() != before
}
