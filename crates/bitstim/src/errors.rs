//! Error and warning types for type-spec parsing, value encoding and packet assembly.

use thiserror::Error;

/// Errors produced when parsing a type token such as `U16[4]` into a
/// [crate::type_spec::TypeDescriptor].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The field spec contains no type token at all.
    #[error("empty type token")]
    Empty,
    /// Kind letter is not one of `U`, `I` or `S`.
    #[error("unknown type kind `{0}`")]
    UnknownKind(char),
    /// Kind letter is not followed by a width.
    #[error("type token has no width")]
    MissingWidth,
    /// Width is zero bits.
    #[error("type width must be positive")]
    ZeroWidth,
    /// Width is not a whole number of bytes.
    #[error("type width {0} is not a multiple of 8 bits")]
    UnalignedWidth(u32),
    /// Width digits do not fit a 32-bit integer.
    #[error("type width `{0}` is too large")]
    InvalidWidth(String),
    /// Array brackets are unbalanced or contain something other than digits.
    #[error("malformed array declaration `{0}`")]
    MalformedArray(String),
    /// Array declared with an explicit length of zero.
    #[error("array length must be positive")]
    ZeroArrayLength,
    /// Field would encode to more than [crate::type_spec::MAX_FIELD_BYTES].
    #[error("field of {array_length} x {width_bytes} bytes exceeds the size limit")]
    TooLarge {
        width_bytes: usize,
        array_length: usize,
    },
    /// Characters left over after a complete type token.
    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),
}

/// Errors produced when a value token cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Token is not an integer literal.
    #[error("`{0}` is not an integer literal")]
    InvalidLiteral(String),
    /// Literal does not fit the declared width.
    #[error("`{literal}` does not fit in {width_bits} bits")]
    OutOfRange { literal: String, width_bits: u32 },
}

/// Any fatal error encountered while encoding a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A field error tagged with the packet and field that produced it.
///
/// Encoding a packet either fully succeeds or fails with this error; there
/// is no partially encoded packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("packet `{packet}`, field `{field}`")]
pub struct PacketError {
    pub packet: String,
    pub field: String,
    #[source]
    pub source: FieldError,
}

/// Non-fatal conditions reported alongside a successfully encoded field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeWarning {
    /// More values were supplied than the array has room for; the extra
    /// values were dropped.
    #[error("{supplied} values supplied for {retained} slots, extra values dropped")]
    Truncated { supplied: usize, retained: usize },
}
