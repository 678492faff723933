//! Type tokens: the `<kind><width>[ '[' [<length>] ']' ]` grammar.
//!
//! A type token declares how wide every value of a field is and how many
//! values the field holds:
//!
//! | token     | width | array length                  |
//! |-----------|-------|-------------------------------|
//! | `U8`      | 1     | 1                             |
//! | `I16[]`   | 2     | number of values supplied     |
//! | `U32[4]`  | 4     | 4                             |
//!
//! The kind letter is accepted in either case.

use std::{fmt, str::FromStr};

use crate::errors::FormatError;

/// Largest encoded size of a single field, in bytes.
pub const MAX_FIELD_BYTES: usize = 64 * 1024;

/// The declared kind letter of a field.
///
/// Only validated; the encoding of a value depends on the sign of the
/// literal, not on this kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `U`
    Unsigned,
    /// `I`
    Signed,
    /// `S`. Encoded through the same integer path as the other kinds.
    Str,
}

impl TypeKind {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'U' => Some(TypeKind::Unsigned),
            'I' => Some(TypeKind::Signed),
            'S' => Some(TypeKind::Str),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            TypeKind::Unsigned => 'U',
            TypeKind::Signed => 'I',
            TypeKind::Str => 'S',
        }
    }
}

/// Whether a type is a scalar or an array, and how its length is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayDecl {
    /// No brackets.
    Scalar,
    /// `[]`: as many elements as values supplied.
    Inferred,
    /// `[N]`
    Fixed(usize),
}

/// A parsed type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    /// Width of one element in bits, always a positive multiple of 8.
    pub width_bits: u32,
    pub array: ArrayDecl,
}

impl TypeDescriptor {
    /// Width of one element in bytes.
    pub fn width_bytes(&self) -> usize {
        (self.width_bits / 8) as usize
    }

    /// Number of elements the field has room for, given how many values
    /// were supplied for it. Never below one.
    pub fn array_length(&self, value_count: usize) -> usize {
        match self.array {
            ArrayDecl::Scalar => 1,
            ArrayDecl::Inferred => value_count.max(1),
            ArrayDecl::Fixed(n) => n,
        }
    }

    /// Total encoded size of the field in bytes, capped at [MAX_FIELD_BYTES].
    pub fn encoded_len(&self, value_count: usize) -> Result<usize, FormatError> {
        let width_bytes = self.width_bytes();
        let array_length = self.array_length(value_count);

        width_bytes
            .checked_mul(array_length)
            .filter(|&len| len <= MAX_FIELD_BYTES)
            .ok_or(FormatError::TooLarge {
                width_bytes,
                array_length,
            })
    }
}

impl FromStr for TypeDescriptor {
    type Err = FormatError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let letter = chars.next().ok_or(FormatError::Empty)?;
        let kind = TypeKind::from_letter(letter).ok_or(FormatError::UnknownKind(letter))?;
        let rest = chars.as_str();

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (width, rest) = rest.split_at(digits_end);
        if width.is_empty() {
            return Err(FormatError::MissingWidth);
        }

        let width_bits: u32 = width
            .parse()
            .map_err(|_| FormatError::InvalidWidth(width.to_string()))?;
        if width_bits == 0 {
            return Err(FormatError::ZeroWidth);
        }
        if width_bits % 8 != 0 {
            return Err(FormatError::UnalignedWidth(width_bits));
        }

        let array = parse_array_decl(rest)?;

        Ok(TypeDescriptor {
            kind,
            width_bits,
            array,
        })
    }
}

fn parse_array_decl(rest: &str) -> Result<ArrayDecl, FormatError> {
    if rest.is_empty() {
        return Ok(ArrayDecl::Scalar);
    }

    let Some(inner) = rest.strip_prefix('[') else {
        return Err(FormatError::TrailingInput(rest.to_string()));
    };
    let Some(close) = inner.find(']') else {
        return Err(FormatError::MalformedArray(rest.to_string()));
    };

    let (length, trailing) = (&inner[..close], &inner[close + 1..]);
    if !trailing.is_empty() {
        return Err(FormatError::TrailingInput(trailing.to_string()));
    }

    if length.is_empty() {
        return Ok(ArrayDecl::Inferred);
    }
    if !length.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::MalformedArray(rest.to_string()));
    }

    match length.parse::<usize>() {
        Ok(0) => Err(FormatError::ZeroArrayLength),
        Ok(n) => Ok(ArrayDecl::Fixed(n)),
        Err(_) => Err(FormatError::MalformedArray(rest.to_string())),
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.letter(), self.width_bits)?;
        match self.array {
            ArrayDecl::Scalar => Ok(()),
            ArrayDecl::Inferred => f.write_str("[]"),
            ArrayDecl::Fixed(n) => write!(f, "[{n}]"),
        }
    }
}
