//! Named fields and their encoding into fixed-length byte sequences.

use log::{debug, warn};

use crate::{
    errors::{EncodeWarning, FieldError, FormatError},
    literal::encode_literal,
    type_spec::TypeDescriptor,
};

/// Value substituted when a field spec names a type but no values.
pub const DEFAULT_VALUE: &str = "0";

/// A single named field as declared in a packet document, e.g.
/// `length: "U16 0x0010"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, used only for reporting.
    pub name: String,
    /// Type token followed by zero or more value tokens, whitespace separated.
    pub raw_spec: String,
}

impl Field {
    pub fn new(name: impl Into<String>, raw_spec: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            raw_spec: raw_spec.into(),
        }
    }

    /// Parses and encodes this field. See [encode_field].
    pub fn encode(&self) -> Result<EncodedField, FieldError> {
        encode_field(self)
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for Field {
    fn from(value: crate::serde::FieldDef) -> Self {
        Field {
            name: value.name,
            raw_spec: value.spec,
        }
    }
}

/// A field spec split into its type token and value tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec<'a> {
    pub type_token: &'a str,
    pub descriptor: TypeDescriptor,
    /// Value tokens after the default value policy has been applied; never empty.
    pub values: Vec<&'a str>,
}

impl<'a> FieldSpec<'a> {
    pub fn parse(raw_spec: &'a str) -> Result<Self, FormatError> {
        let mut tokens = raw_spec.split_whitespace();
        let type_token = tokens.next().ok_or(FormatError::Empty)?;
        let descriptor: TypeDescriptor = type_token.parse()?;
        let values = apply_default_value(tokens.collect());

        Ok(FieldSpec {
            type_token,
            descriptor,
            values,
        })
    }

    /// Number of elements this field encodes.
    pub fn array_length(&self) -> usize {
        self.descriptor.array_length(self.values.len())
    }
}

/// Substitutes [DEFAULT_VALUE] when no value tokens were given.
pub fn apply_default_value(mut values: Vec<&str>) -> Vec<&str> {
    if values.is_empty() {
        values.push(DEFAULT_VALUE);
    }
    values
}

/// A field after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    pub name: String,
    /// Type token followed by the retained value tokens. For reporting only.
    pub canonical_text: String,
    /// Exactly `width_bytes * array_length` bytes, at most
    /// [crate::type_spec::MAX_FIELD_BYTES].
    pub bytes: Vec<u8>,
    pub warnings: Vec<EncodeWarning>,
}

/// Encodes every retained value of `field` big-endian at the declared
/// width, dropping values beyond the array length and zero-padding the
/// tail when fewer values than slots were given.
///
/// Negative literals are encoded in two's complement and non-negative ones
/// as unsigned, whatever the declared kind letter.
pub fn encode_field(field: &Field) -> Result<EncodedField, FieldError> {
    let spec = FieldSpec::parse(&field.raw_spec)?;
    let array_length = spec.array_length();
    let width_bytes = spec.descriptor.width_bytes();
    let total_len = spec.descriptor.encoded_len(spec.values.len())?;

    let mut warnings = Vec::new();
    let mut values = spec.values;
    if values.len() > array_length {
        let warning = EncodeWarning::Truncated {
            supplied: values.len(),
            retained: array_length,
        };
        warn!("field `{}` ({}): {}", field.name, field.raw_spec.trim(), warning);
        warnings.push(warning);
        values.truncate(array_length);
    }

    let mut bytes = Vec::with_capacity(total_len);
    for value in &values {
        bytes.extend(encode_literal(value, width_bytes)?);
    }
    bytes.resize(total_len, 0);

    let canonical_text = std::iter::once(spec.type_token)
        .chain(values.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    debug!(
        "encoded field `{}` as {} bytes: {}",
        field.name,
        bytes.len(),
        canonical_text
    );

    Ok(EncodedField {
        name: field.name.clone(),
        canonical_text,
        bytes,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValueError;

    fn encode(raw_spec: &str) -> Result<EncodedField, FieldError> {
        Field::new("test", raw_spec).encode()
    }

    #[test]
    fn test_scalar() {
        let field = encode("U8 5").unwrap();
        assert_eq!(field.bytes, vec![0x05]);
        assert_eq!(field.canonical_text, "U8 5");
        assert!(field.warnings.is_empty());
    }

    #[test]
    fn test_default_value() {
        let field = encode("U16").unwrap();
        assert_eq!(field.bytes, vec![0x00, 0x00]);
        assert_eq!(field.canonical_text, "U16 0");
    }

    #[test]
    fn test_default_value_for_inferred_array() {
        let field = encode("U8[]").unwrap();
        assert_eq!(field.bytes, vec![0x00]);
        assert_eq!(field.canonical_text, "U8[] 0");
    }

    #[test]
    fn test_zero_padded_array() {
        let field = encode("U8[4] 1 2 3").unwrap();
        assert_eq!(field.bytes, vec![0x01, 0x02, 0x03, 0x00]);
        assert!(field.warnings.is_empty());
    }

    #[test]
    fn test_truncated_array() {
        let field = encode("U16[2] 1 2 3").unwrap();
        assert_eq!(field.bytes, vec![0x00, 0x01, 0x00, 0x02]);
        assert_eq!(field.canonical_text, "U16[2] 1 2");
        assert_eq!(
            field.warnings,
            vec![EncodeWarning::Truncated {
                supplied: 3,
                retained: 2
            }]
        );
    }

    #[test]
    fn test_scalar_with_extra_values_keeps_first() {
        let field = encode("U8 7 8 9").unwrap();
        assert_eq!(field.bytes, vec![0x07]);
        assert_eq!(field.canonical_text, "U8 7");
        assert_eq!(field.warnings.len(), 1);
    }

    #[test]
    fn test_inferred_array_uses_value_count() {
        let field = encode("U16[] 0x0102 0x0304").unwrap();
        assert_eq!(field.bytes, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_signed_negative() {
        assert_eq!(encode("I8 -1").unwrap().bytes, vec![0xFF]);
        assert_eq!(encode("I16 -2").unwrap().bytes, vec![0xFF, 0xFE]);
    }

    // The kind letter does not select the encoding: a negative literal in an
    // unsigned field is still written in two's complement.
    #[test]
    fn test_unsigned_field_accepts_negative_literal() {
        assert_eq!(encode("U8 -1").unwrap().bytes, vec![0xFF]);
    }

    #[test]
    fn test_string_kind_uses_integer_path() {
        assert_eq!(encode("S8[3] 0x41 0x42").unwrap().bytes, vec![0x41, 0x42, 0x00]);
    }

    #[test]
    fn test_canonical_text_normalizes_whitespace() {
        let field = encode("  U8[2]\t1   2 ").unwrap();
        assert_eq!(field.canonical_text, "U8[2] 1 2");
    }

    #[test]
    fn test_format_error() {
        assert_eq!(
            encode("X8").unwrap_err(),
            FieldError::Format(FormatError::UnknownKind('X'))
        );
        assert_eq!(encode("   ").unwrap_err(), FieldError::Format(FormatError::Empty));
    }

    #[test]
    fn test_value_error() {
        assert_eq!(
            encode("U8 banana").unwrap_err(),
            FieldError::Value(ValueError::InvalidLiteral("banana".to_string()))
        );
        assert!(matches!(
            encode("U8 300").unwrap_err(),
            FieldError::Value(ValueError::OutOfRange { width_bits: 8, .. })
        ));
    }

    #[test]
    fn test_oversized_field_is_rejected() {
        assert_eq!(
            encode("U8[1000000]").unwrap_err(),
            FieldError::Format(FormatError::TooLarge {
                width_bytes: 1,
                array_length: 1_000_000
            })
        );
        assert!(matches!(
            encode("U4294967288 1").unwrap_err(),
            FieldError::Format(FormatError::TooLarge { array_length: 1, .. })
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_overflowing_field_size_is_rejected() {
        assert!(matches!(
            encode("U8[100000000000]").unwrap_err(),
            FieldError::Format(FormatError::TooLarge { .. })
        ));
        assert!(matches!(
            encode("U64[3000000000000000000] 1").unwrap_err(),
            FieldError::Format(FormatError::TooLarge { width_bytes: 8, .. })
        ));
    }

    #[test]
    fn test_truncated_values_are_not_validated() {
        let field = encode("U8[1] 1 banana").unwrap();
        assert_eq!(field.bytes, vec![0x01]);
    }
}
