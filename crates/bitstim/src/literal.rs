//! Integer literals and their fixed-width big-endian encoding.
//!
//! Literals follow the usual prefixed-base rules: an optional sign, then
//! `0x`, `0o` or `0b` (either case) or plain decimal. Underscores may
//! separate digits. A decimal literal may not have leading zeros unless
//! every digit is zero. Magnitudes are arbitrary precision so that wide
//! fields (`U256`) can be filled.

use std::str::FromStr;

use crate::errors::ValueError;

/// A parsed integer literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    negative: bool,
    /// Little-endian magnitude without high zero bytes.
    magnitude: Vec<u8>,
}

impl Literal {
    #[cfg(test)]
    fn is_negative(&self) -> bool {
        self.negative
    }

    #[cfg(test)]
    fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Number of significant bits in the magnitude.
    fn magnitude_bits(&self) -> usize {
        match self.magnitude.last() {
            Some(&top) => (self.magnitude.len() - 1) * 8 + (8 - top.leading_zeros() as usize),
            None => 0,
        }
    }

    fn magnitude_is_power_of_two(&self) -> bool {
        let Some((&top, low)) = self.magnitude.split_last() else {
            return false;
        };
        top.is_power_of_two() && low.iter().all(|&b| b == 0)
    }

    /// Whether the literal fits in `width_bits`: unsigned range for
    /// non-negative literals, two's-complement range for negative ones.
    pub fn fits(&self, width_bits: usize) -> bool {
        let bits = self.magnitude_bits();
        if !self.negative {
            return bits <= width_bits;
        }

        // -2^(w-1) is the most negative value and has a w-bit magnitude.
        bits < width_bits || (bits == width_bits && self.magnitude_is_power_of_two())
    }

    /// Big-endian encoding in exactly `width_bytes` bytes, or `None` if the
    /// literal does not fit.
    pub fn to_be_bytes(&self, width_bytes: usize) -> Option<Vec<u8>> {
        if !self.fits(width_bytes * 8) {
            return None;
        }

        let mut out = self.magnitude.clone();
        out.resize(width_bytes, 0);

        if self.negative {
            let mut carry = true;
            for byte in out.iter_mut() {
                let (sum, overflow) = (!*byte).overflowing_add(carry as u8);
                *byte = sum;
                carry = overflow;
            }
        }

        out.reverse();
        Some(out)
    }
}

impl FromStr for Literal {
    type Err = ValueError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidLiteral(token.to_string());

        let (negative, body) = match token.as_bytes().first() {
            Some(b'-') => (true, &token[1..]),
            Some(b'+') => (false, &token[1..]),
            _ => (false, token),
        };

        let (radix, digits, prefixed) = split_radix(body);
        let magnitude = parse_magnitude(digits, radix, prefixed).ok_or_else(invalid)?;

        Ok(Literal {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        })
    }
}

fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return (radix, &body[2..], true);
        }
    }
    (10, body, false)
}

/// Parses digit text into a little-endian magnitude. Underscores are
/// allowed between digits, and directly after a base prefix.
fn parse_magnitude(digits: &str, radix: u32, prefixed: bool) -> Option<Vec<u8>> {
    let mut magnitude: Vec<u8> = Vec::new();
    let mut seen_digit = false;
    let mut last_underscore = false;
    let mut leading_zero = false;
    let mut nonzero = false;

    for c in digits.chars() {
        if c == '_' {
            if last_underscore || (!seen_digit && !prefixed) {
                return None;
            }
            last_underscore = true;
            continue;
        }

        let digit = c.to_digit(radix)?;
        if !seen_digit && digit == 0 {
            leading_zero = true;
        }
        nonzero |= digit != 0;
        seen_digit = true;
        last_underscore = false;

        mul_add(&mut magnitude, radix, digit);
    }

    if !seen_digit || last_underscore {
        return None;
    }
    if radix == 10 && leading_zero && nonzero {
        return None;
    }

    Some(magnitude)
}

/// `magnitude = magnitude * radix + digit`, keeping the magnitude normalized.
fn mul_add(magnitude: &mut Vec<u8>, radix: u32, digit: u32) {
    let mut carry = digit;
    for byte in magnitude.iter_mut() {
        let value = *byte as u32 * radix + carry;
        *byte = (value & 0xFF) as u8;
        carry = value >> 8;
    }
    while carry != 0 {
        magnitude.push((carry & 0xFF) as u8);
        carry >>= 8;
    }
}

/// Parses `token` and encodes it big-endian in `width_bytes` bytes.
pub fn encode_literal(token: &str, width_bytes: usize) -> Result<Vec<u8>, ValueError> {
    let literal: Literal = token.parse()?;
    literal
        .to_be_bytes(width_bytes)
        .ok_or_else(|| ValueError::OutOfRange {
            literal: token.to_string(),
            width_bits: (width_bytes * 8) as u32,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decimal() {
        assert_eq!(encode_literal("5", 1).unwrap(), vec![0x05]);
        assert_eq!(encode_literal("258", 2).unwrap(), vec![0x01, 0x02]);
        assert_eq!(encode_literal("+7", 1).unwrap(), vec![0x07]);
    }

    #[test]
    fn test_encode_prefixed_bases() {
        assert_eq!(encode_literal("0xBEEF", 2).unwrap(), vec![0xBE, 0xEF]);
        assert_eq!(encode_literal("0Xff", 1).unwrap(), vec![0xFF]);
        assert_eq!(encode_literal("0o17", 1).unwrap(), vec![0x0F]);
        assert_eq!(encode_literal("0b1010_0101", 1).unwrap(), vec![0xA5]);
        assert_eq!(encode_literal("0x_12_34", 2).unwrap(), vec![0x12, 0x34]);
    }

    #[test]
    fn test_encode_negative_twos_complement() {
        assert_eq!(encode_literal("-1", 1).unwrap(), vec![0xFF]);
        assert_eq!(encode_literal("-2", 2).unwrap(), vec![0xFF, 0xFE]);
        assert_eq!(encode_literal("-128", 1).unwrap(), vec![0x80]);
        assert_eq!(encode_literal("-0x10", 1).unwrap(), vec![0xF0]);
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let literal: Literal = "-0".parse().unwrap();
        assert!(!literal.is_negative());
        assert!(literal.is_zero());
        assert_eq!(literal.to_be_bytes(2).unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            encode_literal("256", 1).unwrap_err(),
            ValueError::OutOfRange {
                literal: "256".to_string(),
                width_bits: 8
            }
        );
        assert!(encode_literal("-129", 1).is_err());
        assert!(encode_literal("255", 1).is_ok());
    }

    #[test]
    fn test_wide_fields_extend() {
        let mut expected = vec![0u8; 31];
        expected.push(0x2A);
        assert_eq!(encode_literal("42", 32).unwrap(), expected);

        assert_eq!(encode_literal("-1", 20).unwrap(), vec![0xFF; 20]);

        let max = format!("0x{}", "F".repeat(64));
        assert_eq!(encode_literal(&max, 32).unwrap(), vec![0xFF; 32]);
        assert!(encode_literal(&max, 31).is_err());
    }

    #[test]
    fn test_invalid_literals() {
        for token in [
            "", "-", "abc", "0x", "0xG1", "1_", "_1", "1__0", "017", "0b102", "1.5", "--1",
        ] {
            assert_eq!(
                token.parse::<Literal>().unwrap_err(),
                ValueError::InvalidLiteral(token.to_string()),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_zero_forms_are_valid() {
        for token in ["0", "00", "0_0", "0x0", "0b0", "-0"] {
            assert!(token.parse::<Literal>().unwrap().is_zero(), "token {token:?}");
        }
    }
}
