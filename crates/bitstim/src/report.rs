//! Human-readable packet summaries and hex dumps.

use std::fmt::Write;

use crate::{field::EncodedField, packet::EncodedPacket};

/// Payloads up to this many bytes are dumped on a single line.
pub const INLINE_LIMIT: usize = 13;
/// Maximum number of bytes per line of a chunked dump.
pub const CHUNK_LEN: usize = 15;

/// Hex dump of a payload, each byte rendered as `0xNN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexDump {
    /// Short payload, one line.
    Inline(String),
    /// Long payload, at most [CHUNK_LEN] bytes per line.
    Chunked(Vec<String>),
}

impl HexDump {
    pub fn new(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_LIMIT {
            HexDump::Inline(hex_line(bytes))
        } else {
            HexDump::Chunked(bytes.chunks(CHUNK_LEN).map(hex_line).collect())
        }
    }

    /// Writes the dump under `label`, prefixing every line with `prefix`.
    /// Inline dumps share the label's line; chunked ones start below it.
    pub fn write_labeled(&self, out: &mut Vec<String>, prefix: &str, label: &str) {
        match self {
            HexDump::Inline(line) if line.is_empty() => out.push(format!("{prefix}{label}")),
            HexDump::Inline(line) => out.push(format!("{prefix}{label} {line}")),
            HexDump::Chunked(lines) => {
                out.push(format!("{prefix}{label}"));
                out.extend(lines.iter().map(|line| format!("{prefix}{line}")));
            }
        }
    }
}

/// Renders `bytes` as space-separated `0xNN` tokens.
pub fn hex_line(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len() * 5);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "0x{byte:02X}");
    }
    line
}

/// Summary of one packet: its name, each field's canonical text, the byte
/// count and a hex dump.
pub fn format_report(packet_name: &str, fields: &[EncodedField], bytes: &[u8]) -> String {
    let mut lines = Vec::with_capacity(fields.len() + 4);
    lines.push(format!("{packet_name}:"));
    for field in fields {
        lines.push(format!("  {}: {}", field.name, field.canonical_text));
    }
    lines.push(format!("Byte count: {}", bytes.len()));
    HexDump::new(bytes).write_labeled(&mut lines, "", "Packet:");

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

impl EncodedPacket {
    /// See [format_report].
    pub fn report(&self) -> String {
        format_report(&self.name, &self.fields, &self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn test_hex_line() {
        assert_eq!(hex_line(&[0x00, 0x0A, 0xFF]), "0x00 0x0A 0xFF");
        assert_eq!(hex_line(&[]), "");
    }

    #[test]
    fn test_thirteen_bytes_inline() {
        match HexDump::new(&payload(13)) {
            HexDump::Inline(line) => assert_eq!(line.split(' ').count(), 13),
            other => panic!("expected inline dump, got {other:?}"),
        }
    }

    #[test]
    fn test_fourteen_bytes_chunked() {
        let HexDump::Chunked(lines) = HexDump::new(&payload(14)) else {
            panic!("expected chunked dump");
        };
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].split(' ').count(), 14);
    }

    #[test]
    fn test_chunks_never_exceed_limit() {
        let HexDump::Chunked(lines) = HexDump::new(&payload(40)) else {
            panic!("expected chunked dump");
        };
        let counts: Vec<_> = lines.iter().map(|l| l.split(' ').count()).collect();
        assert_eq!(counts, [15, 15, 10]);
    }

    #[test]
    fn test_format_report_inline() {
        let fields = vec![EncodedField {
            name: "id".to_string(),
            canonical_text: "U16 0x0102".to_string(),
            bytes: vec![0x01, 0x02],
            warnings: vec![],
        }];

        assert_eq!(
            format_report("status", &fields, &[0x01, 0x02]),
            "status:\n  id: U16 0x0102\nByte count: 2\nPacket: 0x01 0x02\n"
        );
    }

    #[test]
    fn test_format_report_chunked() {
        let bytes = payload(16);
        let report = format_report("big", &[], &bytes);
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "big:");
        assert_eq!(lines[1], "Byte count: 16");
        assert_eq!(lines[2], "Packet:");
        assert_eq!(lines[3].split(' ').count(), 15);
        assert_eq!(lines[4], "0x0F");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_format_report_empty_packet() {
        assert_eq!(format_report("none", &[], &[]), "none:\nByte count: 0\nPacket:\n");
    }
}
