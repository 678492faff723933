//! Bit-banged asynchronous serial framing as a sequence of pin events.
//!
//! Each byte is sent as one frame on a single pin that idles high:
//!
//! ```text
//!  idle | start | d0 d1 d2 d3 d4 d5 d6 d7 | stop | idle
//!  high |  low  |   data bits, LSB first  | high | high
//! ```
//!
//! Every slot lasts one bit period. The trailing idle slot is the gap
//! between consecutive bytes.
//!
//! The events produced here are independent of any output syntax; see
//! [crate::render] for turning them into text.

use crate::{packet::EncodedPacket, report::HexDump};

/// Logic level of the transmit pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn from_bit(bit: bool) -> Self {
        if bit { Level::High } else { Level::Low }
    }
}

/// One bit period of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitSlot {
    Start,
    /// Data bit by index, 0 being the least significant.
    Data(u8),
    Stop,
    /// Gap after the stop bit. The pin is not driven.
    Idle,
}

/// The frame that carries one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    byte: u8,
}

impl Frame {
    /// Bit periods per frame, including the inter-byte gap.
    pub const SLOTS: usize = 11;

    pub fn new(byte: u8) -> Self {
        Frame { byte }
    }

    /// Line level during `slot`.
    pub fn level(&self, slot: BitSlot) -> Level {
        match slot {
            BitSlot::Start => Level::Low,
            BitSlot::Data(i) => Level::from_bit(self.byte & (1 << i) != 0),
            BitSlot::Stop | BitSlot::Idle => Level::High,
        }
    }

    /// All slots in transmission order with their line levels.
    pub fn slots(&self) -> impl Iterator<Item = (BitSlot, Level)> + '_ {
        std::iter::once(BitSlot::Start)
            .chain((0..8).map(BitSlot::Data))
            .chain([BitSlot::Stop, BitSlot::Idle])
            .map(|slot| (slot, self.level(slot)))
    }
}

/// A single stimulus directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StimulusEvent {
    /// Drive the pin high.
    SetPin,
    /// Drive the pin low.
    ClearPin,
    /// Hold the current state for this many bit periods.
    Delay(u32),
    Comment(String),
    /// Empty separator line.
    Blank,
}

impl StimulusEvent {
    /// The pin assertion that puts the line at `level`.
    pub fn drive(level: Level) -> Self {
        match level {
            Level::High => StimulusEvent::SetPin,
            Level::Low => StimulusEvent::ClearPin,
        }
    }

    pub fn is_pin(&self) -> bool {
        matches!(self, StimulusEvent::SetPin | StimulusEvent::ClearPin)
    }
}

const BYTE_RULE_WIDTH: usize = 53;

/// Events that transmit `byte`, preceded by a comment naming it.
pub fn emit(byte: u8) -> Vec<StimulusEvent> {
    let mut builder = StimulusBuilder::new();
    builder.byte(byte);
    builder.finish()
}

/// Accumulates the events of a full stimulus script.
#[derive(Debug, Clone, Default)]
pub struct StimulusBuilder {
    events: Vec<StimulusEvent>,
}

impl StimulusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header block followed by one frame per payload byte.
    pub fn for_packet(packet: &EncodedPacket) -> Self {
        let mut builder = Self::new();
        builder.packet_header(packet).bytes(&packet.bytes);
        builder
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.events.push(StimulusEvent::Comment(text.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.events.push(StimulusEvent::Blank);
        self
    }

    fn hold(&mut self, level: Option<Level>) -> &mut Self {
        if let Some(level) = level {
            self.events.push(StimulusEvent::drive(level));
        }
        self.events.push(StimulusEvent::Delay(1));
        self
    }

    /// Comment block describing the packet: name, fields, size and hex dump.
    pub fn packet_header(&mut self, packet: &EncodedPacket) -> &mut Self {
        self.comment(format!("{}:", packet.name));
        for field in &packet.fields {
            self.comment(format!("  {}: {}", field.name, field.canonical_text));
        }
        self.comment(format!("Byte count: {}", packet.bytes.len()));

        let mut dump = Vec::new();
        HexDump::new(&packet.bytes).write_labeled(&mut dump, "", "Packet:");
        for line in dump {
            self.comment(line);
        }

        self.blank()
    }

    /// One complete frame for `byte`.
    pub fn byte(&mut self, byte: u8) -> &mut Self {
        let frame = Frame::new(byte);
        self.comment(format!("Byte 0x{byte:02X} {}", "-".repeat(BYTE_RULE_WIDTH)))
            .blank();

        for (slot, level) in frame.slots() {
            match slot {
                BitSlot::Start => {
                    self.comment("Start bit").hold(Some(level)).blank();
                }
                BitSlot::Data(0) => {
                    self.comment("Data").hold(Some(level));
                }
                BitSlot::Data(_) => {
                    self.hold(Some(level));
                }
                BitSlot::Stop => {
                    self.blank().comment("Stop bit").hold(Some(level)).blank();
                }
                BitSlot::Idle => {
                    self.comment("Inter-byte gap").hold(None).blank();
                }
            }
        }

        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for &byte in bytes {
            self.byte(byte);
        }
        self
    }

    pub fn finish(self) -> Vec<StimulusEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StimulusEvent::*;

    fn pins(events: &[StimulusEvent]) -> Vec<StimulusEvent> {
        events.iter().filter(|e| e.is_pin()).cloned().collect()
    }

    #[test]
    fn test_frame_levels_lsb_first() {
        let levels: Vec<_> = Frame::new(0b0000_0110).slots().map(|(_, l)| l).collect();
        assert_eq!(levels.len(), Frame::SLOTS);
        assert_eq!(
            levels,
            [
                Level::Low,
                Level::Low,
                Level::High,
                Level::High,
                Level::Low,
                Level::Low,
                Level::Low,
                Level::Low,
                Level::Low,
                Level::High,
                Level::High,
            ]
        );
    }

    #[test]
    fn test_emit_zero() {
        let events = emit(0x00);
        let mut expected = vec![ClearPin; 9];
        expected.push(SetPin);
        assert_eq!(pins(&events), expected);
    }

    #[test]
    fn test_emit_all_ones() {
        let events = emit(0xFF);
        let mut expected = vec![ClearPin];
        expected.extend(vec![SetPin; 9]);
        assert_eq!(pins(&events), expected);
    }

    #[test]
    fn test_emit_layout() {
        let events = emit(0x01);
        let rule = "-".repeat(53);

        let mut expected = vec![
            Comment(format!("Byte 0x01 {rule}")),
            Blank,
            Comment("Start bit".to_string()),
            ClearPin,
            Delay(1),
            Blank,
            Comment("Data".to_string()),
            SetPin,
            Delay(1),
        ];
        for _ in 1..8 {
            expected.extend([ClearPin, Delay(1)]);
        }
        expected.extend([
            Blank,
            Comment("Stop bit".to_string()),
            SetPin,
            Delay(1),
            Blank,
            Comment("Inter-byte gap".to_string()),
            Delay(1),
            Blank,
        ]);

        assert_eq!(events, expected);
    }

    #[test]
    fn test_every_frame_spans_eleven_periods() {
        for byte in [0x00, 0x5A, 0xA5, 0xFF] {
            let periods: u32 = emit(byte)
                .iter()
                .map(|e| if let Delay(n) = e { *n } else { 0 })
                .sum();
            assert_eq!(periods as usize, Frame::SLOTS);
        }
    }

    #[test]
    fn test_bytes_concatenate_in_order() {
        let mut builder = StimulusBuilder::new();
        builder.bytes(&[0x12, 0x34]);

        let mut expected = emit(0x12);
        expected.extend(emit(0x34));
        assert_eq!(builder.finish(), expected);
    }

    #[test]
    fn test_emit_is_deterministic() {
        assert_eq!(emit(0xC3), emit(0xC3));
    }
}
