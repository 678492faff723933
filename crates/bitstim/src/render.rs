//! Text rendering of [StimulusEvent]s.

use crate::stimulus::StimulusEvent;

/// Turns a sequence of stimulus events into a script.
pub trait Render {
    fn render(&self, events: &[StimulusEvent]) -> String;
}

/// Fixed tokens of the textual stimulus dialect.
///
/// The defaults drive bit 0 of `PIND` and wait 417 cycles per bit, which is
/// 9600 baud at a 4 MHz clock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ScriptDialect {
    /// Statement that drives the pin high.
    pub set_pin: String,
    /// Statement that drives the pin low.
    pub clear_pin: String,
    /// Statement that waits for one bit period.
    pub delay: String,
    pub comment_prefix: String,
}

impl Default for ScriptDialect {
    fn default() -> Self {
        ScriptDialect {
            set_pin: "PIND |= 0x01".to_string(),
            clear_pin: "PIND &= 0xFE".to_string(),
            delay: "#417".to_string(),
            comment_prefix: "//".to_string(),
        }
    }
}

impl ScriptDialect {
    fn push_event(&self, lines: &mut Vec<String>, event: &StimulusEvent) {
        match event {
            StimulusEvent::SetPin => lines.push(self.set_pin.clone()),
            StimulusEvent::ClearPin => lines.push(self.clear_pin.clone()),
            StimulusEvent::Delay(periods) => {
                for _ in 0..*periods {
                    lines.push(self.delay.clone());
                }
            }
            StimulusEvent::Comment(text) => {
                lines.push(format!("{} {}", self.comment_prefix, text))
            }
            StimulusEvent::Blank => lines.push(String::new()),
        }
    }
}

impl Render for ScriptDialect {
    /// One line per event, joined with `\n`.
    fn render(&self, events: &[StimulusEvent]) -> String {
        let mut lines = Vec::with_capacity(events.len());
        for event in events {
            self.push_event(&mut lines, event);
        }
        lines.join("\n")
    }
}
