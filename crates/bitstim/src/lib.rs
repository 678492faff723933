//! # bitstim
//!
//! Packs declaratively typed packet fields into a binary payload and derives
//! a stimulus script that bit-bangs that payload out of a single pin using
//! asynchronous serial framing (start bit, 8 data bits LSB first, stop bit).
//!
//! Fields are written as a type token followed by values, e.g. `U16 0x1234`
//! or `I8[4] -1 2`. Packets are ordered lists of such fields; their encodings
//! concatenate in declaration order.
//!
//! ## Example
//!
//! ```
//! use bitstim::field::Field;
//! use bitstim::packet::Packet;
//! use bitstim::render::{Render, ScriptDialect};
//! use bitstim::stimulus::StimulusBuilder;
//!
//! let packet = Packet::new(
//!     "status",
//!     vec![Field::new("id", "U8 0x42"), Field::new("values", "U8[3] 1 2")],
//! );
//! let encoded = packet.encode().unwrap();
//! assert_eq!(encoded.bytes, vec![0x42, 0x01, 0x02, 0x00]);
//!
//! let events = StimulusBuilder::for_packet(&encoded).finish();
//! let script = ScriptDialect::default().render(&events);
//! assert!(script.contains("// Byte 0x42"));
//! ```

pub mod errors;
pub mod field;
pub mod literal;
pub mod packet;
pub mod pipeline;
pub mod render;
pub mod report;
#[cfg(feature = "serde")]
pub mod serde;
pub mod stimulus;
pub mod type_spec;

pub use errors::{EncodeWarning, FieldError, FormatError, PacketError, ValueError};
pub use field::{EncodedField, Field};
pub use packet::{EncodedPacket, Packet};
pub use pipeline::{PacketOutput, process_packet, stim_file_name};
pub use render::{Render, ScriptDialect};
pub use stimulus::{StimulusBuilder, StimulusEvent, emit};
pub use type_spec::TypeDescriptor;
