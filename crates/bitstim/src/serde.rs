//! Deserializable packet document.
//!
//! A document maps packet names to tables of `field name -> type spec`:
//!
//! ```json
//! {
//!   "status": {
//!     "header": "U8 0xAA",
//!     "flags": "U16",
//!     "samples": "I8[4] -1 2"
//!   }
//! }
//! ```
//!
//! Key order in the document is significant: it is the wire order of the
//! fields. The types here are deserialized through order-preserving map
//! visitors, so any self-describing format that reports map entries in
//! source order (JSON, TOML, YAML) keeps that order.

use std::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{Error, MapAccess, Visitor},
};

/// Top-level document: packets in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDef {
    pub packets: Vec<PacketDef>,
}

/// One packet of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketDef {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

/// One `name: spec` entry of a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Type token and value tokens, e.g. `"U8[4] 1 2 3"`.
    pub spec: String,
}

impl DocumentDef {
    pub fn packet(&self, name: &str) -> Option<&PacketDef> {
        self.packets.iter().find(|p| p.name == name)
    }

    /// Converts every packet definition, keeping document order.
    pub fn into_packets(self) -> Vec<crate::packet::Packet> {
        self.packets.into_iter().map(Into::into).collect()
    }
}

impl<'de> Deserialize<'de> for DocumentDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = DocumentDef;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of packet names to field tables")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut packets: Vec<PacketDef> = Vec::new();

        while let Some(name) = map.next_key::<String>()? {
            if packets.iter().any(|p| p.name == name) {
                return Err(A::Error::custom(format!("duplicate packet `{name}`")));
            }

            let fields = map.next_value_seed(FieldsSeed { packet: &name })?;
            packets.push(PacketDef { name, fields });
        }

        Ok(DocumentDef { packets })
    }
}

/// Deserializes one packet's field table, naming the packet in errors.
struct FieldsSeed<'a> {
    packet: &'a str,
}

impl<'de> serde::de::DeserializeSeed<'de> for FieldsSeed<'_> {
    type Value = Vec<FieldDef>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FieldsSeed<'_> {
    type Value = Vec<FieldDef>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a map of field names to type specs for packet `{}`", self.packet)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut fields: Vec<FieldDef> = Vec::new();

        while let Some(name) = map.next_key::<String>()? {
            if fields.iter().any(|f| f.name == name) {
                return Err(A::Error::custom(format!(
                    "duplicate field `{name}` in packet `{}`",
                    self.packet
                )));
            }

            let spec = map.next_value::<String>().map_err(|e| {
                A::Error::custom(format!("packet `{}`, field `{name}`: {e}", self.packet))
            })?;
            fields.push(FieldDef { name, spec });
        }

        Ok(fields)
    }
}
