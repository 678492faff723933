//! Packet: ordered set of fields concatenated into one payload.

use log::debug;

use crate::{
    errors::{EncodeWarning, PacketError},
    field::{EncodedField, Field},
};

/// A named packet. Field order is wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Packet {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Packet {
            name: name.into(),
            fields,
        }
    }

    /// Encodes every field in declaration order and concatenates the
    /// results. The first failing field aborts the whole packet.
    pub fn encode(&self) -> Result<EncodedPacket, PacketError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut bytes = Vec::new();

        for field in &self.fields {
            let encoded = field.encode().map_err(|source| PacketError {
                packet: self.name.clone(),
                field: field.name.clone(),
                source,
            })?;

            bytes.extend_from_slice(&encoded.bytes);
            fields.push(encoded);
        }

        debug!("encoded packet `{}`: {} bytes", self.name, bytes.len());

        Ok(EncodedPacket {
            name: self.name.clone(),
            fields,
            bytes,
        })
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::PacketDef> for Packet {
    fn from(value: crate::serde::PacketDef) -> Self {
        Packet {
            name: value.name,
            fields: value.fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of [Packet::encode].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPacket {
    pub name: String,
    /// Encoded fields in declaration order.
    pub fields: Vec<EncodedField>,
    /// Concatenation of every field's bytes.
    pub bytes: Vec<u8>,
}

impl EncodedPacket {
    /// Every non-fatal warning, paired with the name of the field it came from.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &EncodeWarning)> {
        self.fields
            .iter()
            .flat_map(|field| field.warnings.iter().map(|w| (field.name.as_str(), w)))
    }
}
