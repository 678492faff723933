//! End-to-end processing of one packet.

use crate::{
    errors::PacketError,
    packet::{EncodedPacket, Packet},
    render::Render,
    stimulus::StimulusBuilder,
};

/// Everything derived from one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOutput {
    pub encoded: EncodedPacket,
    /// Rendered stimulus script.
    pub script: String,
    /// Console summary, see [crate::report::format_report].
    pub report: String,
}

/// Encodes `packet`, then renders its stimulus script with `renderer` and
/// formats its report.
pub fn process_packet<R: Render>(
    packet: &Packet,
    renderer: &R,
) -> Result<PacketOutput, PacketError> {
    let encoded = packet.encode()?;
    let events = StimulusBuilder::for_packet(&encoded).finish();
    let script = renderer.render(&events);
    let report = encoded.report();

    Ok(PacketOutput {
        encoded,
        script,
        report,
    })
}

/// Name of the stimulus file written for a packet.
pub fn stim_file_name(packet_name: &str) -> String {
    format!("{packet_name}.stim")
}
