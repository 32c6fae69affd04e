//! Simulated actuators for running without hardware.
//!
//! Answers frames the way a bus of healthy controllers would: `ok` for set
//! commands and the last commanded value for get commands. Frames with a bad
//! checksum, an unknown verb or an ambiguous checksum split get `err`.

use crate::transport::{MemoryPeer, MemoryTransport};
use avocado_protocol::{format_argument, Address, ChecksumEncoding, Command, Frame, TERMINATOR};
use std::collections::HashMap;
use tracing::trace;

/// Temperature every simulated controller reports, in degrees Celsius.
pub const SIM_TEMPERATURE: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default)]
struct ActuatorState {
    position: f64,
    velocity: f64,
    current: f64,
}

/// A bus full of simulated actuators, keyed by address.
#[derive(Debug, Default)]
pub struct SimulatedBus {
    encoding: ChecksumEncoding,
    actuators: HashMap<Address, ActuatorState>,
}

impl SimulatedBus {
    /// Create a bus expecting frames with the given checksum encoding.
    pub fn new(encoding: ChecksumEncoding) -> Self {
        SimulatedBus {
            encoding,
            actuators: HashMap::new(),
        }
    }

    /// Produce the raw reply to one frame.
    pub fn respond(&mut self, frame: &[u8]) -> Vec<u8> {
        let text = match Frame::parse(frame, self.encoding) {
            Ok(frame) => self.apply(frame.address, frame.command),
            Err(e) => {
                trace!("sim: rejecting frame: {}", e);
                "err".to_string()
            }
        };
        let mut reply = text.into_bytes();
        reply.push(TERMINATOR);
        reply
    }

    fn apply(&mut self, address: Address, command: Command) -> String {
        let state = self.actuators.entry(address).or_default();
        match command {
            Command::SetPosition(v) => {
                state.position = v;
                "ok".to_string()
            }
            Command::SetVelocity(v) => {
                state.velocity = v;
                "ok".to_string()
            }
            Command::SetCurrent(v) => {
                state.current = v;
                "ok".to_string()
            }
            Command::GetPosition => format_argument(state.position),
            Command::GetVelocity => format_argument(state.velocity),
            Command::GetCurrent => format_argument(state.current),
            Command::GetTemperature => format_argument(SIM_TEMPERATURE),
        }
    }

    /// Build an in-memory transport whose peer is this bus.
    pub fn into_transport(self) -> (MemoryTransport, MemoryPeer) {
        let (transport, peer) = MemoryTransport::new_pair();
        let mut bus = self;
        peer.set_responder(move |frame: &[u8]| bus.respond(frame));
        (transport, peer)
    }
}
