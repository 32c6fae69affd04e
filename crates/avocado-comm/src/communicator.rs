//! High-level access to every actuator on one serial line.
//!
//! Each operation is a single round trip: encode one frame, write it, poll
//! the line once, decode at most one reply. Nothing is retried or queued, and
//! the `&mut self` receivers keep one command in flight at a time.

use crate::config::CommConfig;
use crate::error::Result;
use crate::serial::SerialTransport;
use crate::transport::Transport;
use crate::units::{to_wire_position, to_wire_velocity, PositionUnit, VelocityUnit};
use avocado_protocol::{decode_lines, encode_with, Address, ChecksumEncoding, Command};
use tracing::{debug, info, trace, warn};

/// Reply to one command: `None` when the actuator said nothing this poll.
pub type Reply = Option<String>;

/// Drives any number of actuators sharing one transport.
pub struct Communicator<T: Transport = SerialTransport> {
    transport: T,
    position_unit: PositionUnit,
    velocity_unit: VelocityUnit,
    checksum: ChecksumEncoding,
}

impl Communicator<SerialTransport> {
    /// Open the serial port named in `config`.
    ///
    /// Fails with [`CommError::TransportOpen`](crate::CommError::TransportOpen)
    /// if the port cannot be opened.
    pub fn open(config: &CommConfig) -> Result<Self> {
        config.validate()?;
        let transport = SerialTransport::open(&config.port, config.baud_rate, config.timeout())?;
        Ok(Self::with_config(transport, config))
    }
}

impl<T: Transport> Communicator<T> {
    /// Create a communicator using wire units and the default checksum
    /// encoding.
    pub fn new(transport: T) -> Self {
        Communicator {
            transport,
            position_unit: PositionUnit::default(),
            velocity_unit: VelocityUnit::default(),
            checksum: ChecksumEncoding::default(),
        }
    }

    /// Create a communicator with the units and encoding from `config`.
    pub fn with_config(transport: T, config: &CommConfig) -> Self {
        Self::new(transport)
            .with_units(config.position_unit, config.velocity_unit)
            .with_checksum_encoding(config.checksum)
    }

    /// Set the units the caller uses for positions and velocities.
    pub fn with_units(mut self, position_unit: PositionUnit, velocity_unit: VelocityUnit) -> Self {
        self.position_unit = position_unit;
        self.velocity_unit = velocity_unit;
        self
    }

    /// Set how checksums are rendered.
    pub fn with_checksum_encoding(mut self, checksum: ChecksumEncoding) -> Self {
        self.checksum = checksum;
        self
    }

    /// Unit for positions.
    pub fn position_unit(&self) -> PositionUnit {
        self.position_unit
    }

    /// Unit for velocities.
    pub fn velocity_unit(&self) -> VelocityUnit {
        self.velocity_unit
    }

    /// Rotate actuator `address` to `position`, given in the position unit.
    pub fn rotate_to_position(&mut self, address: Address, position: f64) -> Result<Reply> {
        Command::SetPosition(position).validate()?;
        let wire = to_wire_position(position, self.position_unit);
        self.send(address, Command::SetPosition(wire))
    }

    /// Rotate actuator `address` continuously at `velocity`, given in the
    /// velocity unit.
    pub fn rotate_at_velocity(&mut self, address: Address, velocity: f64) -> Result<Reply> {
        Command::SetVelocity(velocity).validate()?;
        let wire = to_wire_velocity(velocity, self.velocity_unit);
        self.send(address, Command::SetVelocity(wire))
    }

    /// Drive actuator `address` at `current` amperes.
    pub fn rotate_at_current(&mut self, address: Address, current: f64) -> Result<Reply> {
        self.send(address, Command::SetCurrent(current))
    }

    /// Ask actuator `address` for its position (reported in radians).
    pub fn get_position(&mut self, address: Address) -> Result<Reply> {
        self.send(address, Command::GetPosition)
    }

    /// Ask actuator `address` for its velocity (reported in revolutions per
    /// second).
    pub fn get_velocity(&mut self, address: Address) -> Result<Reply> {
        self.send(address, Command::GetVelocity)
    }

    /// Ask actuator `address` for its motor current.
    pub fn get_current(&mut self, address: Address) -> Result<Reply> {
        self.send(address, Command::GetCurrent)
    }

    /// Ask actuator `address` for its temperature.
    pub fn get_temperature(&mut self, address: Address) -> Result<Reply> {
        self.send(address, Command::GetTemperature)
    }

    /// Send a command already expressed in wire units and return the reply.
    pub fn send(&mut self, address: Address, command: Command) -> Result<Reply> {
        command.validate()?;

        let frame = encode_with(address, &command, self.checksum);
        debug!("[{}] -> {}: '{}'", self.transport.name(), address, command);
        trace!("frame bytes: {:?}", frame);

        self.transport.write(&frame)?;
        let lines = self.transport.read_available()?;

        match decode_lines(lines.as_slice()) {
            Ok(reply) => {
                debug!("[{}] <- {}: {:?}", self.transport.name(), address, reply);
                Ok(reply)
            }
            Err(e) => {
                warn!(
                    "[{}] reply to '{}' from {} discarded: {}",
                    self.transport.name(),
                    command,
                    address,
                    e
                );
                Err(e.into())
            }
        }
    }

    /// Release the transport.
    ///
    /// Dropping the communicator has the same effect; this only makes the
    /// point of release explicit.
    pub fn close(self) {
        info!("Closing {}", self.transport.name());
    }
}

/// Parse a numeric reply such as `"1.5707 "`.
pub fn parse_reading(reply: &str) -> Option<f64> {
    reply.trim().parse().ok()
}
