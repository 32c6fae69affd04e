//! # avocado-comm
//!
//! Host-side access to Avocado actuator controllers sharing one half-duplex
//! serial line.
//!
//! A [`Communicator`] owns the transport and turns each call into exactly one
//! command frame and one poll for the reply. Positions and velocities are
//! converted from the caller's units to the wire units (radians, revolutions
//! per second) on the way out.
//!
//! ## Example
//!
//! ```no_run
//! use avocado_comm::{CommConfig, Communicator, PositionUnit};
//! use avocado_protocol::Address;
//!
//! let config = CommConfig {
//!     port: "/dev/ttyACM0".to_string(),
//!     position_unit: PositionUnit::Degrees,
//!     ..CommConfig::default()
//! };
//!
//! let mut comm = Communicator::open(&config)?;
//! let reply = comm.rotate_to_position(Address(1), 90.0)?;
//! println!("{:?}", reply);
//! # Ok::<(), avocado_comm::CommError>(())
//! ```

mod communicator;
mod config;
mod error;
mod serial;
mod sim;
mod transport;
mod units;

pub use communicator::{parse_reading, Communicator, Reply};
pub use config::{CommConfig, DEFAULT_PORT};
pub use error::{CommError, Result};
pub use serial::{SerialTransport, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
pub use sim::{SimulatedBus, SIM_TEMPERATURE};
pub use transport::{MemoryPeer, MemoryTransport, Responder, Transport};
pub use units::{
    from_wire_position, from_wire_velocity, to_wire_position, to_wire_velocity, PositionUnit,
    VelocityUnit,
};
