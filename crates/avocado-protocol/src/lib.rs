//! Avocado Actuator Bus Protocol
//!
//! This crate provides the wire contract for driving Avocado actuator
//! controllers that share one half-duplex serial line. Every controller on the
//! line has a numeric address, and the host talks to one controller at a time
//! using a short text protocol.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → actuator): `<address> <verb>[ <argument>]<checksum>\0`
//! - **Responses** (actuator → host): free-form text terminated with `\0`
//!
//! The checksum is an 8-bit substitution-table CRC over the verb and argument
//! text, rendered as decimal digits directly before the terminator.
//!
//! ```text
//! "1 set vel 50.0216\0"
//!  | |          |  |
//!  | |          |  +-- terminator (0x00)
//!  | |          +----- checksum of "set vel 50.0" (216)
//!  | +---------------- command body
//!  +------------------ actuator address
//! ```
//!
//! Only one response may arrive per poll. If the transport hands back more
//! than one line the decoder refuses to guess which one belongs to the command
//! that was just sent and reports [`ProtocolError::MultilineResponse`].
//!
//! # Example
//!
//! ```rust
//! use avocado_protocol::{decode, encode, Address, Command};
//!
//! let frame = encode(Address(1), &Command::SetVelocity(50.0));
//! assert_eq!(frame, b"1 set vel 50.0216\0");
//!
//! let reply = decode(b"ok\0")?;
//! assert_eq!(reply.as_deref(), Some("ok "));
//! # Ok::<(), avocado_protocol::ProtocolError>(())
//! ```

mod checksum;
mod codec;
mod commands;
mod error;
mod frame;

pub use checksum::*;
pub use codec::*;
pub use commands::*;
pub use error::*;
pub use frame::*;
