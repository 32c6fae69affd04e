//! Commands that can be sent to an actuator controller.
//!
//! Every command is a verb token, optionally followed by one numeric
//! argument:
//! - Set commands: `set pos <rad>`, `set vel <rps>`, `set cur <A>`
//! - Get commands: `get pos`, `get vel`, `get cur`, `get tmp`

use crate::error::{ProtocolError, ProtocolResult};
use std::fmt;

/// Address of one actuator controller on the shared line.
///
/// Addresses are not checked against any registry; keeping them unique on a
/// line is up to whoever wires the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u16);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Address(value)
    }
}

/// Commands understood by the actuator firmware.
///
/// Set arguments are already in wire units (radians, revolutions per second,
/// amperes). Unit conversion happens before a command is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Rotate to an absolute position in radians.
    SetPosition(f64),
    /// Rotate continuously at a velocity in revolutions per second.
    SetVelocity(f64),
    /// Drive the motor at a current in amperes.
    SetCurrent(f64),
    /// Read the current position.
    GetPosition,
    /// Read the current velocity.
    GetVelocity,
    /// Read the motor current.
    GetCurrent,
    /// Read the controller temperature.
    GetTemperature,
}

impl Command {
    /// Every command kind, with a zero argument for the set commands.
    pub const ALL: [Command; 7] = [
        Command::SetPosition(0.0),
        Command::SetVelocity(0.0),
        Command::SetCurrent(0.0),
        Command::GetPosition,
        Command::GetVelocity,
        Command::GetCurrent,
        Command::GetTemperature,
    ];

    /// Get the verb token used on the wire.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::SetPosition(_) => "set pos",
            Command::SetVelocity(_) => "set vel",
            Command::SetCurrent(_) => "set cur",
            Command::GetPosition => "get pos",
            Command::GetVelocity => "get vel",
            Command::GetCurrent => "get cur",
            Command::GetTemperature => "get tmp",
        }
    }

    /// Get the argument carried by a set command.
    pub fn argument(&self) -> Option<f64> {
        match *self {
            Command::SetPosition(v) | Command::SetVelocity(v) | Command::SetCurrent(v) => Some(v),
            Command::GetPosition
            | Command::GetVelocity
            | Command::GetCurrent
            | Command::GetTemperature => None,
        }
    }

    /// Check that the argument, if any, can be sent.
    ///
    /// NaN and infinities have no agreed rendering on the wire, so they are
    /// refused here rather than encoded.
    pub fn validate(&self) -> ProtocolResult<()> {
        match self.argument() {
            Some(value) if !value.is_finite() => Err(ProtocolError::NonFiniteArgument {
                verb: self.verb(),
                value,
            }),
            _ => Ok(()),
        }
    }

    /// Get the command body: verb plus argument, without address, checksum or
    /// terminator. This is the text the checksum covers.
    pub fn to_body_string(&self) -> String {
        match self.argument() {
            Some(value) => format!("{} {}", self.verb(), format_argument(value)),
            None => self.verb().to_string(),
        }
    }

    /// Parse a command body back into a command.
    pub fn parse_body(body: &str) -> ProtocolResult<Command> {
        let malformed = || ProtocolError::MalformedFrame(format!("unknown command body '{}'", body));

        let (verb, arg) = match body.match_indices(' ').nth(1) {
            Some((idx, _)) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };

        let value = match arg {
            Some(text) => Some(text.parse::<f64>().map_err(|_| malformed())?),
            None => None,
        };

        match (verb, value) {
            ("set pos", Some(v)) => Ok(Command::SetPosition(v)),
            ("set vel", Some(v)) => Ok(Command::SetVelocity(v)),
            ("set cur", Some(v)) => Ok(Command::SetCurrent(v)),
            ("get pos", None) => Ok(Command::GetPosition),
            ("get vel", None) => Ok(Command::GetVelocity),
            ("get cur", None) => Ok(Command::GetCurrent),
            ("get tmp", None) => Ok(Command::GetTemperature),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_body_string())
    }
}

/// Render a set argument.
///
/// Uses the shortest representation that reads back to the same value and
/// always keeps a fractional part (`50.0`, not `50`). The output never
/// depends on locale.
pub fn format_argument(value: f64) -> String {
    format!("{:?}", value)
}
