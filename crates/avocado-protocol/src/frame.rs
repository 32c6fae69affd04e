//! Frame assembly for host → actuator commands.
//!
//! A frame is the address, a space, the command body, the checksum of the
//! body as decimal text, and a single terminator byte:
//!
//! ```text
//! +---------+----+----------------+----------+------+
//! | address | SP | verb [SP arg]  | checksum | 0x00 |
//! +---------+----+----------------+----------+------+
//! ```
//!
//! The checksum covers the body only; address and terminator are excluded.

use crate::checksum::checksum;
use crate::commands::{Address, Command};
use crate::error::{ProtocolError, ProtocolResult};
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

/// Byte that ends every frame and every response line.
pub const TERMINATOR: u8 = 0x00;

/// How the checksum byte is rendered in a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumEncoding {
    /// Plain decimal digits, one to three of them (`6`, `216`).
    ///
    /// This is what the firmware has always received. Because the digits sit
    /// directly against the argument, the split between argument and checksum
    /// is only recoverable with knowledge of the body.
    #[default]
    Decimal,
    /// Always three decimal digits (`006`, `216`).
    Padded,
}

impl ChecksumEncoding {
    /// Render a checksum value.
    pub fn render(&self, value: u8) -> String {
        match self {
            ChecksumEncoding::Decimal => value.to_string(),
            ChecksumEncoding::Padded => format!("{:03}", value),
        }
    }
}

/// Encode a command for `address` using the default checksum encoding.
pub fn encode(address: Address, command: &Command) -> Vec<u8> {
    encode_with(address, command, ChecksumEncoding::Decimal)
}

/// Encode a command for `address`.
///
/// Encoding never fails. Callers that must not send NaN or infinite
/// arguments check [`Command::validate`] first.
pub fn encode_with(address: Address, command: &Command, encoding: ChecksumEncoding) -> Vec<u8> {
    let body = command.to_body_string();
    let crc = encoding.render(checksum(0, body.as_bytes()));
    let address = address.to_string();

    let mut buf = BytesMut::with_capacity(address.len() + 1 + body.len() + crc.len() + 1);
    buf.put_slice(address.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(body.as_bytes());
    buf.put_slice(crc.as_bytes());
    buf.put_u8(TERMINATOR);

    log::trace!("encoded frame for {}: {:?}", address, String::from_utf8_lossy(&buf));
    buf.to_vec()
}

/// A frame split back into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Actuator address.
    pub address: Address,
    /// Decoded command.
    pub command: Command,
    /// Command body text exactly as it appeared on the wire.
    pub body: String,
    /// Checksum digits exactly as they appeared on the wire.
    pub checksum: String,
}

impl Frame {
    /// Split an encoded frame into address, body and checksum.
    ///
    /// With [`ChecksumEncoding::Decimal`] the checksum has no delimiter, so
    /// every split of the trailing digits is tried. A split counts when its
    /// digits match the checksum of the remaining body and that body parses.
    /// More than one such split means two different commands produce the
    /// same bytes (`"1 set pos 0.023255"` is both `0.023` with checksum 255
    /// and `0.0232` with checksum 55); that frame is rejected as ambiguous
    /// rather than guessed at.
    pub fn parse(bytes: &[u8], encoding: ChecksumEncoding) -> ProtocolResult<Frame> {
        let bytes = match bytes.split_last() {
            Some((&TERMINATOR, rest)) => rest,
            _ => return Err(ProtocolError::MalformedFrame("missing terminator".to_string())),
        };
        if bytes.contains(&TERMINATOR) {
            return Err(ProtocolError::MalformedFrame("embedded terminator".to_string()));
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|_| ProtocolError::MalformedFrame("frame is not valid text".to_string()))?;

        let (address, rest) = text
            .split_once(' ')
            .ok_or_else(|| ProtocolError::MalformedFrame("missing address".to_string()))?;
        let address = address
            .parse::<u16>()
            .map(Address)
            .map_err(|_| ProtocolError::MalformedFrame(format!("bad address '{}'", address)))?;

        let digits = rest.bytes().rev().take_while(u8::is_ascii_digit).count();
        let widths: Vec<usize> = match encoding {
            ChecksumEncoding::Padded => vec![3],
            ChecksumEncoding::Decimal => (1..=3).collect(),
        };

        let mut candidates = widths
            .into_iter()
            .filter(|&w| w <= digits)
            .filter_map(|width| {
                let (body, crc) = rest.split_at(rest.len() - width);
                if encoding.render(checksum(0, body.as_bytes())) != crc {
                    return None;
                }
                let command = Command::parse_body(body).ok()?;
                Some(Frame {
                    address,
                    command,
                    body: body.to_string(),
                    checksum: crc.to_string(),
                })
            });

        match (candidates.next(), candidates.next()) {
            (Some(frame), None) => Ok(frame),
            (Some(first), Some(second)) => Err(ProtocolError::MalformedFrame(format!(
                "ambiguous checksum split in '{}': '{}' or '{}'",
                rest, first.body, second.body
            ))),
            (None, _) => Err(ProtocolError::MalformedFrame(format!(
                "no valid checksum split in '{}'",
                rest
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_set_velocity() {
        let frame = encode(Address(1), &Command::SetVelocity(50.0));
        assert_eq!(frame, b"1 set vel 50.0216\0");
    }

    #[test]
    fn test_encode_get_position() {
        let frame = encode(Address(7), &Command::GetPosition);
        assert_eq!(frame, b"7 get pos6\0");
    }

    #[test]
    fn test_encode_padded() {
        let frame = encode_with(Address(7), &Command::GetPosition, ChecksumEncoding::Padded);
        assert_eq!(frame, b"7 get pos006\0");
    }

    #[test]
    fn test_single_terminator_last() {
        for cmd in Command::ALL {
            let frame = encode(Address(1337), &cmd);
            assert_eq!(frame.last(), Some(&TERMINATOR));
            assert_eq!(frame.iter().filter(|&&b| b == TERMINATOR).count(), 1);
        }
    }

    #[test]
    fn test_checksum_excludes_address() {
        let a = encode(Address(1), &Command::GetTemperature);
        let b = encode(Address(200), &Command::GetTemperature);
        assert!(a.ends_with(b"get tmp235\0"));
        assert!(b.ends_with(b"get tmp235\0"));
    }

    #[test]
    fn test_render_widths() {
        assert_eq!(ChecksumEncoding::Decimal.render(5), "5");
        assert_eq!(ChecksumEncoding::Decimal.render(50), "50");
        assert_eq!(ChecksumEncoding::Padded.render(5), "005");
        assert_eq!(ChecksumEncoding::Padded.render(255), "255");
    }

    #[test]
    fn test_parse_frame() {
        let frame = Frame::parse(b"1 set vel 50.0216\0", ChecksumEncoding::Decimal).unwrap();
        assert_eq!(frame.address, Address(1));
        assert_eq!(frame.command, Command::SetVelocity(50.0));
        assert_eq!(frame.body, "set vel 50.0");
        assert_eq!(frame.checksum, "216");
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        assert!(Frame::parse(b"1 set vel 50.0217\0", ChecksumEncoding::Decimal).is_err());
        assert!(Frame::parse(b"1 get pos6", ChecksumEncoding::Decimal).is_err());
        assert!(Frame::parse(b"x get pos6\0", ChecksumEncoding::Decimal).is_err());
    }

    #[test]
    fn test_parse_rejects_ambiguous_decimal_split() {
        let frame = encode(Address(1), &Command::SetPosition(0.023));
        assert_eq!(frame, b"1 set pos 0.023255\0");
        match Frame::parse(&frame, ChecksumEncoding::Decimal) {
            Err(ProtocolError::MalformedFrame(msg)) => assert!(msg.contains("ambiguous")),
            other => panic!("expected ambiguous frame, got {:?}", other),
        }

        let padded = encode_with(Address(1), &Command::SetPosition(0.023), ChecksumEncoding::Padded);
        let frame = Frame::parse(&padded, ChecksumEncoding::Padded).unwrap();
        assert_eq!(frame.command, Command::SetPosition(0.023));
    }

    #[test]
    fn test_checksum_encoding_serde() {
        let enc: ChecksumEncoding = serde_yaml::from_str("padded").unwrap();
        assert_eq!(enc, ChecksumEncoding::Padded);
        assert_eq!(ChecksumEncoding::default(), ChecksumEncoding::Decimal);
    }
}
