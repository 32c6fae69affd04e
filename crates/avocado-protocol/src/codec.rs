//! Response decoding for actuator replies.
//!
//! The firmware ends each reply with the [`TERMINATOR`] byte. The transport
//! polls the line once per command with a short timeout and hands back
//! whatever arrived, either as raw bytes or already split into lines.
//!
//! Exactly one line per poll is the only unambiguous outcome. Zero lines means
//! the actuator has not answered yet. Two or more lines mean another
//! controller talked over the line, or an earlier terminator got lost; in
//! either case the decoder cannot tell which line answers the current command.

use crate::error::{ProtocolError, ProtocolResult};
use crate::frame::TERMINATOR;

/// Split raw bytes into lines.
///
/// A line ends after a [`TERMINATOR`] or `\n`, and keeps its delimiter. A
/// trailing fragment with no delimiter is returned as a final line. Lines made
/// only of `\r`/`\n` carry nothing and are dropped.
pub fn split_lines(raw: &[u8]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &byte) in raw.iter().enumerate() {
        if byte == TERMINATOR || byte == b'\n' {
            push_line(&mut lines, &raw[start..=i]);
            start = i + 1;
        }
    }
    if start < raw.len() {
        push_line(&mut lines, &raw[start..]);
    }

    lines
}

fn push_line(lines: &mut Vec<Vec<u8>>, line: &[u8]) {
    if !is_blank(line) {
        lines.push(line.to_vec());
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|&b| b == b'\r' || b == b'\n')
}

/// Decode the bytes collected by one poll.
///
/// Returns `Ok(None)` when nothing arrived, `Ok(Some(text))` for a single
/// reply, and [`ProtocolError::MultilineResponse`] for more than one.
pub fn decode(raw: &[u8]) -> ProtocolResult<Option<String>> {
    decode_lines(&split_lines(raw))
}

/// Decode the lines collected by one poll.
///
/// Use this when the transport already delimits lines itself. A line that
/// still contains terminator bytes (a garbled or partial frame) has each of
/// them replaced by a space, so the reply `ok\0` reads as `"ok "`.
pub fn decode_lines<L: AsRef<[u8]>>(lines: &[L]) -> ProtocolResult<Option<String>> {
    let mut lines = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line: &&[u8]| !is_blank(line));

    let line = match (lines.next(), lines.next()) {
        (None, _) => return Ok(None),
        (Some(line), None) => line,
        (Some(_), Some(_)) => {
            let count = 2 + lines.count();
            log::debug!("rejecting poll with {} lines", count);
            return Err(ProtocolError::MultilineResponse { lines: count });
        }
    };

    let line = strip_line_ending(line);
    let cleaned: Vec<u8> = line
        .iter()
        .map(|&b| if b == TERMINATOR { b' ' } else { b })
        .collect();

    Ok(Some(String::from_utf8_lossy(&cleaned).into_owned()))
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b"ok\0"), vec![b"ok\0".to_vec()]);
        assert_eq!(split_lines(b"ok\0ok\0"), vec![b"ok\0".to_vec(), b"ok\0".to_vec()]);
        assert_eq!(split_lines(b"a\r\nb"), vec![b"a\r\n".to_vec(), b"b".to_vec()]);
        assert!(split_lines(b"").is_empty());
        assert!(split_lines(b"\r\n\n").is_empty());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(b""), Ok(None));
        assert_eq!(decode_lines::<Vec<u8>>(&[]), Ok(None));
    }

    #[test]
    fn test_decode_single_line() {
        assert_eq!(decode(b"ok\0"), Ok(Some("ok ".to_string())));
        assert_eq!(decode(b"1.5707\0"), Ok(Some("1.5707 ".to_string())));
    }

    #[test]
    fn test_decode_strips_line_ending() {
        assert_eq!(decode_lines(&[b"ok\r\n".to_vec()]), Ok(Some("ok".to_string())));
    }

    #[test]
    fn test_decode_replaces_embedded_terminators() {
        let lines = vec![b"o\0k\0\n".to_vec()];
        assert_eq!(decode_lines(&lines), Ok(Some("o k ".to_string())));
    }

    #[test]
    fn test_decode_partial_line() {
        assert_eq!(decode(b"o"), Ok(Some("o".to_string())));
    }

    #[test]
    fn test_decode_two_lines_is_error() {
        assert_eq!(decode(b"ok\0ok\0"), Err(ProtocolError::MultilineResponse { lines: 2 }));

        let lines = vec![b"ok\0".to_vec(), b"ok\0".to_vec()];
        assert_eq!(decode_lines(&lines), Err(ProtocolError::MultilineResponse { lines: 2 }));
    }

    #[test]
    fn test_decode_counts_all_lines() {
        assert_eq!(decode(b"a\0b\0c\0"), Err(ProtocolError::MultilineResponse { lines: 3 }));
    }

    #[test]
    fn test_blank_lines_ignored() {
        assert_eq!(decode(b"ok\0\r\n"), Ok(Some("ok ".to_string())));
        let lines = vec![b"\r\n".to_vec(), b"ok\0".to_vec()];
        assert_eq!(decode_lines(&lines), Ok(Some("ok ".to_string())));
    }
}
