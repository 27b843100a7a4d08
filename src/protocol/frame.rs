//! Length-prefixed frame codec
//!
//! Frames are textual: a decimal byte length, a colon, then the body
//! (`5:hello`). The decoder is incremental so partial socket reads are
//! fine; frame interpretation lives in [`crate::protocol::telemetry`].

use crate::common::{PlannerError, PlannerResult};

/// Incremental decoder for length-prefixed frames.
#[derive(Debug, Default)]
pub struct FrameCodec {
    buf: Vec<u8>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes to the decode buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete frame body, if one is buffered.
    ///
    /// A corrupt length prefix poisons the whole stream, so it is an error
    /// rather than a skipped frame.
    pub fn next_frame(&mut self) -> PlannerResult<Option<String>> {
        let colon = match self.buf.iter().position(|&b| b == b':') {
            Some(pos) => pos,
            None => {
                // an absurdly long run without a separator is not a prefix
                if self.buf.len() > 20 {
                    return Err(PlannerError::Protocol(
                        "length prefix missing separator".to_string(),
                    ));
                }
                return Ok(None);
            }
        };

        let prefix = std::str::from_utf8(&self.buf[..colon])
            .ok()
            .and_then(|s| s.parse::<usize>().ok());
        let len = match prefix {
            Some(len) => len,
            None => {
                return Err(PlannerError::Protocol(format!(
                    "bad length prefix: {:?}",
                    String::from_utf8_lossy(&self.buf[..colon])
                )))
            }
        };

        let end = colon + 1 + len;
        if self.buf.len() < end {
            return Ok(None);
        }

        let body = self.buf[colon + 1..end].to_vec();
        self.buf.drain(..end);
        String::from_utf8(body)
            .map(Some)
            .map_err(|_| PlannerError::Protocol("frame body is not valid UTF-8".to_string()))
    }
}

/// Encode a frame body for the wire.
pub fn encode_frame(body: &str) -> String {
    format!("{}:{}", body.len(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_prefixes_byte_length() {
        assert_eq!(encode_frame("hello"), "5:hello");
        assert_eq!(encode_frame(""), "0:");
    }

    #[test]
    fn test_decode_single_frame() {
        let mut codec = FrameCodec::new();
        codec.extend(b"5:hello");
        assert_eq!(codec.next_frame().unwrap(), Some("hello".to_string()));
        assert_eq!(codec.next_frame().unwrap(), None);
    }

    #[test]
    fn test_decode_across_partial_reads() {
        let mut codec = FrameCodec::new();
        codec.extend(b"11:he");
        assert_eq!(codec.next_frame().unwrap(), None);
        codec.extend(b"llo world");
        assert_eq!(codec.next_frame().unwrap(), Some("hello world".to_string()));
    }

    #[test]
    fn test_decode_back_to_back_frames() {
        let mut codec = FrameCodec::new();
        codec.extend(b"2:ab3:cde");
        assert_eq!(codec.next_frame().unwrap(), Some("ab".to_string()));
        assert_eq!(codec.next_frame().unwrap(), Some("cde".to_string()));
        assert_eq!(codec.next_frame().unwrap(), None);
    }

    #[test]
    fn test_roundtrip() {
        let mut codec = FrameCodec::new();
        let body = r#"42["telemetry",{"x":1.0}]"#;
        codec.extend(encode_frame(body).as_bytes());
        assert_eq!(codec.next_frame().unwrap(), Some(body.to_string()));
    }

    #[test]
    fn test_bad_prefix_is_an_error() {
        let mut codec = FrameCodec::new();
        codec.extend(b"abc:xyz");
        assert!(matches!(codec.next_frame(), Err(PlannerError::Protocol(_))));
    }

    #[test]
    fn test_runaway_prefix_is_an_error() {
        let mut codec = FrameCodec::new();
        codec.extend(b"012345678901234567890123");
        assert!(matches!(codec.next_frame(), Err(PlannerError::Protocol(_))));
    }
}
