//! Wire format serialization and framing
//!
//! All TCP traffic uses length-prefixed frames:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ Postcard or JSON         │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Postcard is the default format; camera frames in JSON are close to the
//! frame-size cap and an order of magnitude slower to encode. JSON remains
//! available for debugging with a text client.
//!
//! Deserialization failures are reported to the caller, which logs and skips
//! the frame while keeping the connection open. Oversized frames close the
//! connection.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

/// Maximum frame size: 4 MB, comfortably above one camera frame
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Binary format using postcard - fast and compact
    #[default]
    Postcard,
    /// JSON format - human-readable for debugging
    Json,
}

/// Serializer that can handle both formats
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    /// Create a new serializer for the given format
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Serialize a message to bytes
    pub fn serialize<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => {
                postcard::to_allocvec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Deserialize bytes to a message
    pub fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            WireFormat::Postcard => {
                postcard::from_bytes(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }
}

/// Write one length-prefixed frame
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_SIZE {
        return Err(Error::FrameTooLarge {
            size: payload.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed frame
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    if len > MAX_FRAME_SIZE {
        return Err(Error::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComponentId;
    use crate::streaming::messages::{ClientMessage, ServerMessage};
    use duckie_messages::{Payload, Range, WheelSpeeds};
    use std::io::Cursor;

    #[test]
    fn test_frame_roundtrip() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, b"quack").unwrap();
        write_frame(&mut buffer, b"").unwrap();

        let mut cursor = Cursor::new(buffer);
        assert_eq!(read_frame(&mut cursor).unwrap(), b"quack");
        assert_eq!(read_frame(&mut cursor).unwrap(), b"");
    }

    #[test]
    fn test_oversized_frame_rejected() {
        // Forged header declaring a frame beyond the cap
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&((MAX_FRAME_SIZE as u32) + 1).to_be_bytes());

        let mut cursor = Cursor::new(buffer);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(Error::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn test_postcard_message_roundtrip() {
        let serializer = Serializer::new(WireFormat::Postcard);
        let msg = ClientMessage::Publish {
            component: ComponentId::Motors,
            payload: Payload::from(WheelSpeeds::new(0.5, -0.5)),
        };

        let bytes = serializer.serialize(&msg).unwrap();
        let decoded: ClientMessage = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_json_message_roundtrip() {
        let serializer = Serializer::new(WireFormat::Json);
        let msg = ServerMessage::Data {
            component: ComponentId::RangeFinder,
            payload: Payload::from(Range::out_of_range()),
        };

        let bytes = serializer.serialize(&msg).unwrap();
        let decoded: ServerMessage = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_cross_format_decode_fails() {
        let json = Serializer::new(WireFormat::Json);
        let postcard = Serializer::new(WireFormat::Postcard);

        let msg = ClientMessage::Start {
            component: ComponentId::Camera,
        };
        let bytes = json.serialize(&msg).unwrap();
        let decoded: Result<ClientMessage> = postcard.deserialize(&bytes);
        assert!(decoded.is_err());
    }
}
