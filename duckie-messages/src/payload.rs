//! Untyped payload union carried by backends and the wire protocol

use crate::error::Error;
use crate::{EncoderTicks, ImageFrame, LedsPattern, Range, WheelSpeeds};
use serde::{Deserialize, Serialize};

/// Any message a component driver can publish or receive.
///
/// Backends and transports move `Payload` values around without caring which
/// component they belong to; typed driver handles convert back with
/// `TryFrom`, and a failed conversion identifies a payload routed to the
/// wrong subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    WheelSpeeds(WheelSpeeds),
    Leds(LedsPattern),
    Image(ImageFrame),
    Range(Range),
    Ticks(EncoderTicks),
}

impl Payload {
    /// Stable name of the payload kind, used in logs and mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::WheelSpeeds(_) => "wheel_speeds",
            Payload::Leds(_) => "leds_pattern",
            Payload::Image(_) => "image",
            Payload::Range(_) => "range",
            Payload::Ticks(_) => "encoder_ticks",
        }
    }
}

macro_rules! payload_conversions {
    ($variant:ident, $ty:ty, $kind:literal) => {
        impl From<$ty> for Payload {
            fn from(value: $ty) -> Payload {
                Payload::$variant(value)
            }
        }

        impl TryFrom<Payload> for $ty {
            type Error = Error;

            fn try_from(payload: Payload) -> Result<$ty, Error> {
                match payload {
                    Payload::$variant(value) => Ok(value),
                    other => Err(Error::PayloadKind {
                        expected: $kind,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

payload_conversions!(WheelSpeeds, WheelSpeeds, "wheel_speeds");
payload_conversions!(Leds, LedsPattern, "leds_pattern");
payload_conversions!(Image, ImageFrame, "image");
payload_conversions!(Range, Range, "range");
payload_conversions!(Ticks, EncoderTicks, "encoder_ticks");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_conversion() {
        let speeds = WheelSpeeds::new(0.5, 0.5);
        let payload = Payload::from(speeds);
        assert_eq!(payload.kind(), "wheel_speeds");
        assert_eq!(WheelSpeeds::try_from(payload).unwrap(), speeds);
    }

    #[test]
    fn test_kind_mismatch() {
        let payload = Payload::from(Range::meters(0.4));
        let err = ImageFrame::try_from(payload).unwrap_err();
        assert_eq!(
            err,
            Error::PayloadKind {
                expected: "image",
                actual: "range",
            }
        );
    }

    #[test]
    fn test_ticks_conversion() {
        let payload = Payload::from(EncoderTicks::new(42));
        assert_eq!(EncoderTicks::try_from(payload).unwrap().count, 42);
    }
}
