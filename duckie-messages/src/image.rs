//! Camera image frames

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of channels in a camera frame (BGR8)
pub const CHANNELS: usize = 3;

/// A BGR8 camera frame.
///
/// Pixel data is stored row-major, three bytes per pixel in blue-green-red
/// order (the order the robot camera delivers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageFrame {
    /// Create a frame, validating that the buffer matches the geometry
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::ImageGeometry {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Shape as `(height, width, channels)`, the tuple demos print
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.height, self.width, CHANNELS as u32)
    }

    /// Raw BGR8 pixel bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_geometry_checked() {
        assert!(ImageFrame::new(4, 2, vec![0u8; 24]).is_ok());

        let err = ImageFrame::new(4, 2, vec![0u8; 23]).unwrap_err();
        assert_eq!(
            err,
            Error::ImageGeometry {
                expected: 24,
                actual: 23
            }
        );
    }

    #[test]
    fn test_shape_order() {
        let frame = ImageFrame::new(640, 480, vec![0u8; 640 * 480 * 3]).unwrap();
        assert_eq!(frame.shape(), (480, 640, 3));
    }
}
