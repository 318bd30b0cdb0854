//! Camera simulation
//!
//! Frames are either synthesized (a gradient scene with a moving bar, so
//! consecutive frames differ) or republished from a still image loaded from
//! disk.

use super::config::CameraSimConfig;
use crate::error::{Error, Result};
use duckie_messages::ImageFrame;

pub struct CameraSimulator {
    width: u32,
    height: u32,
    /// Preloaded BGR8 pixels when a source image is configured
    source: Option<Vec<u8>>,
}

impl CameraSimulator {
    pub fn new(config: &CameraSimConfig) -> Result<Self> {
        let (width, height, source) = match &config.source_image {
            Some(path) => {
                let rgb = image::open(path)
                    .map_err(|e| Error::Other(format!("failed to load camera source: {}", e)))?
                    .to_rgb8();
                let (w, h) = rgb.dimensions();
                // Robot cameras deliver BGR
                let mut bgr = Vec::with_capacity((w * h * 3) as usize);
                for pixel in rgb.pixels() {
                    bgr.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                }
                log::info!("Camera source loaded: {} ({}x{})", path.display(), w, h);
                (w, h, Some(bgr))
            }
            None => (config.width, config.height, None),
        };

        Ok(Self {
            width,
            height,
            source,
        })
    }

    /// Produce the frame for the given frame index
    pub fn generate(&self, frame_index: u64) -> ImageFrame {
        let data = match &self.source {
            Some(pixels) => pixels.clone(),
            None => self.synthetic(frame_index),
        };
        // Geometry is fixed at construction, so this cannot fail
        ImageFrame::new(self.width, self.height, data)
            .unwrap_or_else(|_| unreachable!("simulator frame geometry is fixed"))
    }

    /// Gradient scene with a bright vertical bar sliding one step per frame
    fn synthetic(&self, frame_index: u64) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let bar = (frame_index as usize * 8) % w.max(1);
        let mut data = vec![0u8; w * h * 3];

        for y in 0..h {
            let g = (y * 255 / h.max(1)) as u8;
            for x in 0..w {
                let i = (y * w + x) * 3;
                let b = (x * 255 / w.max(1)) as u8;
                let r = if x.abs_diff(bar) < 4 { 255 } else { 40 };
                data[i] = b;
                data[i + 1] = g;
                data[i + 2] = r;
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_frame_geometry() {
        let config = CameraSimConfig {
            width: 64,
            height: 48,
            ..CameraSimConfig::default()
        };
        let sim = CameraSimulator::new(&config).unwrap();

        let frame = sim.generate(0);
        assert_eq!(frame.shape(), (48, 64, 3));
        assert_eq!(frame.data().len(), 64 * 48 * 3);
    }

    #[test]
    fn test_consecutive_frames_differ() {
        let config = CameraSimConfig {
            width: 64,
            height: 48,
            ..CameraSimConfig::default()
        };
        let sim = CameraSimulator::new(&config).unwrap();

        assert_ne!(sim.generate(0), sim.generate(1));
    }

    #[test]
    fn test_missing_source_image_errors() {
        let config = CameraSimConfig {
            source_image: Some("/nonexistent/duck.png".into()),
            ..CameraSimConfig::default()
        };
        assert!(CameraSimulator::new(&config).is_err());
    }
}
