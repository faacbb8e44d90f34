use crate::error::LabError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    User,
    Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraOptions {
    pub facing_mode: FacingMode,
    pub width: u32,
    pub height: u32,
}

/// Counts frames handed out by a stream that have not been released yet.
#[derive(Debug, Clone, Default)]
pub struct FrameTracker {
    live: Arc<AtomicUsize>,
}

impl FrameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, image: RgbImage) -> Frame {
        self.live.fetch_add(1, Ordering::SeqCst);
        Frame {
            image,
            live: Arc::clone(&self.live),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// A captured camera frame. The buffer is released when the frame is
/// disposed or dropped, whichever comes first.
#[derive(Debug)]
pub struct Frame {
    image: RgbImage,
    live: Arc<AtomicUsize>,
}

impl Frame {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dispose(self) {}
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// An open capture stream. Dropping it releases the camera.
pub trait CameraStream: Send {
    fn capture(&self) -> Result<Frame, LabError>;
    /// Frames captured from this stream that are still held somewhere.
    fn live_frames(&self) -> usize;
}

pub trait DeviceCamera {
    fn open(&self, options: &CameraOptions) -> Result<Box<dyn CameraStream>, LabError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_released_on_dispose_and_drop() {
        let tracker = FrameTracker::new();

        let first = tracker.issue(RgbImage::new(2, 2));
        let second = tracker.issue(RgbImage::new(2, 2));
        assert_eq!(tracker.live(), 2);

        first.dispose();
        assert_eq!(tracker.live(), 1);

        drop(second);
        assert_eq!(tracker.live(), 0);
    }
}
