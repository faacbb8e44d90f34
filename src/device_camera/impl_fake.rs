use crate::device_camera::interface::{
    CameraOptions, CameraStream, DeviceCamera, Frame, FrameTracker,
};
use crate::error::LabError;
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeScene {
    /// Every pixel has this colour.
    #[cfg_attr(not(test), allow(dead_code))]
    Solid([u8; 3]),
    /// Random pixels around this colour.
    Noisy([u8; 3]),
}

/// Synthetic camera. The scene can be swapped at any time to simulate
/// pointing the camera at something else.
#[derive(Clone)]
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scene: Arc<Mutex<FakeScene>>,
    denied: bool,
    capture_error: Arc<Mutex<Option<LabError>>>,
    open_streams: Arc<AtomicUsize>,
    tracker: FrameTracker,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            scene: Arc::new(Mutex::new(FakeScene::Noisy([120, 140, 160]))),
            denied: false,
            capture_error: Arc::new(Mutex::new(None)),
            open_streams: Arc::new(AtomicUsize::new(0)),
            tracker: FrameTracker::new(),
        }
    }

    #[cfg(test)]
    pub fn with_scene(self, scene: FakeScene) -> Self {
        self.set_scene(scene);
        self
    }

    /// Every `open` fails as if the user refused camera access.
    #[cfg(test)]
    pub fn denied(mut self) -> Self {
        self.denied = true;
        self
    }

    #[cfg(test)]
    pub fn set_scene(&self, scene: FakeScene) {
        *self.scene.lock().unwrap_or_else(PoisonError::into_inner) = scene;
    }

    #[cfg(test)]
    pub fn set_capture_error(&self, error: Option<LabError>) {
        *self
            .capture_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    #[cfg(test)]
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn live_frames(&self) -> usize {
        self.tracker.live()
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self, options: &CameraOptions) -> Result<Box<dyn CameraStream>, LabError> {
        let _ = self.logger.info(&format!(
            "Opening camera {}x{} facing {:?}",
            options.width, options.height, options.facing_mode
        ));

        if self.denied {
            let _ = self.logger.warn("Camera permission denied");
            return Err(LabError::CameraDenied(
                "permission to use the camera was denied".to_string(),
            ));
        }

        self.open_streams.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(CameraStreamFake {
            logger: Arc::clone(&self.logger),
            scene: Arc::clone(&self.scene),
            capture_error: Arc::clone(&self.capture_error),
            open_streams: Arc::clone(&self.open_streams),
            tracker: self.tracker.clone(),
            width: options.width.max(1),
            height: options.height.max(1),
        }))
    }
}

struct CameraStreamFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scene: Arc<Mutex<FakeScene>>,
    capture_error: Arc<Mutex<Option<LabError>>>,
    open_streams: Arc<AtomicUsize>,
    tracker: FrameTracker,
    width: u32,
    height: u32,
}

impl CameraStreamFake {
    fn render(&self, scene: FakeScene) -> Result<RgbImage, LabError> {
        match scene {
            FakeScene::Solid(rgb) => Ok(RgbImage::from_pixel(self.width, self.height, Rgb(rgb))),
            FakeScene::Noisy(rgb) => {
                let jitter = Uniform::new_inclusive(-24i16, 24i16)
                    .map_err(|e| LabError::InferenceFailed(e.to_string()))?;
                let mut rng = rand::rng();
                Ok(RgbImage::from_fn(self.width, self.height, |_, _| {
                    Rgb(rgb.map(|channel| {
                        (channel as i16 + jitter.sample(&mut rng)).clamp(0, 255) as u8
                    }))
                }))
            }
        }
    }
}

impl CameraStream for CameraStreamFake {
    fn capture(&self) -> Result<Frame, LabError> {
        if let Some(error) = self
            .capture_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        let scene = *self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        let image = self.render(scene)?;
        Ok(self.tracker.issue(image))
    }

    fn live_frames(&self) -> usize {
        self.tracker.live()
    }
}

impl Drop for CameraStreamFake {
    fn drop(&mut self) {
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
        let _ = self.logger.info("Camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::interface::FacingMode;
    use crate::library::logger::impl_fake::LoggerFake;

    fn options() -> CameraOptions {
        CameraOptions {
            facing_mode: FacingMode::Environment,
            width: 8,
            height: 4,
        }
    }

    #[test]
    fn test_open_capture_release() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()))
            .with_scene(FakeScene::Solid([10, 20, 30]));

        let stream = camera.open(&options()).unwrap();
        assert_eq!(camera.open_streams(), 1);

        let frame = stream.capture().unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 4));
        assert_eq!(frame.image().get_pixel(3, 2), &Rgb([10, 20, 30]));
        assert_eq!(stream.live_frames(), 1);

        frame.dispose();
        assert_eq!(stream.live_frames(), 0);

        drop(stream);
        assert_eq!(camera.open_streams(), 0);
    }

    #[test]
    fn test_denied_camera() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new())).denied();

        let result = camera.open(&options());

        assert!(matches!(result, Err(LabError::CameraDenied(_))));
        assert_eq!(camera.open_streams(), 0);
    }

    #[test]
    fn test_noisy_scene_stays_near_base_colour() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()))
            .with_scene(FakeScene::Noisy([100, 100, 100]));
        let stream = camera.open(&options()).unwrap();

        let frame = stream.capture().unwrap();

        assert!(frame
            .image()
            .pixels()
            .all(|p| p.0.iter().all(|&c| (76..=124).contains(&c))));
    }
}
