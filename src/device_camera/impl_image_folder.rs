use crate::device_camera::interface::{
    CameraOptions, CameraStream, DeviceCamera, Frame, FrameTracker,
};
use crate::error::LabError;
use crate::library::logger::interface::Logger;
use image::imageops::FilterType;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Plays back the images of a directory in file-name order like a slow video:
/// each image stays on screen for `interval`, whoever captures it.
pub struct DeviceCameraImageFolder {
    dir: PathBuf,
    interval: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraImageFolder {
    pub fn new(
        dir: impl Into<PathBuf>,
        interval: Duration,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            dir: dir.into(),
            interval,
            logger: logger.with_namespace("camera").with_namespace("image_folder"),
        }
    }

    fn list_images(&self) -> Result<Vec<PathBuf>, LabError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            LabError::CameraDenied(format!("cannot read {}: {}", self.dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| has_image_extension(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(LabError::CameraDenied(format!(
                "no images found in {}",
                self.dir.display()
            )));
        }

        Ok(paths)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Index of the image showing `elapsed` after the stream opened. A zero
/// interval holds the first image.
fn slot(elapsed: Duration, interval: Duration, len: usize) -> usize {
    if len == 0 || interval.is_zero() {
        return 0;
    }
    ((elapsed.as_millis() / interval.as_millis().max(1)) % len as u128) as usize
}

impl DeviceCamera for DeviceCameraImageFolder {
    fn open(&self, options: &CameraOptions) -> Result<Box<dyn CameraStream>, LabError> {
        let paths = self.list_images()?;
        let _ = self.logger.info(&format!(
            "Playing {} images from {}, {:?} each",
            paths.len(),
            self.dir.display(),
            self.interval
        ));

        Ok(Box::new(CameraStreamImageFolder {
            paths,
            interval: self.interval,
            opened: Instant::now(),
            width: options.width.max(1),
            height: options.height.max(1),
            current: Mutex::new(None),
            tracker: FrameTracker::new(),
        }))
    }
}

struct CameraStreamImageFolder {
    paths: Vec<PathBuf>,
    interval: Duration,
    opened: Instant,
    width: u32,
    height: u32,
    /// Last decoded image and its index.
    current: Mutex<Option<(usize, RgbImage)>>,
    tracker: FrameTracker,
}

impl CameraStreamImageFolder {
    fn decode(&self, index: usize) -> Result<RgbImage, LabError> {
        let path = &self.paths[index];
        let image = image::open(path)
            .map_err(|e| LabError::InferenceFailed(format!("{}: {}", path.display(), e)))?;
        Ok(image
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_rgb8())
    }
}

impl CameraStream for CameraStreamImageFolder {
    fn capture(&self) -> Result<Frame, LabError> {
        let index = slot(self.opened.elapsed(), self.interval, self.paths.len());
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        let image = match current.as_ref() {
            Some((cached, image)) if *cached == index => image.clone(),
            _ => {
                let image = self.decode(index)?;
                *current = Some((index, image.clone()));
                image
            }
        };

        Ok(self.tracker.issue(image))
    }

    fn live_frames(&self) -> usize {
        self.tracker.live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::interface::FacingMode;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::Rgb;

    const HOUR: Duration = Duration::from_secs(3600);

    fn options() -> CameraOptions {
        CameraOptions {
            facing_mode: FacingMode::User,
            width: 4,
            height: 4,
        }
    }

    fn red_and_blue() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]))
            .save(dir.path().join("a.png"))
            .unwrap();
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 255]))
            .save(dir.path().join("b.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn test_slot_holds_each_image_for_interval() {
        let interval = Duration::from_millis(100);

        assert_eq!(slot(Duration::from_millis(0), interval, 2), 0);
        assert_eq!(slot(Duration::from_millis(99), interval, 2), 0);
        assert_eq!(slot(Duration::from_millis(100), interval, 2), 1);
        assert_eq!(slot(Duration::from_millis(250), interval, 2), 0);
        assert_eq!(slot(Duration::from_millis(250), Duration::ZERO, 2), 0);
    }

    #[test]
    fn test_repeated_captures_show_the_same_image() {
        let dir = red_and_blue();
        let camera = DeviceCameraImageFolder::new(dir.path(), HOUR, Arc::new(LoggerFake::new()));
        let stream = camera.open(&options()).unwrap();

        let colours: Vec<Rgb<u8>> = (0..4)
            .map(|_| *stream.capture().unwrap().image().get_pixel(1, 1))
            .collect();

        assert_eq!(colours, vec![Rgb([255, 0, 0]); 4]);
        assert_eq!(stream.live_frames(), 0);
    }

    #[test]
    fn test_empty_folder_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let camera = DeviceCameraImageFolder::new(dir.path(), HOUR, Arc::new(LoggerFake::new()));

        assert!(matches!(
            camera.open(&options()),
            Err(LabError::CameraDenied(_))
        ));
    }
}
