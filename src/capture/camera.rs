use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
        Mutex,
    },
    thread::{
        self,
        JoinHandle,
    },
};

use nokhwa::{
    pixel_format::RgbFormat,
    utils::{
        ApiBackend,
        RequestedFormat,
        RequestedFormatType,
    },
    Camera,
};

use crate::{
    capture::CapturedImage,
    core::NutrilensError,
};

#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Prefers a rear-facing device where the platform exposes one by name,
/// otherwise the first enumerated device.
pub fn preferred_index(names: &[String]) -> Option<usize> {
    const REAR_HINTS: [&str; 3] = ["back", "rear", "environment"];

    names
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            REAR_HINTS.iter().any(|hint| name.contains(hint))
        })
        .or(if names.is_empty() { None } else { Some(0) })
}

/// An exclusively-owned capture handle. Opening spawns a grab thread that
/// keeps the newest frame in a slot; dropping the session stops the thread
/// and releases the device. Every exit path of the camera surface — snap,
/// cancel, failure, teardown — ends in this `Drop`.
pub struct CameraSession {
    stop: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<CameraFrame>>>,
    failure: Arc<Mutex<Option<String>>>,
    join_handle: Option<JoinHandle<()>>,
}

impl CameraSession {
    pub fn open() -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let latest = Arc::new(Mutex::new(None));
        let failure = Arc::new(Mutex::new(None));

        let join_handle = {
            let stop = Arc::clone(&stop);
            let latest = Arc::clone(&latest);
            let failure = Arc::clone(&failure);
            thread::spawn(move || grab_loop(&stop, &latest, &failure))
        };

        Self { stop, latest, failure, join_handle: Some(join_handle) }
    }

    pub fn latest_frame(&self) -> Option<CameraFrame> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    /// Device or permission failure reported by the grab thread, if any.
    pub fn failure(&self) -> Option<String> {
        self.failure.lock().ok().and_then(|slot| slot.clone())
    }

    /// Encodes the newest frame as the captured still.
    pub fn snap(&self) -> Result<CapturedImage, NutrilensError> {
        let frame = self
            .latest_frame()
            .ok_or_else(|| NutrilensError::CameraUnavailable("no frame received yet".into()))?;
        CapturedImage::from_rgb(frame.width, frame.height, frame.rgb)
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn grab_loop(
    stop: &AtomicBool,
    latest: &Mutex<Option<CameraFrame>>,
    failure: &Mutex<Option<String>>,
) {
    let fail = |message: String| {
        eprintln!("Camera failure: {}", message);
        if let Ok(mut slot) = failure.lock() {
            *slot = Some(message);
        }
    };

    let devices = match nokhwa::query(ApiBackend::Auto) {
        Ok(devices) => devices,
        Err(e) => return fail(e.to_string()),
    };

    let names: Vec<String> = devices.iter().map(|d| d.human_name()).collect();
    let Some(pick) = preferred_index(&names) else {
        return fail("no capture device found".to_string());
    };
    println!("Opening camera: {}", names[pick]);

    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = match Camera::new(devices[pick].index().clone(), requested) {
        Ok(camera) => camera,
        Err(e) => return fail(e.to_string()),
    };
    if let Err(e) = camera.open_stream() {
        return fail(e.to_string());
    }

    while !stop.load(Ordering::Relaxed) {
        let frame = match camera.frame() {
            Ok(frame) => frame,
            Err(e) => {
                fail(e.to_string());
                break;
            }
        };

        match frame.decode_image::<RgbFormat>() {
            Ok(decoded) => {
                let (width, height) = (decoded.width(), decoded.height());
                if let Ok(mut slot) = latest.lock() {
                    *slot = Some(CameraFrame { width, height, rgb: decoded.into_raw() });
                }
            }
            Err(e) => {
                fail(e.to_string());
                break;
            }
        }
    }

    let _ = camera.stop_stream();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_rear_facing_names() {
        let names = vec!["Integrated Webcam".to_string(), "USB Rear Camera".to_string()];
        assert_eq!(preferred_index(&names), Some(1));

        let names = vec!["Back Camera".to_string(), "Front Camera".to_string()];
        assert_eq!(preferred_index(&names), Some(0));
    }

    #[test]
    fn falls_back_to_the_first_device() {
        let names = vec!["Webcam A".to_string(), "Webcam B".to_string()];
        assert_eq!(preferred_index(&names), Some(0));
    }

    #[test]
    fn no_devices_means_none() {
        assert_eq!(preferred_index(&[]), None);
    }
}
