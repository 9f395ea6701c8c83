use std::{
    fs,
    io::Cursor,
    path::Path,
};

use base64::{
    engine::general_purpose::STANDARD as BASE64,
    Engine as _,
};
use image::{
    ImageFormat,
    RgbImage,
    RgbaImage,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::NutrilensError;

pub mod camera;

pub use camera::CameraSession;

/// One meal picture, already encoded (PNG or JPEG), however it was acquired
/// — file dialog, drag and drop, clipboard paste or camera snap. This is the
/// single representation the rest of the app passes around; the bytes travel
/// base64-encoded when serialized or put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    #[serde(with = "base64_bytes")]
    bytes: Vec<u8>,
    mime: String,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>, mime: &str) -> Self {
        Self { bytes, mime: mime.to_string() }
    }

    /// Accepts already-encoded bytes, rejecting anything empty or that does
    /// not decode as an image.
    pub fn from_encoded_bytes(bytes: Vec<u8>, mime: &str) -> Result<Self, NutrilensError> {
        if bytes.is_empty() {
            return Err(NutrilensError::InvalidImage);
        }
        image::load_from_memory(&bytes).map_err(|_| NutrilensError::InvalidImage)?;
        Ok(Self::new(bytes, mime))
    }

    pub fn from_path(path: &Path) -> Result<Self, NutrilensError> {
        let bytes = fs::read(path)?;
        Self::from_encoded_bytes(bytes, mime_for_path(path))
    }

    /// The first image-typed clipboard entry, or `None` when the clipboard
    /// holds no image — the caller treats that as a no-op, not an error.
    pub fn from_clipboard() -> Result<Option<Self>, NutrilensError> {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                eprintln!("Clipboard unavailable: {}", e);
                return Ok(None);
            }
        };

        let pasted = match clipboard.get_image() {
            Ok(image) => image,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => {
                eprintln!("Clipboard read failed: {}", e);
                return Ok(None);
            }
        };

        let rgba = RgbaImage::from_raw(
            pasted.width as u32,
            pasted.height as u32,
            pasted.bytes.into_owned(),
        )
        .ok_or(NutrilensError::InvalidImage)?;

        Ok(Some(Self::encode_png(image::DynamicImage::ImageRgba8(rgba))?))
    }

    /// Raw RGB pixels (camera frames) to an encoded PNG.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, NutrilensError> {
        let rgb = RgbImage::from_raw(width, height, rgb).ok_or(NutrilensError::InvalidImage)?;
        Self::encode_png(image::DynamicImage::ImageRgb8(rgb))
    }

    fn encode_png(image: image::DynamicImage) -> Result<Self, NutrilensError> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png)?;
        Ok(Self::new(out.into_inner(), "image/png"))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

mod base64_bytes {
    use base64::{
        engine::general_purpose::STANDARD,
        Engine as _,
    };
    use serde::{
        Deserialize,
        Deserializer,
        Serializer,
    };

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
