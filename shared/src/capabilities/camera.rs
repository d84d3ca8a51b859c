//! Photo evidence picker.
//!
//! The shell opens the camera or gallery, reads the chosen file and returns it
//! as an embeddable `data:` URL. The core only checks that the reference is an
//! image it can hand back to the shell for preview.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Heic,
    WebP,
    Gif,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Heic => "image/heic",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/heic" => Some(ImageFormat::Heic),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickConfig {
    /// Accept filter passed to the platform picker.
    pub accept: String,
    pub allow_camera: bool,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            accept: "image/*".to_string(),
            allow_camera: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraOperation {
    PickPhoto { config: PickConfig },
}

impl Operation for CameraOperation {
    type Output = CameraResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub data_url: String,
    pub mime_type: String,
    pub file_size: u64,
}

/// A validated, embeddable image reference.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Accepts `data:image/...` URLs only.
    pub fn parse(data_url: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(data_url)
            .map_err(|e| ValidationError::InvalidPhoto(format!("not a url: {e}")))?;
        if url.scheme() != "data" {
            return Err(ValidationError::InvalidPhoto(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        let media_type = url.path().split([';', ',']).next().unwrap_or_default();
        if ImageFormat::from_mime_type(media_type).is_none() {
            return Err(ValidationError::InvalidPhoto(format!(
                "unsupported media type `{media_type}`"
            )));
        }
        Ok(Self(data_url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Data URLs are large; keep them out of logs.
impl std::fmt::Debug for PhotoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PhotoRef({} bytes)", self.0.len())
    }
}

impl TryFrom<&CapturedPhoto> for PhotoRef {
    type Error = ValidationError;

    fn try_from(photo: &CapturedPhoto) -> Result<Self, Self::Error> {
        if ImageFormat::from_mime_type(&photo.mime_type).is_none() {
            return Err(ValidationError::InvalidPhoto(format!(
                "unsupported media type `{}`",
                photo.mime_type
            )));
        }
        PhotoRef::parse(&photo.data_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraOutput {
    Photo(CapturedPhoto),
    Cancelled,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("could not read file: {reason}")]
    ReadFailed { reason: String },
}

pub type CameraResult = Result<CameraOutput, CameraError>;

pub struct Camera<Ev> {
    context: CapabilityContext<CameraOperation, Ev>,
}

impl<Ev> Capability<Ev> for Camera<Ev> {
    type Operation = CameraOperation;
    type MappedSelf<MappedEv> = Camera<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Camera::new(self.context.map_event(f))
    }
}

impl<Ev> Camera<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<CameraOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn pick_photo<F>(&self, config: PickConfig, callback: F)
    where
        F: FnOnce(CameraResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(CameraOperation::PickPhoto { config })
                .await;
            ctx.update_app(callback(result));
        });
    }
}
