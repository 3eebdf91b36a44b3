//! Camera acquisition for live frames.

use anyhow::Result;

use crate::{error::MatchaError, greenness::ImageFrame, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Frame size used when a camera does not report its dimensions.
pub const DEFAULT_CAPTURE_SIZE: (u32, u32) = (320, 240);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera on phones.
    Environment,
    Any,
}

pub trait FrameSource: Send {
    /// `None` until the stream has reported its metadata.
    fn dimensions(&self) -> Option<(u32, u32)>;
    fn grab(&mut self, width: u32, height: u32) -> Result<ImageFrame>;
}

pub trait CameraProvider {
    fn open(&self, facing: Facing) -> Result<Box<dyn FrameSource>>;
}

/// Prefer the environment-facing camera, fall back to any camera.
pub fn acquire_camera(provider: &dyn CameraProvider) -> Result<Box<dyn FrameSource>, MatchaError> {
    match provider.open(Facing::Environment) {
        Ok(source) => return Ok(source),
        Err(err) => log_warn!("Environment camera unavailable, trying any camera: {err:#}"),
    }

    provider.open(Facing::Any).map_err(|err| {
        log_warn!("No camera available: {err:#}");
        MatchaError::CameraUnavailable
    })
}

pub fn capture_frame(source: &mut dyn FrameSource) -> Result<ImageFrame, MatchaError> {
    let (width, height) = source.dimensions().unwrap_or(DEFAULT_CAPTURE_SIZE);
    let frame = source
        .grab(width, height)
        .map_err(MatchaError::invalid_image)?;
    log_info!("Captured {}x{} frame", frame.width(), frame.height());
    Ok(frame)
}
