use serde::{Deserialize, Serialize};

use super::frame::ImageFrame;

/// Which part of the frame reaches the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MaskPolicy {
    /// Every pixel.
    Full,
    /// A centred circle of radius `floor(min(w, h) / divisor)`. A divisor that is
    /// not a positive finite number keeps every pixel.
    Circle { divisor: f64 },
}

impl MaskPolicy {
    /// Wide circle that only drops the extreme corners.
    pub const WIDE_CIRCLE: MaskPolicy = MaskPolicy::Circle { divisor: 1.5 };
    /// Radius equal to the short side of the frame.
    pub const SHORT_SIDE_CIRCLE: MaskPolicy = MaskPolicy::Circle { divisor: 1.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledPixel {
    pub x: u32,
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy)]
struct Circle {
    cx: i64,
    cy: i64,
    radius_sq: i64,
}

impl Circle {
    fn contains(&self, x: u32, y: u32) -> bool {
        let dx = x as i64 - self.cx;
        let dy = y as i64 - self.cy;
        dx * dx + dy * dy <= self.radius_sq
    }
}

/// Restricts a frame to its region of interest.
pub struct Sampler<'a> {
    frame: &'a ImageFrame,
    circle: Option<Circle>,
}

impl<'a> Sampler<'a> {
    pub fn new(frame: &'a ImageFrame, mask: MaskPolicy) -> Self {
        let circle = match mask {
            MaskPolicy::Full => None,
            MaskPolicy::Circle { divisor } if divisor.is_finite() && divisor > 0.0 => {
                let shorter = frame.width().min(frame.height()) as f64;
                // no pixel is further than width + height from the centre
                let reach = frame.width() as i64 + frame.height() as i64;
                let radius = ((shorter / divisor).floor() as i64).min(reach);
                Some(Circle {
                    cx: (frame.width() / 2) as i64,
                    cy: (frame.height() / 2) as i64,
                    radius_sq: radius.saturating_mul(radius),
                })
            }
            MaskPolicy::Circle { .. } => None,
        };
        Self { frame, circle }
    }

    /// A fresh pass over the masked pixels. Call again to restart.
    pub fn pixels(&self) -> SampledPixels<'a> {
        SampledPixels {
            frame: self.frame,
            circle: self.circle,
            x: 0,
            y: 0,
        }
    }
}

pub struct SampledPixels<'a> {
    frame: &'a ImageFrame,
    circle: Option<Circle>,
    x: u32,
    y: u32,
}

impl Iterator for SampledPixels<'_> {
    type Item = SampledPixel;

    fn next(&mut self) -> Option<Self::Item> {
        let (width, height) = (self.frame.width(), self.frame.height());
        if width == 0 {
            return None;
        }

        while self.y < height {
            let (x, y) = (self.x, self.y);
            self.x += 1;
            if self.x == width {
                self.x = 0;
                self.y += 1;
            }

            if let Some(circle) = &self.circle {
                if !circle.contains(x, y) {
                    continue;
                }
            }

            let [r, g, b] = self.frame.rgb_at(x, y);
            return Some(SampledPixel { x, y, r, g, b });
        }

        None
    }
}
