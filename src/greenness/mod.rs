//! Photo greenness scoring.
//!
//! A frame goes through three stages. The sampler restricts it to a region of interest.
//! The classifier gates and weights each pixel into a fresh accumulator. The normalizer
//! turns the totals into a bounded integer score.

pub mod classifier;
pub mod frame;
pub mod normalizer;
pub mod profile;
pub mod sampler;

pub use classifier::{PixelVerdict, ScoreAccumulator, Tier};
pub use frame::ImageFrame;
pub use normalizer::{GreennessScore, ScoreScale};
pub use profile::{ProfileKind, ScoringProfile};
pub use sampler::{MaskPolicy, Sampler};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Score a frame. Pure; an image with no admissible pixels scores 0.
pub fn analyze(frame: &ImageFrame, profile: &ScoringProfile) -> GreennessScore {
    let sampler = Sampler::new(frame, profile.mask);
    let acc = classifier::accumulate(sampler.pixels(), profile);
    let score = normalizer::normalize(&acc, profile.kind);

    log_debug!(
        "greenness {} from {} considered pixels ({}x{}, {:?})",
        score,
        acc.considered_pixels(),
        frame.width(),
        frame.height(),
        profile.kind
    );

    score
}
