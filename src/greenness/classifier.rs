use super::{
    profile::{ProfileKind, ScoringProfile},
    sampler::SampledPixel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    SuperEmerald,
    Emerald,
    /// Passed the gates without matching a green band. Counted, scores nothing.
    Untiered,
    /// Legacy profile: the raw green channel is the contribution.
    RawGreen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelVerdict {
    Rejected,
    Counted { tier: Tier, contribution: f64 },
}

/// `(max - min) / max` over the three channels, 0 for black.
pub fn saturation(r: u8, g: u8, b: u8) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0 {
        0.0
    } else {
        (max - min) as f64 / max as f64
    }
}

pub fn classify(pixel: &SampledPixel, profile: &ScoringProfile) -> PixelVerdict {
    let SampledPixel { r, g, b, .. } = *pixel;

    if profile.white_gate.rejects(r, g, b) {
        return PixelVerdict::Rejected;
    }

    if profile.kind == ProfileKind::Legacy {
        return PixelVerdict::Counted {
            tier: Tier::RawGreen,
            contribution: g as f64,
        };
    }

    if let Some(gate) = &profile.dominance {
        if !gate.admits(r, g, b) {
            return PixelVerdict::Rejected;
        }
    }

    let sat = saturation(r, g, b);
    let penalties = &profile.penalties;
    let mut weight = 1.0;
    if sat < penalties.pale_saturation {
        weight -= penalties.pale;
    }
    if r > penalties.yellow_red_floor && (g as i16 - r as i16) < penalties.yellow_green_gap {
        weight -= penalties.yellow;
    }

    let (tier, contribution) = if profile.super_emerald.matches(r, g, b, sat) {
        (Tier::SuperEmerald, profile.super_emerald.multiplier * weight)
    } else if profile.emerald.matches(r, g, b, sat) {
        (Tier::Emerald, profile.emerald.multiplier * weight)
    } else {
        (Tier::Untiered, 0.0)
    };

    PixelVerdict::Counted { tier, contribution }
}

/// Running totals for one analysis. Never shared between analyses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    considered_pixels: u64,
    weighted_green: f64,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: PixelVerdict) {
        if let PixelVerdict::Counted { contribution, .. } = verdict {
            self.considered_pixels += 1;
            self.weighted_green += contribution;
        }
    }

    pub fn considered_pixels(&self) -> u64 {
        self.considered_pixels
    }

    pub fn weighted_green(&self) -> f64 {
        self.weighted_green
    }
}

pub fn accumulate<I>(pixels: I, profile: &ScoringProfile) -> ScoreAccumulator
where
    I: IntoIterator<Item = SampledPixel>,
{
    let mut acc = ScoreAccumulator::new();
    for pixel in pixels {
        acc.record(classify(&pixel, profile));
    }
    acc
}
