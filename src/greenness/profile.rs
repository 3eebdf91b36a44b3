//! Tunable thresholds for the greenness heuristics.

use serde::{Deserialize, Serialize};

use super::{normalizer::ScoreScale, sampler::MaskPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileKind {
    /// Gated, saturation-weighted two-tier scoring on a 0–100 scale.
    Emerald,
    /// Average green channel of non-white pixels on a 0–10 scale.
    Legacy,
}

impl ProfileKind {
    pub fn scale(&self) -> ScoreScale {
        match self {
            ProfileKind::Emerald => ScoreScale::OutOfHundred,
            ProfileKind::Legacy => ScoreScale::OutOfTen,
        }
    }
}

/// Highlight rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteGate {
    /// Reject when every channel is strictly above the threshold.
    AllAbove(u8),
    /// Reject when no channel is strictly below the threshold.
    NoneBelow(u8),
}

impl WhiteGate {
    pub fn rejects(&self, r: u8, g: u8, b: u8) -> bool {
        match *self {
            WhiteGate::AllAbove(t) => r > t && g > t && b > t,
            WhiteGate::NoneBelow(t) => !(r < t || g < t || b < t),
        }
    }
}

/// Stage-1 gates of the emerald profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominanceGate {
    /// Green must beat red and blue by more than this.
    pub margin: u8,
    pub green_floor: u8,
    /// Applies to red and blue.
    pub channel_floor: u8,
    /// Every channel must stay strictly below this.
    pub channel_ceiling: u8,
}

impl DominanceGate {
    pub fn admits(&self, r: u8, g: u8, b: u8) -> bool {
        let (r, g, b) = (r as u16, g as u16, b as u16);
        let margin = self.margin as u16;
        let ceiling = self.channel_ceiling as u16;

        g > r + margin
            && g > b + margin
            && g > self.green_floor as u16
            && r > self.channel_floor as u16
            && b > self.channel_floor as u16
            && g < ceiling
            && r < ceiling
            && b < ceiling
    }
}

/// Weight penalties applied before tiering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalties {
    pub pale_saturation: f64,
    pub pale: f64,
    pub yellow_red_floor: u8,
    pub yellow_green_gap: i16,
    pub yellow: f64,
}

/// One green band. Every bound is strict, and blue must stay below green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRule {
    pub min_green: u8,
    pub min_blue: u8,
    pub max_red: u8,
    pub min_saturation: f64,
    pub multiplier: f64,
}

impl TierRule {
    pub fn matches(&self, r: u8, g: u8, b: u8, saturation: f64) -> bool {
        g > self.min_green
            && b > self.min_blue
            && b < g
            && r < self.max_red
            && saturation > self.min_saturation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub kind: ProfileKind,
    pub mask: MaskPolicy,
    pub white_gate: WhiteGate,
    /// `None` admits every pixel that clears the white gate.
    pub dominance: Option<DominanceGate>,
    pub penalties: Penalties,
    pub super_emerald: TierRule,
    pub emerald: TierRule,
}

impl ScoringProfile {
    pub fn emerald() -> Self {
        Self {
            kind: ProfileKind::Emerald,
            mask: MaskPolicy::WIDE_CIRCLE,
            white_gate: WhiteGate::AllAbove(230),
            dominance: Some(DominanceGate {
                margin: 5,
                green_floor: 30,
                channel_floor: 10,
                channel_ceiling: 255,
            }),
            penalties: Penalties {
                pale_saturation: 0.15,
                pale: 0.5,
                yellow_red_floor: 80,
                yellow_green_gap: 30,
                yellow: 0.5,
            },
            super_emerald: TierRule {
                min_green: 120,
                min_blue: 20,
                max_red: 150,
                min_saturation: 0.08,
                multiplier: 2.0,
            },
            emerald: TierRule {
                min_green: 60,
                min_blue: 10,
                max_red: 180,
                min_saturation: 0.05,
                multiplier: 1.0,
            },
        }
    }

    pub fn legacy() -> Self {
        Self {
            kind: ProfileKind::Legacy,
            mask: MaskPolicy::Full,
            white_gate: WhiteGate::NoneBelow(240),
            dominance: None,
            ..Self::emerald()
        }
    }

    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Emerald => Self::emerald(),
            ProfileKind::Legacy => Self::legacy(),
        }
    }

    pub fn scale(&self) -> ScoreScale {
        self.kind.scale()
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::emerald()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_gates_differ_on_boundary() {
        assert!(!WhiteGate::AllAbove(230).rejects(230, 240, 240));
        assert!(WhiteGate::AllAbove(230).rejects(231, 231, 231));
        assert!(WhiteGate::NoneBelow(240).rejects(240, 240, 240));
        assert!(!WhiteGate::NoneBelow(240).rejects(239, 255, 255));
    }

    #[test]
    fn dominance_does_not_overflow_near_ceiling() {
        let gate = ScoringProfile::emerald().dominance.unwrap();
        assert!(!gate.admits(252, 254, 20));
        assert!(gate.admits(20, 254, 20));
    }
}
