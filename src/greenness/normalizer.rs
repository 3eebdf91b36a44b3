use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{classifier::ScoreAccumulator, profile::ProfileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreScale {
    OutOfTen,
    OutOfHundred,
}

impl ScoreScale {
    pub fn max(&self) -> u8 {
        match self {
            ScoreScale::OutOfTen => 10,
            ScoreScale::OutOfHundred => 100,
        }
    }

    pub fn from_max(max: i64) -> Result<Self> {
        match max {
            10 => Ok(ScoreScale::OutOfTen),
            100 => Ok(ScoreScale::OutOfHundred),
            other => bail!("unsupported greenness scale {other}"),
        }
    }
}

/// A bounded greenness score together with the scale it was produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreennessScore {
    value: u8,
    scale: ScoreScale,
}

impl GreennessScore {
    pub fn new(value: u8, scale: ScoreScale) -> Result<Self> {
        if value > scale.max() {
            bail!("greenness {value} exceeds scale maximum {}", scale.max());
        }
        Ok(Self { value, scale })
    }

    pub fn zero(scale: ScoreScale) -> Self {
        Self { value: 0, scale }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }

    /// The value projected onto 0–100 so mixed-scale records compare sensibly.
    pub fn normalized(&self) -> u16 {
        self.value as u16 * (100 / self.scale.max() as u16)
    }
}

impl fmt::Display for GreennessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.scale.max())
    }
}

pub fn normalize(acc: &ScoreAccumulator, kind: ProfileKind) -> GreennessScore {
    let scale = kind.scale();
    if acc.considered_pixels() == 0 {
        return GreennessScore::zero(scale);
    }

    let mean = acc.weighted_green() / acc.considered_pixels() as f64;
    let raw = match kind {
        ProfileKind::Emerald => (mean * 100.0).round(),
        ProfileKind::Legacy => (mean / 255.0 * 10.0).round(),
    };
    let value = raw.clamp(0.0, scale.max() as f64) as u8;

    GreennessScore { value, scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greenness::classifier::{PixelVerdict, Tier};

    fn acc_with(contributions: &[f64]) -> ScoreAccumulator {
        let mut acc = ScoreAccumulator::new();
        for &contribution in contributions {
            acc.record(PixelVerdict::Counted {
                tier: Tier::Emerald,
                contribution,
            });
        }
        acc
    }

    #[test]
    fn empty_accumulator_scores_zero() {
        let acc = ScoreAccumulator::new();
        assert_eq!(normalize(&acc, ProfileKind::Emerald).value(), 0);
        assert_eq!(normalize(&acc, ProfileKind::Legacy).value(), 0);
    }

    #[test]
    fn emerald_clamps_at_hundred() {
        let score = normalize(&acc_with(&[2.0, 2.0]), ProfileKind::Emerald);
        assert_eq!(score.value(), 100);
        assert_eq!(score.scale(), ScoreScale::OutOfHundred);
    }

    #[test]
    fn emerald_rounds_half_up() {
        // 1.0 / 8 = 0.125 -> 12.5 -> 13
        let score = normalize(
            &acc_with(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ProfileKind::Emerald,
        );
        assert_eq!(score.value(), 13);
    }

    #[test]
    fn legacy_maps_average_green_onto_ten() {
        // average 204 -> 8.0
        let score = normalize(&acc_with(&[204.0, 204.0]), ProfileKind::Legacy);
        assert_eq!(score.value(), 8);
        assert_eq!(score.to_string(), "8/10");
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        assert!(GreennessScore::new(11, ScoreScale::OutOfTen).is_err());
        assert_eq!(
            GreennessScore::new(7, ScoreScale::OutOfTen).unwrap().normalized(),
            70
        );
    }
}
