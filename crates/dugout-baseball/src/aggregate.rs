// Usage-weighted aggregation of per-pitch predictions.

use crate::arsenal::finite_or_zero;
use crate::predict::PitchMatchupPrediction;
use serde::Serialize;

/// Overall prediction for one batter/pitcher pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallPrediction {
    pub ba: f64,
    pub slg: f64,
    pub woba: f64,
    pub base_ba: f64,
    pub base_slg: f64,
    pub base_woba: f64,
    pub advantage: f64,
    pub hit_probability: f64,
    pub extra_base_probability: f64,
    pub strikeout_probability: f64,
    /// Platoon multiplier used, so displays can back out unadjusted values.
    pub platoon_factor: f64,
}

/// Why no overall prediction could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoPrediction {
    #[error("no overlapping pitch types between batter and pitcher")]
    NoOverlappingPitches,
    #[error("pitcher usage data sums to zero")]
    NoUsage,
}

/// Combine per-pitch predictions weighted by the pitcher's usage.
///
/// Zero-usage pitch types stay in the sums with weight 0.
pub fn aggregate(
    predictions: &[PitchMatchupPrediction],
    platoon_multiplier: f64,
) -> Result<OverallPrediction, NoPrediction> {
    if predictions.is_empty() {
        return Err(NoPrediction::NoOverlappingPitches);
    }

    let total_usage: f64 = predictions
        .iter()
        .map(|p| finite_or_zero(p.pitcher_usage))
        .sum();
    if !total_usage.is_finite() || total_usage <= 0.0 {
        return Err(NoPrediction::NoUsage);
    }

    let mut out = OverallPrediction {
        ba: 0.0,
        slg: 0.0,
        woba: 0.0,
        base_ba: 0.0,
        base_slg: 0.0,
        base_woba: 0.0,
        advantage: 0.0,
        hit_probability: 0.0,
        extra_base_probability: 0.0,
        strikeout_probability: 0.0,
        platoon_factor: platoon_multiplier,
    };

    for p in predictions {
        let w = finite_or_zero(p.pitcher_usage) / total_usage;
        let extra_base = ((p.predicted_slg - p.predicted_ba) / 3.0).max(0.0);
        let strikeout = (finite_or_zero(p.batter.strikeout_percent) * platoon_multiplier
            + finite_or_zero(p.pitcher.strikeout_percent))
            / 2.0
            / 100.0;

        out.ba += p.predicted_ba * w;
        out.slg += p.predicted_slg * w;
        out.woba += p.predicted_woba * w;
        out.base_ba += p.base_predicted_ba * w;
        out.base_slg += p.base_predicted_slg * w;
        out.base_woba += p.base_predicted_woba * w;
        out.advantage += p.matchup_advantage * w;
        out.extra_base_probability += extra_base * w;
        out.strikeout_probability += strikeout * w;
    }
    out.hit_probability = out.ba;

    Ok(out)
}
