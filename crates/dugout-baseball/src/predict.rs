// Per-pitch-type outcome prediction.
//
// Blends what the batter does against a pitch type with what the pitcher
// allows with it. `1 - pitcher metric` stands in for the pitcher's
// suppression; the two are averaged. Downstream displays rely on this
// exact scale.

use crate::arsenal::{finite_or_zero, ArsenalRow};
use crate::platoon::PlatoonFactor;
use serde::Serialize;

/// Prediction for one pitch type both players have data for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchMatchupPrediction {
    pub pitch_type: String,
    pub pitch_name: Option<String>,
    /// Pitcher usage of this pitch type, 0-100.
    pub pitcher_usage: f64,
    pub batter: ArsenalRow,
    pub pitcher: ArsenalRow,
    pub base_predicted_ba: f64,
    pub base_predicted_slg: f64,
    pub base_predicted_woba: f64,
    pub predicted_ba: f64,
    pub predicted_slg: f64,
    pub predicted_woba: f64,
    /// Positive favors the batter.
    pub matchup_advantage: f64,
    /// Per-season rows behind `batter`, oldest first. Filled by the matchup
    /// pipeline; empty when predicting from rows alone.
    pub batter_seasons: Vec<ArsenalRow>,
    /// Per-season rows behind `pitcher`, oldest first.
    pub pitcher_seasons: Vec<ArsenalRow>,
}

/// Unadjusted and platoon-adjusted blend of one metric.
fn blend(batter: f64, pitcher_allowed: f64, multiplier: f64) -> (f64, f64) {
    let batter = finite_or_zero(batter);
    let suppression = 1.0 - finite_or_zero(pitcher_allowed);
    let base = (batter + suppression) / 2.0;
    let adjusted = (batter * multiplier + suppression) / 2.0;
    (base, adjusted)
}

/// Predict one pitch type from the batter's and pitcher's rows for it.
pub fn predict_pitch(
    batter: &ArsenalRow,
    pitcher: &ArsenalRow,
    platoon: &PlatoonFactor,
) -> PitchMatchupPrediction {
    let m = platoon.multiplier;
    let (base_predicted_ba, predicted_ba) =
        blend(batter.batting_average_against, pitcher.batting_average_against, m);
    let (base_predicted_slg, predicted_slg) =
        blend(batter.slugging_against, pitcher.slugging_against, m);
    let (base_predicted_woba, predicted_woba) = blend(batter.woba_against, pitcher.woba_against, m);
    let matchup_advantage =
        (finite_or_zero(batter.run_value_per_100) - finite_or_zero(pitcher.run_value_per_100)) * m;

    PitchMatchupPrediction {
        pitch_type: pitcher.pitch_type.clone(),
        pitch_name: pitcher.pitch_name.clone().or_else(|| batter.pitch_name.clone()),
        pitcher_usage: finite_or_zero(pitcher.pitch_usage_percent),
        batter: batter.clone(),
        pitcher: pitcher.clone(),
        base_predicted_ba,
        base_predicted_slg,
        base_predicted_woba,
        predicted_ba,
        predicted_slg,
        predicted_woba,
        matchup_advantage,
        batter_seasons: Vec::new(),
        pitcher_seasons: Vec::new(),
    }
}

/// Predict every pitch type in the pitcher's arsenal that the batter has
/// seen, in the pitcher's order. Pitch types without batter data are skipped.
pub fn predict_arsenal(
    batter_rows: &[ArsenalRow],
    pitcher_rows: &[ArsenalRow],
    platoon: &PlatoonFactor,
) -> Vec<PitchMatchupPrediction> {
    pitcher_rows
        .iter()
        .filter_map(|pitch| {
            batter_rows
                .iter()
                .find(|b| b.pitch_type == pitch.pitch_type)
                .map(|batter| predict_pitch(batter, pitch, platoon))
        })
        .collect()
}
