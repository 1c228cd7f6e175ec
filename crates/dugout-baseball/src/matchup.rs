// Batter vs pitcher matchup pipeline and display classifications.

use crate::aggregate::{aggregate, NoPrediction, OverallPrediction};
use crate::arsenal::{normalize_usage, ArsenalTable};
use crate::platoon::{platoon_factor, PlatoonFactor};
use crate::predict::{predict_arsenal, PitchMatchupPrediction};
use crate::roster::PlayerIdentity;
use serde::Serialize;
use std::fmt;
use tracing::info;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Full analysis of one batter/pitcher pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupAnalysis {
    pub batter: PlayerIdentity,
    pub pitcher: PlayerIdentity,
    pub platoon: PlatoonFactor,
    /// Per-pitch breakdown, in the pitcher's arsenal order.
    pub pitches: Vec<PitchMatchupPrediction>,
    pub overall: OverallPrediction,
}

impl MatchupAnalysis {
    pub fn advantage_level(&self) -> AdvantageLevel {
        AdvantageLevel::from_advantage(self.overall.advantage)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchupError {
    #[error("no matchup data for {batter} vs {pitcher}: {reason}")]
    NoData {
        batter: String,
        pitcher: String,
        /// Still reported so callers can show the handedness matchup.
        platoon: PlatoonFactor,
        reason: NoPrediction,
    },
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the whole prediction for a resolved batter and pitcher.
///
/// Each player's rows are combined over `seasons` (all loaded seasons when
/// `None`); the pitcher's usage is rescaled to 100 before weighting.
pub fn compute_matchup(
    batter: &PlayerIdentity,
    pitcher: &PlayerIdentity,
    batter_table: &ArsenalTable,
    pitcher_table: &ArsenalTable,
    seasons: Option<&[u16]>,
) -> Result<MatchupAnalysis, MatchupError> {
    let platoon = platoon_factor(batter.handedness, pitcher.handedness);

    let batter_rows = batter_table.player_arsenal(&batter.display_name, seasons);
    let mut pitcher_rows = pitcher_table.player_arsenal(&pitcher.display_name, seasons);
    normalize_usage(&mut pitcher_rows);

    let mut pitches = predict_arsenal(&batter_rows, &pitcher_rows, &platoon);
    for p in pitches.iter_mut() {
        p.batter_seasons = batter_table.season_rows(&batter.display_name, &p.pitch_type, seasons);
        p.pitcher_seasons = pitcher_table.season_rows(&pitcher.display_name, &p.pitch_type, seasons);
    }
    info!(
        "{} ({}) vs {} ({}): {} batter pitch types, {} pitcher pitch types, {} overlapping, platoon {:.2}",
        batter.display_name,
        batter.handedness,
        pitcher.display_name,
        pitcher.handedness,
        batter_rows.len(),
        pitcher_rows.len(),
        pitches.len(),
        platoon.multiplier
    );

    let overall = aggregate(&pitches, platoon.multiplier).map_err(|reason| MatchupError::NoData {
        batter: batter.display_name.clone(),
        pitcher: pitcher.display_name.clone(),
        platoon,
        reason,
    })?;

    Ok(MatchupAnalysis {
        batter: batter.clone(),
        pitcher: pitcher.clone(),
        platoon,
        pitches,
        overall,
    })
}

// ---------------------------------------------------------------------------
// Display classifications
// ---------------------------------------------------------------------------

/// Bucketed reading of the usage-weighted run-value advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdvantageLevel {
    StrongHitter,
    Hitter,
    Even,
    Pitcher,
    StrongPitcher,
}

impl AdvantageLevel {
    pub fn from_advantage(advantage: f64) -> Self {
        if advantage > 1.5 {
            AdvantageLevel::StrongHitter
        } else if advantage > 0.5 {
            AdvantageLevel::Hitter
        } else if advantage > -0.5 {
            AdvantageLevel::Even
        } else if advantage > -1.5 {
            AdvantageLevel::Pitcher
        } else {
            AdvantageLevel::StrongPitcher
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdvantageLevel::StrongHitter => "Strong Hitter Advantage",
            AdvantageLevel::Hitter => "Hitter Advantage",
            AdvantageLevel::Even => "Even Matchup",
            AdvantageLevel::Pitcher => "Pitcher Advantage",
            AdvantageLevel::StrongPitcher => "Strong Pitcher Advantage",
        }
    }
}

impl fmt::Display for AdvantageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome a probability refers to; each has its own thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeKind {
    Hit,
    ExtraBase,
    Strikeout,
}

impl OutcomeKind {
    /// (high, medium, low) lower bounds.
    fn thresholds(&self) -> (f64, f64, f64) {
        match self {
            OutcomeKind::Hit => (0.300, 0.250, 0.200),
            OutcomeKind::ExtraBase => (0.040, 0.020, 0.010),
            OutcomeKind::Strikeout => (0.280, 0.220, 0.180),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProbabilityCategory {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ProbabilityCategory {
    pub fn classify(probability: f64, kind: OutcomeKind) -> Self {
        let (high, medium, low) = kind.thresholds();
        if probability >= high {
            ProbabilityCategory::High
        } else if probability >= medium {
            ProbabilityCategory::Medium
        } else if probability >= low {
            ProbabilityCategory::Low
        } else {
            ProbabilityCategory::VeryLow
        }
    }
}

impl fmt::Display for ProbabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbabilityCategory::High => "High",
            ProbabilityCategory::Medium => "Medium",
            ProbabilityCategory::Low => "Low",
            ProbabilityCategory::VeryLow => "Very Low",
        };
        f.write_str(s)
    }
}

/// Total-bases outlook from predicted SLG and wOBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BasesPotential {
    High,
    Medium,
    Low,
}

impl BasesPotential {
    /// Either metric clearing a bar is enough.
    pub fn classify(slg: f64, woba: f64) -> Self {
        if slg >= 0.500 || woba >= 0.370 {
            BasesPotential::High
        } else if slg >= 0.420 || woba >= 0.330 {
            BasesPotential::Medium
        } else {
            BasesPotential::Low
        }
    }
}

impl fmt::Display for BasesPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BasesPotential::High => "High",
            BasesPotential::Medium => "Medium",
            BasesPotential::Low => "Low",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
