// Platoon adjustment from batter/pitcher handedness.

use crate::roster::Handedness;
use serde::Serialize;
use std::fmt;

/// Which side the handedness matchup favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlatoonAdvantage {
    Hitter,
    Pitcher,
    Even,
    Unknown,
}

impl fmt::Display for PlatoonAdvantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlatoonAdvantage::Hitter => "Hitter",
            PlatoonAdvantage::Pitcher => "Pitcher",
            PlatoonAdvantage::Even => "Even",
            PlatoonAdvantage::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Multiplier applied to the batter's metrics for a handedness pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatoonFactor {
    pub advantage: PlatoonAdvantage,
    pub multiplier: f64,
    pub description: &'static str,
}

impl PlatoonFactor {
    /// No platoon effect assumed.
    pub const NEUTRAL: PlatoonFactor = PlatoonFactor {
        advantage: PlatoonAdvantage::Unknown,
        multiplier: 1.0,
        description: "Handedness data not available",
    };
}

/// Look up the platoon factor for a batter/pitcher handedness pair.
///
/// Only the six listed pairings carry an effect; any other combination,
/// including switch-throwing pitchers or unknown hands, is neutral.
pub fn platoon_factor(bats: Handedness, throws: Handedness) -> PlatoonFactor {
    use Handedness::{Left, Right, Switch};

    let (advantage, multiplier, description) = match (bats, throws) {
        (Right, Right) => (PlatoonAdvantage::Pitcher, 0.95, "RHB vs RHP slightly favors pitcher"),
        (Left, Left) => (PlatoonAdvantage::Pitcher, 0.90, "LHB vs LHP strongly favors pitcher"),
        (Right, Left) => (PlatoonAdvantage::Pitcher, 1.05, "RHB vs LHP"),
        (Left, Right) => (PlatoonAdvantage::Hitter, 1.10, "LHB vs RHP strongly favors hitter"),
        (Switch, Right) => (PlatoonAdvantage::Hitter, 1.05, "Switch hitter batting left vs RHP favors hitter"),
        (Switch, Left) => (PlatoonAdvantage::Even, 1.00, "Switch hitter batting right vs LHP is neutral"),
        _ => return PlatoonFactor::NEUTRAL,
    };

    PlatoonFactor {
        advantage,
        multiplier,
        description,
    }
}
