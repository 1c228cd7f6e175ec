// Loading every input the matchup engine needs from the configured paths.

use crate::arsenal::{load_arsenal, pitch_type_names, ArsenalRow, ArsenalTable};
use crate::roster::{identities, load_roster, PlayerIdentity, PlayerRole, RosterEntry, RosterError};
use dugout_core::config::{Config, DataPaths};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Batter and pitcher tables plus everything derived from them.
#[derive(Debug, Clone, Default)]
pub struct MatchupData {
    pub batters: ArsenalTable,
    pub pitchers: ArsenalTable,
    pub roster: Vec<RosterEntry>,
    /// Pitch code to display name, pitcher names first.
    pub pitch_names: HashMap<String, String>,
    /// Resolver candidates, one per batter in the table.
    pub batter_list: Vec<PlayerIdentity>,
    /// Resolver candidates, one per pitcher in the table.
    pub pitcher_list: Vec<PlayerIdentity>,
}

impl MatchupData {
    /// Assemble from loaded tables, deriving pitch names and candidates.
    pub fn from_parts(batters: ArsenalTable, pitchers: ArsenalTable, roster: Vec<RosterEntry>) -> Self {
        let pitch_names = pitch_type_names(&[&pitchers, &batters]);
        let batter_list = identities(&batters, &roster, PlayerRole::Batter);
        let pitcher_list = identities(&pitchers, &roster, PlayerRole::Pitcher);
        MatchupData {
            batters,
            pitchers,
            roster,
            pitch_names,
            batter_list,
            pitcher_list,
        }
    }

    pub fn candidates(&self, role: PlayerRole) -> &[PlayerIdentity] {
        match role {
            PlayerRole::Batter => &self.batter_list,
            PlayerRole::Pitcher => &self.pitcher_list,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("no {side} arsenal data could be loaded for seasons {seasons:?}")]
    NoSeasons { side: &'static str, seasons: Vec<u16> },

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Load all matchup data from the paths in the config.
pub fn load_all(config: &Config) -> Result<MatchupData, DataError> {
    load_all_from_paths(&config.data)
}

/// Load all matchup data from explicit paths.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<MatchupData, DataError> {
    let batters = load_side(&paths.seasons, "batter", |s| paths.hitter_file(s))?;
    let pitchers = load_side(&paths.seasons, "pitcher", |s| paths.pitcher_file(s))?;
    let roster = load_roster(Path::new(&paths.roster))?;

    let data = MatchupData::from_parts(batters, pitchers, roster);
    info!(
        "loaded {} batters and {} pitchers over seasons {:?}, {} roster entries",
        data.batter_list.len(),
        data.pitcher_list.len(),
        data.batters.seasons(),
        data.roster.len()
    );
    Ok(data)
}

/// Read one side's CSV for every season, skipping seasons that fail.
fn load_side(
    seasons: &[u16],
    side: &'static str,
    file_for: impl Fn(u16) -> PathBuf,
) -> Result<ArsenalTable, DataError> {
    let mut rows: Vec<ArsenalRow> = Vec::new();
    for &season in seasons {
        let path = file_for(season);
        match load_arsenal(&path, Some(season)) {
            Ok(season_rows) if season_rows.is_empty() => {
                warn!("{} {} file {} has no usable rows", season, side, path.display());
            }
            Ok(season_rows) => rows.extend(season_rows),
            Err(e) => warn!("skipping {} {} data: {}", season, side, e),
        }
    }

    let table = ArsenalTable::new(rows);
    if table.is_empty() {
        return Err(DataError::NoSeasons {
            side,
            seasons: seasons.to_vec(),
        });
    }
    Ok(table)
}
