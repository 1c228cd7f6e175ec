// Library root: matchup engine modules, exposed for the binary and
// integration tests.

pub mod aggregate;
pub mod arsenal;
pub mod data;
pub mod matchup;
pub mod names;
pub mod platoon;
pub mod predict;
pub mod roster;
