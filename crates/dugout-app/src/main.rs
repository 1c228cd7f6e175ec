// Dugout entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config, initialize tracing (log to file, not terminal)
// 3. Load arsenal tables and roster
// 4. Resolve batter and pitcher, apply handedness overrides
// 5. Compute the matchup and print the report

mod args;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use dugout_baseball::data::{self, MatchupData};
use dugout_baseball::matchup::{compute_matchup, MatchupError};
use dugout_baseball::names::{resolve_traced, PlayerRef, TargetPlayer};
use dugout_baseball::roster::{find_entry, PlayerIdentity, PlayerRole};
use dugout_core::{config, logging};
use tracing::{info, warn};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    // 1. Parse arguments
    let args = match args::parse(std::env::args().skip(1)) {
        Ok(args::Command::Run(args)) => args,
        Ok(args::Command::Help) => {
            println!("{}", args::USAGE);
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("error: {e:#}\n\n{}", args::USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    // 2. Load config, initialize tracing
    let config = config::load_config().context("failed to load configuration")?;
    logging::init_tracing(&config.logging).context("failed to initialize logging")?;
    info!("Dugout starting: {:?} vs {:?}", args.batter, args.pitcher);

    // 3. Load data
    let data = data::load_all(&config).context("failed to load matchup data")?;

    // 4. Resolve players
    let batter_team = args.batter_team.as_deref();
    let Some(mut batter) = find_player(&data, &args.batter, batter_team, PlayerRole::Batter) else {
        return Ok(not_found(&args, "batter", &args.batter));
    };
    let pitcher_team = args.pitcher_team.as_deref();
    let Some(mut pitcher) = find_player(&data, &args.pitcher, pitcher_team, PlayerRole::Pitcher) else {
        return Ok(not_found(&args, "pitcher", &args.pitcher));
    };
    if let Some(bats) = args.bats {
        info!("Overriding {} batting side: {} -> {}", batter.display_name, batter.handedness, bats);
        batter.handedness = bats;
    }
    if let Some(throws) = args.throws {
        info!("Overriding {} throwing arm: {} -> {}", pitcher.display_name, pitcher.handedness, throws);
        pitcher.handedness = throws;
    }
    for player in [&batter, &pitcher] {
        if !player.handedness.is_known() {
            warn!("{} has unknown handedness; platoon factor is neutral", player.display_name);
        }
    }

    // 5. Compute and report
    let seasons = (!args.seasons.is_empty()).then_some(args.seasons.as_slice());
    let analysis = match compute_matchup(&batter, &pitcher, &data.batters, &data.pitchers, seasons) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("{}", e);
            let MatchupError::NoData { platoon, .. } = &e;
            if args.json {
                println!("{}", report::render_json_error("no_data", &e.to_string()));
            } else {
                println!("{e}");
                println!("Platoon: {} (x{:.2})", platoon.description, platoon.multiplier);
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(
        "Predicted BA {:.3}, SLG {:.3}, wOBA {:.3} over {} pitch types",
        analysis.overall.ba,
        analysis.overall.slg,
        analysis.overall.woba,
        analysis.pitches.len()
    );

    let report = report::build_report(&analysis, &data.pitch_names, &args.seasons, chrono::Utc::now());
    if args.json {
        println!("{}", report::render_json(&report).context("failed to serialize report")?);
    } else {
        print!("{}", report::render_text(&report));
    }

    Ok(ExitCode::SUCCESS)
}

/// Roster lookup, then the resolver; one retry on the surname alone.
/// `team` narrows the roster lookup and breaks surname ties.
fn find_player(
    data: &MatchupData,
    query: &str,
    team: Option<&str>,
    role: PlayerRole,
) -> Option<PlayerIdentity> {
    let candidates = data.candidates(role);
    let target = match (find_entry(&data.roster, query.trim(), team, role), team) {
        (Some(entry), _) => TargetPlayer::from(entry.to_player_ref()),
        (None, Some(team)) => TargetPlayer::from(PlayerRef::new(Some(query), None, Some(team))),
        (None, None) => TargetPlayer::from(query),
    };

    let (resolved, trace) = resolve_traced(&target, candidates);
    if let Some(found) = resolved {
        info!("{:?} resolved to {} ({:?})", query, found.player.display_name, found.tier);
        return Some(found.player.clone());
    }

    let surname = surname_of(query);
    if surname.is_empty() || surname == query.trim() {
        warn!("no {:?} for {:?}: {:?}", role, query, trace);
        return None;
    }

    let (retry, _) = resolve_traced(&TargetPlayer::from(surname), candidates);
    match retry {
        Some(found) => {
            info!("{:?} resolved by surname {:?} to {}", query, surname, found.player.display_name);
            Some(found.player.clone())
        }
        None => {
            warn!("no {:?} for {:?}: {:?}", role, query, trace);
            None
        }
    }
}

/// "Judge, Aaron" -> "Judge"; "Aaron Judge" -> "Judge".
fn surname_of(query: &str) -> &str {
    match query.split_once(',') {
        Some((last, _)) => last.trim(),
        None => query.split_whitespace().last().unwrap_or_default(),
    }
}

fn not_found(args: &args::Args, role: &str, query: &str) -> ExitCode {
    let message = format!("{role} not found: {query:?}");
    if args.json {
        println!("{}", report::render_json_error("not_found", &message));
    } else {
        println!("{message}");
    }
    ExitCode::FAILURE
}
