//! Setup: build teams from the entered names and generate the opening schedule.

use crate::logic::progression::check_round_advance;
use crate::logic::schedule::{generate_round_robin, generate_tournament_with_rng};
use crate::logic::standings::recompute_standings;
use crate::models::{default_team_name, Competition, CompetitionConfig, CompetitionKind, Team, TeamId};
use rand::Rng;

/// Trimmed names with empty entries replaced by `"Team {index+1}"`.
pub fn team_names_with_defaults<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                default_team_name(i as TeamId)
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

/// Normalize a score entry: a non-negative integer, or None for anything else (empty, negative, garbage).
pub fn parse_score(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

/// JSON score entry: non-negative integer numbers and numeric strings count,
/// anything else (negative, fractional, null, bool) is unset.
pub fn parse_score_json(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => parse_score(s),
        _ => None,
    }
}

/// Start a competition with a thread-local RNG for bracket seeding.
pub fn start_competition<S: AsRef<str>>(names: &[S], config: CompetitionConfig) -> Competition {
    start_competition_with_rng(names, config, &mut rand::thread_rng())
}

/// Create teams (ids in input order), generate the schedule and compute initial standings.
pub fn start_competition_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
    names: &[S],
    config: CompetitionConfig,
    rng: &mut R,
) -> Competition {
    let teams: Vec<Team> = team_names_with_defaults(names)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Team::new(i as TeamId, name))
        .collect();
    let mut competition = Competition::new(teams, config);
    schedule(&mut competition, rng);
    log::info!(
        "Started {} {} with {} teams",
        config.kind,
        competition.id,
        competition.teams.len()
    );
    competition
}

/// Regenerate the schedule from the same teams and config: all scores, stage and champion are cleared.
pub fn restart_competition(competition: &mut Competition) {
    restart_competition_with_rng(competition, &mut rand::thread_rng())
}

pub fn restart_competition_with_rng<R: Rng + ?Sized>(competition: &mut Competition, rng: &mut R) {
    competition.matches.clear();
    competition.tournament_stage = 0;
    competition.champion = None;
    schedule(competition, rng);
    log::info!("Restarted {} {}", competition.config.kind, competition.id);
}

fn schedule<R: Rng + ?Sized>(competition: &mut Competition, rng: &mut R) {
    competition.matches = match competition.config.kind {
        CompetitionKind::League => {
            generate_round_robin(&competition.teams, competition.config.match_count)
        }
        CompetitionKind::Tournament => generate_tournament_with_rng(&competition.teams, rng),
    };
    recompute_standings(competition);
    if competition.config.kind == CompetitionKind::Tournament {
        // Settles brackets that need no play, e.g. a lone entrant is champion at once.
        if let Err(e) = check_round_advance(competition, &mut |_: u32| false) {
            log::warn!("Initial round check failed: {}", e);
        }
    }
}
