//! Competition logic: setup, schedule generation, standings and bracket progression.

mod progression;
mod schedule;
mod setup;
mod standings;

pub use progression::{
    advance_round, check_round_advance, record_score, AdvanceGate, RoundProgress, ScoreOutcome,
};
pub use schedule::{
    bracket_size, generate_round_robin, generate_tournament, generate_tournament_with_rng,
};
pub use setup::{
    parse_score, parse_score_json, restart_competition, restart_competition_with_rng,
    start_competition, start_competition_with_rng, team_names_with_defaults,
};
pub use standings::{compare_teams, rank_teams, recompute_standings, standings_csv};
