//! Scoreboard web app: league and knockout scoring for small competitions.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    advance_round, bracket_size, check_round_advance, generate_round_robin, generate_tournament,
    generate_tournament_with_rng, parse_score, parse_score_json, rank_teams, record_score,
    recompute_standings, restart_competition, restart_competition_with_rng, standings_csv, start_competition,
    start_competition_with_rng, team_names_with_defaults, AdvanceGate, RoundProgress, ScoreOutcome,
};
pub use models::{
    Competition, CompetitionConfig, CompetitionError, CompetitionId, CompetitionKind, GameMatch,
    MatchCount, MatchId, Side, Team, TeamId, TeamStats, BYE_TEAM_ID,
};
