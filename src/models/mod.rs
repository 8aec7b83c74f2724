//! Data structures for a competition: teams, matches, configuration and state.

mod competition;
mod game;
mod team;

pub use competition::{
    default_team_name, Competition, CompetitionConfig, CompetitionError, CompetitionId,
    CompetitionKind, MatchCount,
};
pub use game::{GameMatch, MatchId, Side};
pub use team::{Team, TeamId, TeamStats, BYE_TEAM_ID, BYE_TEAM_NAME};
