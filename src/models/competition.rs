//! Competition, its configuration, and CompetitionError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::team::{Team, TeamId, BYE_TEAM_ID, BYE_TEAM_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during competition operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompetitionError {
    /// No match with this id.
    MatchNotFound(MatchId),
    /// No team with this id.
    TeamNotFound(TeamId),
    /// Bye matches are pre-scored and cannot be edited.
    ByeMatch(MatchId),
    /// The match belongs to a bracket round that has already been advanced past.
    RoundClosed(MatchId),
    /// Operation only applies to the other competition kind.
    WrongKind(CompetitionKind),
    /// Match count must be 1 or 2.
    InvalidMatchCount(u8),
    /// Advancement was confirmed for a round that is no longer current.
    StaleRound { expected: u32, current: u32 },
}

impl std::fmt::Display for CompetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            CompetitionError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            CompetitionError::ByeMatch(id) => write!(f, "Match {} is a bye and cannot be scored", id),
            CompetitionError::RoundClosed(id) => {
                write!(f, "Match {} belongs to a finished round", id)
            }
            CompetitionError::WrongKind(kind) => write!(f, "Not available for a {}", kind),
            CompetitionError::InvalidMatchCount(n) => {
                write!(f, "Match count must be 1 or 2 (got {})", n)
            }
            CompetitionError::StaleRound { expected, current } => write!(
                f,
                "Round {} is no longer current (now at round {})",
                expected, current
            ),
        }
    }
}

impl std::error::Error for CompetitionError {}

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionKind {
    /// Round-robin with a standings table.
    #[default]
    League,
    /// Single elimination bracket.
    Tournament,
}

impl std::fmt::Display for CompetitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionKind::League => write!(f, "league"),
            CompetitionKind::Tournament => write!(f, "tournament"),
        }
    }
}

/// How many times each pair meets in a league.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCount {
    #[default]
    Single,
    /// Mirrored fixture with home/away swapped.
    Double,
}

impl TryFrom<u8> for MatchCount {
    type Error = CompetitionError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(MatchCount::Single),
            2 => Ok(MatchCount::Double),
            other => Err(CompetitionError::InvalidMatchCount(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    pub kind: CompetitionKind,
    /// Ignored for tournaments.
    #[serde(default)]
    pub match_count: MatchCount,
}

impl CompetitionConfig {
    pub fn league(match_count: MatchCount) -> Self {
        Self {
            kind: CompetitionKind::League,
            match_count,
        }
    }

    pub fn tournament() -> Self {
        Self {
            kind: CompetitionKind::Tournament,
            match_count: MatchCount::Single,
        }
    }
}

/// Full competition state: teams, the growing match list, and bracket progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub config: CompetitionConfig,
    /// Dashboard heading such as a grade and class label.
    #[serde(default)]
    pub title: Option<String>,
    /// Real teams in registration order. The bye placeholder is never stored here.
    pub teams: Vec<Team>,
    /// All matches ever generated; later bracket rounds are appended.
    pub matches: Vec<GameMatch>,
    /// Bracket round currently being played (tournament only).
    pub tournament_stage: u32,
    /// Set once the final is decided.
    pub champion: Option<TeamId>,
    pub started_at: DateTime<Utc>,
}

impl Competition {
    /// Create a competition with no matches yet (see `logic::start_competition`).
    pub fn new(teams: Vec<Team>, config: CompetitionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            title: None,
            teams,
            matches: Vec::new(),
            tournament_stage: 0,
            champion: None,
            started_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> CompetitionKind {
        self.config.kind
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    /// Display name for a team id, including the bye placeholder.
    pub fn team_name(&self, id: TeamId) -> &str {
        if id == BYE_TEAM_ID {
            return BYE_TEAM_NAME;
        }
        self.team(id).map(|t| t.name.as_str()).unwrap_or("TBD")
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Id for the next appended match.
    pub fn next_match_id(&self) -> MatchId {
        self.matches.len() as MatchId
    }

    /// Matches shown to players: everything except bye matches.
    pub fn visible_matches(&self) -> Vec<&GameMatch> {
        self.matches.iter().filter(|m| !m.is_bye).collect()
    }

    /// Matches of one round, byes included.
    pub fn round_matches(&self, round: u32) -> Vec<&GameMatch> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    /// All matches grouped by round (bracket columns), in round order.
    pub fn rounds(&self) -> Vec<Vec<&GameMatch>> {
        let last = match self.matches.iter().map(|m| m.round).max() {
            Some(r) => r,
            None => return Vec::new(),
        };
        (0..=last).map(|r| self.round_matches(r)).collect()
    }

    /// Set the heading; blank clears it.
    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }

    /// Rename a team without touching the schedule. An empty name falls back to the default.
    pub fn rename_team(&mut self, id: TeamId, name: &str) -> Result<(), CompetitionError> {
        let team = self
            .get_team_mut(id)
            .ok_or(CompetitionError::TeamNotFound(id))?;
        let trimmed = name.trim();
        team.name = if trimmed.is_empty() {
            default_team_name(id)
        } else {
            trimmed.to_string()
        };
        Ok(())
    }
}

/// `"Team N"` with N one-based.
pub fn default_team_name(id: TeamId) -> String {
    format!("Team {}", id + 1)
}
