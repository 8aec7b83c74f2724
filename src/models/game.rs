//! Match (game) and Side.

use crate::models::team::{TeamId, BYE_TEAM_ID};
use serde::{Deserialize, Serialize};

/// Sequential match id, unique across all rounds of a competition.
pub type MatchId = u32;

/// Which slot of a match a score belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

/// A single match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_1: TeamId,
    pub team_2: TeamId,
    /// None while unset.
    pub score_1: Option<u32>,
    pub score_2: Option<u32>,
    /// Bracket round for tournaments, rotation index for leagues.
    pub round: u32,
    /// Either side is the bye placeholder.
    pub is_bye: bool,
}

impl GameMatch {
    /// An unscored match. Bye matches must be built with `league_bye` or `walkover`.
    pub fn new(id: MatchId, team_1: TeamId, team_2: TeamId, round: u32) -> Self {
        Self {
            id,
            team_1,
            team_2,
            score_1: None,
            score_2: None,
            round,
            is_bye: team_1 == BYE_TEAM_ID || team_2 == BYE_TEAM_ID,
        }
    }

    /// League bye week: pre-scored 0-0.
    pub fn league_bye(id: MatchId, team_1: TeamId, team_2: TeamId, round: u32) -> Self {
        Self {
            score_1: Some(0),
            score_2: Some(0),
            ..Self::new(id, team_1, team_2, round)
        }
    }

    /// Bracket bye: whichever slot holds the placeholder loses 0-1.
    pub fn walkover(id: MatchId, team_1: TeamId, team_2: TeamId, round: u32) -> Self {
        let (score_1, score_2) = if team_1 == BYE_TEAM_ID { (0, 1) } else { (1, 0) };
        Self {
            score_1: Some(score_1),
            score_2: Some(score_2),
            ..Self::new(id, team_1, team_2, round)
        }
    }

    /// Both halves of the score are set.
    pub fn is_scored(&self) -> bool {
        self.score_1.is_some() && self.score_2.is_some()
    }

    /// Both scores, if set.
    pub fn scores(&self) -> Option<(u32, u32)> {
        Some((self.score_1?, self.score_2?))
    }

    /// Higher scorer; an exact tie goes to `team_1`. None until scored.
    pub fn winner(&self) -> Option<TeamId> {
        let (s1, s2) = self.scores()?;
        Some(if s2 > s1 { self.team_2 } else { self.team_1 })
    }

    pub fn set_score(&mut self, side: Side, value: Option<u32>) {
        match side {
            Side::One => self.score_1 = value,
            Side::Two => self.score_2 = value,
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_1 == team || self.team_2 == team
    }
}
