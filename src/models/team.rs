//! Team and TeamStats data structures.

use serde::{Deserialize, Serialize};

/// Team identifier: registration order, with `BYE_TEAM_ID` reserved for the bye placeholder.
pub type TeamId = i32;

/// Id of the synthetic "bye" team used to pad odd leagues and brackets.
pub const BYE_TEAM_ID: TeamId = -1;

/// Display name of the bye placeholder.
pub const BYE_TEAM_NAME: &str = "Bye";

/// Aggregate results for a team. Always rebuilt from the match list, never patched.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
    /// Scored for.
    pub sf: u32,
    /// Scored against.
    pub sa: u32,
    /// Goal difference (`sf - sa`).
    pub gd: i64,
}

impl TeamStats {
    /// Record one finished match from this team's point of view.
    /// Totals saturate instead of overflowing on huge scores.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played = self.played.saturating_add(1);
        self.sf = self.sf.saturating_add(scored);
        self.sa = self.sa.saturating_add(conceded);
        if scored > conceded {
            self.won = self.won.saturating_add(1);
            self.points = self.points.saturating_add(3);
        } else if scored < conceded {
            self.lost = self.lost.saturating_add(1);
        } else {
            self.drawn = self.drawn.saturating_add(1);
            self.points = self.points.saturating_add(1);
        }
    }
}

/// A team in the competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub stats: TeamStats,
}

impl Team {
    /// Create a team with zeroed stats.
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stats: TeamStats::default(),
        }
    }

    /// Zero all stats before a recompute.
    pub fn reset_stats(&mut self) {
        self.stats = TeamStats::default();
    }
}
