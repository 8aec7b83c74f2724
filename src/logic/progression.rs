//! Score entry and bracket progression.

use crate::logic::standings::recompute_standings;
use crate::models::{
    Competition, CompetitionError, CompetitionKind, GameMatch, MatchId, Side, Team, TeamId,
    BYE_TEAM_ID,
};
use serde::Serialize;

/// Asks whoever drives the competition whether a finished round may advance.
pub trait AdvanceGate {
    /// `round` is the round that just completed. Returning false leaves state untouched.
    fn confirm_advance(&mut self, round: u32) -> bool;
}

impl<F: FnMut(u32) -> bool> AdvanceGate for F {
    fn confirm_advance(&mut self, round: u32) -> bool {
        self(round)
    }
}

/// Where the current bracket round stands after a check.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundProgress {
    /// Nothing to play (no teams).
    NoMatches,
    /// Some matches of the round still lack a score.
    InProgress { round: u32, remaining: usize },
    /// Round finished but the gate declined; asked again on the next edit.
    AwaitingConfirmation { round: u32 },
    /// Next round generated.
    Advanced { round: u32, new_matches: Vec<MatchId> },
    /// Bracket decided.
    Champion { team: TeamId },
}

/// Result of a score edit, depending on the competition kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    Standings(Vec<Team>),
    Round(RoundProgress),
}

/// Set one half of a match score, then refresh standings (league) or check the round (tournament).
///
/// `value` of None clears the score. Bye matches and matches from rounds already
/// advanced past are rejected.
pub fn record_score<G: AdvanceGate + ?Sized>(
    competition: &mut Competition,
    match_id: MatchId,
    side: Side,
    value: Option<u32>,
    gate: &mut G,
) -> Result<ScoreOutcome, CompetitionError> {
    let kind = competition.kind();
    let stage = competition.tournament_stage;
    let m = competition
        .get_match_mut(match_id)
        .ok_or(CompetitionError::MatchNotFound(match_id))?;
    if m.is_bye {
        log::warn!("Rejected score edit on bye match {}", match_id);
        return Err(CompetitionError::ByeMatch(match_id));
    }
    if kind == CompetitionKind::Tournament && m.round < stage {
        log::warn!("Rejected score edit on match {} from closed round {}", match_id, m.round);
        return Err(CompetitionError::RoundClosed(match_id));
    }
    m.set_score(side, value);
    log::debug!("Match {} side {:?} set to {:?}", match_id, side, value);

    match kind {
        CompetitionKind::League => Ok(ScoreOutcome::Standings(recompute_standings(competition))),
        CompetitionKind::Tournament => check_round_advance(competition, gate).map(ScoreOutcome::Round),
    }
}

/// Check whether the current bracket round is finished and, if the gate agrees, start the next one.
///
/// 1. Take the matches of `tournament_stage`.
/// 2. If any lacks a score, report progress.
/// 3. A single finished match is the final: its winner is champion.
/// 4. Otherwise ask the gate; on yes pair the winners into the next round,
///    giving an odd last winner a walkover.
pub fn check_round_advance<G: AdvanceGate + ?Sized>(
    competition: &mut Competition,
    gate: &mut G,
) -> Result<RoundProgress, CompetitionError> {
    if competition.kind() != CompetitionKind::Tournament {
        return Err(CompetitionError::WrongKind(competition.kind()));
    }

    let round = competition.tournament_stage;
    let current = competition.round_matches(round);
    let total = current.len();
    let remaining = current.iter().filter(|m| !m.is_scored()).count();
    let winners: Vec<TeamId> = current.iter().filter_map(|m| m.winner()).collect();

    if total == 0 {
        // A lone entrant never plays: the bracket is decided before it starts.
        if round == 0 && competition.teams.len() == 1 {
            let team = competition.teams[0].id;
            return Ok(declare_champion(competition, team));
        }
        return Ok(RoundProgress::NoMatches);
    }

    if remaining > 0 {
        competition.champion = None;
        return Ok(RoundProgress::InProgress { round, remaining });
    }

    if let &[team] = winners.as_slice() {
        return Ok(declare_champion(competition, team));
    }

    if !gate.confirm_advance(round) {
        return Ok(RoundProgress::AwaitingConfirmation { round });
    }

    let next_round = round + 1;
    competition.tournament_stage = next_round;
    let mut new_matches = Vec::with_capacity(winners.len() / 2 + 1);
    for pair in winners.chunks(2) {
        let id = competition.next_match_id();
        let m = match *pair {
            [team_1, team_2] => GameMatch::new(id, team_1, team_2, next_round),
            _ => GameMatch::walkover(id, pair[0], BYE_TEAM_ID, next_round),
        };
        competition.matches.push(m);
        new_matches.push(id);
    }
    log::info!(
        "Round {} complete: {} winners advance to round {} ({} matches)",
        round,
        winners.len(),
        next_round,
        new_matches.len()
    );

    Ok(RoundProgress::Advanced {
        round: next_round,
        new_matches,
    })
}

/// Confirmed advancement for callers that asked asynchronously.
///
/// Fails with `StaleRound` if the bracket moved on since `expected_round` was offered.
pub fn advance_round(
    competition: &mut Competition,
    expected_round: u32,
) -> Result<RoundProgress, CompetitionError> {
    if competition.kind() != CompetitionKind::Tournament {
        return Err(CompetitionError::WrongKind(competition.kind()));
    }
    if competition.tournament_stage != expected_round {
        return Err(CompetitionError::StaleRound {
            expected: expected_round,
            current: competition.tournament_stage,
        });
    }
    check_round_advance(competition, &mut |_: u32| true)
}

fn declare_champion(competition: &mut Competition, team: TeamId) -> RoundProgress {
    if competition.champion != Some(team) {
        log::info!("Champion: {}", competition.team_name(team));
    }
    competition.champion = Some(team);
    RoundProgress::Champion { team }
}
