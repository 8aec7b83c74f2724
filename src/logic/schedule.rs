//! Fixture generation: round-robin leagues and single-elimination brackets.

use crate::models::{GameMatch, MatchCount, MatchId, Team, TeamId, BYE_TEAM_ID};
use rand::seq::SliceRandom;
use rand::Rng;

/// Round-robin fixture list using the circle method.
///
/// 1. Pad an odd field with the bye placeholder.
/// 2. For each of `n - 1` rounds pair slot `m` with slot `n - 1 - m`.
/// 3. Rotate: the last slot moves to index 1, slot 0 stays fixed.
///
/// Bye pairings are pre-scored 0-0 and never mirrored. With `MatchCount::Double`
/// every real pairing is followed directly by its reversed fixture.
pub fn generate_round_robin(teams: &[Team], match_count: MatchCount) -> Vec<GameMatch> {
    let mut slots: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    if slots.len() % 2 != 0 {
        slots.push(BYE_TEAM_ID);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    let mut schedule: Vec<GameMatch> = Vec::new();
    for round in 0..(n - 1) as u32 {
        for m in 0..n / 2 {
            let team_1 = slots[m];
            let team_2 = slots[n - 1 - m];
            let id = schedule.len() as MatchId;
            if team_1 == BYE_TEAM_ID || team_2 == BYE_TEAM_ID {
                schedule.push(GameMatch::league_bye(id, team_1, team_2, round));
                continue;
            }
            schedule.push(GameMatch::new(id, team_1, team_2, round));
            if match_count == MatchCount::Double {
                schedule.push(GameMatch::new(id + 1, team_2, team_1, round));
            }
        }
        if let Some(last) = slots.pop() {
            slots.insert(1, last);
        }
    }

    log::info!(
        "Generated round robin: {} teams, {} rounds, {} matches",
        teams.len(),
        n - 1,
        schedule.len()
    );
    schedule
}

/// Number of bracket slots for `n` teams: the smallest power of two >= n (0 for no teams).
pub fn bracket_size(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}

/// First-round bracket, seeded with a thread-local RNG.
pub fn generate_tournament(teams: &[Team]) -> Vec<GameMatch> {
    generate_tournament_with_rng(teams, &mut rand::thread_rng())
}

/// First-round bracket (all matches in round 0).
///
/// Pads with byes up to `bracket_size`, shuffles, then pairs consecutive slots.
/// A pairing against a bye is resolved immediately in the real team's favour.
pub fn generate_tournament_with_rng<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Vec<GameMatch> {
    let size = bracket_size(teams.len());
    let mut slots: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    slots.resize(size, BYE_TEAM_ID);
    slots.shuffle(rng);
    separate_byes(&mut slots);

    let schedule: Vec<GameMatch> = slots
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let id = i as MatchId;
            if pair[0] == BYE_TEAM_ID || pair[1] == BYE_TEAM_ID {
                GameMatch::walkover(id, pair[0], pair[1], 0)
            } else {
                GameMatch::new(id, pair[0], pair[1], 0)
            }
        })
        .collect();

    log::info!(
        "Generated bracket: {} teams padded to {}, {} first-round matches ({} byes)",
        teams.len(),
        size,
        schedule.len(),
        size - teams.len()
    );
    schedule
}

/// Break up bye-vs-bye pairs by swapping one bye with a team from a real-vs-real pair.
/// Byes are always fewer than pairs, so a real pair exists whenever a double bye does.
fn separate_byes(slots: &mut [TeamId]) {
    let is_bye = |t: TeamId| t == BYE_TEAM_ID;
    let pairs = slots.len() / 2;
    for p in 0..pairs {
        if !(is_bye(slots[2 * p]) && is_bye(slots[2 * p + 1])) {
            continue;
        }
        let real_pair = (0..pairs).find(|&q| !is_bye(slots[2 * q]) && !is_bye(slots[2 * q + 1]));
        if let Some(q) = real_pair {
            slots.swap(2 * p + 1, 2 * q + 1);
        }
    }
}
