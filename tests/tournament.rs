//! Integration tests for bracket generation and round progression.

use rand::rngs::StdRng;
use rand::SeedableRng;
use scoreboard_web::{
    advance_round, bracket_size, check_round_advance, generate_tournament_with_rng, record_score,
    start_competition_with_rng, Competition, CompetitionConfig, CompetitionError, GameMatch,
    MatchCount, MatchId, RoundProgress, ScoreOutcome, Side, Team, TeamId, BYE_TEAM_ID,
};
use std::collections::HashSet;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("T{i}")).collect()
}

fn tournament(n: usize, seed: u64) -> Competition {
    let mut rng = StdRng::seed_from_u64(seed);
    start_competition_with_rng(&names(n), CompetitionConfig::tournament(), &mut rng)
}

fn decline(_: u32) -> bool {
    false
}

/// Score every open match of the current round 3-1 for team 1, declining to advance.
/// Returns the outcome of the last edit.
fn play_current_round(c: &mut Competition) -> Option<ScoreOutcome> {
    let open: Vec<MatchId> = c
        .round_matches(c.tournament_stage)
        .iter()
        .filter(|m| !m.is_scored())
        .map(|m| m.id)
        .collect();
    let mut last = None;
    for id in open {
        record_score(c, id, Side::One, Some(3), &mut decline).unwrap();
        last = Some(record_score(c, id, Side::Two, Some(1), &mut decline).unwrap());
    }
    last
}

#[test]
fn bracket_size_is_next_power_of_two() {
    assert_eq!(bracket_size(0), 0);
    assert_eq!(bracket_size(1), 1);
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(3), 4);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(bracket_size(8), 8);
    assert_eq!(bracket_size(9), 16);
}

#[test]
fn first_round_places_every_team_once() {
    for n in 2..=12 {
        let teams: Vec<Team> = (0..n).map(|i| Team::new(i as TeamId, format!("T{i}"))).collect();
        let schedule = generate_tournament_with_rng(&teams, &mut StdRng::seed_from_u64(n as u64));
        assert_eq!(schedule.len(), bracket_size(n) / 2);
        assert!(schedule.iter().all(|m| m.round == 0));

        let mut seen = HashSet::new();
        for m in &schedule {
            assert!(
                !(m.team_1 == BYE_TEAM_ID && m.team_2 == BYE_TEAM_ID),
                "bye met bye with {} teams",
                n
            );
            for team in [m.team_1, m.team_2] {
                if team != BYE_TEAM_ID {
                    assert!(seen.insert(team));
                }
            }
        }
        assert_eq!(seen.len(), n);
    }
}

#[test]
fn walkovers_go_to_the_real_team() {
    for seed in 0..20 {
        let c = tournament(5, seed);
        let byes: Vec<_> = c.matches.iter().filter(|m| m.is_bye).collect();
        assert_eq!(byes.len(), 3);
        for m in byes {
            let winner = m.winner().unwrap();
            assert_ne!(winner, BYE_TEAM_ID);
            let expected = if m.team_1 == BYE_TEAM_ID { (0, 1) } else { (1, 0) };
            assert_eq!(m.scores(), Some(expected));
        }
    }
}

#[test]
fn six_teams_play_down_to_a_champion() {
    let mut c = tournament(6, 7);
    assert_eq!(c.matches.len(), 4);
    assert_eq!(c.matches.iter().filter(|m| m.is_bye).count(), 2);

    let last = play_current_round(&mut c).unwrap();
    assert_eq!(last, ScoreOutcome::Round(RoundProgress::AwaitingConfirmation { round: 0 }));
    assert_eq!(c.tournament_stage, 0);

    let progress = check_round_advance(&mut c, &mut |_: u32| true).unwrap();
    assert_eq!(
        progress,
        RoundProgress::Advanced {
            round: 1,
            new_matches: vec![4, 5]
        }
    );
    assert_eq!(c.round_matches(1).len(), 2);
    assert!(c.round_matches(1).iter().all(|m| !m.is_bye));

    play_current_round(&mut c);
    let progress = advance_round(&mut c, 1).unwrap();
    assert_eq!(
        progress,
        RoundProgress::Advanced {
            round: 2,
            new_matches: vec![6]
        }
    );

    let final_match = c.round_matches(2)[0].clone();
    let last = play_current_round(&mut c).unwrap();
    assert_eq!(
        last,
        ScoreOutcome::Round(RoundProgress::Champion {
            team: final_match.team_1
        })
    );
    assert_eq!(c.champion, Some(final_match.team_1));

    // Earlier rounds are kept and ids never reused.
    let ids: Vec<MatchId> = c.matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, (0..7).collect::<Vec<_>>());
}

#[test]
fn three_teams_walkover_counts_as_finished() {
    let mut c = tournament(3, 11);
    assert_eq!(c.matches.len(), 2);
    assert_eq!(c.matches.iter().filter(|m| m.is_bye).count(), 1);

    assert_eq!(
        check_round_advance(&mut c, &mut decline).unwrap(),
        RoundProgress::InProgress {
            round: 0,
            remaining: 1
        }
    );

    let real = c.matches.iter().find(|m| !m.is_bye).unwrap().id;
    let mut asked = Vec::new();
    let mut gate = |round: u32| {
        asked.push(round);
        false
    };
    record_score(&mut c, real, Side::One, Some(0), &mut gate).unwrap();
    let outcome = record_score(&mut c, real, Side::Two, Some(2), &mut gate).unwrap();
    assert_eq!(outcome, ScoreOutcome::Round(RoundProgress::AwaitingConfirmation { round: 0 }));
    assert_eq!(asked, vec![0]);

    let progress = advance_round(&mut c, 0).unwrap();
    assert_eq!(
        progress,
        RoundProgress::Advanced {
            round: 1,
            new_matches: vec![2]
        }
    );
    let final_match = &c.matches[2];
    assert!(!final_match.is_bye);
    assert!(final_match.involves(c.matches[real as usize].team_2));
}

#[test]
fn declined_advance_leaves_state_unchanged() {
    let mut c = tournament(4, 3);
    play_current_round(&mut c);
    let before = c.matches.clone();

    let progress = check_round_advance(&mut c, &mut decline).unwrap();
    assert_eq!(progress, RoundProgress::AwaitingConfirmation { round: 0 });
    assert_eq!(c.matches, before);
    assert_eq!(c.tournament_stage, 0);

    // Asked again on the next check.
    let progress = check_round_advance(&mut c, &mut |_: u32| true).unwrap();
    assert!(matches!(progress, RoundProgress::Advanced { round: 1, .. }));
}

#[test]
fn odd_winner_count_gets_a_walkover() {
    let teams: Vec<Team> = (0..6).map(|i| Team::new(i, format!("T{i}"))).collect();
    let mut c = Competition::new(teams, CompetitionConfig::tournament());
    c.matches = vec![
        GameMatch::new(0, 0, 1, 0),
        GameMatch::new(1, 2, 3, 0),
        GameMatch::new(2, 4, 5, 0),
    ];
    for m in &mut c.matches {
        m.score_1 = Some(2);
        m.score_2 = Some(0);
    }

    let progress = check_round_advance(&mut c, &mut |_: u32| true).unwrap();
    assert_eq!(
        progress,
        RoundProgress::Advanced {
            round: 1,
            new_matches: vec![3, 4]
        }
    );
    let walkover = &c.matches[4];
    assert_eq!((walkover.team_1, walkover.team_2), (4, BYE_TEAM_ID));
    assert!(walkover.is_bye);
    assert_eq!(walkover.scores(), Some((1, 0)));
}

#[test]
fn tie_goes_to_first_slot() {
    let mut m = GameMatch::new(0, 3, 4, 0);
    assert_eq!(m.winner(), None);
    m.set_score(Side::One, Some(2));
    assert_eq!(m.winner(), None);
    m.set_score(Side::Two, Some(2));
    assert_eq!(m.winner(), Some(3));
}

#[test]
fn closed_and_bye_matches_reject_edits() {
    let mut c = tournament(3, 5);
    let bye = c.matches.iter().find(|m| m.is_bye).unwrap().id;
    assert_eq!(
        record_score(&mut c, bye, Side::One, Some(4), &mut decline),
        Err(CompetitionError::ByeMatch(bye))
    );

    let real = c.matches.iter().find(|m| !m.is_bye).unwrap().id;
    play_current_round(&mut c);
    advance_round(&mut c, 0).unwrap();
    assert_eq!(
        record_score(&mut c, real, Side::One, None, &mut decline),
        Err(CompetitionError::RoundClosed(real))
    );
    assert_eq!(
        record_score(&mut c, 99, Side::One, Some(1), &mut decline),
        Err(CompetitionError::MatchNotFound(99))
    );
}

#[test]
fn stale_confirmation_is_rejected() {
    let mut c = tournament(4, 9);
    play_current_round(&mut c);
    advance_round(&mut c, 0).unwrap();
    assert_eq!(
        advance_round(&mut c, 0),
        Err(CompetitionError::StaleRound {
            expected: 0,
            current: 1
        })
    );
}

#[test]
fn clearing_the_final_withdraws_the_champion() {
    let mut c = tournament(2, 1);
    play_current_round(&mut c);
    assert!(c.champion.is_some());
    record_score(&mut c, 0, Side::Two, None, &mut decline).unwrap();
    assert_eq!(c.champion, None);
}

#[test]
fn degenerate_brackets() {
    let mut empty = tournament(0, 0);
    assert!(empty.matches.is_empty());
    assert_eq!(
        check_round_advance(&mut empty, &mut decline).unwrap(),
        RoundProgress::NoMatches
    );

    let mut lone = tournament(1, 0);
    assert!(lone.matches.is_empty());
    assert_eq!(
        check_round_advance(&mut lone, &mut decline).unwrap(),
        RoundProgress::Champion { team: 0 }
    );
    assert_eq!(lone.champion, Some(0));
}

#[test]
fn league_has_no_bracket() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut c = start_competition_with_rng(
        &names(4),
        CompetitionConfig::league(MatchCount::Single),
        &mut rng,
    );
    assert!(matches!(
        check_round_advance(&mut c, &mut decline),
        Err(CompetitionError::WrongKind(_))
    ));
}

#[test]
fn lone_entrant_is_champion_from_the_start() {
    let c = tournament(1, 0);
    assert_eq!(c.champion, Some(0));

    let c = tournament(4, 0);
    assert_eq!(c.champion, None);
    assert_eq!(c.tournament_stage, 0);
}
