//! League standings: full recompute from the match list and ranking.

use crate::models::{Competition, GameMatch, Team, BYE_TEAM_ID};
use std::cmp::Ordering;

/// Rebuild every team's stats from scratch and return the teams ranked best first.
///
/// Only matches with both scores set and no bye side count.
pub fn recompute_standings(competition: &mut Competition) -> Vec<Team> {
    for team in &mut competition.teams {
        team.reset_stats();
    }

    let results: Vec<_> = competition
        .matches
        .iter()
        .filter(|m| counts_for_standings(m))
        .filter_map(|m| m.scores().map(|(s1, s2)| (m.team_1, m.team_2, s1, s2)))
        .collect();

    for (team_1, team_2, score_1, score_2) in results {
        if let Some(t) = competition.get_team_mut(team_1) {
            t.stats.record(score_1, score_2);
        }
        if let Some(t) = competition.get_team_mut(team_2) {
            t.stats.record(score_2, score_1);
        }
    }

    for team in &mut competition.teams {
        team.stats.gd = i64::from(team.stats.sf) - i64::from(team.stats.sa);
    }

    let mut ranked = competition.teams.clone();
    rank_teams(&mut ranked);
    ranked
}

fn counts_for_standings(m: &GameMatch) -> bool {
    m.team_1 != BYE_TEAM_ID && m.team_2 != BYE_TEAM_ID && m.is_scored()
}

/// Points, then goal difference, then scored-for; all descending.
pub fn compare_teams(a: &Team, b: &Team) -> Ordering {
    b.stats
        .points
        .cmp(&a.stats.points)
        .then_with(|| b.stats.gd.cmp(&a.stats.gd))
        .then_with(|| b.stats.sf.cmp(&a.stats.sf))
}

/// Stable sort by `compare_teams`; full ties keep their input order.
pub fn rank_teams(teams: &mut [Team]) {
    teams.sort_by(compare_teams);
}

/// Render ranked teams as CSV: rank, team, played, won, drawn, lost, sf, sa, gd, points.
pub fn standings_csv(ranked: &[Team]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank", "team", "played", "won", "drawn", "lost", "sf", "sa", "gd", "points",
    ])?;
    for (i, team) in ranked.iter().enumerate() {
        let s = &team.stats;
        writer.write_record([
            (i + 1).to_string(),
            team.name.clone(),
            s.played.to_string(),
            s.won.to_string(),
            s.drawn.to_string(),
            s.lost.to_string(),
            s.sf.to_string(),
            s.sa.to_string(),
            s.gd.to_string(),
            s.points.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
