//! Draft rollups by the NFL team a drafted player belonged to.

use crate::draft::{PickGrade, PickView, grade_all};
use crate::history::LeagueHistory;
use crate::math::average_grade;
use core_types::{DraftPick, Grade};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const NOTABLE_PLAYERS: usize = 5;
const BEST_AND_WORST: usize = 5;

/// Canonical form of an NFL team abbreviation, `None` when blank.
pub fn normalize_abbr(raw: &str) -> Option<String> {
    let abbr = raw.trim().to_uppercase();
    (!abbr.is_empty()).then_some(abbr)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NflTeamSummary {
    pub abbr: String,
    pub total_picks: usize,
    pub total_points: Decimal,
    pub avg_grade: Option<Grade>,
    pub graded_picks: usize,
    pub unique_managers: usize,
    pub seasons_span: Vec<i32>,
    pub top_position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Homer {
    pub member_id: i64,
    pub manager: String,
    pub pick_count: usize,
    pub total_points: Decimal,
    pub avg_grade: Option<Grade>,
    pub seasons_count: usize,
    pub notable_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSlice {
    pub position: String,
    pub count: usize,
    pub total_points: Decimal,
    pub avg_grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NflSeasonSlice {
    pub season: i32,
    pub picks: usize,
    pub total_points: Decimal,
    pub avg_grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NflTeamDetail {
    pub abbr: String,
    pub total_picks: usize,
    pub total_points: Decimal,
    pub avg_grade: Option<Grade>,
    pub homer_leaderboard: Vec<Homer>,
    pub all_picks: Vec<PickView>,
    pub grade_breakdown: BTreeMap<Grade, usize>,
    pub position_breakdown: Vec<PositionSlice>,
    pub best_picks: Vec<PickView>,
    pub worst_picks: Vec<PickView>,
    pub by_season: Vec<NflSeasonSlice>,
}

/// Picks grouped by normalized NFL team; picks without a team are skipped.
fn picks_by_abbr(history: &LeagueHistory) -> BTreeMap<String, Vec<&DraftPick>> {
    let mut groups: BTreeMap<String, Vec<&DraftPick>> = BTreeMap::new();
    for pick in history.draft_picks() {
        if let Some(abbr) = pick.player_team.as_deref().and_then(normalize_abbr) {
            groups.entry(abbr).or_default().push(pick);
        }
    }
    groups
}

fn points(picks: &[&DraftPick]) -> Decimal {
    picks.iter().filter_map(|p| p.season_points).sum::<Decimal>().round_dp(1)
}

fn letter(picks: &[&DraftPick], grades: &HashMap<i64, PickGrade>) -> Option<Grade> {
    average_grade(picks.iter().filter_map(|p| grades.get(&p.id).map(|g| g.grade))).map(|(_, g)| g)
}

/// The position drafted most often; ties go to the alphabetically first.
fn top_position(picks: &[&DraftPick]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for pos in picks.iter().filter_map(|p| p.player_position.as_deref()) {
        *counts.entry(pos).or_default() += 1;
    }
    let max = counts.values().copied().max()?;
    counts.into_iter().find(|(_, c)| *c == max).map(|(pos, _)| pos.to_string())
}

pub fn nfl_teams(history: &LeagueHistory) -> Vec<NflTeamSummary> {
    let grades = grade_all(history);
    let mut teams: Vec<NflTeamSummary> = picks_by_abbr(history)
        .into_iter()
        .map(|(abbr, picks)| {
            let managers: BTreeSet<i64> = picks
                .iter()
                .filter_map(|p| history.manager_of(p.team_id).map(|m| m.id))
                .collect();
            let seasons: BTreeSet<i32> = picks
                .iter()
                .filter_map(|p| history.season_year(p.season_id))
                .collect();
            NflTeamSummary {
                total_picks: picks.len(),
                total_points: points(&picks),
                avg_grade: letter(&picks, &grades),
                graded_picks: picks.iter().filter(|p| grades.contains_key(&p.id)).count(),
                unique_managers: managers.len(),
                seasons_span: seasons.into_iter().collect(),
                top_position: top_position(&picks),
                abbr,
            }
        })
        .collect();
    // Groups come out in abbreviation order, so a stable sort keeps it as the tiebreak.
    teams.sort_by(|a, b| b.total_picks.cmp(&a.total_picks));
    teams
}

/// Everything drafted from one NFL team, or `None` if nothing was.
pub fn nfl_team_detail(history: &LeagueHistory, abbr: &str) -> Option<NflTeamDetail> {
    let abbr = normalize_abbr(abbr)?;
    let mut groups = picks_by_abbr(history);
    let picks = groups.remove(&abbr)?;
    let grades = grade_all(history);

    let mut by_manager: BTreeMap<i64, Vec<&DraftPick>> = BTreeMap::new();
    for pick in picks.iter().copied() {
        if let Some(member) = history.manager_of(pick.team_id) {
            by_manager.entry(member.id).or_default().push(pick);
        }
    }
    let mut homer_leaderboard: Vec<Homer> = by_manager
        .into_iter()
        .map(|(member_id, mine)| {
            let mut notable: Vec<String> = Vec::new();
            for pick in &mine {
                if notable.len() < NOTABLE_PLAYERS && !notable.contains(&pick.player_name) {
                    notable.push(pick.player_name.clone());
                }
            }
            Homer {
                member_id,
                manager: history.member_name(member_id).to_string(),
                pick_count: mine.len(),
                total_points: points(&mine),
                avg_grade: letter(&mine, &grades),
                seasons_count: mine
                    .iter()
                    .filter_map(|p| history.season_year(p.season_id))
                    .collect::<BTreeSet<_>>()
                    .len(),
                notable_players: notable,
            }
        })
        .collect();
    homer_leaderboard.sort_by(|a, b| {
        b.pick_count
            .cmp(&a.pick_count)
            .then_with(|| a.manager.cmp(&b.manager))
    });

    let all_picks: Vec<PickView> = picks
        .iter()
        .map(|p| PickView::new(history, p, grades.get(&p.id)))
        .collect();

    let mut grade_breakdown: BTreeMap<Grade, usize> = BTreeMap::new();
    for grade in all_picks.iter().filter_map(|p| p.grade) {
        *grade_breakdown.entry(grade).or_default() += 1;
    }

    let mut by_position: BTreeMap<String, Vec<&DraftPick>> = BTreeMap::new();
    for pick in picks.iter().copied() {
        let pos = pick.player_position.clone().unwrap_or_else(|| "Unknown".to_string());
        by_position.entry(pos).or_default().push(pick);
    }
    let mut position_breakdown: Vec<PositionSlice> = by_position
        .into_iter()
        .map(|(position, slice)| PositionSlice {
            position,
            count: slice.len(),
            total_points: points(&slice),
            avg_grade: letter(&slice, &grades),
        })
        .collect();
    position_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_year: BTreeMap<i32, Vec<&DraftPick>> = BTreeMap::new();
    for pick in picks.iter().copied() {
        if let Some(year) = history.season_year(pick.season_id) {
            by_year.entry(year).or_default().push(pick);
        }
    }
    let by_season = by_year
        .into_iter()
        .map(|(season, slice)| NflSeasonSlice {
            season,
            picks: slice.len(),
            total_points: points(&slice),
            avg_grade: letter(&slice, &grades),
        })
        .collect();

    let mut graded: Vec<&PickView> = all_picks.iter().filter(|p| p.grade.is_some()).collect();
    let pts = |p: &PickView| p.season_points.unwrap_or_default();
    graded.sort_by(|a, b| a.grade.cmp(&b.grade).then_with(|| pts(*b).cmp(&pts(*a))));
    let best_picks = graded.iter().take(BEST_AND_WORST).map(|p| (*p).clone()).collect();
    graded.sort_by(|a, b| b.grade.cmp(&a.grade).then_with(|| pts(*a).cmp(&pts(*b))));
    let worst_picks = graded.iter().take(BEST_AND_WORST).map(|p| (*p).clone()).collect();

    Some(NflTeamDetail {
        total_picks: picks.len(),
        total_points: points(&picks),
        avg_grade: letter(&picks, &grades),
        abbr,
        homer_leaderboard,
        all_picks,
        grade_breakdown,
        position_breakdown,
        best_picks,
        worst_picks,
        by_season,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use rust_decimal_macros::dec;

    fn league() -> LeagueHistory {
        let mut fx = Fixture::new();
        let season = fx.season(2023);
        let ann = fx.member("Ann");
        let bo = fx.member("Bo");
        let ta = fx.team(season, ann, "Ann FC", 0, 0, Decimal::ZERO);
        let tb = fx.team(season, bo, "Bo FC", 0, 0, Decimal::ZERO);
        fx.pick(season, ta, 1, ("Dak Prescott", "QB", "dal "), Some(dec!(300)));
        fx.pick(season, tb, 2, ("CeeDee Lamb", "WR", "DAL"), Some(dec!(350)));
        fx.pick(season, ta, 3, ("Saquon Barkley", "RB", "NYG"), Some(dec!(100)));
        fx.pick(season, ta, 4, ("Tony Pollard", "RB", "Dal"), None);
        fx.pick(season, tb, 5, ("Nobody", "K", "  "), Some(dec!(90)));
        fx.build()
    }

    #[test]
    fn abbreviations_are_normalized() {
        assert_eq!(normalize_abbr(" dal "), Some("DAL".to_string()));
        assert_eq!(normalize_abbr("   "), None);

        let teams = nfl_teams(&league());
        let abbrs: Vec<&str> = teams.iter().map(|t| t.abbr.as_str()).collect();
        assert_eq!(abbrs, vec!["DAL", "NYG"]);
        assert_eq!(teams[0].total_picks, 3);
        assert_eq!(teams[0].graded_picks, 2);
        assert_eq!(teams[0].unique_managers, 2);
        assert_eq!(teams[0].total_points, dec!(650));
        assert_eq!(teams[0].seasons_span, vec![2023]);
        // QB, RB and WR once each: alphabetical tiebreak.
        assert_eq!(teams[0].top_position.as_deref(), Some("QB"));
    }

    #[test]
    fn detail_builds_homer_leaderboard() {
        let history = league();
        let detail = nfl_team_detail(&history, "dal").unwrap();
        assert_eq!(detail.abbr, "DAL");
        assert_eq!(detail.all_picks.len(), 3);

        let homers: Vec<(&str, usize)> = detail
            .homer_leaderboard
            .iter()
            .map(|h| (h.manager.as_str(), h.pick_count))
            .collect();
        assert_eq!(homers, vec![("Ann", 2), ("Bo", 1)]);
        assert_eq!(detail.homer_leaderboard[0].notable_players, vec!["Dak Prescott", "Tony Pollard"]);

        assert_eq!(detail.grade_breakdown.values().sum::<usize>(), 2);
        assert_eq!(detail.best_picks[0].player_name, "CeeDee Lamb");
        assert_eq!(detail.worst_picks[0].player_name, "Dak Prescott");
        assert_eq!(detail.by_season[0].picks, 3);
        assert!(nfl_team_detail(&history, "SEA").is_none());
    }
}
