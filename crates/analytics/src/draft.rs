use crate::history::LeagueHistory;
use crate::math::{average_grade, percentage, ratio};
use core_types::{DraftPick, Grade, Season};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How a graded pick performed relative to where it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickGrade {
    /// 1-based position among the season's graded picks, by overall pick.
    pub draft_rank: usize,
    /// 1-based position among the season's graded picks, by season points.
    pub performance_rank: usize,
    /// `draft_rank - performance_rank`; positive means outperformed the slot.
    pub differential: i64,
    pub grade: Grade,
}

/// Grades are a pure function of the two ranks.
pub fn grade_pick(draft_rank: usize, performance_rank: usize) -> PickGrade {
    let differential = draft_rank as i64 - performance_rank as i64;
    PickGrade {
        draft_rank,
        performance_rank,
        differential,
        grade: Grade::from_differential(differential),
    }
}

/// Grades one season's picks, keyed by pick id.
///
/// Picks without season points are not graded. Equal points keep draft order
/// when assigning performance ranks.
pub fn grade_draft<'a>(picks: impl IntoIterator<Item = &'a DraftPick>) -> HashMap<i64, PickGrade> {
    let mut graded: Vec<(&DraftPick, Decimal)> = picks
        .into_iter()
        .filter_map(|p| p.season_points.map(|pts| (p, pts)))
        .collect();
    graded.sort_by_key(|(p, _)| (p.pick_number, p.id));

    let mut by_points: Vec<usize> = (0..graded.len()).collect();
    by_points.sort_by(|&a, &b| graded[b].1.cmp(&graded[a].1).then(a.cmp(&b)));

    let mut performance_rank = vec![0usize; graded.len()];
    for (rank, &idx) in by_points.iter().enumerate() {
        performance_rank[idx] = rank + 1;
    }

    graded
        .iter()
        .enumerate()
        .map(|(idx, (pick, _))| (pick.id, grade_pick(idx + 1, performance_rank[idx])))
        .collect()
}

/// Grades for every pick in the league, season by season.
pub fn grade_all(history: &LeagueHistory) -> HashMap<i64, PickGrade> {
    history
        .seasons()
        .iter()
        .flat_map(|s| grade_draft(history.picks_in_season(s.id)))
        .collect()
}

/// A draft pick joined with its team, manager and grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickView {
    pub season: Option<i32>,
    pub pick_number: i32,
    pub round: i32,
    pub pick_in_round: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_team: Option<String>,
    pub team_id: i64,
    pub team_name: String,
    pub manager: String,
    pub member_id: Option<i64>,
    pub season_points: Option<Decimal>,
    pub performance_rank: Option<usize>,
    pub differential: Option<i64>,
    pub grade: Option<Grade>,
}

impl PickView {
    pub fn new(history: &LeagueHistory, pick: &DraftPick, grade: Option<&PickGrade>) -> Self {
        Self {
            season: history.season_year(pick.season_id),
            pick_number: pick.pick_number,
            round: pick.round,
            pick_in_round: pick.pick_in_round,
            player_id: pick.player_id.clone(),
            player_name: pick.player_name.clone(),
            player_position: pick.player_position.clone(),
            player_team: pick.player_team.clone(),
            team_id: pick.team_id,
            team_name: history.team_name(pick.team_id).to_string(),
            manager: history.manager_name(pick.team_id).to_string(),
            member_id: history.manager_of(pick.team_id).map(|m| m.id),
            season_points: pick.season_points,
            performance_rank: grade.map(|g| g.performance_rank),
            differential: grade.map(|g| g.differential),
            grade: grade.map(|g| g.grade),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftBoard {
    pub season: i32,
    pub total_picks: usize,
    pub rounds: BTreeMap<i32, Vec<PickView>>,
}

pub fn draft_board(history: &LeagueHistory, season: &Season) -> DraftBoard {
    let grades = grade_draft(history.picks_in_season(season.id));
    let mut rounds: BTreeMap<i32, Vec<PickView>> = BTreeMap::new();
    let mut total_picks = 0;
    for pick in history.picks_in_season(season.id) {
        total_picks += 1;
        rounds
            .entry(pick.round)
            .or_default()
            .push(PickView::new(history, pick, grades.get(&pick.id)));
    }
    DraftBoard {
        season: season.year,
        total_picks,
        rounds,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub team_id: i64,
    pub team_name: String,
    pub manager: String,
    pub member_id: Option<i64>,
    pub overall_grade: Option<Grade>,
    pub avg_grade_value: Option<Decimal>,
    pub total_picks: usize,
    pub graded_picks: usize,
    pub total_season_points: Decimal,
    pub steals_count: usize,
    pub busts_count: usize,
    pub best_pick: Option<String>,
    pub picks: Vec<PickView>,
}

/// One report card per drafting team; best average grade first, ungraded last.
pub fn draft_report_cards(history: &LeagueHistory, season: &Season) -> Vec<ReportCard> {
    let grades = grade_draft(history.picks_in_season(season.id));

    let mut by_team: BTreeMap<i64, Vec<&DraftPick>> = BTreeMap::new();
    for pick in history.picks_in_season(season.id) {
        by_team.entry(pick.team_id).or_default().push(pick);
    }

    let mut cards: Vec<ReportCard> = by_team
        .into_iter()
        .map(|(team_id, picks)| {
            let pick_grades: Vec<Grade> = picks
                .iter()
                .filter_map(|p| grades.get(&p.id).map(|g| g.grade))
                .collect();
            let average = average_grade(pick_grades.iter().copied());

            // Earliest pick wins a tie on points.
            let best = picks
                .iter()
                .filter_map(|p| p.season_points.map(|pts| (*p, pts)))
                .fold(None, |best: Option<(&DraftPick, Decimal)>, (p, pts)| match best {
                    Some((_, top)) if top >= pts => best,
                    _ => Some((p, pts)),
                });

            ReportCard {
                team_id,
                team_name: history.team_name(team_id).to_string(),
                manager: history.manager_name(team_id).to_string(),
                member_id: history.manager_of(team_id).map(|m| m.id),
                overall_grade: average.map(|(_, letter)| letter),
                avg_grade_value: average.map(|(value, _)| value),
                total_picks: picks.len(),
                graded_picks: pick_grades.len(),
                total_season_points: picks
                    .iter()
                    .filter_map(|p| p.season_points)
                    .sum::<Decimal>()
                    .round_dp(1),
                steals_count: pick_grades.iter().filter(|g| g.is_steal()).count(),
                busts_count: pick_grades.iter().filter(|g| g.is_bust()).count(),
                best_pick: best.map(|(p, _)| p.player_name.clone()),
                picks: picks
                    .iter()
                    .map(|p| PickView::new(history, p, grades.get(&p.id)))
                    .collect(),
            }
        })
        .collect();

    cards.sort_by(|a, b| {
        b.avg_grade_value
            .cmp(&a.avg_grade_value)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    cards
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StealsAndBusts {
    pub season: i32,
    pub steals: Vec<PickView>,
    pub busts: Vec<PickView>,
}

/// The `limit` biggest positive and negative differentials of a draft.
pub fn steals_and_busts(history: &LeagueHistory, season: &Season, limit: usize) -> StealsAndBusts {
    let grades = grade_draft(history.picks_in_season(season.id));
    let graded: Vec<(&DraftPick, &PickGrade)> = history
        .picks_in_season(season.id)
        .filter_map(|p| grades.get(&p.id).map(|g| (p, g)))
        .collect();

    let mut steals: Vec<_> = graded.iter().filter(|(_, g)| g.differential > 0).collect();
    steals.sort_by(|a, b| b.1.differential.cmp(&a.1.differential).then(a.1.draft_rank.cmp(&b.1.draft_rank)));
    let mut busts: Vec<_> = graded.iter().filter(|(_, g)| g.differential < 0).collect();
    busts.sort_by(|a, b| a.1.differential.cmp(&b.1.differential).then(a.1.draft_rank.cmp(&b.1.draft_rank)));

    let view = |entry: &&(&DraftPick, &PickGrade)| PickView::new(history, entry.0, Some(entry.1));
    StealsAndBusts {
        season: season.year,
        steals: steals.iter().take(limit).map(view).collect(),
        busts: busts.iter().take(limit).map(view).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSeason {
    pub year: i32,
    pub num_picks: usize,
    pub num_teams: i32,
}

/// Seasons that have draft data, newest first.
pub fn draft_seasons(history: &LeagueHistory) -> Vec<DraftSeason> {
    history
        .seasons()
        .iter()
        .rev()
        .filter_map(|s| {
            let num_picks = history.picks_in_season(s.id).count();
            (num_picks > 0).then_some(DraftSeason {
                year: s.year,
                num_picks,
                num_teams: s.num_teams,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionShare {
    pub position: String,
    pub count: usize,
    pub percentage: Decimal,
    pub avg_points: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOnePick {
    pub season: Option<i32>,
    pub pick_number: i32,
    pub player_name: String,
    pub player_position: Option<String>,
    pub season_points: Option<Decimal>,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftTendencies {
    pub member_id: i64,
    pub member_name: String,
    pub total_picks: usize,
    pub seasons_drafted: usize,
    /// Most drafted position first.
    pub position_breakdown: Vec<PositionShare>,
    pub round_1_history: Vec<RoundOnePick>,
    pub avg_grade: Option<Grade>,
    pub favorite_position: Option<String>,
}

/// A member's drafting habits across every season they drafted in.
pub fn draft_tendencies(history: &LeagueHistory, member_id: i64) -> Option<DraftTendencies> {
    let member = history.member(member_id)?;
    let grades = grade_all(history);
    let team_ids: BTreeSet<i64> = history.teams_of_member(member_id).map(|t| t.id).collect();
    let picks: Vec<&DraftPick> = history
        .draft_picks()
        .iter()
        .filter(|p| team_ids.contains(&p.team_id))
        .collect();

    let mut positions: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for pick in &picks {
        let pos = pick.player_position.clone().unwrap_or_else(|| "Unknown".to_string());
        let entry = positions.entry(pos).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += pick.season_points.unwrap_or_default();
    }
    let mut position_breakdown: Vec<PositionShare> = positions
        .into_iter()
        .map(|(position, (count, points))| PositionShare {
            position,
            count,
            percentage: percentage(count as i64, picks.len() as i64).round_dp(1),
            avg_points: ratio(points, Decimal::from(count as i64)).round_dp(1),
        })
        .collect();
    // Stable sort keeps the alphabetical order among equal counts.
    position_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let round_1_history = picks
        .iter()
        .filter(|p| p.round == 1)
        .map(|p| RoundOnePick {
            season: history.season_year(p.season_id),
            pick_number: p.pick_number,
            player_name: p.player_name.clone(),
            player_position: p.player_position.clone(),
            season_points: p.season_points,
            grade: grades.get(&p.id).map(|g| g.grade),
        })
        .collect();

    let seasons_drafted = picks
        .iter()
        .filter_map(|p| history.season_year(p.season_id))
        .collect::<BTreeSet<_>>()
        .len();

    Some(DraftTendencies {
        member_id,
        member_name: member.name.clone(),
        total_picks: picks.len(),
        seasons_drafted,
        favorite_position: position_breakdown.first().map(|p| p.position.clone()),
        position_breakdown,
        round_1_history,
        avg_grade: average_grade(picks.iter().filter_map(|p| grades.get(&p.id).map(|g| g.grade)))
            .map(|(_, letter)| letter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use rust_decimal_macros::dec;

    #[test]
    fn grade_is_pure_function_of_ranks() {
        assert_eq!(grade_pick(60, 5), grade_pick(60, 5));
        assert_eq!(grade_pick(60, 5).grade, Grade::APlus);
        assert_eq!(grade_pick(5, 60).grade, Grade::F);
        assert_eq!(grade_pick(20, 20).grade, Grade::C);
        assert_eq!(grade_pick(40, 10).differential, 30);
    }

    /// A 12-team, 5-round draft where later picks score more.
    fn inverted_draft() -> (LeagueHistory, i64) {
        let mut fx = Fixture::new();
        let season = fx.season(2023);
        let teams: Vec<i64> = (0..12)
            .map(|i| {
                let m = fx.member(&format!("M{i:02}"));
                fx.team(season, m, &format!("T{i:02}"), 0, 0, Decimal::ZERO)
            })
            .collect();
        for pick in 1..=60 {
            let team = teams[((pick - 1) % 12) as usize];
            let name = format!("Player {pick}");
            fx.pick(season, team, pick, (name.as_str(), "RB", "dal"), Some(Decimal::from(pick * 5)));
        }
        // Never played: must stay ungraded.
        fx.pick(season, teams[0], 61, ("Injured Guy", "WR", "NYG"), None);
        (fx.build(), season)
    }

    #[test]
    fn ungraded_picks_are_excluded() {
        let (history, season) = inverted_draft();
        let grades = grade_draft(history.picks_in_season(season));
        assert_eq!(grades.len(), 60);
        let injured = history
            .draft_picks()
            .iter()
            .find(|p| p.player_name == "Injured Guy")
            .unwrap();
        assert!(!grades.contains_key(&injured.id));
    }

    #[test]
    fn performance_rank_inverts_draft_rank() {
        let (history, season) = inverted_draft();
        let grades = grade_draft(history.picks_in_season(season));
        let last = history.draft_picks().iter().find(|p| p.pick_number == 60).unwrap();
        let g = grades[&last.id];
        assert_eq!((g.draft_rank, g.performance_rank, g.differential), (60, 1, 59));
        assert_eq!(g.grade, Grade::APlus);
    }

    #[test]
    fn equal_points_keep_draft_order() {
        let mut fx = Fixture::new();
        let season = fx.season(2022);
        let m = fx.member("M");
        let t = fx.team(season, m, "T", 0, 0, Decimal::ZERO);
        let first = fx.pick(season, t, 1, ("A", "QB", "KC"), Some(dec!(100)));
        let second = fx.pick(season, t, 2, ("B", "QB", "KC"), Some(dec!(100)));
        let history = fx.build();
        let grades = grade_draft(history.draft_picks());
        assert_eq!(grades[&first].performance_rank, 1);
        assert_eq!(grades[&second].performance_rank, 2);
    }

    #[test]
    fn steals_and_busts_are_ordered_by_differential() {
        let (history, season_id) = inverted_draft();
        let season = history.season(season_id).unwrap();
        let result = steals_and_busts(&history, season, 3);
        let steal_picks: Vec<i32> = result.steals.iter().map(|p| p.pick_number).collect();
        let bust_picks: Vec<i32> = result.busts.iter().map(|p| p.pick_number).collect();
        assert_eq!(steal_picks, vec![60, 59, 58]);
        assert_eq!(bust_picks, vec![1, 2, 3]);
        assert_eq!(result.busts[0].differential, Some(-59));
    }

    #[test]
    fn report_cards_summarize_each_team() {
        let (history, season_id) = inverted_draft();
        let season = history.season(season_id).unwrap();
        let cards = draft_report_cards(&history, season);
        assert_eq!(cards.len(), 12);

        let first = cards.iter().find(|c| c.team_name == "T00").unwrap();
        assert_eq!(first.total_picks, 6);
        assert_eq!(first.graded_picks, 5);
        assert_eq!(first.best_pick.as_deref(), Some("Player 49"));
        assert!(first.overall_grade.is_some());

        // Later slots benefit most in an inverted draft.
        assert_eq!(cards[0].team_name, "T11");
        assert!(cards.windows(2).all(|w| w[0].avg_grade_value >= w[1].avg_grade_value));
    }

    #[test]
    fn board_groups_by_round_and_tendencies_track_positions() {
        let (history, season_id) = inverted_draft();
        let season = history.season(season_id).unwrap();
        let board = draft_board(&history, season);
        assert_eq!(board.total_picks, 61);
        assert_eq!(board.rounds[&1].len(), 12);
        assert_eq!(board.rounds[&6].len(), 1);
        assert_eq!(board.rounds[&6][0].grade, None);

        let member = history.manager_of(board.rounds[&1][0].team_id).unwrap().id;
        let tendencies = draft_tendencies(&history, member).unwrap();
        assert_eq!(tendencies.total_picks, 6);
        assert_eq!(tendencies.favorite_position.as_deref(), Some("RB"));
        assert_eq!(tendencies.position_breakdown[0].count, 5);
        assert_eq!(tendencies.round_1_history.len(), 1);
        assert_eq!(draft_seasons(&history)[0].num_picks, 61);
    }
}
