use crate::history::LeagueHistory;
use core_types::{Matchup, Season};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupView {
    pub id: i64,
    pub season: Option<i32>,
    pub week: i32,
    pub team1_name: String,
    pub team1_manager: String,
    pub team1_score: Decimal,
    pub team2_name: String,
    pub team2_manager: String,
    pub team2_score: Decimal,
    /// Manager of the winning team; `None` for ties.
    pub winner_manager: Option<String>,
    pub is_playoff: bool,
    pub is_championship: bool,
    pub point_differential: Decimal,
}

impl MatchupView {
    pub fn new(history: &LeagueHistory, m: &Matchup) -> Self {
        Self {
            id: m.id,
            season: history.season_year(m.season_id),
            week: m.week,
            team1_name: history.team_name(m.team1_id).to_string(),
            team1_manager: history.manager_name(m.team1_id).to_string(),
            team1_score: m.team1_score,
            team2_name: history.team_name(m.team2_id).to_string(),
            team2_manager: history.manager_name(m.team2_id).to_string(),
            team2_score: m.team2_score,
            winner_manager: m.winner_id().map(|id| history.manager_name(id).to_string()),
            is_playoff: m.is_playoff,
            is_championship: m.is_championship,
            point_differential: m.margin().round_dp(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonMatchups {
    pub season: i32,
    pub week: Option<i32>,
    pub matchups: Vec<MatchupView>,
}

/// A season's games in week order, optionally narrowed to one week.
pub fn season_matchups(history: &LeagueHistory, season: &Season, week: Option<i32>) -> SeasonMatchups {
    SeasonMatchups {
        season: season.year,
        week,
        matchups: history
            .matchups_in_season(season.id)
            .filter(|m| week.is_none_or(|w| m.week == w))
            .map(|m| MatchupView::new(history, m))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayoffBracket {
    pub season: i32,
    pub playoff_rounds: BTreeMap<i32, Vec<MatchupView>>,
}

pub fn playoff_bracket(history: &LeagueHistory, season: &Season) -> PlayoffBracket {
    let mut playoff_rounds: BTreeMap<i32, Vec<MatchupView>> = BTreeMap::new();
    for m in history.matchups_in_season(season.id).filter(|m| m.is_playoff) {
        playoff_rounds.entry(m.week).or_default().push(MatchupView::new(history, m));
    }
    PlayoffBracket {
        season: season.year,
        playoff_rounds,
    }
}

/// One team's score in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyScore {
    pub season: Option<i32>,
    pub week: i32,
    pub team_name: String,
    pub manager: String,
    pub score: Decimal,
    pub won: bool,
    pub is_playoff: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blowout {
    pub season: Option<i32>,
    pub week: i32,
    pub winner_name: String,
    pub winner_manager: String,
    pub winner_score: Decimal,
    pub loser_name: String,
    pub loser_manager: String,
    pub loser_score: Decimal,
    pub margin: Decimal,
    pub is_playoff: bool,
}

fn scored(history: &LeagueHistory) -> impl Iterator<Item = &Matchup> {
    history.matchups().iter().filter(|m| m.is_scored())
}

/// Smallest margins first, among games where both teams scored.
pub fn close_games(history: &LeagueHistory, limit: usize) -> Vec<MatchupView> {
    let mut games: Vec<&Matchup> = scored(history).collect();
    games.sort_by_key(|m| m.margin());
    games.into_iter().take(limit).map(|m| MatchupView::new(history, m)).collect()
}

/// Largest margins first, among games where both teams scored.
pub fn blowouts(history: &LeagueHistory, limit: usize) -> Vec<Blowout> {
    let mut games: Vec<&Matchup> = scored(history).collect();
    games.sort_by(|a, b| b.margin().cmp(&a.margin()));
    games
        .into_iter()
        .take(limit)
        .map(|m| {
            let (winner, winner_score, loser, loser_score) = if m.team1_score > m.team2_score {
                (m.team1_id, m.team1_score, m.team2_id, m.team2_score)
            } else {
                (m.team2_id, m.team2_score, m.team1_id, m.team1_score)
            };
            Blowout {
                season: history.season_year(m.season_id),
                week: m.week,
                winner_name: history.team_name(winner).to_string(),
                winner_manager: history.manager_name(winner).to_string(),
                winner_score,
                loser_name: history.team_name(loser).to_string(),
                loser_manager: history.manager_name(loser).to_string(),
                loser_score,
                margin: m.margin().round_dp(2),
                is_playoff: m.is_playoff,
            }
        })
        .collect()
}

fn weekly_scores<'a>(
    history: &'a LeagueHistory,
    games: impl Iterator<Item = &'a Matchup> + 'a,
) -> impl Iterator<Item = WeeklyScore> + 'a {
    games.flat_map(move |m| {
        [(m.team1_id, m.team1_score), (m.team2_id, m.team2_score)].map(|(team_id, score)| WeeklyScore {
            season: history.season_year(m.season_id),
            week: m.week,
            team_name: history.team_name(team_id).to_string(),
            manager: history.manager_name(team_id).to_string(),
            score,
            won: m.winner_id() == Some(team_id),
            is_playoff: m.is_playoff,
        })
    })
}

/// Best single-team scores across every game.
pub fn highest_scores(history: &LeagueHistory, limit: usize) -> Vec<WeeklyScore> {
    let mut scores: Vec<WeeklyScore> = weekly_scores(history, history.matchups().iter()).collect();
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(limit);
    scores
}

/// Worst single-team scores; unplayed games are left out.
pub fn lowest_scores(history: &LeagueHistory, limit: usize) -> Vec<WeeklyScore> {
    let mut scores: Vec<WeeklyScore> = weekly_scores(history, scored(history)).collect();
    scores.sort_by_key(|s| s.score);
    scores.truncate(limit);
    scores
}
