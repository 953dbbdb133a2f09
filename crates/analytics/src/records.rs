use crate::history::LeagueHistory;
use core_types::{Matchup, Season};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single team's weekly score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub score: Decimal,
    pub team: String,
    pub manager: String,
    pub season: Option<i32>,
    pub week: i32,
}

/// A game remembered for its margin of victory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginRecord {
    pub margin: Decimal,
    pub winner: String,
    pub winner_manager: String,
    pub winner_score: Decimal,
    pub loser: String,
    pub loser_manager: String,
    pub loser_score: Decimal,
    pub season: Option<i32>,
    pub week: i32,
}

/// A game remembered for the points both teams put up together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRecord {
    pub total: Decimal,
    pub team1: String,
    pub team1_score: Decimal,
    pub team2: String,
    pub team2_score: Decimal,
    pub season: Option<i32>,
    pub week: i32,
}

/// Extremes found in a set of games. Every field is `None` when no played
/// game qualifies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordBook {
    pub highest_score: Option<ScoreRecord>,
    pub lowest_score: Option<ScoreRecord>,
    pub biggest_blowout: Option<MarginRecord>,
    pub closest_game: Option<MarginRecord>,
    pub highest_combined: Option<CombinedRecord>,
    pub lowest_combined: Option<CombinedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonHighlights {
    pub season: i32,
    pub total_matchups: usize,
    pub regular_season_matchups: usize,
    #[serde(flatten)]
    pub records: RecordBook,
}

/// Single pass over `matchups` tracking running extremes.
///
/// Only games where both teams scored count. All comparisons are strict, so
/// on equal values the first game in iteration order keeps the record.
pub fn scan_records<'a>(
    history: &LeagueHistory,
    matchups: impl IntoIterator<Item = &'a Matchup>,
) -> RecordBook {
    let mut book = RecordBook::default();

    for m in matchups.into_iter().filter(|m| m.is_scored()) {
        let season = history.season_year(m.season_id);

        for (team_id, score) in [(m.team1_id, m.team1_score), (m.team2_id, m.team2_score)] {
            if book.highest_score.as_ref().is_none_or(|r| score > r.score) {
                book.highest_score = Some(score_record(history, m, team_id, score, season));
            }
            if book.lowest_score.as_ref().is_none_or(|r| score < r.score) {
                book.lowest_score = Some(score_record(history, m, team_id, score, season));
            }
        }

        let margin = m.margin();
        if margin > Decimal::ZERO {
            if book.biggest_blowout.as_ref().is_none_or(|r| margin > r.margin) {
                book.biggest_blowout = Some(margin_record(history, m, season));
            }
            if book.closest_game.as_ref().is_none_or(|r| margin < r.margin) {
                book.closest_game = Some(margin_record(history, m, season));
            }
        }

        let total = m.total_points();
        if book.highest_combined.as_ref().is_none_or(|r| total > r.total) {
            book.highest_combined = Some(combined_record(history, m, season));
        }
        if book.lowest_combined.as_ref().is_none_or(|r| total < r.total) {
            book.lowest_combined = Some(combined_record(history, m, season));
        }
    }

    book
}

/// League-wide records across every season.
pub fn all_time_records(history: &LeagueHistory) -> RecordBook {
    scan_records(history, history.matchups())
}

pub fn season_highlights(history: &LeagueHistory, season: &Season) -> SeasonHighlights {
    let matchups: Vec<&Matchup> = history.matchups_in_season(season.id).collect();
    SeasonHighlights {
        season: season.year,
        total_matchups: matchups.len(),
        regular_season_matchups: matchups.iter().filter(|m| m.is_regular_season()).count(),
        records: scan_records(history, matchups.iter().copied()),
    }
}

fn score_record(
    history: &LeagueHistory,
    m: &Matchup,
    team_id: i64,
    score: Decimal,
    season: Option<i32>,
) -> ScoreRecord {
    ScoreRecord {
        score,
        team: history.team_name(team_id).to_string(),
        manager: history.manager_name(team_id).to_string(),
        season,
        week: m.week,
    }
}

fn margin_record(history: &LeagueHistory, m: &Matchup, season: Option<i32>) -> MarginRecord {
    let (winner, winner_score, loser, loser_score) = if m.team1_score > m.team2_score {
        (m.team1_id, m.team1_score, m.team2_id, m.team2_score)
    } else {
        (m.team2_id, m.team2_score, m.team1_id, m.team1_score)
    };
    MarginRecord {
        margin: m.margin().round_dp(2),
        winner: history.team_name(winner).to_string(),
        winner_manager: history.manager_name(winner).to_string(),
        winner_score,
        loser: history.team_name(loser).to_string(),
        loser_manager: history.manager_name(loser).to_string(),
        loser_score,
        season,
        week: m.week,
    }
}

fn combined_record(history: &LeagueHistory, m: &Matchup, season: Option<i32>) -> CombinedRecord {
    CombinedRecord {
        total: m.total_points().round_dp(2),
        team1: history.team_name(m.team1_id).to_string(),
        team1_score: m.team1_score,
        team2: history.team_name(m.team2_id).to_string(),
        team2_score: m.team2_score,
        season,
        week: m.week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_season_has_no_records() {
        let mut fx = Fixture::new();
        fx.season(2024);
        let history = fx.build();
        let highlights = season_highlights(&history, history.season_by_year(2024).unwrap());
        assert_eq!(highlights.total_matchups, 0);
        assert_eq!(highlights.records, RecordBook::default());

        let json = serde_json::to_value(&highlights).unwrap();
        assert!(json["highest_score"].is_null());
    }

    #[test]
    fn scan_tracks_extremes_and_keeps_first_on_ties() {
        let mut fx = Fixture::new();
        let season = fx.season(2023);
        let (a, b, c, d) = (fx.member("A"), fx.member("B"), fx.member("C"), fx.member("D"));
        let ta = fx.team(season, a, "Aces", 0, 0, Decimal::ZERO);
        let tb = fx.team(season, b, "Bears", 0, 0, Decimal::ZERO);
        let tc = fx.team(season, c, "Cats", 0, 0, Decimal::ZERO);
        let td = fx.team(season, d, "Dogs", 0, 0, Decimal::ZERO);

        fx.game(season, 1, (ta, dec!(150.5)), (tb, dec!(80.0)));
        fx.game(season, 1, (tc, dec!(101.0)), (td, dec!(100.5)));
        // Same high score a week later must not replace week 1.
        fx.game(season, 2, (tb, dec!(150.5)), (tc, dec!(90.0)));
        // Same close margin a week later must not replace week 1.
        fx.game(season, 2, (td, dec!(95.0)), (ta, dec!(94.5)));
        // Unplayed game is ignored entirely.
        fx.game(season, 3, (ta, dec!(0)), (tb, dec!(0)));
        let history = fx.build();

        let book = all_time_records(&history);
        let high = book.highest_score.unwrap();
        assert_eq!((high.team.as_str(), high.week), ("Aces", 1));
        let low = book.lowest_score.unwrap();
        assert_eq!((low.score, low.team.as_str()), (dec!(80.0), "Bears"));

        let blowout = book.biggest_blowout.unwrap();
        assert_eq!(blowout.margin, dec!(70.5));
        assert_eq!(blowout.winner, "Aces");
        assert_eq!(blowout.loser_manager, "B");

        let close = book.closest_game.unwrap();
        assert_eq!((close.margin, close.week, close.winner.as_str()), (dec!(0.5), 1, "Cats"));

        assert_eq!(book.highest_combined.unwrap().total, dec!(240.5));
        assert_eq!(book.lowest_combined.unwrap().total, dec!(189.5));
    }

    #[test]
    fn tied_games_never_count_as_closest() {
        let mut fx = Fixture::new();
        let season = fx.season(2019);
        let (a, b) = (fx.member("A"), fx.member("B"));
        let ta = fx.team(season, a, "A", 0, 0, Decimal::ZERO);
        let tb = fx.team(season, b, "B", 0, 0, Decimal::ZERO);
        fx.game(season, 1, (ta, dec!(99)), (tb, dec!(99)));
        let history = fx.build();

        let book = all_time_records(&history);
        assert!(book.closest_game.is_none());
        assert!(book.biggest_blowout.is_none());
        assert!(book.highest_score.is_some());
    }
}
