use crate::draft::{PickView, grade_all};
use crate::history::LeagueHistory;
use crate::math::average_grade;
use crate::transactions::TransactionView;
use core_types::{Grade, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHit {
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_team: Option<String>,
    pub player_id: Option<String>,
    pub draft_count: usize,
    pub transaction_count: usize,
}

impl PlayerHit {
    fn appearances(&self) -> usize {
        self.draft_count + self.transaction_count
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Players whose name contains `query`, case-insensitively, most seen first.
///
/// Draft picks and transactions are merged on the normalized name; the first
/// non-empty position and NFL team seen are kept.
pub fn search_players(history: &LeagueHistory, query: &str, limit: usize) -> Vec<PlayerHit> {
    let needle = normalize(query);
    let mut results: Vec<PlayerHit> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut slot = |name: &str, results: &mut Vec<PlayerHit>| -> usize {
        *index.entry(normalize(name)).or_insert_with(|| {
            results.push(PlayerHit {
                player_name: name.trim().to_string(),
                player_position: None,
                player_team: None,
                player_id: None,
                draft_count: 0,
                transaction_count: 0,
            });
            results.len() - 1
        })
    };

    for pick in history.draft_picks() {
        if !normalize(&pick.player_name).contains(&needle) {
            continue;
        }
        let i = slot(&pick.player_name, &mut results);
        let hit = &mut results[i];
        hit.draft_count += 1;
        fill(&mut hit.player_position, &pick.player_position);
        fill(&mut hit.player_team, &pick.player_team);
        fill(&mut hit.player_id, &pick.player_id);
    }
    for tx in history.transactions() {
        if !normalize(&tx.player_name).contains(&needle) {
            continue;
        }
        let i = slot(&tx.player_name, &mut results);
        let hit = &mut results[i];
        hit.transaction_count += 1;
        fill(&mut hit.player_position, &tx.player_position);
        fill(&mut hit.player_id, &tx.player_id);
    }

    results.sort_by(|a, b| b.appearances().cmp(&a.appearances()));
    results.truncate(limit);
    results
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        *slot = value.clone().filter(|v| !v.trim().is_empty());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineEvent {
    Drafted,
    Add,
    Drop,
    Trade,
    Waiver,
}

impl From<TransactionType> for TimelineEvent {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Add => TimelineEvent::Add,
            TransactionType::Drop => TimelineEvent::Drop,
            TransactionType::Trade => TimelineEvent::Trade,
            TransactionType::Waiver => TimelineEvent::Waiver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub event: TimelineEvent,
    pub season: Option<i32>,
    pub detail: String,
    pub manager: String,
    pub member_id: Option<i64>,
    pub team_name: String,
    pub grade: Option<Grade>,
    pub season_points: Option<Decimal>,
    pub round: Option<i32>,
    pub pick_number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSeason {
    pub season: Option<i32>,
    pub points: Decimal,
    pub grade: Option<Grade>,
    pub manager: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub times_drafted: usize,
    pub times_added: usize,
    pub times_dropped: usize,
    pub times_traded: usize,
    pub total_transactions: usize,
    pub seasons_active: Vec<i32>,
    pub managers_drafted_by: Vec<String>,
    pub avg_draft_grade: Option<Grade>,
    pub best_season: Option<BestSeason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHistory {
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_team: Option<String>,
    pub summary: PlayerSummary,
    pub draft_history: Vec<PickView>,
    pub transaction_timeline: Vec<TransactionView>,
    pub timeline: Vec<TimelineEntry>,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A player's full league history, matched case-insensitively on the exact name.
pub fn player_history(history: &LeagueHistory, name: &str) -> Option<PlayerHistory> {
    let key = normalize(name);
    let grades = grade_all(history);

    let draft_history: Vec<PickView> = history
        .draft_picks()
        .iter()
        .filter(|p| normalize(&p.player_name) == key)
        .map(|p| PickView::new(history, p, grades.get(&p.id)))
        .collect();
    let transaction_timeline: Vec<TransactionView> = history
        .transactions()
        .iter()
        .filter(|t| normalize(&t.player_name) == key)
        .map(|t| TransactionView::new(history, t))
        .collect();
    if draft_history.is_empty() && transaction_timeline.is_empty() {
        return None;
    }

    // Most recent draft wins for position and team.
    let player_position = draft_history
        .iter()
        .rev()
        .find_map(|p| p.player_position.clone().filter(|v| !v.is_empty()));
    let player_team = draft_history
        .iter()
        .rev()
        .find_map(|p| p.player_team.clone().filter(|v| !v.is_empty()));

    let mut keyed: Vec<((i32, i32), TimelineEntry)> = Vec::new();
    for pick in &draft_history {
        keyed.push((
            (pick.season.unwrap_or_default(), 0),
            TimelineEntry {
                event: TimelineEvent::Drafted,
                season: pick.season,
                detail: format!("Rd {} Pk {} by {} ({})", pick.round, pick.pick_number, pick.manager, pick.team_name),
                manager: pick.manager.clone(),
                member_id: pick.member_id,
                team_name: pick.team_name.clone(),
                grade: pick.grade,
                season_points: pick.season_points,
                round: Some(pick.round),
                pick_number: Some(pick.pick_number),
            },
        ));
    }
    for tx in &transaction_timeline {
        let week = tx.week.filter(|w| *w > 0);
        let week_note = week.map(|w| format!(" (Week {w})")).unwrap_or_default();
        keyed.push((
            (tx.season.unwrap_or_default(), week.unwrap_or_default() + 1),
            TimelineEntry {
                event: tx.kind.into(),
                season: tx.season,
                detail: format!("{} by {} ({}){}", capitalize(tx.kind.as_str()), tx.manager, tx.team_name, week_note),
                manager: tx.manager.clone(),
                member_id: tx.member_id,
                team_name: tx.team_name.clone(),
                grade: None,
                season_points: None,
                round: None,
                pick_number: None,
            },
        ));
    }
    keyed.sort_by_key(|(sort_key, _)| *sort_key);
    let timeline = keyed.into_iter().map(|(_, entry)| entry).collect();

    let count = |f: fn(TransactionType) -> bool| transaction_timeline.iter().filter(|t| f(t.kind)).count();
    let times_added = count(|k| k.is_pickup());
    let times_dropped = count(|k| k == TransactionType::Drop);
    let times_traded = count(|k| k == TransactionType::Trade);

    let seasons_active: BTreeSet<i32> = draft_history
        .iter()
        .filter_map(|p| p.season)
        .chain(transaction_timeline.iter().filter_map(|t| t.season))
        .collect();
    let managers_drafted_by: BTreeSet<String> = draft_history
        .iter()
        .filter(|p| p.member_id.is_some())
        .map(|p| p.manager.clone())
        .collect();

    let mut best_season: Option<&PickView> = None;
    for pick in &draft_history {
        let points = pick.season_points.unwrap_or_default();
        if points > Decimal::ZERO && best_season.is_none_or(|b| points > b.season_points.unwrap_or_default()) {
            best_season = Some(pick);
        }
    }

    Some(PlayerHistory {
        player_name: name.trim().to_string(),
        player_position,
        player_team,
        summary: PlayerSummary {
            times_drafted: draft_history.len(),
            times_added,
            times_dropped,
            times_traded,
            total_transactions: times_added + times_dropped + times_traded,
            seasons_active: seasons_active.into_iter().collect(),
            managers_drafted_by: managers_drafted_by.into_iter().collect(),
            avg_draft_grade: average_grade(draft_history.iter().filter_map(|p| p.grade)).map(|(_, g)| g),
            best_season: best_season.map(|p| BestSeason {
                season: p.season,
                points: p.season_points.unwrap_or_default(),
                grade: p.grade,
                manager: p.manager.clone(),
            }),
        },
        draft_history,
        transaction_timeline,
        timeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use rust_decimal_macros::dec;

    fn league() -> LeagueHistory {
        let mut fx = Fixture::new();
        let (s1, s2) = (fx.season(2022), fx.season(2023));
        let ann = fx.member("Ann");
        let bo = fx.member("Bo");
        let a1 = fx.team(s1, ann, "Ann 22", 0, 0, Decimal::ZERO);
        let b2 = fx.team(s2, bo, "Bo 23", 0, 0, Decimal::ZERO);
        fx.pick(s1, a1, 1, ("Justin Jefferson", "WR", "MIN"), Some(dec!(320)));
        fx.pick(s2, b2, 1, ("justin jefferson ", "WR", "MIN"), Some(dec!(180)));
        fx.pick(s2, b2, 2, ("Justin Fields", "QB", "CHI"), Some(dec!(200)));
        fx.transaction(s1, a1, TransactionType::Drop, "Justin Fields", Some(10), Decimal::ZERO);
        fx.transaction(s2, b2, TransactionType::Waiver, "Justin Jefferson", Some(3), dec!(40));
        fx.transaction(s2, b2, TransactionType::Trade, "Justin Jefferson", None, Decimal::ZERO);
        fx.build()
    }

    #[test]
    fn search_merges_by_normalized_name() {
        let history = league();
        let hits = search_players(&history, "JUSTIN", 25);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].player_name, "Justin Jefferson");
        assert_eq!((hits[0].draft_count, hits[0].transaction_count), (2, 2));
        assert_eq!(hits[0].player_team.as_deref(), Some("MIN"));
        assert_eq!(hits[1].player_name, "Justin Fields");

        assert_eq!(search_players(&history, "justin", 1).len(), 1);
        assert!(search_players(&history, "mahomes", 25).is_empty());
    }

    #[test]
    fn history_orders_drafts_before_in_season_moves() {
        let history = league();
        let player = player_history(&history, "Justin Jefferson").unwrap();
        let events: Vec<(Option<i32>, TimelineEvent)> =
            player.timeline.iter().map(|e| (e.season, e.event)).collect();
        assert_eq!(
            events,
            vec![
                (Some(2022), TimelineEvent::Drafted),
                (Some(2023), TimelineEvent::Drafted),
                (Some(2023), TimelineEvent::Trade),
                (Some(2023), TimelineEvent::Waiver),
            ]
        );
        assert_eq!(player.timeline[3].detail, "Waiver by Bo (Bo 23) (Week 3)");
        assert_eq!(player.timeline[0].detail, "Rd 1 Pk 1 by Ann (Ann 22)");
    }

    #[test]
    fn history_summary_counts_moves() {
        let history = league();
        let player = player_history(&history, "justin jefferson").unwrap();
        let summary = &player.summary;
        assert_eq!(summary.times_drafted, 2);
        assert_eq!((summary.times_added, summary.times_dropped, summary.times_traded), (1, 0, 1));
        assert_eq!(summary.seasons_active, vec![2022, 2023]);
        assert_eq!(summary.managers_drafted_by, vec!["Ann", "Bo"]);
        let best = summary.best_season.as_ref().unwrap();
        assert_eq!((best.season, best.points), (Some(2022), dec!(320)));
        assert_eq!(player.player_position.as_deref(), Some("WR"));
        assert!(player_history(&history, "Nobody").is_none());
    }
}
