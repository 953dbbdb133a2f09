use crate::history::LeagueHistory;
use chrono::{DateTime, Utc};
use core_types::{Season, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

const TOP_PICKUPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub season: Option<i32>,
    pub timestamp: Option<DateTime<Utc>>,
    pub week: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub team_id: i64,
    pub team_name: String,
    pub manager: String,
    pub member_id: Option<i64>,
    pub games_played: i32,
    pub points_scored: Decimal,
}

impl TransactionView {
    pub fn new(history: &LeagueHistory, tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind,
            season: history.season_year(tx.season_id),
            timestamp: tx.timestamp,
            week: tx.week,
            player_id: tx.player_id.clone(),
            player_name: tx.player_name.clone(),
            player_position: tx.player_position.clone(),
            team_id: tx.team_id,
            team_name: history.team_name(tx.team_id).to_string(),
            manager: history.manager_name(tx.team_id).to_string(),
            member_id: history.manager_of(tx.team_id).map(|m| m.id),
            games_played: tx.games_played,
            points_scored: tx.points_scored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTransactions {
    pub season: i32,
    pub total: usize,
    pub type_breakdown: BTreeMap<TransactionType, usize>,
    pub transactions: Vec<TransactionView>,
}

/// Newest first. Undated moves sort after dated ones.
fn newest_first(a: &&Transaction, b: &&Transaction) -> std::cmp::Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| b.id.cmp(&a.id))
}

fn type_breakdown<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> BTreeMap<TransactionType, usize> {
    let mut counts = BTreeMap::new();
    for tx in txs {
        *counts.entry(tx.kind).or_default() += 1;
    }
    counts
}

pub fn season_transactions(
    history: &LeagueHistory,
    season: &Season,
    filter: Option<TransactionType>,
) -> SeasonTransactions {
    let mut txs: Vec<&Transaction> = history
        .transactions_in_season(season.id)
        .filter(|tx| filter.is_none_or(|kind| tx.kind == kind))
        .collect();
    txs.sort_by(newest_first);

    SeasonTransactions {
        season: season.year,
        total: txs.len(),
        type_breakdown: type_breakdown(txs.iter().copied()),
        transactions: txs.iter().map(|tx| TransactionView::new(history, tx)).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonActivity {
    pub year: i32,
    pub total: usize,
    pub type_breakdown: BTreeMap<TransactionType, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pickup {
    pub player_name: String,
    pub player_position: Option<String>,
    pub season: Option<i32>,
    pub points_scored: Decimal,
    pub games_played: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberActivity {
    pub member_id: i64,
    pub member_name: String,
    pub total_transactions: usize,
    pub type_breakdown: BTreeMap<TransactionType, usize>,
    /// Newest season first.
    pub season_activity: Vec<SeasonActivity>,
    pub top_waiver_pickups: Vec<Pickup>,
}

/// Every move made by any of a member's teams.
pub fn member_activity(history: &LeagueHistory, member_id: i64) -> Option<MemberActivity> {
    let member = history.member(member_id)?;
    let team_ids: BTreeSet<i64> = history.teams_of_member(member_id).map(|t| t.id).collect();
    let mut txs: Vec<&Transaction> = history
        .transactions()
        .iter()
        .filter(|tx| team_ids.contains(&tx.team_id))
        .collect();
    txs.sort_by(newest_first);

    let mut by_year: BTreeMap<Reverse<i32>, Vec<&Transaction>> = BTreeMap::new();
    for tx in txs.iter().copied() {
        let year = history.season_year(tx.season_id).unwrap_or_default();
        by_year.entry(Reverse(year)).or_default().push(tx);
    }
    let season_activity = by_year
        .into_iter()
        .map(|(Reverse(year), season_txs)| SeasonActivity {
            year,
            total: season_txs.len(),
            type_breakdown: type_breakdown(season_txs),
        })
        .collect();

    let mut pickups: Vec<&&Transaction> = txs
        .iter()
        .filter(|tx| tx.kind.is_pickup() && tx.points_scored > Decimal::ZERO)
        .collect();
    pickups.sort_by(|a, b| b.points_scored.cmp(&a.points_scored));

    Some(MemberActivity {
        member_id,
        member_name: member.name.clone(),
        total_transactions: txs.len(),
        type_breakdown: type_breakdown(txs.iter().copied()),
        season_activity,
        top_waiver_pickups: pickups
            .into_iter()
            .take(TOP_PICKUPS)
            .map(|tx| Pickup {
                player_name: tx.player_name.clone(),
                player_position: tx.player_position.clone(),
                season: history.season_year(tx.season_id),
                points_scored: tx.points_scored,
                games_played: tx.games_played,
            })
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaiverWireWins {
    pub season: i32,
    pub waiver_wins: Vec<TransactionView>,
}

/// The season's add and waiver claims that scored the most afterwards.
pub fn waiver_wire_wins(history: &LeagueHistory, season: &Season, limit: usize) -> WaiverWireWins {
    let mut adds: Vec<&Transaction> = history
        .transactions_in_season(season.id)
        .filter(|tx| tx.kind.is_pickup())
        .collect();
    adds.sort_by(|a, b| b.points_scored.cmp(&a.points_scored));

    WaiverWireWins {
        season: season.year,
        waiver_wins: adds
            .into_iter()
            .take(limit)
            .map(|tx| TransactionView::new(history, tx))
            .collect(),
    }
}
