use crate::history::LeagueHistory;
use core_types::LuckRating;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckRow {
    pub member_id: i64,
    pub member: String,
    pub actual_wins: i64,
    pub actual_losses: i64,
    /// Sum of weekly all-play win rates, two decimals.
    pub expected_wins: Decimal,
    /// Exactly `actual_wins - expected_wins`.
    pub luck_factor: Decimal,
    pub lucky_wins: i64,
    pub unlucky_losses: i64,
    pub luck_rating: LuckRating,
}

#[derive(Debug, Default)]
struct LuckTally {
    wins: i64,
    losses: i64,
    expected: Decimal,
    lucky_wins: i64,
    unlucky_losses: i64,
}

struct TeamWeek {
    member_id: i64,
    score: Decimal,
    result: Ordering,
}

/// Share of the other scores posted that week which `own` beats outright.
pub fn weekly_expected_wins(week_scores: &[Decimal], own: Decimal) -> Decimal {
    if week_scores.len() < 2 {
        return Decimal::ZERO;
    }
    let beaten = week_scores.iter().filter(|s| **s < own).count();
    Decimal::from(beaten as i64) / Decimal::from(week_scores.len() as i64 - 1)
}

/// Median of a week's scores; the mean of the two middle values for an even count.
pub fn median(scores: &[Decimal]) -> Option<Decimal> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// Luck analysis over every played regular-season game in the league.
///
/// Members without a single game are left out. Ordered by luck factor desc,
/// then member name.
pub fn luck_analysis(history: &LeagueHistory) -> Vec<LuckRow> {
    let mut weeks: BTreeMap<(i64, i32), Vec<TeamWeek>> = BTreeMap::new();
    for m in history
        .matchups()
        .iter()
        .filter(|m| m.is_regular_season() && m.is_scored())
    {
        for team_id in [m.team1_id, m.team2_id] {
            let (Some(team), Some((own, opp, _))) = (history.team(team_id), m.perspective(team_id)) else {
                continue;
            };
            weeks.entry((m.season_id, m.week)).or_default().push(TeamWeek {
                member_id: team.member_id,
                score: own,
                result: own.cmp(&opp),
            });
        }
    }

    let mut tallies: HashMap<i64, LuckTally> = HashMap::new();
    for entries in weeks.values() {
        let scores: Vec<Decimal> = entries.iter().map(|e| e.score).collect();
        let Some(week_median) = median(&scores) else {
            continue;
        };
        for entry in entries {
            let tally = tallies.entry(entry.member_id).or_default();
            tally.expected += weekly_expected_wins(&scores, entry.score);
            match entry.result {
                Ordering::Greater => {
                    tally.wins += 1;
                    if entry.score < week_median {
                        tally.lucky_wins += 1;
                    }
                }
                Ordering::Less => {
                    tally.losses += 1;
                    if entry.score > week_median {
                        tally.unlucky_losses += 1;
                    }
                }
                Ordering::Equal => {}
            }
        }
    }

    let mut rows: Vec<LuckRow> = tallies
        .into_iter()
        .filter_map(|(member_id, tally)| {
            let member = history.member(member_id)?;
            let expected_wins = tally.expected.round_dp(2);
            let luck_factor = Decimal::from(tally.wins) - expected_wins;
            Some(LuckRow {
                member_id,
                member: member.name.clone(),
                actual_wins: tally.wins,
                actual_losses: tally.losses,
                expected_wins,
                luck_factor,
                lucky_wins: tally.lucky_wins,
                unlucky_losses: tally.unlucky_losses,
                luck_rating: LuckRating::from_factor(luck_factor),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.luck_factor
            .cmp(&a.luck_factor)
            .then_with(|| a.member.cmp(&b.member))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    rows
}
