use crate::history::LeagueHistory;
use crate::math::percentage;
use crate::members::by_name;
use core_types::Member;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Minimum meetings before a head-to-head series can be a rivalry.
const RIVALRY_MIN_GAMES: i64 = 3;
const RIVALRY_THRESHOLD: Decimal = dec!(30);
const MAX_RIVALRIES: usize = 5;

/// One member's all-time record against one opponent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadRecord {
    pub opponent_id: i64,
    pub opponent_name: String,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub total_games: i64,
    pub win_pct: Decimal,
    pub points_for: Decimal,
    pub points_against: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub member_id: i64,
    pub member_name: String,
    pub opponents: Vec<HeadToHeadRecord>,
}

/// Every ordered pair of distinct members. Rows and opponents are ordered by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadMatrix {
    pub members: Vec<String>,
    pub matrix: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberHeadToHead {
    pub member_id: i64,
    pub member: String,
    pub head_to_head: Vec<HeadToHeadRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RivalryClass {
    #[serde(rename = "Heated Rivalry")]
    Heated,
    Competitive,
    Developing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rivalry {
    #[serde(flatten)]
    pub record: HeadToHeadRecord,
    pub rivalry_score: Decimal,
    pub classification: RivalryClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRivalries {
    pub member_id: i64,
    pub member: String,
    pub rivalries: Vec<Rivalry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PairTally {
    wins: i64,
    losses: i64,
    ties: i64,
    points_for: Decimal,
    points_against: Decimal,
}

/// Tallies keyed by `(member, opponent)`, counting every game (regular season
/// and playoffs) from both sides. Games between two teams of the same member
/// are skipped.
fn pair_tallies(history: &LeagueHistory) -> HashMap<(i64, i64), PairTally> {
    let mut tallies: HashMap<(i64, i64), PairTally> = HashMap::new();
    for m in history.matchups() {
        let (Some(t1), Some(t2)) = (history.team(m.team1_id), history.team(m.team2_id)) else {
            continue;
        };
        if t1.member_id == t2.member_id {
            continue;
        }
        for (me, opp, own, against) in [
            (t1.member_id, t2.member_id, m.team1_score, m.team2_score),
            (t2.member_id, t1.member_id, m.team2_score, m.team1_score),
        ] {
            let tally = tallies.entry((me, opp)).or_default();
            tally.points_for += own;
            tally.points_against += against;
            match own.cmp(&against) {
                Ordering::Greater => tally.wins += 1,
                Ordering::Less => tally.losses += 1,
                Ordering::Equal => tally.ties += 1,
            }
        }
    }
    tallies
}

fn to_record(opponent: &Member, tally: PairTally) -> HeadToHeadRecord {
    let total_games = tally.wins + tally.losses + tally.ties;
    HeadToHeadRecord {
        opponent_id: opponent.id,
        opponent_name: opponent.name.clone(),
        wins: tally.wins,
        losses: tally.losses,
        ties: tally.ties,
        total_games,
        win_pct: percentage(tally.wins, total_games).round_dp(1),
        points_for: tally.points_for.round_dp(2),
        points_against: tally.points_against.round_dp(2),
    }
}

pub fn head_to_head_matrix(history: &LeagueHistory) -> HeadToHeadMatrix {
    let tallies = pair_tallies(history);
    let mut members: Vec<&Member> = history.members().iter().collect();
    members.sort_by(|a, b| by_name(a, b));

    let matrix = members
        .iter()
        .map(|me| MatrixRow {
            member_id: me.id,
            member_name: me.name.clone(),
            opponents: members
                .iter()
                .filter(|opp| opp.id != me.id)
                .map(|opp| to_record(opp, tallies.get(&(me.id, opp.id)).copied().unwrap_or_default()))
                .collect(),
        })
        .collect();

    HeadToHeadMatrix {
        members: members.iter().map(|m| m.name.clone()).collect(),
        matrix,
    }
}

/// Opponents `member_id` has actually played, best win% first.
pub fn member_head_to_head(history: &LeagueHistory, member_id: i64) -> Option<MemberHeadToHead> {
    let member = history.member(member_id)?;
    let mut records: Vec<HeadToHeadRecord> = pair_tallies(history)
        .into_iter()
        .filter(|((me, _), _)| *me == member_id)
        .filter_map(|((_, opp), tally)| history.member(opp).map(|o| to_record(o, tally)))
        .collect();
    records.sort_by(|a, b| {
        b.win_pct
            .cmp(&a.win_pct)
            .then_with(|| a.opponent_name.cmp(&b.opponent_name))
            .then_with(|| a.opponent_id.cmp(&b.opponent_id))
    });

    Some(MemberHeadToHead {
        member_id,
        member: member.name.clone(),
        head_to_head: records,
    })
}

/// `(competitiveness * 0.6 + frequency * 0.4) * 100`, where competitiveness is
/// `1 - |W - L| / games` and frequency is `min(games / 10, 1)`.
pub fn rivalry_score(record: &HeadToHeadRecord) -> Decimal {
    if record.total_games == 0 {
        return Decimal::ZERO;
    }
    let games = Decimal::from(record.total_games);
    let competitiveness = Decimal::ONE - Decimal::from((record.wins - record.losses).abs()) / games;
    let frequency = (games / dec!(10)).min(Decimal::ONE);
    (competitiveness * dec!(0.6) + frequency * dec!(0.4)) * Decimal::ONE_HUNDRED
}

impl RivalryClass {
    pub fn from_score(score: Decimal) -> Self {
        if score > dec!(70) {
            RivalryClass::Heated
        } else if score > dec!(50) {
            RivalryClass::Competitive
        } else {
            RivalryClass::Developing
        }
    }
}

/// Top rivalries for a member: at least three meetings and a score above 30.
pub fn member_rivalries(history: &LeagueHistory, member_id: i64) -> Option<MemberRivalries> {
    let h2h = member_head_to_head(history, member_id)?;
    let mut rivalries: Vec<Rivalry> = h2h
        .head_to_head
        .into_iter()
        .filter(|r| r.total_games >= RIVALRY_MIN_GAMES)
        .filter_map(|record| {
            let score = rivalry_score(&record).round_dp(1);
            (score > RIVALRY_THRESHOLD).then(|| Rivalry {
                record,
                rivalry_score: score,
                classification: RivalryClass::from_score(score),
            })
        })
        .collect();
    rivalries.sort_by(|a, b| {
        b.rivalry_score
            .cmp(&a.rivalry_score)
            .then_with(|| a.record.opponent_name.cmp(&b.record.opponent_name))
    });
    rivalries.truncate(MAX_RIVALRIES);

    Some(MemberRivalries {
        member_id,
        member: h2h.member,
        rivalries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{round_robin_season, Fixture};

    #[test]
    fn matrix_is_antisymmetric() {
        let (fx, _, _) = round_robin_season();
        let history = fx.build();
        let matrix = head_to_head_matrix(&history);

        assert_eq!(matrix.members.len(), 12);
        for row in &matrix.matrix {
            assert_eq!(row.opponents.len(), 11, "self pairs are excluded");
            for rec in &row.opponents {
                let mirror = matrix
                    .matrix
                    .iter()
                    .find(|r| r.member_id == rec.opponent_id)
                    .and_then(|r| r.opponents.iter().find(|o| o.opponent_id == row.member_id))
                    .unwrap();
                assert_eq!(rec.wins, mirror.losses);
                assert_eq!(rec.losses, mirror.wins);
                assert_eq!(rec.ties, mirror.ties);
                assert_eq!(rec.points_for, mirror.points_against);
            }
        }
    }

    fn series(results: &[(i64, i64)]) -> (LeagueHistory, i64, i64) {
        let mut fx = Fixture::new();
        let a = fx.member("Ann");
        let b = fx.member("Bo");
        for (i, (sa, sb)) in results.iter().enumerate() {
            let season = fx.season(2010 + i as i32);
            let ta = fx.team(season, a, "Ann FC", 0, 0, Decimal::ZERO);
            let tb = fx.team(season, b, "Bo FC", 0, 0, Decimal::ZERO);
            fx.game(season, 1, (ta, Decimal::from(*sa)), (tb, Decimal::from(*sb)));
        }
        (fx.build(), a, b)
    }

    #[test]
    fn member_head_to_head_counts_ties() {
        let (history, ann, _) = series(&[(100, 90), (80, 95), (88, 88)]);
        let h2h = member_head_to_head(&history, ann).unwrap();
        let rec = &h2h.head_to_head[0];
        assert_eq!((rec.wins, rec.losses, rec.ties, rec.total_games), (1, 1, 1, 3));
        assert_eq!(rec.win_pct, dec!(33.3));
        assert_eq!(rec.points_for, dec!(268));
    }

    #[test]
    fn even_series_is_a_rivalry() {
        let (history, ann, _) = series(&[(100, 90), (80, 95), (110, 90), (70, 99)]);
        let rivalries = member_rivalries(&history, ann).unwrap().rivalries;
        // competitiveness 1.0, frequency 0.4 -> 76
        assert_eq!(rivalries.len(), 1);
        assert_eq!(rivalries[0].rivalry_score, dec!(76));
        assert_eq!(rivalries[0].classification, RivalryClass::Heated);
    }

    #[test]
    fn short_or_lopsided_series_are_not_rivalries() {
        let (history, ann, _) = series(&[(100, 90), (100, 95)]);
        assert!(member_rivalries(&history, ann).unwrap().rivalries.is_empty());

        // 3-0: competitiveness 0, frequency 0.3 -> 12
        let (history, ann, _) = series(&[(100, 90), (100, 95), (120, 80)]);
        assert!(member_rivalries(&history, ann).unwrap().rivalries.is_empty());
    }

    #[test]
    fn unknown_member_yields_none() {
        let (history, _, _) = series(&[(100, 90)]);
        assert!(member_head_to_head(&history, 42).is_none());
    }
}
