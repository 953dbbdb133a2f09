use crate::history::LeagueHistory;
use crate::math::{percentage, ratio};
use core_types::Member;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// Career totals for one member, summed over their team seasons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Career {
    pub seasons: i64,
    pub championships: i64,
    pub playoff_appearances: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: Decimal,
}

impl Career {
    pub fn of(history: &LeagueHistory, member_id: i64) -> Self {
        history
            .teams_of_member(member_id)
            .fold(Career::default(), |mut career, team| {
                career.seasons += 1;
                career.championships += i64::from(team.is_champion);
                career.playoff_appearances += i64::from(team.reached_playoffs());
                career.wins += i64::from(team.wins);
                career.losses += i64::from(team.losses);
                career.ties += i64::from(team.ties);
                career.points_for += team.points_for;
                career
            })
    }

    pub fn games(&self) -> i64 {
        self.wins + self.losses + self.ties
    }

    /// Wins over decisions, as a fraction in [0, 1]. Ties are not decisions.
    pub fn win_ratio(&self) -> Decimal {
        ratio(Decimal::from(self.wins), Decimal::from(self.wins + self.losses))
    }

    pub fn points_per_game(&self) -> Decimal {
        ratio(self.points_for, Decimal::from(self.games()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub id: i64,
    pub name: String,
    pub total_seasons: i64,
    pub total_championships: i64,
    pub total_wins: i64,
    pub total_losses: i64,
    pub total_ties: i64,
    pub win_percentage: Decimal,
    pub total_points_for: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRecord {
    pub year: i32,
    pub team_name: String,
    pub record: String,
    pub points_for: Decimal,
    /// Zero when the final rank is unknown.
    pub final_rank: i32,
    pub made_playoffs: bool,
    pub is_champion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberProfile {
    #[serde(flatten)]
    pub summary: MemberSummary,
    pub avg_points_per_season: Decimal,
    /// Best (lowest) final rank, zero when no season has one.
    pub best_finish: i32,
    pub worst_finish: i32,
    pub seasons: Vec<SeasonRecord>,
}

fn summarize(member: &Member, career: &Career) -> MemberSummary {
    MemberSummary {
        id: member.id,
        name: member.name.clone(),
        total_seasons: career.seasons,
        total_championships: career.championships,
        total_wins: career.wins,
        total_losses: career.losses,
        total_ties: career.ties,
        win_percentage: percentage(career.wins, career.wins + career.losses).round_dp(1),
        total_points_for: career.points_for.round_dp(2),
    }
}

/// Every member's career summary; championships desc, win% desc, name asc.
pub fn member_summaries(history: &LeagueHistory) -> Vec<MemberSummary> {
    let mut summaries: Vec<MemberSummary> = history
        .members()
        .iter()
        .map(|m| summarize(m, &Career::of(history, m.id)))
        .collect();
    summaries.sort_by(|a, b| {
        b.total_championships
            .cmp(&a.total_championships)
            .then_with(|| b.win_percentage.cmp(&a.win_percentage))
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

pub fn member_profile(history: &LeagueHistory, member_id: i64) -> Option<MemberProfile> {
    let member = history.member(member_id)?;
    let career = Career::of(history, member_id);

    let ranks: Vec<i32> = history
        .teams_of_member(member_id)
        .filter_map(|t| t.final_rank)
        .filter(|r| *r > 0)
        .collect();

    let mut seasons: Vec<SeasonRecord> = history
        .teams_of_member(member_id)
        .map(|team| SeasonRecord {
            year: history.season_year(team.season_id).unwrap_or_default(),
            team_name: team.name.clone(),
            record: team.record(),
            points_for: team.points_for.round_dp(2),
            final_rank: team.final_rank.unwrap_or_default(),
            made_playoffs: team.made_playoffs,
            is_champion: team.is_champion,
        })
        .collect();
    seasons.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.team_name.cmp(&b.team_name)));

    Some(MemberProfile {
        summary: summarize(member, &career),
        avg_points_per_season: ratio(career.points_for, Decimal::from(career.seasons)).round_dp(2),
        best_finish: ranks.iter().copied().min().unwrap_or_default(),
        worst_finish: ranks.iter().copied().max().unwrap_or_default(),
        seasons,
    })
}

/// Orders members by name, breaking ties on id.
pub(crate) fn by_name(a: &Member, b: &Member) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
}
