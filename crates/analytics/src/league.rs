use crate::history::LeagueHistory;
use core_types::{Season, TeamSeason};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub year: i32,
    pub num_teams: i32,
    pub champion_name: Option<String>,
    pub champion_member: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueOverview {
    pub id: i64,
    pub name: String,
    pub total_seasons: usize,
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLine {
    pub id: i64,
    pub name: String,
    pub member_name: String,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub points_for: Decimal,
    pub points_against: Decimal,
    pub final_rank: Option<i32>,
    pub is_champion: bool,
    pub playoff_seed: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDetail {
    pub id: i64,
    pub year: i32,
    pub num_teams: i32,
    pub regular_season_weeks: i32,
    pub playoff_weeks: i32,
    /// Final rank order, unranked teams last.
    pub teams: Vec<TeamLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionYear {
    pub year: i32,
    pub team_name: String,
    pub manager: String,
    pub record: String,
    pub points_for: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionshipLeader {
    pub member: String,
    pub championships: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Champions {
    pub yearly_champions: Vec<ChampionYear>,
    pub championship_leaders: Vec<ChampionshipLeader>,
}

/// The title winner of a season: the flagged team, else the season's recorded champion.
pub fn champion_of<'a>(history: &'a LeagueHistory, season: &Season) -> Option<&'a TeamSeason> {
    history
        .teams_in_season(season.id)
        .find(|t| t.is_champion)
        .or_else(|| season.champion_team_id.and_then(|id| history.team(id)))
}

fn summarize(history: &LeagueHistory, season: &Season) -> SeasonSummary {
    let champion = champion_of(history, season);
    SeasonSummary {
        id: season.id,
        year: season.year,
        num_teams: season.num_teams,
        champion_name: champion.map(|t| t.name.clone()),
        champion_member: champion.map(|t| history.member_name(t.member_id).to_string()),
    }
}

/// Every season, newest first.
pub fn season_summaries(history: &LeagueHistory) -> Vec<SeasonSummary> {
    history.seasons().iter().rev().map(|s| summarize(history, s)).collect()
}

/// `None` when no league has been imported yet.
pub fn league_overview(history: &LeagueHistory) -> Option<LeagueOverview> {
    let league = history.league()?;
    let seasons = season_summaries(history);
    Some(LeagueOverview {
        id: league.id,
        name: league.name.clone(),
        total_seasons: seasons.len(),
        seasons,
    })
}

pub fn season_detail(history: &LeagueHistory, season: &Season) -> SeasonDetail {
    let mut teams: Vec<&TeamSeason> = history.teams_in_season(season.id).collect();
    teams.sort_by_key(|t| (t.final_rank.is_none(), t.final_rank, t.id));

    SeasonDetail {
        id: season.id,
        year: season.year,
        num_teams: season.num_teams,
        regular_season_weeks: season.regular_season_weeks,
        playoff_weeks: season.playoff_weeks,
        teams: teams
            .into_iter()
            .map(|t| TeamLine {
                id: t.id,
                name: t.name.clone(),
                member_name: history.member_name(t.member_id).to_string(),
                wins: t.wins,
                losses: t.losses,
                ties: t.ties,
                points_for: t.points_for,
                points_against: t.points_against,
                final_rank: t.final_rank,
                is_champion: t.is_champion,
                playoff_seed: t.playoff_seed,
            })
            .collect(),
    }
}

pub fn champions(history: &LeagueHistory) -> Champions {
    let yearly_champions: Vec<ChampionYear> = history
        .seasons()
        .iter()
        .rev()
        .filter_map(|season| {
            let team = champion_of(history, season)?;
            Some(ChampionYear {
                year: season.year,
                team_name: team.name.clone(),
                manager: history.member_name(team.member_id).to_string(),
                record: team.record(),
                points_for: team.points_for.round_dp(2),
            })
        })
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for champ in &yearly_champions {
        *counts.entry(champ.manager.as_str()).or_default() += 1;
    }
    let mut championship_leaders: Vec<ChampionshipLeader> = counts
        .into_iter()
        .map(|(member, championships)| ChampionshipLeader {
            member: member.to_string(),
            championships,
        })
        .collect();
    championship_leaders.sort_by(|a, b| b.championships.cmp(&a.championships));

    Champions {
        yearly_champions,
        championship_leaders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use rust_decimal_macros::dec;

    fn league() -> LeagueHistory {
        let mut fx = Fixture::new();
        let (s1, s2, s3) = (fx.season(2021), fx.season(2022), fx.season(2023));
        let (ann, bo) = (fx.member("Ann"), fx.member("Bo"));

        let a1 = fx.team(s1, ann, "Ann 21", 10, 4, dec!(1600));
        fx.team_mut(a1).is_champion = true;
        fx.team_mut(a1).final_rank = Some(1);
        let b1 = fx.team(s1, bo, "Bo 21", 4, 10, dec!(1200));
        fx.team_mut(b1).final_rank = Some(2);

        fx.team(s2, ann, "Ann 22", 8, 6, dec!(1400));
        let b2 = fx.team(s2, bo, "Bo 22", 6, 8, dec!(1300));
        // Only the season row knows the 2022 champion.
        fx.season_mut(s2).champion_team_id = Some(b2);

        let a3 = fx.team(s3, ann, "Ann 23", 9, 5, dec!(1500));
        fx.team_mut(a3).is_champion = true;
        fx.build()
    }

    #[test]
    fn overview_lists_seasons_newest_first() {
        let history = league();
        let overview = league_overview(&history).unwrap();
        assert_eq!(overview.name, "Top Pot");
        assert_eq!(overview.total_seasons, 3);
        let years: Vec<i32> = overview.seasons.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2023, 2022, 2021]);
        assert_eq!(overview.seasons[1].champion_member.as_deref(), Some("Bo"));
    }

    #[test]
    fn season_detail_puts_unranked_teams_last() {
        let history = league();
        let detail = season_detail(&history, history.season_by_year(2021).unwrap());
        assert_eq!(detail.teams[0].name, "Ann 21");

        let detail = season_detail(&history, history.season_by_year(2022).unwrap());
        assert!(detail.teams.iter().all(|t| t.final_rank.is_none()));
        assert_eq!(detail.teams.len(), 2);
    }

    #[test]
    fn champions_count_titles_per_member() {
        let champs = champions(&league());
        assert_eq!(champs.yearly_champions.len(), 3);
        assert_eq!(champs.yearly_champions[0].year, 2023);
        assert_eq!(champs.yearly_champions[2].record, "10-4");
        assert_eq!(champs.championship_leaders[0].member, "Ann");
        assert_eq!(champs.championship_leaders[0].championships, 2);
        assert_eq!(champs.championship_leaders[1].championships, 1);
    }
}
