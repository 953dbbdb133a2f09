use crate::history::LeagueHistory;
use core_types::{Matchup, Season, TeamSeason};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One row of a season's standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub team_id: i64,
    pub team_name: String,
    pub member_id: i64,
    pub manager: String,
    pub record: String,
    pub points_for: Decimal,
    pub points_against: Decimal,
    pub made_playoffs: bool,
    pub is_champion: bool,
}

/// Standings order: wins desc, points for desc, ties desc, team name asc.
///
/// The final `id` comparison only matters for two teams sharing a name and
/// keeps the ordering total.
pub fn standings_order(a: &TeamSeason, b: &TeamSeason) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.points_for.cmp(&a.points_for))
        .then_with(|| b.ties.cmp(&a.ties))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranked standings for `season`.
pub fn season_standings(history: &LeagueHistory, season: &Season) -> Vec<StandingRow> {
    let mut teams: Vec<&TeamSeason> = history.teams_in_season(season.id).collect();
    teams.sort_by(|a, b| standings_order(a, b));

    teams
        .into_iter()
        .enumerate()
        .map(|(idx, team)| StandingRow {
            rank: idx + 1,
            team_id: team.id,
            team_name: team.name.clone(),
            member_id: team.member_id,
            manager: history.member_name(team.member_id).to_string(),
            record: team.record(),
            points_for: team.points_for.round_dp(2),
            points_against: team.points_against.round_dp(2),
            made_playoffs: team.made_playoffs,
            is_champion: team.is_champion,
        })
        .collect()
}

/// A team's record recomputed from game results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamTally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: Decimal,
    pub points_against: Decimal,
}

impl TeamTally {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// Tallies W/L/T and points per team from the regular-season games in `matchups`.
pub fn tally_records<'a>(matchups: impl IntoIterator<Item = &'a Matchup>) -> BTreeMap<i64, TeamTally> {
    let mut tallies: BTreeMap<i64, TeamTally> = BTreeMap::new();
    for m in matchups.into_iter().filter(|m| m.is_regular_season()) {
        for team_id in [m.team1_id, m.team2_id] {
            let Some((own, opp, _)) = m.perspective(team_id) else {
                continue;
            };
            let tally = tallies.entry(team_id).or_default();
            tally.points_for += own;
            tally.points_against += opp;
            match own.cmp(&opp) {
                Ordering::Greater => tally.wins += 1,
                Ordering::Less => tally.losses += 1,
                Ordering::Equal => tally.ties += 1,
            }
        }
    }
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{round_robin_season, Fixture};
    use rust_decimal_macros::dec;

    #[test]
    fn ten_and_four_with_most_points_ranks_first() {
        let mut fx = Fixture::new();
        let season = fx.season(2022);
        let names = ["Ann", "Bo", "Cy", "Di"];
        let members: Vec<i64> = names.iter().map(|n| fx.member(n)).collect();
        fx.team(season, members[0], "Alpha", 10, 4, dec!(1650.20));
        fx.team(season, members[1], "Bravo", 10, 4, dec!(1544.00));
        fx.team(season, members[2], "Charlie", 9, 5, dec!(1700.00));
        fx.team(season, members[3], "Delta", 3, 11, dec!(1200.00));
        let history = fx.build();

        let rows = season_standings(&history, history.season_by_year(2022).unwrap());
        let order: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Bravo", "Charlie", "Delta"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].record, "10-4");
        assert_eq!(rows[0].manager, "Ann");
    }

    #[test]
    fn full_ties_fall_back_to_team_name() {
        let mut fx = Fixture::new();
        let season = fx.season(2021);
        let a = fx.member("A");
        let b = fx.member("B");
        fx.team(season, a, "Zebras", 7, 7, dec!(1400));
        fx.team(season, b, "Aardvarks", 7, 7, dec!(1400));
        let history = fx.build();

        let rows = season_standings(&history, history.season_by_year(2021).unwrap());
        assert_eq!(rows[0].team_name, "Aardvarks");
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn round_robin_tallies_balance() {
        let (fx, season, teams) = round_robin_season();
        let history = fx.build();

        let regular: Vec<_> = history
            .matchups_in_season(season)
            .filter(|m| m.is_regular_season())
            .collect();
        assert_eq!(regular.len(), 84);

        let tallies = tally_records(regular.iter().copied());
        let wins: u32 = tallies.values().map(|t| t.wins).sum();
        let losses: u32 = tallies.values().map(|t| t.losses).sum();
        let games: u32 = tallies.values().map(|t| t.games()).sum();
        assert_eq!(wins, losses);
        assert_eq!(games / 2, regular.len() as u32);

        // Highest-scoring team wins every week.
        assert_eq!(tallies[&teams[11]].wins, 14);
        assert_eq!(tallies[&teams[0]].losses, 14);
    }

    #[test]
    fn ties_are_counted_on_both_sides() {
        let mut fx = Fixture::new();
        let season = fx.season(2020);
        let a = fx.member("A");
        let b = fx.member("B");
        let ta = fx.team(season, a, "A", 0, 0, Decimal::ZERO);
        let tb = fx.team(season, b, "B", 0, 0, Decimal::ZERO);
        fx.game(season, 1, (ta, dec!(100)), (tb, dec!(100)));
        fx.playoff_game(season, 15, (ta, dec!(120)), (tb, dec!(90)));
        let history = fx.build();

        let tallies = tally_records(history.matchups());
        assert_eq!(tallies[&ta].ties, 1);
        assert_eq!(tallies[&tb].ties, 1);
        assert_eq!(tallies[&ta].wins, 0, "playoff games are not part of the record");
    }
}
