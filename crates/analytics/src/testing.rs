//! Builders for small in-memory leagues used by the unit tests.

use crate::history::{HistoryData, LeagueHistory};
use core_types::{
    DraftPick, League, Matchup, Member, Season, TeamSeason, Transaction, TransactionType,
};
use rust_decimal::Decimal;

pub(crate) struct Fixture {
    data: HistoryData,
    next_id: i64,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            data: HistoryData {
                league: Some(League {
                    id: 1,
                    name: "Top Pot".to_string(),
                }),
                ..HistoryData::default()
            },
            next_id: 1,
        }
    }

    fn id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn member(&mut self, name: &str) -> i64 {
        let id = self.id();
        self.data.members.push(Member {
            id,
            name: name.to_string(),
        });
        id
    }

    pub(crate) fn season(&mut self, year: i32) -> i64 {
        let id = self.id();
        self.data.seasons.push(Season {
            id,
            league_id: 1,
            year,
            num_teams: 12,
            num_playoff_teams: 6,
            regular_season_weeks: 14,
            playoff_weeks: 3,
            champion_team_id: None,
        });
        id
    }

    pub(crate) fn team(
        &mut self,
        season_id: i64,
        member_id: i64,
        name: &str,
        wins: i32,
        losses: i32,
        points_for: Decimal,
    ) -> i64 {
        let id = self.id();
        self.data.teams.push(TeamSeason {
            id,
            season_id,
            member_id,
            name: name.to_string(),
            wins,
            losses,
            ties: 0,
            points_for,
            points_against: Decimal::ZERO,
            playoff_seed: None,
            made_playoffs: false,
            final_rank: None,
            is_champion: false,
        });
        id
    }

    pub(crate) fn team_mut(&mut self, team_id: i64) -> &mut TeamSeason {
        self.data
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .expect("fixture team exists")
    }

    pub(crate) fn season_mut(&mut self, season_id: i64) -> &mut Season {
        self.data
            .seasons
            .iter_mut()
            .find(|s| s.id == season_id)
            .expect("fixture season exists")
    }

    pub(crate) fn game(
        &mut self,
        season_id: i64,
        week: i32,
        team1: (i64, Decimal),
        team2: (i64, Decimal),
    ) -> i64 {
        self.push_game(season_id, week, team1, team2, false)
    }

    pub(crate) fn playoff_game(
        &mut self,
        season_id: i64,
        week: i32,
        team1: (i64, Decimal),
        team2: (i64, Decimal),
    ) -> i64 {
        self.push_game(season_id, week, team1, team2, true)
    }

    fn push_game(
        &mut self,
        season_id: i64,
        week: i32,
        (team1_id, team1_score): (i64, Decimal),
        (team2_id, team2_score): (i64, Decimal),
        is_playoff: bool,
    ) -> i64 {
        let id = self.id();
        self.data.matchups.push(Matchup {
            id,
            season_id,
            week,
            team1_id,
            team2_id,
            team1_score,
            team2_score,
            is_playoff,
            is_championship: false,
            is_consolation: false,
        });
        id
    }

    pub(crate) fn pick(
        &mut self,
        season_id: i64,
        team_id: i64,
        pick_number: i32,
        player: (&str, &str, &str),
        season_points: Option<Decimal>,
    ) -> i64 {
        let id = self.id();
        let (name, position, nfl_team) = player;
        self.data.draft_picks.push(DraftPick {
            id,
            season_id,
            team_id,
            round: (pick_number - 1) / 12 + 1,
            pick_number,
            pick_in_round: Some((pick_number - 1) % 12 + 1),
            player_id: None,
            player_name: name.to_string(),
            player_position: Some(position.to_string()),
            player_team: Some(nfl_team.to_string()),
            season_points,
        });
        id
    }

    pub(crate) fn transaction(
        &mut self,
        season_id: i64,
        team_id: i64,
        kind: TransactionType,
        player: &str,
        week: Option<i32>,
        points_scored: Decimal,
    ) -> i64 {
        let id = self.id();
        self.data.transactions.push(Transaction {
            id,
            season_id,
            team_id,
            kind,
            timestamp: None,
            week,
            player_id: None,
            player_name: player.to_string(),
            player_position: Some("WR".to_string()),
            games_played: 0,
            points_scored,
        });
        id
    }

    pub(crate) fn transaction_mut(&mut self, transaction_id: i64) -> &mut Transaction {
        self.data
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .expect("fixture transaction exists")
    }

    pub(crate) fn build(self) -> LeagueHistory {
        LeagueHistory::new(self.data)
    }
}

/// A 12-team season with a 14-week round-robin schedule.
///
/// Team `i` (0-based) scores `70 + 4*i + week` every week, so higher-indexed
/// teams always win. Returns the fixture, the season id and the team ids.
pub(crate) fn round_robin_season() -> (Fixture, i64, Vec<i64>) {
    let mut fx = Fixture::new();
    let season = fx.season(2023);
    let teams: Vec<i64> = (0..12)
        .map(|i| {
            let member = fx.member(&format!("Manager {i:02}"));
            fx.team(season, member, &format!("Team {i:02}"), 0, 0, Decimal::ZERO)
        })
        .collect();

    let score = |i: usize, week: i32| Decimal::from(70 + 4 * i as i64 + week as i64);
    for week in 1..=14 {
        for (a, b) in circle_pairings(12, ((week - 1) % 11) as usize) {
            fx.game(season, week, (teams[a], score(a, week)), (teams[b], score(b, week)));
        }
    }
    (fx, season, teams)
}

/// Pairings for one round of the circle method.
fn circle_pairings(n: usize, round: usize) -> Vec<(usize, usize)> {
    let mut ring: Vec<usize> = (1..n).collect();
    ring.rotate_right(round % (n - 1));
    let mut seats = vec![0];
    seats.extend(ring);
    (0..n / 2).map(|i| (seats[i], seats[n - 1 - i])).collect()
}
