use core_types::{DraftPick, League, Matchup, Member, Season, TeamSeason, Transaction};
use std::collections::HashMap;

const UNKNOWN: &str = "Unknown";

/// The raw rows of a league, as loaded from storage.
#[derive(Debug, Clone, Default)]
pub struct HistoryData {
    pub league: Option<League>,
    pub members: Vec<Member>,
    pub seasons: Vec<Season>,
    pub teams: Vec<TeamSeason>,
    pub matchups: Vec<Matchup>,
    pub draft_picks: Vec<DraftPick>,
    pub transactions: Vec<Transaction>,
}

/// An immutable, indexed snapshot of a league's history.
///
/// Rows are put into a canonical order on construction so every scan over
/// them is deterministic:
/// - seasons by year,
/// - matchups by (year, week, id),
/// - draft picks by (year, overall pick, id),
/// - transactions by (year, timestamp, id).
#[derive(Debug, Clone, Default)]
pub struct LeagueHistory {
    data: HistoryData,
    members_by_id: HashMap<i64, usize>,
    seasons_by_id: HashMap<i64, usize>,
    teams_by_id: HashMap<i64, usize>,
}

impl LeagueHistory {
    pub fn new(mut data: HistoryData) -> Self {
        data.seasons.sort_by_key(|s| (s.year, s.id));

        let year_of: HashMap<i64, i32> = data.seasons.iter().map(|s| (s.id, s.year)).collect();
        let year = |season_id: i64| year_of.get(&season_id).copied().unwrap_or(i32::MIN);

        data.matchups.sort_by_key(|m| (year(m.season_id), m.week, m.id));
        data.draft_picks.sort_by_key(|p| (year(p.season_id), p.pick_number, p.id));
        data.transactions.sort_by_key(|t| (year(t.season_id), t.timestamp, t.id));
        data.teams.sort_by_key(|t| (year(t.season_id), t.id));

        let members_by_id = index_by(&data.members, |m| m.id);
        let seasons_by_id = index_by(&data.seasons, |s| s.id);
        let teams_by_id = index_by(&data.teams, |t| t.id);

        Self {
            data,
            members_by_id,
            seasons_by_id,
            teams_by_id,
        }
    }

    pub fn league(&self) -> Option<&League> {
        self.data.league.as_ref()
    }

    pub fn members(&self) -> &[Member] {
        &self.data.members
    }

    pub fn seasons(&self) -> &[Season] {
        &self.data.seasons
    }

    pub fn teams(&self) -> &[TeamSeason] {
        &self.data.teams
    }

    pub fn matchups(&self) -> &[Matchup] {
        &self.data.matchups
    }

    pub fn draft_picks(&self) -> &[DraftPick] {
        &self.data.draft_picks
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.data.transactions
    }

    pub fn member(&self, id: i64) -> Option<&Member> {
        self.members_by_id.get(&id).map(|&i| &self.data.members[i])
    }

    pub fn season(&self, id: i64) -> Option<&Season> {
        self.seasons_by_id.get(&id).map(|&i| &self.data.seasons[i])
    }

    pub fn season_by_year(&self, year: i32) -> Option<&Season> {
        self.data.seasons.iter().find(|s| s.year == year)
    }

    pub fn team(&self, id: i64) -> Option<&TeamSeason> {
        self.teams_by_id.get(&id).map(|&i| &self.data.teams[i])
    }

    pub fn season_year(&self, season_id: i64) -> Option<i32> {
        self.season(season_id).map(|s| s.year)
    }

    pub fn member_name(&self, member_id: i64) -> &str {
        self.member(member_id).map_or(UNKNOWN, |m| m.name.as_str())
    }

    /// The member who managed `team_id`.
    pub fn manager_of(&self, team_id: i64) -> Option<&Member> {
        self.team(team_id).and_then(|t| self.member(t.member_id))
    }

    pub fn manager_name(&self, team_id: i64) -> &str {
        self.manager_of(team_id).map_or(UNKNOWN, |m| m.name.as_str())
    }

    pub fn team_name(&self, team_id: i64) -> &str {
        self.team(team_id).map_or(UNKNOWN, |t| t.name.as_str())
    }

    pub fn teams_in_season(&self, season_id: i64) -> impl Iterator<Item = &TeamSeason> {
        self.data.teams.iter().filter(move |t| t.season_id == season_id)
    }

    pub fn teams_of_member(&self, member_id: i64) -> impl Iterator<Item = &TeamSeason> {
        self.data.teams.iter().filter(move |t| t.member_id == member_id)
    }

    pub fn matchups_in_season(&self, season_id: i64) -> impl Iterator<Item = &Matchup> {
        self.data.matchups.iter().filter(move |m| m.season_id == season_id)
    }

    pub fn picks_in_season(&self, season_id: i64) -> impl Iterator<Item = &DraftPick> {
        self.data.draft_picks.iter().filter(move |p| p.season_id == season_id)
    }

    pub fn transactions_in_season(&self, season_id: i64) -> impl Iterator<Item = &Transaction> {
        self.data.transactions.iter().filter(move |t| t.season_id == season_id)
    }

    pub fn is_empty(&self) -> bool {
        self.data.seasons.is_empty() && self.data.members.is_empty()
    }
}

fn index_by<T>(rows: &[T], key: impl Fn(&T) -> i64) -> HashMap<i64, usize> {
    rows.iter().enumerate().map(|(i, row)| (key(row), i)).collect()
}
