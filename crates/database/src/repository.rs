use crate::error::DbError;
use analytics::HistoryData;
use chrono::{DateTime, Utc};
use core_types::{DraftPick, League, Matchup, Member, Season, TeamSeason, Transaction, TransactionType};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use tracing::debug;

/// The `DbRepository` is the read side of the league archive. It loads the
/// rows the analytics layer reduces over.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

// --- Row types ---
// One per table. They mirror the schema and convert into the core types.

#[derive(Debug, Clone, FromRow)]
pub struct DbLeague {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbMember {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSeason {
    pub id: i64,
    pub league_id: i64,
    pub year: i32,
    pub num_teams: i32,
    pub num_playoff_teams: i32,
    pub regular_season_weeks: i32,
    pub playoff_weeks: i32,
    pub champion_team_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTeam {
    pub id: i64,
    pub season_id: i64,
    pub member_id: i64,
    pub name: String,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub points_for: Decimal,
    pub points_against: Decimal,
    pub playoff_seed: Option<i32>,
    pub made_playoffs: bool,
    pub final_rank: Option<i32>,
    pub is_champion: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbMatchup {
    pub id: i64,
    pub season_id: i64,
    pub week: i32,
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_score: Decimal,
    pub team2_score: Decimal,
    pub is_playoff: bool,
    pub is_championship: bool,
    pub is_consolation: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbDraftPick {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    pub round: i32,
    pub pick_number: i32,
    pub pick_in_round: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_team: Option<String>,
    pub season_points: Option<Decimal>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTransaction {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub week: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub games_played: i32,
    pub points_scored: Decimal,
}

impl From<DbLeague> for League {
    fn from(row: DbLeague) -> Self {
        League { id: row.id, name: row.name }
    }
}

impl From<DbMember> for Member {
    fn from(row: DbMember) -> Self {
        Member { id: row.id, name: row.name }
    }
}

impl From<DbSeason> for Season {
    fn from(row: DbSeason) -> Self {
        Season {
            id: row.id,
            league_id: row.league_id,
            year: row.year,
            num_teams: row.num_teams,
            num_playoff_teams: row.num_playoff_teams,
            regular_season_weeks: row.regular_season_weeks,
            playoff_weeks: row.playoff_weeks,
            champion_team_id: row.champion_team_id,
        }
    }
}

impl From<DbTeam> for TeamSeason {
    fn from(row: DbTeam) -> Self {
        TeamSeason {
            id: row.id,
            season_id: row.season_id,
            member_id: row.member_id,
            name: row.name,
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
            points_for: row.points_for,
            points_against: row.points_against,
            playoff_seed: row.playoff_seed,
            made_playoffs: row.made_playoffs,
            final_rank: row.final_rank,
            is_champion: row.is_champion,
        }
    }
}

impl From<DbMatchup> for Matchup {
    fn from(row: DbMatchup) -> Self {
        Matchup {
            id: row.id,
            season_id: row.season_id,
            week: row.week,
            team1_id: row.team1_id,
            team2_id: row.team2_id,
            team1_score: row.team1_score,
            team2_score: row.team2_score,
            is_playoff: row.is_playoff,
            is_championship: row.is_championship,
            is_consolation: row.is_consolation,
        }
    }
}

impl From<DbDraftPick> for DraftPick {
    fn from(row: DbDraftPick) -> Self {
        DraftPick {
            id: row.id,
            season_id: row.season_id,
            team_id: row.team_id,
            round: row.round,
            pick_number: row.pick_number,
            pick_in_round: row.pick_in_round,
            player_id: row.player_id,
            player_name: row.player_name,
            player_position: row.player_position,
            player_team: row.player_team,
            season_points: row.season_points,
        }
    }
}

impl TryFrom<DbTransaction> for Transaction {
    type Error = DbError;

    fn try_from(row: DbTransaction) -> Result<Self, Self::Error> {
        let kind: TransactionType = row
            .kind
            .parse()
            .map_err(|e| DbError::Invalid(format!("transaction {}: {}", row.id, e)))?;
        Ok(Transaction {
            id: row.id,
            season_id: row.season_id,
            team_id: row.team_id,
            kind,
            timestamp: row.timestamp,
            week: row.week,
            player_id: row.player_id,
            player_name: row.player_name,
            player_position: row.player_position,
            games_played: row.games_played,
            points_scored: row.points_scored,
        })
    }
}

impl DbRepository {
    /// Creates a new repository instance with a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The league row. With several leagues imported, the lowest id wins.
    pub async fn get_league(&self) -> Result<Option<League>, DbError> {
        let row = sqlx::query_as::<_, DbLeague>("SELECT id, name FROM leagues ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(League::from))
    }

    pub async fn get_members(&self) -> Result<Vec<Member>, DbError> {
        let rows = sqlx::query_as::<_, DbMember>("SELECT id, name FROM members ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    pub async fn get_seasons(&self) -> Result<Vec<Season>, DbError> {
        let rows = sqlx::query_as::<_, DbSeason>(
            r#"
            SELECT id, league_id, year, num_teams, num_playoff_teams,
                   regular_season_weeks, playoff_weeks, champion_team_id
            FROM seasons
            ORDER BY year
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Season::from).collect())
    }

    pub async fn get_teams(&self) -> Result<Vec<TeamSeason>, DbError> {
        let rows = sqlx::query_as::<_, DbTeam>(
            r#"
            SELECT id, season_id, member_id, name, wins, losses, ties,
                   points_for, points_against, playoff_seed, made_playoffs,
                   final_rank, is_champion
            FROM teams
            ORDER BY season_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TeamSeason::from).collect())
    }

    pub async fn get_matchups(&self) -> Result<Vec<Matchup>, DbError> {
        let rows = sqlx::query_as::<_, DbMatchup>(
            r#"
            SELECT id, season_id, week, team1_id, team2_id, team1_score, team2_score,
                   is_playoff, is_championship, is_consolation
            FROM matchups
            ORDER BY season_id, week, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Matchup::from).collect())
    }

    pub async fn get_draft_picks(&self) -> Result<Vec<DraftPick>, DbError> {
        let rows = sqlx::query_as::<_, DbDraftPick>(
            r#"
            SELECT id, season_id, team_id, round, pick_number, pick_in_round, player_id,
                   player_name, player_position, player_team, season_points
            FROM draft_picks
            ORDER BY season_id, pick_number, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DraftPick::from).collect())
    }

    pub async fn get_transactions(&self) -> Result<Vec<Transaction>, DbError> {
        let rows = sqlx::query_as::<_, DbTransaction>(
            r#"
            SELECT id, season_id, team_id, type, timestamp, week, player_id,
                   player_name, player_position, games_played, points_scored
            FROM transactions
            ORDER BY season_id, timestamp, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Loads every table concurrently into one snapshot.
    pub async fn load_history(&self) -> Result<HistoryData, DbError> {
        let (league, members, seasons, teams, matchups, draft_picks, transactions) = tokio::try_join!(
            self.get_league(),
            self.get_members(),
            self.get_seasons(),
            self.get_teams(),
            self.get_matchups(),
            self.get_draft_picks(),
            self.get_transactions(),
        )?;

        debug!(
            seasons = seasons.len(),
            teams = teams.len(),
            matchups = matchups.len(),
            draft_picks = draft_picks.len(),
            transactions = transactions.len(),
            "Loaded league history"
        );

        Ok(HistoryData {
            league,
            members,
            seasons,
            teams,
            matchups,
            draft_picks,
            transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn transaction_row(kind: &str) -> DbTransaction {
        DbTransaction {
            id: 7,
            season_id: 1,
            team_id: 2,
            kind: kind.to_string(),
            timestamp: None,
            week: Some(3),
            player_id: None,
            player_name: "Puka Nacua".to_string(),
            player_position: Some("WR".to_string()),
            games_played: 12,
            points_scored: dec!(210.4),
        }
    }

    #[test]
    fn transaction_rows_parse_their_type() {
        let tx = Transaction::try_from(transaction_row("Waiver")).unwrap();
        assert_eq!(tx.kind, TransactionType::Waiver);
        assert_eq!(tx.points_scored, dec!(210.4));

        let err = Transaction::try_from(transaction_row("claim")).unwrap_err();
        assert!(matches!(err, DbError::Invalid(msg) if msg.starts_with("transaction 7")));
    }

    #[test]
    fn team_rows_convert_field_for_field() {
        let team: TeamSeason = DbTeam {
            id: 5,
            season_id: 1,
            member_id: 9,
            name: "Gridiron Gang".to_string(),
            wins: 10,
            losses: 4,
            ties: 0,
            points_for: dec!(1650.22),
            points_against: dec!(1400.10),
            playoff_seed: Some(1),
            made_playoffs: true,
            final_rank: Some(1),
            is_champion: true,
        }
        .into();
        assert_eq!(team.record(), "10-4");
        assert!(team.reached_playoffs());
        assert_eq!(team.points_for, dec!(1650.22));
    }
}
