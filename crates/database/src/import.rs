//! Loads a league export (the JSON dump of every table) into Postgres.

use crate::error::DbError;
use crate::repository::DbRepository;
use chrono::{DateTime, NaiveDateTime, Utc};
use core_types::TransactionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{Postgres, Transaction};
use std::path::Path;
use tracing::{info, warn};

/// The export file. Every table is optional; extra keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeagueExport {
    pub leagues: Vec<ExportLeague>,
    pub members: Vec<ExportMember>,
    pub seasons: Vec<ExportSeason>,
    pub teams: Vec<ExportTeam>,
    pub matchups: Vec<ExportMatchup>,
    pub draft_picks: Vec<ExportDraftPick>,
    pub transactions: Vec<ExportTransaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportLeague {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportMember {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSeason {
    pub id: i64,
    pub league_id: i64,
    pub year: i32,
    #[serde(default = "default_num_teams")]
    pub num_teams: i32,
    #[serde(default = "default_playoff_teams")]
    pub num_playoff_teams: i32,
    #[serde(default = "default_regular_weeks")]
    pub regular_season_weeks: i32,
    #[serde(default = "default_playoff_weeks")]
    pub playoff_weeks: i32,
    #[serde(default)]
    pub champion_team_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportTeam {
    pub id: i64,
    pub season_id: i64,
    pub member_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wins: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub losses: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ties: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_for: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_against: Decimal,
    #[serde(default)]
    pub playoff_seed: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub made_playoffs: bool,
    #[serde(default)]
    pub final_rank: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_champion: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportMatchup {
    pub id: i64,
    pub season_id: i64,
    pub week: i32,
    pub team1_id: i64,
    pub team2_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team1_score: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team2_score: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_playoff: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_championship: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_consolation: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportDraftPick {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    #[serde(default = "default_round")]
    pub round: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pick_number: i32,
    #[serde(default)]
    pub pick_in_round: Option<i32>,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default = "unknown_player", deserialize_with = "null_as_unknown_player")]
    pub player_name: String,
    #[serde(default)]
    pub player_position: Option<String>,
    #[serde(default, alias = "player_nfl_team")]
    pub player_team: Option<String>,
    #[serde(default)]
    pub season_points: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportTransaction {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub week: Option<i32>,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default = "unknown_player", deserialize_with = "null_as_unknown_player")]
    pub player_name: String,
    #[serde(default)]
    pub player_position: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub games_played: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_scored: Decimal,
}

fn default_num_teams() -> i32 {
    12
}

fn default_playoff_teams() -> i32 {
    6
}

fn default_regular_weeks() -> i32 {
    14
}

fn default_playoff_weeks() -> i32 {
    3
}

fn default_round() -> i32 {
    1
}

fn unknown_player() -> String {
    "Unknown".to_string()
}

/// Nullable columns in the export: `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unknown_player<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_player))
}

/// Accepts RFC 3339 or a naive ISO timestamp (read as UTC). Anything else,
/// including null, becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

impl LeagueExport {
    pub fn from_json(raw: &str) -> Result<Self, DbError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DbError::Invalid(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn total_rows(&self) -> usize {
        self.leagues.len()
            + self.members.len()
            + self.seasons.len()
            + self.teams.len()
            + self.matchups.len()
            + self.draft_picks.len()
            + self.transactions.len()
    }
}

/// Rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub leagues: usize,
    pub members: usize,
    pub seasons: usize,
    pub teams: usize,
    pub matchups: usize,
    pub draft_picks: usize,
    pub transactions: usize,
}

impl DbRepository {
    /// Upserts the whole export in dependency order inside one transaction.
    ///
    /// Re-importing the same file is a no-op apart from refreshed values.
    /// `on_row` is called once per written row, for progress reporting.
    pub async fn import_export(
        &self,
        export: &LeagueExport,
        mut on_row: impl FnMut() + Send,
    ) -> Result<ImportSummary, DbError> {
        let mut tx = self.pool().begin().await?;
        let mut summary = ImportSummary::default();

        for row in &export.leagues {
            upsert_league(&mut tx, row).await?;
            summary.leagues += 1;
            on_row();
        }
        for row in &export.members {
            upsert_member(&mut tx, row).await?;
            summary.members += 1;
            on_row();
        }
        for row in &export.seasons {
            upsert_season(&mut tx, row).await?;
            summary.seasons += 1;
            on_row();
        }
        for row in &export.teams {
            upsert_team(&mut tx, row).await?;
            summary.teams += 1;
            on_row();
        }
        for row in &export.matchups {
            upsert_matchup(&mut tx, row).await?;
            summary.matchups += 1;
            on_row();
        }
        for row in &export.draft_picks {
            upsert_draft_pick(&mut tx, row).await?;
            summary.draft_picks += 1;
            on_row();
        }
        for row in &export.transactions {
            upsert_transaction(&mut tx, row).await?;
            summary.transactions += 1;
            on_row();
        }

        tx.commit().await?;

        if summary.leagues == 0 {
            warn!("Export contained no league row; the dashboard overview will be empty");
        }
        info!(?summary, "Imported league export");
        Ok(summary)
    }
}

async fn upsert_league(tx: &mut Transaction<'_, Postgres>, row: &ExportLeague) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO leagues (id, name) VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_member(tx: &mut Transaction<'_, Postgres>, row: &ExportMember) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO members (id, name) VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_season(tx: &mut Transaction<'_, Postgres>, row: &ExportSeason) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO seasons (id, league_id, year, num_teams, num_playoff_teams,
                             regular_season_weeks, playoff_weeks, champion_team_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            league_id = EXCLUDED.league_id,
            year = EXCLUDED.year,
            num_teams = EXCLUDED.num_teams,
            num_playoff_teams = EXCLUDED.num_playoff_teams,
            regular_season_weeks = EXCLUDED.regular_season_weeks,
            playoff_weeks = EXCLUDED.playoff_weeks,
            champion_team_id = EXCLUDED.champion_team_id
        "#,
    )
    .bind(row.id)
    .bind(row.league_id)
    .bind(row.year)
    .bind(row.num_teams)
    .bind(row.num_playoff_teams)
    .bind(row.regular_season_weeks)
    .bind(row.playoff_weeks)
    .bind(row.champion_team_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_team(tx: &mut Transaction<'_, Postgres>, row: &ExportTeam) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO teams (id, season_id, member_id, name, wins, losses, ties, points_for,
                           points_against, playoff_seed, made_playoffs, final_rank, is_champion)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (id) DO UPDATE SET
            season_id = EXCLUDED.season_id,
            member_id = EXCLUDED.member_id,
            name = EXCLUDED.name,
            wins = EXCLUDED.wins,
            losses = EXCLUDED.losses,
            ties = EXCLUDED.ties,
            points_for = EXCLUDED.points_for,
            points_against = EXCLUDED.points_against,
            playoff_seed = EXCLUDED.playoff_seed,
            made_playoffs = EXCLUDED.made_playoffs,
            final_rank = EXCLUDED.final_rank,
            is_champion = EXCLUDED.is_champion
        "#,
    )
    .bind(row.id)
    .bind(row.season_id)
    .bind(row.member_id)
    .bind(&row.name)
    .bind(row.wins)
    .bind(row.losses)
    .bind(row.ties)
    .bind(row.points_for)
    .bind(row.points_against)
    .bind(row.playoff_seed)
    .bind(row.made_playoffs)
    .bind(row.final_rank)
    .bind(row.is_champion)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_matchup(tx: &mut Transaction<'_, Postgres>, row: &ExportMatchup) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO matchups (id, season_id, week, team1_id, team2_id, team1_score, team2_score,
                              is_playoff, is_championship, is_consolation)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE SET
            season_id = EXCLUDED.season_id,
            week = EXCLUDED.week,
            team1_id = EXCLUDED.team1_id,
            team2_id = EXCLUDED.team2_id,
            team1_score = EXCLUDED.team1_score,
            team2_score = EXCLUDED.team2_score,
            is_playoff = EXCLUDED.is_playoff,
            is_championship = EXCLUDED.is_championship,
            is_consolation = EXCLUDED.is_consolation
        "#,
    )
    .bind(row.id)
    .bind(row.season_id)
    .bind(row.week)
    .bind(row.team1_id)
    .bind(row.team2_id)
    .bind(row.team1_score)
    .bind(row.team2_score)
    .bind(row.is_playoff)
    .bind(row.is_championship)
    .bind(row.is_consolation)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_draft_pick(tx: &mut Transaction<'_, Postgres>, row: &ExportDraftPick) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO draft_picks (id, season_id, team_id, round, pick_number, pick_in_round, player_id,
                                 player_name, player_position, player_team, season_points)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            season_id = EXCLUDED.season_id,
            team_id = EXCLUDED.team_id,
            round = EXCLUDED.round,
            pick_number = EXCLUDED.pick_number,
            pick_in_round = EXCLUDED.pick_in_round,
            player_id = EXCLUDED.player_id,
            player_name = EXCLUDED.player_name,
            player_position = EXCLUDED.player_position,
            player_team = EXCLUDED.player_team,
            season_points = EXCLUDED.season_points
        "#,
    )
    .bind(row.id)
    .bind(row.season_id)
    .bind(row.team_id)
    .bind(row.round)
    .bind(row.pick_number)
    .bind(row.pick_in_round)
    .bind(&row.player_id)
    .bind(&row.player_name)
    .bind(&row.player_position)
    .bind(&row.player_team)
    .bind(row.season_points)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_transaction(tx: &mut Transaction<'_, Postgres>, row: &ExportTransaction) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO transactions (id, season_id, team_id, type, timestamp, week, player_id,
                                  player_name, player_position, games_played, points_scored)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            season_id = EXCLUDED.season_id,
            team_id = EXCLUDED.team_id,
            type = EXCLUDED.type,
            timestamp = EXCLUDED.timestamp,
            week = EXCLUDED.week,
            player_id = EXCLUDED.player_id,
            player_name = EXCLUDED.player_name,
            player_position = EXCLUDED.player_position,
            games_played = EXCLUDED.games_played,
            points_scored = EXCLUDED.points_scored
        "#,
    )
    .bind(row.id)
    .bind(row.season_id)
    .bind(row.team_id)
    .bind(row.kind.as_str())
    .bind(row.timestamp)
    .bind(row.week)
    .bind(&row.player_id)
    .bind(&row.player_name)
    .bind(&row.player_position)
    .bind(row.games_played)
    .bind(row.points_scored)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    const EXPORT: &str = r#"{
        "leagues": [{"id": 1, "name": "Top Pot", "yahoo_league_key": "449.l.1"}],
        "members": [{"id": 10, "name": "Ann", "total_wins": 90}],
        "seasons": [{"id": 100, "league_id": 1, "year": 2023, "champion_team_id": null}],
        "teams": [{"id": 1000, "season_id": 100, "member_id": 10, "name": "Ann FC",
                   "wins": 10, "losses": 4, "points_for": 1650.5}],
        "matchups": [{"id": 5, "season_id": 100, "week": 1, "team1_id": 1000, "team2_id": 1001,
                      "team1_score": 120.25, "team2_score": 99}],
        "standings": [{"id": 1}],
        "draft_picks": [{"id": 7, "season_id": 100, "team_id": 1000, "round": 1, "pick_number": 3,
                         "player_name": "Bijan Robinson", "player_nfl_team": "ATL"}],
        "transactions": [{"id": 9, "season_id": 100, "team_id": 1000, "type": "waiver",
                          "timestamp": "2023-10-01T14:30:00", "player_name": "Puka Nacua",
                          "points_scored": 88.2}],
        "exported_at": "2024-01-01T00:00:00"
    }"#;

    #[test]
    fn parses_the_export_shape_with_defaults() {
        let export = LeagueExport::from_json(EXPORT).unwrap();
        assert_eq!(export.total_rows(), 7);

        let season = &export.seasons[0];
        assert_eq!((season.num_teams, season.regular_season_weeks, season.playoff_weeks), (12, 14, 3));

        let team = &export.teams[0];
        assert_eq!(team.points_for, dec!(1650.5));
        assert_eq!(team.points_against, Decimal::ZERO);
        assert!(!team.is_champion);

        assert_eq!(export.matchups[0].team2_score, dec!(99));
        assert_eq!(export.draft_picks[0].player_team.as_deref(), Some("ATL"));
        assert_eq!(export.draft_picks[0].season_points, None);

        let tx = &export.transactions[0];
        assert_eq!(tx.kind, TransactionType::Waiver);
        assert_eq!(tx.timestamp, Some(Utc.with_ymd_and_hms(2023, 10, 1, 14, 30, 0).unwrap()));
    }

    #[test]
    fn null_columns_read_as_defaults() {
        let raw = r#"{
            "teams": [{"id": 1, "season_id": 1, "member_id": 1, "name": "Ann FC", "wins": null,
                       "points_for": null, "points_against": null, "final_rank": null, "is_champion": null}],
            "matchups": [{"id": 2, "season_id": 1, "week": 14, "team1_id": 1, "team2_id": 2,
                          "team1_score": null, "team2_score": null, "is_playoff": null}],
            "transactions": [{"id": 3, "season_id": 1, "team_id": 1, "type": "add", "player_name": null,
                              "games_played": null, "points_scored": null}]
        }"#;
        let export = LeagueExport::from_json(raw).unwrap();

        let team = &export.teams[0];
        assert_eq!((team.wins, team.points_for, team.points_against), (0, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(team.final_rank, None);
        assert!(!team.is_champion);

        let game = &export.matchups[0];
        assert_eq!((game.team1_score, game.team2_score), (Decimal::ZERO, Decimal::ZERO));
        assert!(!game.is_playoff);

        let tx = &export.transactions[0];
        assert_eq!(tx.points_scored, Decimal::ZERO);
        assert_eq!(tx.games_played, 0);
        assert_eq!(tx.player_name, "Unknown");
    }

    #[test]
    fn missing_tables_are_empty() {
        let export = LeagueExport::from_json(r#"{"members": []}"#).unwrap();
        assert_eq!(export.total_rows(), 0);
    }

    #[test]
    fn timestamps_are_parsed_leniently() {
        assert_eq!(
            parse_timestamp("2023-10-01T14:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2023, 10, 1, 12, 30, 0).unwrap())
        );
        assert!(parse_timestamp("2023-10-01 14:30:00.123").is_some());
        assert_eq!(parse_timestamp("last tuesday"), None);
    }

    #[test]
    fn unknown_transaction_types_are_rejected() {
        let raw = r#"{"transactions": [{"id": 1, "season_id": 1, "team_id": 1, "type": "claim", "player_name": "X"}]}"#;
        assert!(matches!(LeagueExport::from_json(raw), Err(DbError::JsonError(_))));
    }
}
