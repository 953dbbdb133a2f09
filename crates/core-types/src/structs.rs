use crate::enums::TransactionType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
}

/// A person who has managed a team in one or more seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub league_id: i64,
    pub year: i32,
    pub num_teams: i32,
    pub num_playoff_teams: i32,
    pub regular_season_weeks: i32,
    pub playoff_weeks: i32,
    pub champion_team_id: Option<i64>,
}

/// One member's team for one season, with the final regular-season record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeason {
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

impl TeamSeason {
    /// `W-L`, or `W-L-T` when the team recorded ties.
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }

    pub fn reached_playoffs(&self) -> bool {
        self.made_playoffs || self.playoff_seed.is_some()
    }
}

/// A single game between two teams of the same season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
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

impl Matchup {
    /// The winning team, or `None` for a tie.
    pub fn winner_id(&self) -> Option<i64> {
        if self.team1_score > self.team2_score {
            Some(self.team1_id)
        } else if self.team2_score > self.team1_score {
            Some(self.team2_id)
        } else {
            None
        }
    }

    pub fn margin(&self) -> Decimal {
        (self.team1_score - self.team2_score).abs()
    }

    pub fn total_points(&self) -> Decimal {
        self.team1_score + self.team2_score
    }

    pub fn is_regular_season(&self) -> bool {
        !self.is_playoff && !self.is_consolation
    }

    /// Both teams posted a non-zero score, i.e. the game was actually played.
    pub fn is_scored(&self) -> bool {
        self.team1_score > Decimal::ZERO && self.team2_score > Decimal::ZERO
    }

    /// Returns `(own_score, opponent_score, opponent_id)` from the perspective of `team_id`.
    pub fn perspective(&self, team_id: i64) -> Option<(Decimal, Decimal, i64)> {
        if self.team1_id == team_id {
            Some((self.team1_score, self.team2_score, self.team2_id))
        } else if self.team2_id == team_id {
            Some((self.team2_score, self.team1_score, self.team1_id))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    pub round: i32,
    /// Overall pick number within the draft.
    pub pick_number: i32,
    pub pick_in_round: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_team: Option<String>,
    /// Points the player scored that season; `None` when never played.
    pub season_points: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub season_id: i64,
    pub team_id: i64,
    pub kind: TransactionType,
    pub timestamp: Option<DateTime<Utc>>,
    pub week: Option<i32>,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_position: Option<String>,
    pub games_played: i32,
    pub points_scored: Decimal,
}
