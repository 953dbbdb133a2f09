use crate::draft::{self, DraftBoard, DraftSeason, DraftTendencies, ReportCard, StealsAndBusts};
use crate::error::AnalyticsError;
use crate::h2h::{self, HeadToHeadMatrix, MemberHeadToHead, MemberRivalries};
use crate::history::LeagueHistory;
use crate::league::{self, Champions, LeagueOverview, SeasonDetail, SeasonSummary};
use crate::luck::{self, LuckRow};
use crate::matchups::{self, Blowout, MatchupView, PlayoffBracket, SeasonMatchups, WeeklyScore};
use crate::members::{self, MemberProfile, MemberSummary};
use crate::nfl::{self, NflTeamDetail, NflTeamSummary};
use crate::players::{self, PlayerHistory, PlayerHit};
use crate::power::{self, PowerRanking};
use crate::records::{self, RecordBook, SeasonHighlights};
use crate::standings::{self, StandingRow};
use crate::transactions::{self, MemberActivity, SeasonTransactions, WaiverWireWins};
use configuration::PowerWeights;
use core_types::{Season, TransactionType};
use tracing::debug;

/// Entry point for every derived statistic.
///
/// The engine holds no league data. Each call takes a [`LeagueHistory`]
/// snapshot, resolves the season or member it is asked about, and hands the
/// rows to the matching pure aggregation. Lookups that miss become
/// [`AnalyticsError`]s; everything else degrades to empty results.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    weights: PowerWeights,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            weights: PowerWeights::default(),
        }
    }
}

impl AnalyticsEngine {
    /// Builds an engine with custom power ranking weights.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidWeights`] if any weight is negative or
    /// the weights do not sum to one.
    pub fn new(weights: PowerWeights) -> Result<Self, AnalyticsError> {
        weights
            .validate()
            .map_err(|e| AnalyticsError::InvalidWeights(e.to_string()))?;
        Ok(Self { weights })
    }

    fn season<'a>(&self, history: &'a LeagueHistory, year: i32) -> Result<&'a Season, AnalyticsError> {
        history
            .season_by_year(year)
            .ok_or(AnalyticsError::SeasonNotFound(year))
    }

    // --- League ---

    pub fn league_overview(&self, history: &LeagueHistory) -> Result<LeagueOverview, AnalyticsError> {
        league::league_overview(history).ok_or_else(|| AnalyticsError::NotFound("League".to_string()))
    }

    pub fn seasons(&self, history: &LeagueHistory) -> Vec<SeasonSummary> {
        league::season_summaries(history)
    }

    pub fn season_detail(&self, history: &LeagueHistory, year: i32) -> Result<SeasonDetail, AnalyticsError> {
        Ok(league::season_detail(history, self.season(history, year)?))
    }

    pub fn standings(&self, history: &LeagueHistory, year: i32) -> Result<Vec<StandingRow>, AnalyticsError> {
        let season = self.season(history, year)?;
        let rows = standings::season_standings(history, season);
        debug!(year, teams = rows.len(), "Computed season standings");
        Ok(rows)
    }

    pub fn season_highlights(&self, history: &LeagueHistory, year: i32) -> Result<SeasonHighlights, AnalyticsError> {
        Ok(records::season_highlights(history, self.season(history, year)?))
    }

    pub fn champions(&self, history: &LeagueHistory) -> Champions {
        league::champions(history)
    }

    // --- Members ---

    pub fn members(&self, history: &LeagueHistory) -> Vec<MemberSummary> {
        members::member_summaries(history)
    }

    pub fn member_profile(&self, history: &LeagueHistory, member_id: i64) -> Result<MemberProfile, AnalyticsError> {
        members::member_profile(history, member_id).ok_or(AnalyticsError::MemberNotFound(member_id))
    }

    pub fn member_head_to_head(
        &self,
        history: &LeagueHistory,
        member_id: i64,
    ) -> Result<MemberHeadToHead, AnalyticsError> {
        h2h::member_head_to_head(history, member_id).ok_or(AnalyticsError::MemberNotFound(member_id))
    }

    pub fn member_rivalries(&self, history: &LeagueHistory, member_id: i64) -> Result<MemberRivalries, AnalyticsError> {
        h2h::member_rivalries(history, member_id).ok_or(AnalyticsError::MemberNotFound(member_id))
    }

    // --- Records ---

    pub fn all_time_records(&self, history: &LeagueHistory) -> RecordBook {
        records::all_time_records(history)
    }

    pub fn head_to_head_matrix(&self, history: &LeagueHistory) -> HeadToHeadMatrix {
        h2h::head_to_head_matrix(history)
    }

    pub fn luck_analysis(&self, history: &LeagueHistory) -> Vec<LuckRow> {
        luck::luck_analysis(history)
    }

    pub fn power_rankings(&self, history: &LeagueHistory) -> Vec<PowerRanking> {
        let rankings = power::power_rankings(history, &self.weights);
        debug!(members = rankings.len(), "Computed power rankings");
        rankings
    }

    // --- Matchups ---

    pub fn season_matchups(
        &self,
        history: &LeagueHistory,
        year: i32,
        week: Option<i32>,
    ) -> Result<SeasonMatchups, AnalyticsError> {
        Ok(matchups::season_matchups(history, self.season(history, year)?, week))
    }

    pub fn playoff_bracket(&self, history: &LeagueHistory, year: i32) -> Result<PlayoffBracket, AnalyticsError> {
        Ok(matchups::playoff_bracket(history, self.season(history, year)?))
    }

    pub fn close_games(&self, history: &LeagueHistory, limit: usize) -> Vec<MatchupView> {
        matchups::close_games(history, limit)
    }

    pub fn blowouts(&self, history: &LeagueHistory, limit: usize) -> Vec<Blowout> {
        matchups::blowouts(history, limit)
    }

    pub fn highest_scores(&self, history: &LeagueHistory, limit: usize) -> Vec<WeeklyScore> {
        matchups::highest_scores(history, limit)
    }

    pub fn lowest_scores(&self, history: &LeagueHistory, limit: usize) -> Vec<WeeklyScore> {
        matchups::lowest_scores(history, limit)
    }

    // --- Drafts & transactions ---

    pub fn draft_seasons(&self, history: &LeagueHistory) -> Vec<DraftSeason> {
        draft::draft_seasons(history)
    }

    pub fn draft_board(&self, history: &LeagueHistory, year: i32) -> Result<DraftBoard, AnalyticsError> {
        Ok(draft::draft_board(history, self.season(history, year)?))
    }

    pub fn draft_report_cards(&self, history: &LeagueHistory, year: i32) -> Result<Vec<ReportCard>, AnalyticsError> {
        Ok(draft::draft_report_cards(history, self.season(history, year)?))
    }

    pub fn steals_and_busts(
        &self,
        history: &LeagueHistory,
        year: i32,
        limit: usize,
    ) -> Result<StealsAndBusts, AnalyticsError> {
        Ok(draft::steals_and_busts(history, self.season(history, year)?, limit))
    }

    pub fn draft_tendencies(&self, history: &LeagueHistory, member_id: i64) -> Result<DraftTendencies, AnalyticsError> {
        draft::draft_tendencies(history, member_id).ok_or(AnalyticsError::MemberNotFound(member_id))
    }

    pub fn season_transactions(
        &self,
        history: &LeagueHistory,
        year: i32,
        filter: Option<TransactionType>,
    ) -> Result<SeasonTransactions, AnalyticsError> {
        Ok(transactions::season_transactions(history, self.season(history, year)?, filter))
    }

    pub fn member_activity(&self, history: &LeagueHistory, member_id: i64) -> Result<MemberActivity, AnalyticsError> {
        transactions::member_activity(history, member_id).ok_or(AnalyticsError::MemberNotFound(member_id))
    }

    pub fn waiver_wire_wins(
        &self,
        history: &LeagueHistory,
        year: i32,
        limit: usize,
    ) -> Result<WaiverWireWins, AnalyticsError> {
        Ok(transactions::waiver_wire_wins(history, self.season(history, year)?, limit))
    }

    // --- NFL teams & players ---

    pub fn nfl_teams(&self, history: &LeagueHistory) -> Vec<NflTeamSummary> {
        nfl::nfl_teams(history)
    }

    pub fn nfl_team_detail(&self, history: &LeagueHistory, abbr: &str) -> Result<NflTeamDetail, AnalyticsError> {
        nfl::nfl_team_detail(history, abbr).ok_or_else(|| {
            AnalyticsError::NotFound(format!("Draft data for NFL team '{}'", abbr.trim().to_uppercase()))
        })
    }

    pub fn search_players(
        &self,
        history: &LeagueHistory,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PlayerHit>, AnalyticsError> {
        if query.trim().chars().count() < 2 {
            return Err(AnalyticsError::InvalidInput(
                "search query must be at least 2 characters".to_string(),
            ));
        }
        Ok(players::search_players(history, query, limit))
    }

    pub fn player_history(&self, history: &LeagueHistory, name: &str) -> Result<PlayerHistory, AnalyticsError> {
        players::player_history(history, name)
            .ok_or_else(|| AnalyticsError::NotFound(format!("Player '{}'", name.trim())))
    }
}
