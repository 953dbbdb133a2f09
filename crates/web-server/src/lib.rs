use axum::{
    Json, Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use configuration::{ServerSettings, Settings};
use database::DbRepository;
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod params;
pub mod state;

pub use error::AppError;
pub use state::{AppState, HistorySource};

use analytics::AnalyticsEngine;
use narrative::{NarrativeStore, Narrator};

/// Builds the CORS layer from the configured origins. A single `*` allows any origin.
fn cors_layer(server: &ServerSettings) -> CorsLayer {
    let origin = if server.allowed_origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o.trim()) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::any())
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Commish API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "leagues": "/api/leagues",
            "members": "/api/members",
            "matchups": "/api/matchups",
            "records": "/api/records",
            "drafts": "/api/drafts",
            "nfl_teams": "/api/nfl-teams",
            "players": "/api/players",
            "ai": "/api/ai",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Every API route, with CORS and request tracing applied.
pub fn router(state: Arc<AppState>, server: &ServerSettings) -> Router {
    use handlers::{ai, drafts, league, matchups, members, nfl, players, records};

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        // --- League ---
        .route("/api/leagues", get(league::get_league))
        .route("/api/leagues/seasons", get(league::get_seasons))
        .route("/api/leagues/seasons/:year", get(league::get_season))
        .route("/api/leagues/seasons/:year/highlights", get(league::get_season_highlights))
        .route("/api/leagues/standings/:year", get(league::get_standings))
        .route("/api/leagues/champions", get(league::get_champions))
        // --- Members ---
        .route("/api/members", get(members::get_members))
        .route("/api/members/:member_id", get(members::get_member))
        .route("/api/members/:member_id/head-to-head", get(members::get_head_to_head))
        .route("/api/members/:member_id/rivalries", get(members::get_rivalries))
        // --- Matchups ---
        .route("/api/matchups/season/:year", get(matchups::get_season_matchups))
        .route("/api/matchups/week/:year/:week", get(matchups::get_week_matchups))
        .route("/api/matchups/playoffs/:year", get(matchups::get_playoff_bracket))
        .route("/api/matchups/close-games", get(matchups::get_close_games))
        .route("/api/matchups/blowouts", get(matchups::get_blowouts))
        .route("/api/matchups/highest-scores", get(matchups::get_highest_scores))
        .route("/api/matchups/lowest-scores", get(matchups::get_lowest_scores))
        // --- Records ---
        .route("/api/records/all-time", get(records::get_all_time))
        .route("/api/records/h2h-matrix", get(records::get_h2h_matrix))
        .route("/api/records/luck-analysis", get(records::get_luck_analysis))
        .route("/api/records/power-rankings", get(records::get_power_rankings))
        // --- Drafts & transactions ---
        .route("/api/drafts/seasons", get(drafts::get_draft_seasons))
        .route("/api/drafts/board/:year", get(drafts::get_draft_board))
        .route("/api/drafts/report-card/:year", get(drafts::get_report_cards))
        .route("/api/drafts/steals-busts/:year", get(drafts::get_steals_and_busts))
        .route("/api/drafts/tendencies/:member_id", get(drafts::get_tendencies))
        .route("/api/drafts/transactions/:year", get(drafts::get_transactions))
        .route("/api/drafts/transactions/activity/:member_id", get(drafts::get_member_activity))
        .route("/api/drafts/waiver-wire-wins/:year", get(drafts::get_waiver_wire_wins))
        // --- NFL teams & players ---
        .route("/api/nfl-teams", get(nfl::get_nfl_teams))
        .route("/api/nfl-teams/:abbr", get(nfl::get_nfl_team))
        .route("/api/players/search", get(players::search_players))
        .route("/api/players/history/*name", get(players::get_player_history))
        // --- AI ---
        .route("/api/ai/status", get(ai::get_status))
        .route("/api/ai/tones", get(ai::get_tones))
        .route("/api/ai/summary", post(ai::post_summary))
        .route("/api/ai/block-insight", post(ai::post_block_insight))
        .route("/api/ai/batch-insights", post(ai::post_batch_insights))
        .route("/api/ai/cache/clear", delete(ai::clear_cache))
        .with_state(state)
        .layer(cors_layer(server))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let engine = AnalyticsEngine::new(settings.analysis.power_weights)?;
    let store: Arc<dyn NarrativeStore> = Arc::new(db_repo.clone());
    let narrator = Narrator::from_settings(&settings.narrative, store);

    let app_state = Arc::new(AppState::new(
        Arc::new(db_repo),
        engine,
        narrator,
        Duration::from_secs(settings.server.snapshot_ttl_secs),
    ));
    let app = router(app_state, &settings.server);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
