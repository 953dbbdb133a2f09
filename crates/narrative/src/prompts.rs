//! System prompts and the user prompts built from a dashboard context.
//!
//! The context is whatever JSON the dashboard already rendered for the page or
//! block, so every lookup here tolerates missing fields.

use crate::error::NarrativeError;
use serde_json::Value;

const PAGE_STYLE: &str = "STYLE GUIDELINES:\n\
- Use emojis to punctuate key moments\n\
- Break into 2-3 short paragraphs\n\
- Reference specific managers, years, scores and weeks\n\
- Create storylines: rivalries, redemption arcs, heartbreaks, triumphs\n\n\
Keep it around 150-200 words.";

const BLOCK_STYLE: &str = "STYLE:\n\
- Use a few emojis\n\
- 2-3 short sentences max, specific and punchy\n\n\
Keep it to 40-60 words. This is a quick insight, not an essay.";

/// A full-page summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    MemberProfile,
    Standings,
    Records,
    Matchups,
}

/// A short insight embedded in one block of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    SeasonHistory,
    Rivalries,
    HeadToHeadRecords,
    NotableMoments,
    ChampionshipYears,
    StatsOverview,
    LeagueHistory,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::MemberProfile,
        PageKind::Standings,
        PageKind::Records,
        PageKind::Matchups,
    ];

    pub fn from_id(id: &str) -> Result<Self, NarrativeError> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| NarrativeError::UnknownKind("page_type", id.to_string()))
    }

    pub fn id(&self) -> &'static str {
        match self {
            PageKind::MemberProfile => "member_profile",
            PageKind::Standings => "standings",
            PageKind::Records => "records",
            PageKind::Matchups => "matchups",
        }
    }

    /// Kind stored with cached page summaries.
    pub fn cache_kind(&self) -> String {
        format!("summary_{}", self.id())
    }

    pub fn system_prompt(&self) -> String {
        let role = match self {
            PageKind::MemberProfile => {
                "You are a charismatic fantasy football analyst with the energy of a sports talk show host, \
                 writing the intro to a league member's profile page. Tell the story of this manager's career \
                 like a mini-documentary. Celebrate championships; without any, play up the hungry contender. \
                 Contrast their best and worst moments and end with a defining statement."
            }
            PageKind::Standings => {
                "You are a fantasy football analyst doing an end-of-season recap like an awards show host. \
                 Celebrate the champion, call out surprises and disappointments, and hand out titles to \
                 standout performances."
            }
            PageKind::Records => {
                "You are a fantasy football historian commentating on the league's Hall of Fame. Treat records \
                 as legendary achievements, include the hall of shame, use the luck analysis to stir the \
                 lucky-versus-skilled debate, and crown a GOAT."
            }
            PageKind::Matchups => {
                "You are a colorful fantasy football commentator narrating a highlight reel of memorable \
                 matchups. Close games are championship moments, blowouts are devastating, high scores are \
                 legendary and low scores are the hall of shame."
            }
        };
        format!("{role}\n\n{PAGE_STYLE}")
    }

    pub fn user_prompt(&self, context: &Value) -> String {
        match self {
            PageKind::MemberProfile => member_profile_prompt(context),
            PageKind::Standings => standings_prompt(context),
            PageKind::Records => records_prompt(context),
            PageKind::Matchups => matchups_prompt(context),
        }
    }
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::SeasonHistory,
        BlockKind::Rivalries,
        BlockKind::HeadToHeadRecords,
        BlockKind::NotableMoments,
        BlockKind::ChampionshipYears,
        BlockKind::StatsOverview,
        BlockKind::LeagueHistory,
    ];

    pub fn from_id(id: &str) -> Result<Self, NarrativeError> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| NarrativeError::UnknownKind("block_type", id.to_string()))
    }

    pub fn id(&self) -> &'static str {
        match self {
            BlockKind::SeasonHistory => "season_history",
            BlockKind::Rivalries => "rivalries",
            BlockKind::HeadToHeadRecords => "h2h_records",
            BlockKind::NotableMoments => "notable_moments",
            BlockKind::ChampionshipYears => "championship_years",
            BlockKind::StatsOverview => "stats_overview",
            BlockKind::LeagueHistory => "league_history",
        }
    }

    pub fn system_prompt(&self) -> String {
        let role = match self {
            BlockKind::SeasonHistory => {
                "You are a sharp fantasy football analyst commenting on a manager's season-by-season journey. \
                 Are they improving, declining or yo-yoing? Name the trend and the turning points."
            }
            BlockKind::Rivalries => {
                "You are a fantasy football commentator analyzing rivalries. Who dominates, who is the underdog, \
                 and what makes these matchups spicy?"
            }
            BlockKind::HeadToHeadRecords => {
                "You are a fantasy football analyst breaking down head-to-head records. Who do they own, and who \
                 is their kryptonite?"
            }
            BlockKind::NotableMoments => {
                "You are an excited fantasy football commentator highlighting career-defining moments, the \
                 legendary and the legendarily bad."
            }
            BlockKind::ChampionshipYears => {
                "You are a fantasy football historian opening the trophy case. Celebrate the titles, or the \
                 hunger for a first one."
            }
            BlockKind::StatsOverview => {
                "You are a fantasy football analyst giving a quick career verdict: elite, average or a \
                 cautionary tale?"
            }
            BlockKind::LeagueHistory => {
                "You are a nostalgic fantasy football commentator narrating a This Day in League History \
                 segment. Make the moment feel epic."
            }
        };
        format!("{role}\n\n{BLOCK_STYLE}")
    }

    pub fn user_prompt(&self, context: &Value, member_context: Option<&Value>) -> String {
        let name = member_context
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("This manager");

        match self {
            BlockKind::SeasonHistory => {
                let lines = list(context, "seasons", 10, |s| {
                    format!(
                        "- {}: {} (#{}) - {} pts{}",
                        text(s, "year"),
                        text(s, "record"),
                        text(s, "final_rank"),
                        text(s, "points_for"),
                        if flag(s, "is_champion") { " CHAMPION" } else { "" }
                    )
                });
                format!("Analyze {name}'s season history and identify the storyline:\n\n{lines}\n\nWhat's the narrative arc here?")
            }
            BlockKind::Rivalries => {
                let lines = list(context, "rivalries", 5, |r| {
                    format!(
                        "- vs {}: {}-{} ({}%) - {}",
                        text(r, "opponent_name"),
                        text(r, "wins"),
                        text(r, "losses"),
                        text(r, "win_percentage"),
                        text(r, "classification")
                    )
                });
                format!("Analyze {name}'s top rivalries:\n\n{lines}\n\nWho's the nemesis? Who do they dominate?")
            }
            BlockKind::HeadToHeadRecords => {
                let lines = list(context, "head_to_head", 12, |r| {
                    format!(
                        "- vs {}: {}-{} ({}%)",
                        text(r, "opponent_name"),
                        text(r, "wins"),
                        text(r, "losses"),
                        text(r, "win_percentage")
                    )
                });
                format!("Analyze {name}'s head-to-head records:\n\n{lines}\n\nWhat patterns do you see? Any surprises?")
            }
            BlockKind::NotableMoments => {
                let notable = &context["notable_events"];
                format!(
                    "Comment on {name}'s most notable moments:\n\n\
                     Career High: {} pts vs {}\n\
                     Biggest Blowout Win: +{} vs {}\n\
                     Closest Victory: +{} vs {}\n\
                     Worst Defeat: -{} to {}\n\n\
                     What do these moments say about this manager?",
                    text(&notable["highest_score"], "score"),
                    text(&notable["highest_score"], "opponent"),
                    text(&notable["biggest_win"], "margin"),
                    text(&notable["biggest_win"], "opponent"),
                    text(&notable["closest_win"], "margin"),
                    text(&notable["closest_win"], "opponent"),
                    text(&notable["worst_loss"], "margin"),
                    text(&notable["worst_loss"], "opponent"),
                )
            }
            BlockKind::ChampionshipYears => {
                let titles = context["notable_events"]["championship_years"]
                    .as_array()
                    .map_or(0, Vec::len);
                if titles == 0 {
                    format!("{name} has NO championships yet.\n\nTotal Rings: 0\n\nWhat should we say about their quest for glory?")
                } else {
                    let lines = list(&context["notable_events"], "championship_years", titles, |c| {
                        format!("- {}: {} ({})", text(c, "year"), text(c, "team_name"), text(c, "record"))
                    });
                    format!("Celebrate {name}'s championship legacy:\n\n{lines}\n\nTotal Rings: {titles}")
                }
            }
            BlockKind::StatsOverview => {
                let m = &context["member"];
                format!(
                    "Give a quick verdict on {name}'s career:\n\n\
                     Seasons: {}\nChampionships: {}\nRecord: {}-{} ({}%)\nBest Finish: #{}\nWorst Finish: #{}\n\n\
                     Elite? Solid? Work in progress?",
                    text(m, "total_seasons"),
                    text(m, "total_championships"),
                    text(m, "total_wins"),
                    text(m, "total_losses"),
                    text(m, "win_percentage"),
                    text(m, "best_finish"),
                    text(m, "worst_finish"),
                )
            }
            BlockKind::LeagueHistory => {
                format!("Narrate this moment from league history in an exciting way: {context}")
            }
        }
    }
}

fn member_profile_prompt(context: &Value) -> String {
    let m = &context["member"];
    let notable = &context["notable_events"];
    let rivalries = list(context, "rivalries", 3, |r| {
        format!(
            "- {} ({}-{}, {})",
            text(r, "opponent_name"),
            text(r, "wins"),
            text(r, "losses"),
            text(r, "classification")
        )
    });
    let titles = list(notable, "championship_years", 20, |c| {
        format!("- {} ({})", text(c, "year"), text(c, "record"))
    });

    format!(
        "Write an entertaining narrative about this fantasy football manager's career.\n\n\
         === MANAGER PROFILE ===\n\
         Name: {}\nSeasons Played: {}\nChampionships: {}\nCareer Record: {}-{} ({}% win rate)\n\
         Best Finish: #{}\nWorst Finish: #{}\nAverage Points/Season: {}\n\n\
         === LEGENDARY MOMENTS ===\n\
         Career High Score: {} vs {} (Week {}, {})\n\
         Biggest Blowout Win: +{} vs {}\n\
         Worst Defeat: -{} to {}\n\n\
         === CHAMPIONSHIPS ===\n{}\n\n\
         === RIVALRIES ===\n{}",
        text(m, "name"),
        text(m, "total_seasons"),
        text(m, "total_championships"),
        text(m, "total_wins"),
        text(m, "total_losses"),
        text(m, "win_percentage"),
        text(m, "best_finish"),
        text(m, "worst_finish"),
        text(m, "avg_points_per_season"),
        text(&notable["highest_score"], "score"),
        text(&notable["highest_score"], "opponent"),
        text(&notable["highest_score"], "week"),
        text(&notable["highest_score"], "season"),
        text(&notable["biggest_win"], "margin"),
        text(&notable["biggest_win"], "opponent"),
        text(&notable["worst_loss"], "margin"),
        text(&notable["worst_loss"], "opponent"),
        or_none(titles, "Still hunting for that first ring..."),
        or_none(rivalries, "No heated rivalries yet"),
    )
}

fn standings_prompt(context: &Value) -> String {
    let standings = context["standings"].as_array();
    let champion = standings
        .and_then(|rows| rows.iter().find(|s| flag(s, "is_champion")))
        .map_or_else(|| "TBD".to_string(), |c| format!("{} ({})", text(c, "manager"), text(c, "record")));
    let playoff_teams = standings.map_or(0, |rows| rows.iter().filter(|s| flag(s, "made_playoffs")).count());
    let top = list(context, "standings", 5, |s| {
        format!(
            "{}. {} - {} ({} pts)",
            text(s, "rank"),
            text(s, "manager"),
            text(s, "record"),
            text(s, "points_for")
        )
    });
    let records = &context["season_records"];

    format!(
        "Summarize this fantasy football season:\n\n\
         Season: {}\nChampion: {champion}\n\nTop 5 Standings:\n{top}\n\n\
         Season Highlights:\n\
         - Highest Score: {} by {} (Week {})\n\
         - Biggest Blowout: {} beat {} by {}\n\
         - Closest Game: {} point differential\n\n\
         Playoff Teams: {playoff_teams}\n\nWrite an engaging season recap.",
        text(&context["season"], "year"),
        text(&records["highest_score"], "score"),
        text(&records["highest_score"], "manager"),
        text(&records["highest_score"], "week"),
        text(&records["biggest_blowout"], "winner"),
        text(&records["biggest_blowout"], "loser"),
        text(&records["biggest_blowout"], "margin"),
        text(&records["closest_game"], "margin"),
    )
}

fn records_prompt(context: &Value) -> String {
    let all_time = &context["all_time_records"];
    let power = list(context, "power_rankings", 5, |p| {
        format!(
            "{}. {} - {} titles, {}% win rate",
            text(p, "rank"),
            text(p, "member"),
            text(p, "championships"),
            text(p, "win_percentage")
        )
    });
    let luck = list(context, "luck_analysis", 3, |l| {
        format!("- {}: {}", text(l, "member"), text(l, "luck_rating"))
    });

    format!(
        "Comment on these all-time league records:\n\n\
         - Highest Score Ever: {} by {} ({})\n\
         - Lowest Score Ever: {} by {}\n\
         - Biggest Blowout: {} points ({} over {})\n\
         - Closest Game: {} points\n\n\
         Power Rankings (Top 5):\n{power}\n\nLuck Analysis (Most Lucky):\n{luck}\n\n\
         Write an entertaining commentary on the league's greatest achievements and storylines.",
        text(&all_time["highest_score"], "score"),
        text(&all_time["highest_score"], "manager"),
        text(&all_time["highest_score"], "season"),
        text(&all_time["lowest_score"], "score"),
        text(&all_time["lowest_score"], "manager"),
        text(&all_time["biggest_blowout"], "margin"),
        text(&all_time["biggest_blowout"], "winner"),
        text(&all_time["biggest_blowout"], "loser"),
        text(&all_time["closest_game"], "margin"),
    )
}

fn matchups_prompt(context: &Value) -> String {
    let close = list(context, "close_games", 3, |g| {
        format!(
            "- {} vs {}: {} point difference (Week {}, {})",
            text(g, "team1_manager"),
            text(g, "team2_manager"),
            text(g, "point_differential"),
            text(g, "week"),
            text(g, "season")
        )
    });
    let blowouts = list(context, "blowouts", 3, |g| {
        format!(
            "- {} crushed {} by {} (Week {}, {})",
            text(g, "winner_manager"),
            text(g, "loser_manager"),
            text(g, "margin"),
            text(g, "week"),
            text(g, "season")
        )
    });
    let score_line = |s: &Value| {
        format!(
            "- {}: {} points (Week {}, {})",
            text(s, "manager"),
            text(s, "score"),
            text(s, "week"),
            text(s, "season")
        )
    };
    let high = list(context, "highest_scores", 3, score_line);
    let low = list(context, "lowest_scores", 3, score_line);

    format!(
        "Analyze these notable matchups and create an entertaining narrative:\n\n\
         Closest Games:\n{close}\n\nBiggest Blowouts:\n{blowouts}\n\n\
         Highest Scores:\n{high}\n\nLowest Scores (Hall of Shame):\n{low}\n\n\
         Write colorful commentary about these memorable matchups."
    )
}

/// Shown for a block whose section is missing from a batched reply.
pub const SECTION_FALLBACK: &str = "✨ Check out these stats!";

/// System prompt for a batched request covering several blocks at once.
pub fn batch_system_prompt() -> String {
    "You are an entertaining fantasy football analyst providing quick, punchy insights for different \
     sections of a manager's profile page.\n\n\
     STYLE FOR ALL INSIGHTS:\n\
     - Use emojis liberally\n\
     - Be specific with names, numbers and years\n\
     - Keep each insight to 40-60 words\n\
     - Each section gets its own distinct insight"
        .to_string()
}

/// One combined prompt for several block prompts. The reply is expected to
/// label each insight `[SECTION_n]`, numbered from 1 in `sections` order.
pub fn batch_user_prompt(sections: &[(BlockKind, String)]) -> String {
    let body: String = sections
        .iter()
        .enumerate()
        .map(|(i, (kind, prompt))| {
            format!(
                "\n=== SECTION {}: {} ===\n{}\n",
                i + 1,
                kind.id().replace('_', " ").to_uppercase(),
                prompt
            )
        })
        .collect();

    format!(
        "You need to provide {count} separate insights for different sections of a fantasy football \
         manager's profile page.\n\n\
         For EACH section, write a brief, punchy insight (40-60 words) with emojis and personality.\n\n\
         IMPORTANT: Format your response EXACTLY like this, with each section clearly labeled:\n\n\
         [SECTION_1]\nYour insight for section 1 here...\n\n\
         [SECTION_2]\nYour insight for section 2 here...\n\n\
         (and so on for each section)\n\n\
         Here are the sections to analyze:\n{body}\n\
         Remember: Each insight should be 40-60 words, use emojis, and be entertaining!",
        count = sections.len()
    )
}

/// Splits a batched reply into `count` insights on its `[SECTION_n]` markers.
/// A section whose marker is missing gets [`SECTION_FALLBACK`].
pub fn split_sections(reply: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| {
            let marker = format!("[SECTION_{n}]");
            let Some(found) = reply.find(&marker) else {
                return SECTION_FALLBACK.to_string();
            };
            let rest = &reply[found + marker.len()..];
            let end = rest.find(&format!("[SECTION_{}]", n + 1)).unwrap_or(rest.len());
            rest[..end].trim().to_string()
        })
        .collect()
}

/// Display text for `value[key]`: strings unquoted, missing values as `N/A`.
fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// One line per element of the array at `value[key]`, at most `limit` of them.
fn list(value: &Value, key: &str, limit: usize, line: impl Fn(&Value) -> String) -> String {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().take(limit).map(&line).collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}

fn or_none(lines: String, fallback: &str) -> String {
    if lines.is_empty() { fallback.to_string() } else { lines }
}
