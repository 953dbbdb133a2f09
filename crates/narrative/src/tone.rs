use serde::Serialize;
use std::fmt;

/// Voice the narrative is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Commissioner,
    TrashTalk,
    HypeMan,
    Analyst,
    Poet,
    MovieTrailer,
}

/// A tone as listed by `GET /api/ai/tones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneOption {
    pub id: &'static str,
    pub label: &'static str,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Commissioner,
        Tone::TrashTalk,
        Tone::HypeMan,
        Tone::Analyst,
        Tone::Poet,
        Tone::MovieTrailer,
    ];

    /// Resolves a tone id; anything unrecognised falls back to the commissioner.
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id.trim())
            .unwrap_or_default()
    }

    pub fn id(&self) -> &'static str {
        match self {
            Tone::Commissioner => "commissioner",
            Tone::TrashTalk => "trash_talk",
            Tone::HypeMan => "hype_man",
            Tone::Analyst => "analyst",
            Tone::Poet => "poet",
            Tone::MovieTrailer => "movie_trailer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Commissioner => "The Commissioner",
            Tone::TrashTalk => "Trash Talk",
            Tone::HypeMan => "Hype Man",
            Tone::Analyst => "Analyst",
            Tone::Poet => "Poet Laureate",
            Tone::MovieTrailer => "Movie Trailer",
        }
    }

    /// Text appended to a system prompt to shift its voice. Empty for the default tone.
    pub fn modifier(&self) -> &'static str {
        match self {
            Tone::Commissioner => "",
            Tone::TrashTalk => {
                "\n\nTONE OVERRIDE: TRASH TALK MODE.\n\
                 You are in roast mode. Be savage and hilarious; every stat is ammunition.\n\
                 - Mock bad records, low scores and playoff misses hard\n\
                 - Even good managers get backhanded compliments\n\
                 - Keep it friendly league banter, never actual cruelty\n\
                 - Still reference real stats and names"
            }
            Tone::HypeMan => {
                "\n\nTONE OVERRIDE: HYPE MAN MODE.\n\
                 You are the ultimate cheerleader. Everything is amazing.\n\
                 - Find the silver lining in even the worst records\n\
                 - Celebrate small victories like championships\n\
                 - Bad seasons are the setup for the redemption arc\n\
                 - Stay supportive while still referencing real stats"
            }
            Tone::Analyst => {
                "\n\nTONE OVERRIDE: ANALYST MODE.\n\
                 You are a dead-serious sports analyst. No jokes and no emojis.\n\
                 - Use precise stats, percentages and comparisons to league averages\n\
                 - Talk about sample size and regression to the mean\n\
                 - Give an honest, data-driven assessment"
            }
            Tone::Poet => {
                "\n\nTONE OVERRIDE: POET LAUREATE MODE.\n\
                 You are a dramatic poet narrating an epic tale.\n\
                 - Use metaphor and vivid imagery\n\
                 - Seasons are chapters, careers are sagas, championships are coronations\n\
                 - Make even mediocre records sound like mythology"
            }
            Tone::MovieTrailer => {
                "\n\nTONE OVERRIDE: MOVIE TRAILER MODE.\n\
                 You are the voice-over for an action movie trailer. Maximum drama.\n\
                 - Short, punchy sentences with dramatic pauses\n\
                 - Reference specific stats like plot twists\n\
                 - End with a dramatic one-liner"
            }
        }
    }

    pub fn options() -> Vec<ToneOption> {
        Self::ALL
            .into_iter()
            .map(|t| ToneOption {
                id: t.id(),
                label: t.label(),
            })
            .collect()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
