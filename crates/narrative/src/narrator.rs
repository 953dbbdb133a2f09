use crate::cache::{CachedNarrative, NarrativeStore};
use crate::client::{AnthropicClient, Completion, NarrativeClient};
use crate::error::NarrativeError;
use crate::hashing::{cache_key, context_hash};
use crate::prompts::{self, BlockKind, PageKind};
use crate::tone::Tone;
use configuration::NarrativeSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the AI endpoints return. `narrative` is `None` whenever generation
/// was unavailable or failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeResponse {
    pub narrative: Option<String>,
    pub kind: String,
    pub tone: Tone,
    pub model: Option<String>,
    pub cached: bool,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiStatus {
    pub available: bool,
    pub provider: Option<&'static str>,
    pub model: Option<String>,
    pub model_display: Option<String>,
}

/// One block of a batched insight request.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockRequest {
    pub block_type: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub member_context: Option<Value>,
    #[serde(default)]
    pub tone: Option<String>,
}

/// Insights for a batch of blocks, keyed by block type.
///
/// `cached` is true only when every block came from the cache. When the LLM
/// is unavailable or fails, `insights` still carries the cached blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse {
    pub insights: BTreeMap<String, String>,
    pub tone: Tone,
    pub model: Option<String>,
    pub cached: bool,
    pub available: bool,
}

struct Request {
    kind: String,
    tone: Tone,
    hash: String,
    system: String,
    prompt: String,
    max_tokens: u32,
}

/// Writes page summaries and block insights, caching each by
/// `(kind, tone, context hash)`.
///
/// LLM failures never surface as errors: the response comes back with
/// `available: false`. Only an unknown page or block type is an error.
pub struct Narrator {
    client: Option<Arc<dyn NarrativeClient>>,
    store: Arc<dyn NarrativeStore>,
    model_display: String,
    summary_max_tokens: u32,
    block_max_tokens: u32,
    batch_max_tokens: u32,
}

impl Narrator {
    pub fn new(
        client: Option<Arc<dyn NarrativeClient>>,
        store: Arc<dyn NarrativeStore>,
        settings: &NarrativeSettings,
    ) -> Self {
        Self {
            client,
            store,
            model_display: settings.model_display.clone(),
            summary_max_tokens: settings.summary_max_tokens,
            block_max_tokens: settings.block_max_tokens,
            batch_max_tokens: settings.batch_max_tokens,
        }
    }

    /// Builds a narrator backed by the Anthropic client, or a disabled one
    /// when no API key is configured.
    pub fn from_settings(settings: &NarrativeSettings, store: Arc<dyn NarrativeStore>) -> Self {
        let client: Option<Arc<dyn NarrativeClient>> = match AnthropicClient::new(settings) {
            Ok(client) => {
                info!(model = %settings.model, "Narrative generation enabled");
                Some(Arc::new(client))
            }
            Err(NarrativeError::NotConfigured) => {
                info!("Narrative generation disabled (no API key configured)");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to build the LLM client; narrative generation disabled");
                None
            }
        };
        Self::new(client, store, settings)
    }

    pub fn status(&self) -> AiStatus {
        match &self.client {
            Some(client) => AiStatus {
                available: true,
                provider: Some("Anthropic"),
                model: Some(client.model().to_string()),
                model_display: Some(self.model_display.clone()),
            },
            None => AiStatus {
                available: false,
                provider: None,
                model: None,
                model_display: None,
            },
        }
    }

    /// A full-page summary for `page_type`.
    pub async fn summary(&self, page_type: &str, context: &Value, tone: &str) -> Result<NarrativeResponse, NarrativeError> {
        let page = PageKind::from_id(page_type)?;
        let tone = Tone::from_id(tone);
        let request = Request {
            kind: page.cache_kind(),
            tone,
            hash: context_hash(context),
            system: format!("{}{}", page.system_prompt(), tone.modifier()),
            prompt: page.user_prompt(context),
            max_tokens: self.summary_max_tokens,
        };
        Ok(self.generate(request).await)
    }

    /// A short insight for one block of a page.
    pub async fn block_insight(
        &self,
        block_type: &str,
        context: &Value,
        member_context: Option<&Value>,
        tone: &str,
    ) -> Result<NarrativeResponse, NarrativeError> {
        let block = BlockKind::from_id(block_type)?;
        let tone = Tone::from_id(tone);
        let request = Request {
            kind: block.id().to_string(),
            tone,
            hash: context_hash(&json!({ "context": context, "member": member_context })),
            system: format!("{}{}", block.system_prompt(), tone.modifier()),
            prompt: block.user_prompt(context, member_context),
            max_tokens: self.block_max_tokens,
        };
        Ok(self.generate(request).await)
    }

    pub async fn clear_cache(&self) -> Result<u64, NarrativeError> {
        let cleared = self.store.clear().await?;
        info!(cleared, "Cleared narrative cache");
        Ok(cleared)
    }

    /// Insights for several blocks with one LLM call.
    ///
    /// Cached blocks are served as-is. The rest go out as one combined prompt
    /// whose reply is split on its section markers, and each block is then
    /// cached on its own, so a later single-block request hits the same entry.
    /// The whole batch uses the first block's tone.
    pub async fn batch_insights(&self, blocks: &[BlockRequest]) -> Result<BatchResponse, NarrativeError> {
        let kinds = blocks
            .iter()
            .map(|b| BlockKind::from_id(&b.block_type))
            .collect::<Result<Vec<_>, _>>()?;
        let tone = blocks
            .first()
            .and_then(|b| b.tone.as_deref())
            .map(Tone::from_id)
            .unwrap_or_default();

        let mut response = BatchResponse {
            insights: BTreeMap::new(),
            tone,
            model: None,
            cached: false,
            available: false,
        };
        let Some(client) = &self.client else {
            return Ok(response);
        };

        let mut uncached = Vec::new();
        for (block, kind) in blocks.iter().zip(kinds) {
            let hash = context_hash(&json!({ "context": block.context, "member": block.member_context }));
            let key = cache_key(kind.id(), tone.id(), &hash);
            match self.lookup(&key).await {
                Some(hit) => {
                    response.insights.insert(kind.id().to_string(), hit.narrative);
                }
                None => uncached.push((block, kind, key, hash)),
            }
        }

        if uncached.is_empty() {
            debug!(blocks = blocks.len(), "Batch served entirely from cache");
            response.model = Some(self.model_display.clone());
            response.cached = true;
            response.available = true;
            return Ok(response);
        }

        let sections: Vec<(BlockKind, String)> = uncached
            .iter()
            .map(|(block, kind, _, _)| (*kind, kind.user_prompt(&block.context, block.member_context.as_ref())))
            .collect();
        let completion = Completion {
            system: format!("{}{}", prompts::batch_system_prompt(), tone.modifier()),
            prompt: prompts::batch_user_prompt(&sections),
            max_tokens: self.batch_max_tokens,
        };
        let reply = match client.complete(&completion).await {
            Ok(text) => text,
            Err(e) => {
                warn!(blocks = uncached.len(), error = %e, "Batch narrative generation failed");
                return Ok(response);
            }
        };

        let insights = prompts::split_sections(&reply, uncached.len());
        for ((_, kind, key, hash), insight) in uncached.into_iter().zip(insights) {
            self.remember(key, kind.id(), tone, &insight, hash).await;
            response.insights.insert(kind.id().to_string(), insight);
        }

        response.model = Some(self.model_display.clone());
        response.available = true;
        Ok(response)
    }

    /// A cache hit for `key`. A failing store counts as a miss.
    async fn lookup(&self, key: &str) -> Option<CachedNarrative> {
        match self.store.get(key).await {
            Ok(Some(hit)) => {
                debug!(cache_key = %key, "Narrative cache hit");
                Some(hit)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Narrative cache lookup failed");
                None
            }
        }
    }

    async fn remember(&self, key: String, kind: &str, tone: Tone, narrative: &str, hash: String) {
        let entry = CachedNarrative {
            cache_key: key,
            kind: kind.to_string(),
            tone: tone.id().to_string(),
            narrative: narrative.to_string(),
            model: self.model_display.clone(),
            context_hash: hash,
        };
        if let Err(e) = self.store.put(&entry).await {
            warn!(cache_key = %entry.cache_key, error = %e, "Failed to cache narrative");
        }
    }

    async fn generate(&self, request: Request) -> NarrativeResponse {
        let unavailable = NarrativeResponse {
            narrative: None,
            kind: request.kind.clone(),
            tone: request.tone,
            model: None,
            cached: false,
            available: false,
        };
        let Some(client) = &self.client else {
            return unavailable;
        };

        let key = cache_key(&request.kind, request.tone.id(), &request.hash);
        if let Some(hit) = self.lookup(&key).await {
            return NarrativeResponse {
                narrative: Some(hit.narrative),
                kind: request.kind,
                tone: request.tone,
                model: Some(hit.model),
                cached: true,
                available: true,
            };
        }

        let completion = Completion {
            system: request.system,
            prompt: request.prompt,
            max_tokens: request.max_tokens,
        };
        let narrative = match client.complete(&completion).await {
            Ok(text) => text,
            Err(e) => {
                warn!(kind = %request.kind, error = %e, "Narrative generation failed");
                return unavailable;
            }
        };

        self.remember(key, &request.kind, request.tone, &narrative, request.hash).await;

        NarrativeResponse {
            narrative: Some(narrative),
            kind: request.kind,
            tone: request.tone,
            model: Some(self.model_display.clone()),
            cached: false,
            available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeClient {
        calls: Mutex<Vec<Completion>>,
        fail: bool,
        reply: Option<String>,
    }

    #[async_trait]
    impl NarrativeClient for FakeClient {
        async fn complete(&self, completion: &Completion) -> Result<String, NarrativeError> {
            self.calls.lock().unwrap().push(completion.clone());
            if self.fail {
                Err(NarrativeError::Upstream(529, "overloaded".to_string()))
            } else if let Some(reply) = &self.reply {
                Ok(reply.clone())
            } else {
                Ok(format!("story #{}", self.calls.lock().unwrap().len()))
            }
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    fn narrator(client: Option<Arc<FakeClient>>, store: Arc<MemoryStore>) -> Narrator {
        let settings = NarrativeSettings {
            model_display: "Fake".to_string(),
            ..NarrativeSettings::default()
        };
        Narrator::new(client.map(|c| c as Arc<dyn NarrativeClient>), store, &settings)
    }

    #[tokio::test]
    async fn second_identical_request_is_served_from_cache() {
        let client = Arc::new(FakeClient::default());
        let store = Arc::new(MemoryStore::new());
        let narrator = narrator(Some(client.clone()), store.clone());
        let context = json!({"season": {"year": 2023}, "standings": []});

        let first = narrator.summary("standings", &context, "poet").await.unwrap();
        assert!(first.available && !first.cached);
        assert_eq!(first.kind, "summary_standings");
        assert_eq!(first.tone, Tone::Poet);
        assert_eq!(first.model.as_deref(), Some("Fake"));

        let second = narrator.summary("standings", &context, "poet").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.narrative, first.narrative);
        assert_eq!(client.calls.lock().unwrap().len(), 1);

        // A different tone is a different cache entry.
        narrator.summary("standings", &context, "analyst").await.unwrap();
        assert_eq!(client.calls.lock().unwrap().len(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn tone_modifier_is_appended_to_the_system_prompt() {
        let client = Arc::new(FakeClient::default());
        let narrator = narrator(Some(client.clone()), Arc::new(MemoryStore::new()));
        narrator
            .block_insight("rivalries", &json!({"rivalries": []}), Some(&json!({"name": "Ann"})), "trash_talk")
            .await
            .unwrap();

        let calls = client.calls.lock().unwrap();
        assert!(calls[0].system.ends_with(Tone::TrashTalk.modifier()));
        assert!(calls[0].prompt.contains("Ann's top rivalries"));
        assert_eq!(calls[0].max_tokens, NarrativeSettings::default().block_max_tokens);
    }

    #[tokio::test]
    async fn failures_degrade_to_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let disabled = narrator(None, store.clone());
        let response = disabled.summary("records", &json!({}), "commissioner").await.unwrap();
        assert!(!response.available);
        assert_eq!(response.narrative, None);
        assert!(!disabled.status().available);

        let failing = narrator(
            Some(Arc::new(FakeClient {
                fail: true,
                ..FakeClient::default()
            })),
            store.clone(),
        );
        let response = failing.block_insight("stats_overview", &json!({}), None, "nope").await.unwrap();
        assert!(!response.available);
        assert_eq!(response.tone, Tone::Commissioner);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_kinds_are_errors() {
        let narrator = narrator(Some(Arc::new(FakeClient::default())), Arc::new(MemoryStore::new()));
        assert!(matches!(
            narrator.summary("draft", &json!({}), "poet").await,
            Err(NarrativeError::UnknownKind("page_type", _))
        ));
    }

    fn block(block_type: &str, context: Value, member: Option<Value>, tone: &str) -> BlockRequest {
        BlockRequest {
            block_type: block_type.to_string(),
            context,
            member_context: member,
            tone: Some(tone.to_string()),
        }
    }

    #[tokio::test]
    async fn batch_reuses_cached_blocks_and_falls_back_on_missing_sections() {
        let client = Arc::new(FakeClient::default());
        let narrator = narrator(Some(client.clone()), Arc::new(MemoryStore::new()));
        let member = json!({"name": "Ann"});
        let rivals = json!({"rivalries": [{"opponent_name": "Bo"}]});

        let single = narrator
            .block_insight("rivalries", &rivals, Some(&member), "poet")
            .await
            .unwrap();
        assert_eq!(single.narrative.as_deref(), Some("story #1"));

        let blocks = vec![
            block("rivalries", rivals.clone(), Some(member.clone()), "poet"),
            block("h2h_records", json!({"records": []}), Some(member.clone()), "analyst"),
        ];
        let batch = narrator.batch_insights(&blocks).await.unwrap();
        assert!(batch.available && !batch.cached);
        assert_eq!(batch.tone, Tone::Poet);
        assert_eq!(batch.insights["rivalries"], "story #1");
        // The reply had no section markers.
        assert_eq!(batch.insights["h2h_records"], prompts::SECTION_FALLBACK);

        {
            let calls = client.calls.lock().unwrap();
            assert_eq!(calls.len(), 2);
            assert!(calls[1].prompt.contains("SECTION 1: H2H RECORDS"));
            assert!(!calls[1].prompt.contains("RIVALRIES"));
            assert_eq!(calls[1].max_tokens, NarrativeSettings::default().batch_max_tokens);
        }

        let again = narrator.batch_insights(&blocks).await.unwrap();
        assert!(again.cached);
        assert_eq!(again.insights.len(), 2);
        assert_eq!(client.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn batch_reply_is_split_and_cached_per_block() {
        let client = Arc::new(FakeClient {
            reply: Some("[SECTION_1]\nBo is the villain. 😤\n[SECTION_2]\nElite. 👑".to_string()),
            ..FakeClient::default()
        });
        let narrator = narrator(Some(client.clone()), Arc::new(MemoryStore::new()));
        let overview = json!({"total_wins": 90});
        let blocks = vec![
            block("rivalries", json!({"rivalries": []}), None, "hype_man"),
            block("stats_overview", overview.clone(), None, "hype_man"),
        ];

        let batch = narrator.batch_insights(&blocks).await.unwrap();
        assert_eq!(batch.insights["rivalries"], "Bo is the villain. 😤");
        assert_eq!(batch.insights["stats_overview"], "Elite. 👑");
        assert!(client.calls.lock().unwrap()[0].system.ends_with(Tone::HypeMan.modifier()));

        let single = narrator
            .block_insight("stats_overview", &overview, None, "hype_man")
            .await
            .unwrap();
        assert!(single.cached);
        assert_eq!(single.narrative.as_deref(), Some("Elite. 👑"));
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_validates_every_block_and_degrades_without_a_client() {
        let narrator_with_client = narrator(Some(Arc::new(FakeClient::default())), Arc::new(MemoryStore::new()));
        let blocks = vec![
            block("rivalries", json!({}), None, "poet"),
            block("horoscope", json!({}), None, "poet"),
        ];
        assert!(matches!(
            narrator_with_client.batch_insights(&blocks).await,
            Err(NarrativeError::UnknownKind("block_type", _))
        ));

        let disabled = narrator(None, Arc::new(MemoryStore::new()));
        let response = disabled.batch_insights(&blocks[..1]).await.unwrap();
        assert!(!response.available);
        assert!(response.insights.is_empty());
    }
}
