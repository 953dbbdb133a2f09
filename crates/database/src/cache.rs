use crate::repository::DbRepository;
use async_trait::async_trait;
use narrative::{CachedNarrative, NarrativeError, NarrativeStore};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
struct DbCachedNarrative {
    cache_key: String,
    block_type: String,
    tone: String,
    narrative: String,
    model: String,
    context_hash: String,
}

impl From<DbCachedNarrative> for CachedNarrative {
    fn from(row: DbCachedNarrative) -> Self {
        CachedNarrative {
            cache_key: row.cache_key,
            kind: row.block_type,
            tone: row.tone,
            narrative: row.narrative,
            model: row.model,
            context_hash: row.context_hash,
        }
    }
}

fn cache_error(e: sqlx::Error) -> NarrativeError {
    NarrativeError::Cache(e.to_string())
}

/// Narrative cache on the `ai_cache` table.
#[async_trait]
impl NarrativeStore for DbRepository {
    async fn get(&self, cache_key: &str) -> Result<Option<CachedNarrative>, NarrativeError> {
        let row = sqlx::query_as::<_, DbCachedNarrative>(
            r#"
            SELECT cache_key, block_type, tone, narrative, model, context_hash
            FROM ai_cache
            WHERE cache_key = $1
            "#,
        )
        .bind(cache_key)
        .fetch_optional(self.pool())
        .await
        .map_err(cache_error)?;
        Ok(row.map(CachedNarrative::from))
    }

    async fn put(&self, entry: &CachedNarrative) -> Result<(), NarrativeError> {
        sqlx::query(
            r#"
            INSERT INTO ai_cache (cache_key, block_type, tone, narrative, model, context_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (cache_key) DO UPDATE SET
                narrative = EXCLUDED.narrative,
                model = EXCLUDED.model,
                created_at = NOW()
            "#,
        )
        .bind(&entry.cache_key)
        .bind(&entry.kind)
        .bind(&entry.tone)
        .bind(&entry.narrative)
        .bind(&entry.model)
        .bind(&entry.context_hash)
        .execute(self.pool())
        .await
        .map_err(cache_error)?;
        Ok(())
    }

    async fn clear(&self) -> Result<u64, NarrativeError> {
        let result = sqlx::query("DELETE FROM ai_cache")
            .execute(self.pool())
            .await
            .map_err(cache_error)?;
        Ok(result.rows_affected())
    }
}
