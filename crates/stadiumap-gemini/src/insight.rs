//! Stadium trivia with fallback content and a per-session cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stadiumap_core::{AiInsight, Stadium};

use crate::client::GeminiClient;
use crate::error::GeminiError;

/// Source of [`AiInsight`]s. Never fails: a fallback pair is a valid answer.
pub trait InsightClient: Send + Sync {
    fn fetch_insight(&self, stadium: &Stadium) -> impl Future<Output = AiInsight> + Send;
}

impl<T: InsightClient> InsightClient for Arc<T> {
    fn fetch_insight(&self, stadium: &Stadium) -> impl Future<Output = AiInsight> + Send {
        (**self).fetch_insight(stadium)
    }
}

/// Shown when the request fails or the model answers with nothing usable.
#[must_use]
pub fn fallback_insight() -> AiInsight {
    AiInsight {
        description: "A legendary football ground.".to_owned(),
        fun_fact: "Home to amazing matches throughout history.".to_owned(),
    }
}

/// Shown when no API key is configured.
#[must_use]
pub fn missing_key_insight() -> AiInsight {
    AiInsight {
        description: "API Key missing. Please configure your environment.".to_owned(),
        fun_fact: "Configure the GEMINI_API_KEY in your .env file to see AI insights.".to_owned(),
    }
}

impl InsightClient for GeminiClient {
    async fn fetch_insight(&self, stadium: &Stadium) -> AiInsight {
        match self.request_insight(stadium).await {
            Ok(insight) => insight,
            Err(GeminiError::MissingApiKey) => missing_key_insight(),
            Err(err) => {
                tracing::warn!(
                    stadium = %stadium.id,
                    error = %err,
                    "insight request failed, using fallback"
                );
                fallback_insight()
            }
        }
    }
}

/// Memoizes insights by stadium id for the life of the session.
///
/// Whatever the client returns is cached, fallback included, and never
/// refetched.
pub struct InsightCache<C> {
    client: C,
    entries: Mutex<HashMap<String, AiInsight>>,
}

impl<C: InsightClient> InsightCache<C> {
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn cached(&self, stadium_id: &str) -> Option<AiInsight> {
        lock(&self.entries).get(stadium_id).cloned()
    }

    /// Return the cached insight for `stadium`, fetching it on first use.
    ///
    /// Concurrent first lookups for the same id may both reach the client;
    /// the first answer stored wins.
    pub async fn get_or_fetch(&self, stadium: &Stadium) -> AiInsight {
        if let Some(hit) = self.cached(&stadium.id) {
            tracing::debug!(stadium = %stadium.id, "insight cache hit");
            return hit;
        }

        let insight = self.client.fetch_insight(stadium).await;
        lock(&self.entries)
            .entry(stadium.id.clone())
            .or_insert(insight)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
