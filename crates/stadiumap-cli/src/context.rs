use std::sync::Arc;

use anyhow::Context as _;
use stadiumap_core::{AppConfig, Stadium};
use stadiumap_gemini::GeminiClient;
use stadiumap_store::FileStore;

/// Everything a command handler needs, built once from the loaded config.
pub(crate) struct AppContext {
    pub config: AppConfig,
    pub store: FileStore,
    pub gemini: Arc<GeminiClient>,
    pub seed: Vec<Stadium>,
}

impl AppContext {
    pub(crate) fn new(config: AppConfig) -> anyhow::Result<Self> {
        let gemini = GeminiClient::from_config(&config).context("building Gemini client")?;
        if !gemini.has_api_key() {
            tracing::warn!("GEMINI_API_KEY is not set; AI discovery and insights are disabled");
        }
        let seed = stadiumap_core::load_seed_stadiums().context("loading built-in stadiums")?;
        let store = FileStore::in_dir(&config.data_dir);

        Ok(Self {
            config,
            store,
            gemini: Arc::new(gemini),
            seed,
        })
    }

    pub(crate) fn seed_stadium(&self, id: &str) -> Option<&Stadium> {
        self.seed.iter().find(|s| s.id == id)
    }
}
