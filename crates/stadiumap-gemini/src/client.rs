//! HTTP client for the Gemini `generateContent` API.
//!
//! Every call asks for a JSON answer constrained by a response schema, then
//! validates what comes back. Stadium records go through
//! [`stadiumap_core::validate_candidates`] before anything else sees them.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use stadiumap_core::{validate_candidates, AiInsight, AppConfig, Bounds, RawStadium, Stadium};

use crate::error::GeminiError;
use crate::prompt;
use crate::retry::retry_with_backoff;
use crate::wire::{
    strip_code_fence, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SCAN_MAX_RESULTS: u32 = 15;

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_BASE_MS: u64 = 500;

/// Client for the Gemini REST API.
///
/// Use [`GeminiClient::from_config`] in the binary or
/// [`GeminiClient::with_base_url`] to point at a mock server in tests. A
/// client without an API key can be constructed; its calls fail with
/// [`GeminiError::MissingApiKey`] without touching the network.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    model: String,
    max_retries: u32,
    retry_backoff_base_ms: u64,
    scan_max_results: u32,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// A blank `api_key` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeminiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("stadiumap/0.1")
            .build()?;

        // Exactly one trailing slash so the endpoint path is appended to any
        // prefix the base URL carries.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeminiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            base_url,
            model: DEFAULT_MODEL.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_base_ms: DEFAULT_RETRY_BACKOFF_BASE_MS,
            scan_max_results: DEFAULT_SCAN_MAX_RESULTS,
        })
    }

    /// Build a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        Ok(Self::with_base_url(
            config.gemini_api_key.as_deref(),
            config.gemini_timeout_secs,
            &config.gemini_base_url,
        )?
        .with_model(config.gemini_model.clone())
        .with_retry(config.gemini_max_retries, config.gemini_retry_backoff_base_ms)
        .with_scan_max_results(config.scan_max_results))
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn with_scan_max_results(mut self, max_results: u32) -> Self {
        self.scan_max_results = max_results;
        self
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask for the stadiums inside `bounds`.
    ///
    /// Records that fail validation are dropped. At most `scan_max_results`
    /// stadiums are returned; ones without an image get a placeholder URL.
    /// An empty answer is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::MissingApiKey`] if no key is configured.
    /// - [`GeminiError::Http`] / [`GeminiError::Status`] once retries are
    ///   exhausted.
    /// - [`GeminiError::Deserialize`] if the answer is not a JSON array of
    ///   stadium objects.
    pub async fn stadiums_in_area(&self, bounds: Bounds) -> Result<Vec<Stadium>, GeminiError> {
        let question = prompt::area_scan(&bounds, self.scan_max_results);
        let Some(text) = self.generate(&question, &prompt::area_scan_schema()).await? else {
            return Ok(Vec::new());
        };

        let raw: Option<Vec<RawStadium>> = parse_answer(&text, "area scan")?;
        let mut stadiums = validate_candidates(raw.unwrap_or_default());
        stadiums.truncate(usize::try_from(self.scan_max_results).unwrap_or(usize::MAX));

        tracing::debug!(count = stadiums.len(), "area scan answer validated");
        Ok(stadiums.into_iter().map(with_placeholder_image).collect())
    }

    /// Look up one stadium by free-text name.
    ///
    /// Returns `Ok(None)` for a blank query, an empty or `null` answer, or a
    /// record that fails validation.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::stadiums_in_area`].
    pub async fn search_stadium(&self, query: &str) -> Result<Option<Stadium>, GeminiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let question = prompt::stadium_search(query);
        let Some(text) = self
            .generate(&question, &prompt::stadium_search_schema())
            .await?
        else {
            return Ok(None);
        };

        let Some(raw) = parse_answer::<Option<RawStadium>>(&text, "stadium search")? else {
            return Ok(None);
        };
        match raw.into_stadium() {
            Ok(stadium) => Ok(Some(with_placeholder_image(stadium))),
            Err(reject) => {
                tracing::debug!(query, reason = %reject, "search answer rejected");
                Ok(None)
            }
        }
    }

    /// Ask for a description and fun fact about `stadium`.
    ///
    /// This is the raw call; [`crate::InsightClient::fetch_insight`] wraps it
    /// with fallback content.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::EmptyResponse`] if the model answers with nothing or
    ///   with blank fields.
    /// - Otherwise same as [`GeminiClient::stadiums_in_area`].
    pub async fn request_insight(&self, stadium: &Stadium) -> Result<AiInsight, GeminiError> {
        let context = format!("insight({})", stadium.id);
        let question = prompt::insight(stadium);
        let text = self
            .generate(&question, &prompt::insight_schema())
            .await?
            .ok_or_else(|| GeminiError::EmptyResponse(context.clone()))?;

        let insight: AiInsight = parse_answer(&text, &context)?;
        if insight.description.trim().is_empty() && insight.fun_fact.trim().is_empty() {
            return Err(GeminiError::EmptyResponse(context));
        }
        Ok(insight)
    }

    /// One `generateContent` call with retries. `Ok(None)` means the model
    /// produced no text.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Option<String>, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = self.generate_url(api_key);
        let request = GenerateContentRequest::json(prompt, schema);

        let url = &url;
        let request = &request;
        let response = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, move || {
            self.send(url, request)
        })
        .await?;

        if let Some(reason) = response.block_reason() {
            tracing::warn!(model = %self.model, reason, "Gemini blocked the prompt");
            return Ok(None);
        }
        if let Some(finish) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            tracing::trace!(finish, "Gemini candidate finished");
        }
        Ok(response.text())
    }

    fn generate_url(&self, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "{}v1beta/models/{}:generateContent",
            self.base_url.path(),
            self.model
        ));
        url.query_pairs_mut().append_pair("key", api_key);
        url
    }

    /// Sends one POST and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Status`] for a non-2xx answer, with the API's
    /// error message when the body carries one.
    async fn send(
        &self,
        url: &Url,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self.client.post(url.clone()).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
                Ok(envelope) => format!("{} ({})", envelope.error.message, envelope.error.status),
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
            context: format!("generateContent(model={})", self.model),
            source: e,
        })
    }
}

fn parse_answer<T: DeserializeOwned>(text: &str, context: &str) -> Result<T, GeminiError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| GeminiError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// `https://picsum.photos/800/400?random=<seed>`
#[must_use]
pub fn placeholder_image_url(seed: u32) -> String {
    format!("https://picsum.photos/800/400?random={seed}")
}

fn with_placeholder_image(mut stadium: Stadium) -> Stadium {
    if stadium.image_url.is_none() {
        stadium.image_url = Some(placeholder_image_url(rand::random_range(0..1000)));
    }
    stadium
}
