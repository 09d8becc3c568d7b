//! Gemini-backed stadium discovery, search and trivia.

pub mod client;
mod discovery;
pub mod error;
pub mod insight;
mod prompt;
mod retry;
mod wire;

pub use client::{placeholder_image_url, GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::GeminiError;
pub use insight::{fallback_insight, missing_key_insight, InsightCache, InsightClient};
