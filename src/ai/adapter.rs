use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use derive_more::Display;
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::ai::gemini::GeminiClient;
use crate::ai::{AiError, GenerateRequest, GenerativeClient};
use crate::config::AiConfig;

pub const SUMMARY_NOT_CONFIGURED: &str = "API Key not configured.";
pub const SUMMARY_EMPTY: &str = "Could not generate summary.";
pub const SUMMARY_FAILED: &str =
    "Failed to generate summary. Please check your network or API key.";

/// Result of asking the model which candidate titles fit a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "titles", rename_all = "snake_case")]
pub enum SemanticMatch {
    /// Candidate titles judged relevant, in the model's order.
    Matched(Vec<String>),
    /// The service answered and nothing was relevant.
    NoMatches,
    /// No key, transport failure or an unusable answer.
    Unavailable,
}

impl SemanticMatch {
    pub fn titles(&self) -> &[String] {
        match self {
            SemanticMatch::Matched(titles) => titles,
            SemanticMatch::NoMatches | SemanticMatch::Unavailable => &[],
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiAction {
    #[display("summarize")]
    Summarize,
    #[display("semantic_match")]
    SemanticMatch,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    #[display("idle")]
    Idle,
    #[display("loading")]
    Loading,
    #[display("succeeded")]
    Succeeded,
    #[display("failed")]
    Failed,
}

type RequestKey = (AiAction, String);

#[derive(Debug, Clone, Copy)]
struct Slot {
    phase: RequestPhase,
    generation: u64,
}

#[derive(Debug, Default)]
struct Phases {
    slots: HashMap<RequestKey, Slot>,
    next_generation: u64,
}

/// Per (action, subject) state of outstanding AI requests. Only one request
/// per key may be loading; different keys run side by side.
#[derive(Debug, Default)]
pub struct RequestTracker {
    phases: Mutex<Phases>,
}

impl RequestTracker {
    fn lock(&self) -> MutexGuard<'_, Phases> {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(self: &Arc<Self>, action: AiAction, subject: &str) -> Result<RequestGuard, AiError> {
        let key = (action, subject.to_string());
        let mut phases = self.lock();
        if matches!(phases.slots.get(&key), Some(slot) if slot.phase == RequestPhase::Loading) {
            return Err(AiError::InFlight(format!("{} for {}", action, subject)));
        }
        phases.next_generation += 1;
        let generation = phases.next_generation;
        phases.slots.insert(
            key.clone(),
            Slot {
                phase: RequestPhase::Loading,
                generation,
            },
        );
        debug!("{} [{}]: idle -> loading", action, subject);

        Ok(RequestGuard {
            tracker: Arc::clone(self),
            key,
            generation,
        })
    }

    pub fn phase(&self, action: AiAction, subject: &str) -> RequestPhase {
        self.lock()
            .slots
            .get(&(action, subject.to_string()))
            .map(|slot| slot.phase)
            .unwrap_or(RequestPhase::Idle)
    }
}

/// Holds a key in `Loading`; dropping it returns the key to `Idle` unless a
/// newer request has taken the key over.
pub struct RequestGuard {
    tracker: Arc<RequestTracker>,
    key: RequestKey,
    generation: u64,
}

impl RequestGuard {
    pub fn finish(&self, succeeded: bool) {
        let phase = if succeeded {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Failed
        };
        let mut phases = self.tracker.lock();
        if let Some(slot) = phases.slots.get_mut(&self.key) {
            if slot.generation == self.generation {
                slot.phase = phase;
                debug!("{} [{}]: loading -> {}", self.key.0, self.key.1, phase);
            }
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let mut phases = self.tracker.lock();
        let owned = phases
            .slots
            .get(&self.key)
            .is_some_and(|slot| slot.generation == self.generation);
        if owned {
            phases.slots.remove(&self.key);
            debug!("{} [{}]: -> idle", self.key.0, self.key.1);
        }
    }
}

/// Wraps the two AI calls so callers never handle an error branch.
#[derive(Clone)]
pub struct AiAdapter {
    client: Option<Arc<dyn GenerativeClient>>,
    tracker: Arc<RequestTracker>,
}

impl AiAdapter {
    pub fn new(client: Option<Arc<dyn GenerativeClient>>) -> Self {
        Self {
            client,
            tracker: Arc::new(RequestTracker::default()),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        match GeminiClient::from_config(config) {
            Ok(client) => {
                info!("AI augmentation enabled with model {}", config.model);
                Self::new(Some(Arc::new(client)))
            }
            Err(AiError::NotConfigured) => {
                warn!("API_KEY not set; AI summaries and semantic search will use fallbacks");
                Self::new(None)
            }
            Err(e) => {
                error!("Failed to initialise AI client: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }

    /// Three sentence plain-language summary, or a fixed fallback text.
    pub async fn summarize(&self, text: &str) -> String {
        self.summarize_outcome(text).await.0
    }

    /// Like `summarize`, refusing a second concurrent request for `subject`.
    pub async fn summarize_tracked(&self, subject: &str, text: &str) -> Result<String, AiError> {
        let guard = self.tracker.begin(AiAction::Summarize, subject)?;
        let (summary, succeeded) = self.summarize_outcome(text).await;
        guard.finish(succeeded);
        Ok(summary)
    }

    async fn summarize_outcome(&self, text: &str) -> (String, bool) {
        let Some(client) = &self.client else {
            return (SUMMARY_NOT_CONFIGURED.to_string(), false);
        };

        let request = GenerateRequest {
            prompt: format!(
                "Provide a concise, 3-sentence summary of the following academic abstract suitable for a general audience: {}",
                text
            ),
            json: false,
        };
        match client.generate(request).await {
            Ok(Some(summary)) => (summary.trim().to_string(), true),
            Ok(None) => {
                warn!("Summary request returned no text");
                (SUMMARY_EMPTY.to_string(), false)
            }
            Err(e) => {
                error!("Summary request failed: {}", e);
                (SUMMARY_FAILED.to_string(), false)
            }
        }
    }

    /// Asks which of `candidates` are relevant to `query`. Only exact
    /// candidate strings are returned.
    pub async fn semantic_match(&self, query: &str, candidates: &[String]) -> SemanticMatch {
        let Some(client) = &self.client else {
            return SemanticMatch::Unavailable;
        };

        let listing = match serde_json::to_string(candidates) {
            Ok(listing) => listing,
            Err(e) => {
                error!("Failed to encode candidate titles: {}", e);
                return SemanticMatch::Unavailable;
            }
        };
        let request = GenerateRequest {
            prompt: format!(
                "I have the following list of academic journals:\n{}\n\n\
                 The user is searching for: \"{}\".\n\n\
                 Return a JSON array of strings containing ONLY the exact names of the journals \
                 that are most relevant to this search query.\n\
                 If none are relevant, return an empty array.",
                listing, query
            ),
            json: true,
        };

        let reply = match client.generate(request).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                warn!("Semantic match returned no text");
                return SemanticMatch::Unavailable;
            }
            Err(e) => {
                error!("Semantic match request failed: {}", e);
                return SemanticMatch::Unavailable;
            }
        };

        match parse_titles(&reply) {
            Ok(titles) => {
                let mut matched: Vec<String> = Vec::new();
                for title in titles {
                    if candidates.contains(&title) && !matched.contains(&title) {
                        matched.push(title);
                    }
                }
                if matched.is_empty() {
                    SemanticMatch::NoMatches
                } else {
                    SemanticMatch::Matched(matched)
                }
            }
            Err(e) => {
                error!("{}", e);
                SemanticMatch::Unavailable
            }
        }
    }

    pub async fn semantic_match_tracked(
        &self,
        query: &str,
        candidates: &[String],
    ) -> Result<SemanticMatch, AiError> {
        let subject = query.trim().to_lowercase();
        let guard = self.tracker.begin(AiAction::SemanticMatch, &subject)?;
        let outcome = self.semantic_match(query, candidates).await;
        guard.finish(outcome != SemanticMatch::Unavailable);
        Ok(outcome)
    }
}

// Models sometimes wrap JSON mode answers in a markdown fence
fn parse_titles(reply: &str) -> Result<Vec<String>, AiError> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str::<Vec<String>>(body)
        .map_err(|e| AiError::InvalidResponse(format!("Expected a JSON array of titles: {}", e)))
}
