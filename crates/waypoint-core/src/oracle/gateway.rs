//! Memoized per-request-kind operations against the oracle.
//!
//! Every operation builds a normalized cache key (refinements excepted --
//! those are always intentionally fresh), consults the TTL cache, and on a
//! miss issues the call with that request kind's schema, parses the
//! response into model types, and stores the parsed value. Transport
//! failures are classified (quota vs. generic) before they reach the
//! caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::model::{CountryBrief, DayPlan, DestinationSummary, ItineraryStyle, PackingCategory, Plan};

use super::{OracleError, classify_failure, prompts, schema};
use super::trait_def::{Oracle, OracleRequest};

/// Gateway pairing an [`Oracle`] transport with a [`ResponseCache`].
pub struct OracleGateway {
    oracle: Box<dyn Oracle>,
    cache: ResponseCache,
}

impl std::fmt::Debug for OracleGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleGateway")
            .field("oracle", &self.oracle.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Cache keys
// ---------------------------------------------------------------------------

/// Trim and case-fold one key segment so that semantically identical
/// requests collide regardless of incidental formatting.
fn norm(segment: &str) -> String {
    segment.trim().to_lowercase()
}

pub fn suggestions_cache_key(budget: &str, season: &str, continent: &str) -> String {
    format!(
        "suggestions-v2:{}:{}:{}",
        norm(budget),
        norm(season),
        norm(continent)
    )
}

pub fn off_beat_cache_key() -> String {
    "suggestions-v2:off-beat".to_string()
}

pub fn country_brief_cache_key(country: &str) -> String {
    format!("country-brief-v2:{}", norm(country))
}

pub fn plan_cache_key(
    destination: &str,
    duration: u32,
    style: ItineraryStyle,
    notes: &str,
) -> String {
    format!("plan:{}:{duration}:{style}:{}", norm(destination), norm(notes))
}

pub fn comprehensive_plan_cache_key(
    destination: &str,
    style: ItineraryStyle,
    notes: &str,
) -> String {
    format!(
        "comprehensive-plan:{}:{style}:{}",
        norm(destination),
        norm(notes)
    )
}

pub fn packing_list_cache_key(
    destination: &str,
    duration: usize,
    activity_names: &[String],
) -> String {
    format!(
        "packing-list:{}:{duration}:{}",
        norm(destination),
        norm(&activity_names.join(","))
    )
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

impl OracleGateway {
    pub fn new(oracle: Box<dyn Oracle>, cache: ResponseCache) -> Self {
        Self { oracle, cache }
    }

    /// Direct access to the cache (startup sweep, tests).
    pub fn cache_mut(&mut self) -> &mut ResponseCache {
        &mut self.cache
    }

    /// Issue one request, going through the cache when `cache_key` is set.
    ///
    /// An empty response body parses to `T::default()` -- a benign empty
    /// answer is not an error. Any other non-conforming payload is a
    /// [`OracleError::Parse`].
    async fn fetch<T>(
        &mut self,
        action: &str,
        cache_key: Option<&str>,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> Result<T, OracleError>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        if let Some(key) = cache_key {
            if let Some(payload) = self.cache.get(key) {
                match serde_json::from_value::<T>(payload) {
                    Ok(parsed) => return Ok(parsed),
                    Err(e) => {
                        // Shape drift between versions; fall through to a
                        // fresh call which will overwrite the entry.
                        warn!(key, error = %e, "cached payload no longer parses");
                    }
                }
            }
        }

        let request = OracleRequest {
            prompt,
            response_schema,
        };
        let text = self
            .oracle
            .complete(&request)
            .await
            .map_err(|e| classify_failure(action, format!("{e:#}")))?;

        let trimmed = text.trim();
        let parsed: T = if trimmed.is_empty() {
            debug!(action, "empty oracle payload, using empty default");
            T::default()
        } else {
            serde_json::from_str(trimmed).map_err(|e| OracleError::Parse {
                action: action.to_string(),
                message: e.to_string(),
            })?
        };

        if let Some(key) = cache_key {
            match serde_json::to_value(&parsed) {
                Ok(value) => self.cache.set(key, value),
                Err(e) => warn!(key, error = %e, "failed to serialize payload for caching"),
            }
        }

        Ok(parsed)
    }

    /// Destination suggestions for a budget/season/continent query.
    pub async fn suggestions(
        &mut self,
        budget: &str,
        season: &str,
        continent: &str,
    ) -> Result<Vec<DestinationSummary>, OracleError> {
        let key = suggestions_cache_key(budget, season, continent);
        self.fetch(
            "get travel suggestions",
            Some(&key),
            prompts::suggestions(budget, season, continent),
            schema::suggestion_list(),
        )
        .await
    }

    /// Curated off-the-beaten-path suggestions.
    pub async fn off_beat_suggestions(&mut self) -> Result<Vec<DestinationSummary>, OracleError> {
        let key = off_beat_cache_key();
        self.fetch(
            "get off-beat travel suggestions",
            Some(&key),
            prompts::off_beat_suggestions(),
            schema::suggestion_list(),
        )
        .await
    }

    /// Direct lookup for a single named country.
    pub async fn country_brief(&mut self, country: &str) -> Result<CountryBrief, OracleError> {
        let key = country_brief_cache_key(country);
        let action = format!("get information for {country}");
        self.fetch(
            &action,
            Some(&key),
            prompts::country_brief(country),
            schema::country_brief(),
        )
        .await
    }

    /// Fixed-duration plan generation.
    pub async fn full_plan(
        &mut self,
        destination: &str,
        duration: u32,
        style: ItineraryStyle,
        notes: &str,
    ) -> Result<Plan, OracleError> {
        let key = plan_cache_key(destination, duration, style, notes);
        let action = format!("create a travel plan for {destination}");
        self.fetch(
            &action,
            Some(&key),
            prompts::full_plan(destination, duration, style, notes),
            schema::plan(),
        )
        .await
    }

    /// Comprehensive plan; the oracle chooses the duration.
    pub async fn comprehensive_plan(
        &mut self,
        destination: &str,
        style: ItineraryStyle,
        notes: &str,
    ) -> Result<Plan, OracleError> {
        let key = comprehensive_plan_cache_key(destination, style, notes);
        let action = format!("create a comprehensive travel plan for {destination}");
        self.fetch(
            &action,
            Some(&key),
            prompts::comprehensive_plan(destination, style, notes),
            schema::plan(),
        )
        .await
    }

    /// Refinement of an existing plan. Never cached: every refinement is
    /// intentionally fresh.
    ///
    /// `exclusions` are deletion fingerprints (`name|city`); they are
    /// rendered human-readable here, at the boundary, and nowhere else.
    pub async fn refine_plan(
        &mut self,
        destination: &str,
        duration: usize,
        style: ItineraryStyle,
        current_days: &[DayPlan],
        instruction: &str,
        exclusions: &[String],
    ) -> Result<Plan, OracleError> {
        let rendered: Vec<String> = exclusions
            .iter()
            .map(|fp| fp.replacen('|', " in ", 1))
            .collect();
        let action = format!("rebuild the travel plan for {destination}");
        self.fetch(
            &action,
            None,
            prompts::refine_plan(destination, duration, style, current_days, instruction, &rendered),
            schema::plan(),
        )
        .await
    }

    /// Packing list for a planned trip.
    pub async fn packing_list(
        &mut self,
        destination: &str,
        duration: usize,
        activity_names: &[String],
    ) -> Result<Vec<PackingCategory>, OracleError> {
        let key = packing_list_cache_key(destination, duration, activity_names);
        let action = format!("generate a packing list for {destination}");
        self.fetch(
            &action,
            Some(&key),
            prompts::packing_list(destination, duration, activity_names),
            schema::packing_list(),
        )
        .await
    }
}
