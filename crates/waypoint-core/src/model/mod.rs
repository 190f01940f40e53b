//! Itinerary data model.
//!
//! Every type here round-trips through serde: the oracle gateway parses
//! provider responses into these structs, the cache stores them as JSON,
//! and [`SavedPlan`] is the on-disk plan document. Equality is structural;
//! the plan store's modified flag is `working != baseline`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Overall flavor requested for an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItineraryStyle {
    Mixed,
    Touristy,
    #[serde(rename = "Off-beat")]
    OffBeat,
}

impl Default for ItineraryStyle {
    fn default() -> Self {
        Self::Mixed
    }
}

impl fmt::Display for ItineraryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mixed => "Mixed",
            Self::Touristy => "Touristy",
            Self::OffBeat => "Off-beat",
        };
        f.write_str(s)
    }
}

impl FromStr for ItineraryStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mixed" => Ok(Self::Mixed),
            "touristy" => Ok(Self::Touristy),
            "off-beat" | "offbeat" => Ok(Self::OffBeat),
            other => Err(StyleParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ItineraryStyle`] string.
#[derive(Debug, Clone)]
pub struct StyleParseError(pub String);

impl fmt::Display for StyleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid itinerary style: {:?} (expected mixed, touristy, or off-beat)",
            self.0
        )
    }
}

impl std::error::Error for StyleParseError {}

/// Category tag on a single activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Touristy,
    #[serde(rename = "Off-beat")]
    OffBeat,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Touristy => "Touristy",
            Self::OffBeat => "Off-beat",
        };
        f.write_str(s)
    }
}

/// Flavor of an advisory tip attached to a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipKind {
    Do,
    Dont,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// Costs and currency
// ---------------------------------------------------------------------------

/// Per-concern cost estimate in USD. Pass-through arithmetic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
}

/// Local currency metadata and USD conversion factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    /// Three-letter currency code, e.g. "EUR".
    pub code: String,
    /// Currency symbol, e.g. "€".
    pub symbol: String,
    pub usd_to_local_rate: f64,
    pub usd_to_home_rate: f64,
}

// ---------------------------------------------------------------------------
// Destinations
// ---------------------------------------------------------------------------

/// One suggested destination with a 7-day solo cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationSummary {
    pub name: String,
    pub country: String,
    pub description: String,
    pub visa_note: String,
    /// Estimated total for a 7-day solo trip, USD.
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub currency: CurrencyInfo,
}

/// Direct-lookup answer for a single named country.
///
/// Same payload as [`DestinationSummary`] minus the name fields, which the
/// caller already knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryBrief {
    pub description: String,
    pub visa_note: String,
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub currency: CurrencyInfo,
}

impl CountryBrief {
    /// Combine the brief with the user-typed country name into a full
    /// destination summary.
    pub fn into_summary(self, country: &str) -> DestinationSummary {
        DestinationSummary {
            name: country.to_string(),
            country: country.to_string(),
            description: self.description,
            visa_note: self.visa_note,
            average_cost: self.average_cost,
            cost_breakdown: self.cost_breakdown,
            currency: self.currency,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan internals
// ---------------------------------------------------------------------------

/// A titled link attached to an activity or to the plan as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub title: String,
    pub url: String,
}

/// One way of making a travel leg (train, bus, flight...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    pub mode: String,
    pub duration: String,
    /// Estimated cost in USD.
    pub cost: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// An inter-city movement within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub from_city: String,
    pub to_city: String,
    pub options: Vec<TransportOption>,
}

/// An advisory tip for a day (do / don't / warning / info).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryTip {
    pub kind: TipKind,
    pub tip: String,
}

/// A single visitable activity.
///
/// `id` is assigned locally (see [`crate::identity`]); the oracle does not
/// supply identifiers reliably, so it is optional on the wire and stamped
/// after every parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub city: String,
    pub kind: ActivityKind,
    /// Estimated cost in USD.
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub visiting_tip: Option<String>,
    #[serde(default)]
    pub links: Vec<ReferenceLink>,
}

/// One day of the itinerary.
///
/// `travel` holds 0, 1, or 2 legs. Two legs means a same-day round trip
/// (outbound + return) and must never be collapsed into one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-indexed day number, matching the day's position in the plan.
    pub day: u32,
    pub title: String,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub tips: Vec<AdvisoryTip>,
    #[serde(default, deserialize_with = "travel_one_or_many")]
    pub travel: Option<Vec<TravelLeg>>,
    #[serde(default)]
    pub user_note: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
}

/// Estimated accommodation total for one visited city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStayCost {
    pub city: String,
    pub estimated_cost: f64,
    pub nights: u32,
}

/// One category of a packing list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingCategory {
    pub category: String,
    pub items: Vec<String>,
}

/// A complete travel plan as returned by the oracle and edited locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub optimization_note: String,
    #[serde(default)]
    pub official_links: Option<Vec<ReferenceLink>>,
    #[serde(default)]
    pub city_stay_costs: Option<Vec<CityStayCost>>,
    #[serde(default)]
    pub packing_list: Option<Vec<PackingCategory>>,
    /// Item name -> packed flag. Reset whenever a new packing list lands.
    #[serde(default)]
    pub checked_items: Option<BTreeMap<String, bool>>,
}

impl Plan {
    /// Flattened activity names, day order then activity order.
    pub fn activity_names(&self) -> Vec<String> {
        self.days
            .iter()
            .flat_map(|day| day.activities.iter().map(|a| a.name.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Saved plan document
// ---------------------------------------------------------------------------

/// The persisted plan file: the plan plus everything needed to regenerate
/// or refine it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlan {
    pub id: Uuid,
    /// User-chosen display name.
    pub name: String,
    pub plan: Plan,
    pub destination: DestinationSummary,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub style: ItineraryStyle,
    #[serde(default)]
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Accept `travel` as either a single bare object or an array.
///
/// Older saved plans wrote a lone object for single-leg days; normalize to
/// a one-element array so the rest of the engine only sees arrays.
fn travel_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<TravelLeg>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<TravelLeg>),
        One(TravelLeg),
    }

    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::Many(legs) => legs,
        OneOrMany::One(leg) => vec![leg],
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
