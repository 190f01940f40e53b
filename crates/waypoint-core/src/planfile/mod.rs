//! Saved plan documents.
//!
//! A [`SavedPlan`] serializes to pretty JSON on disk. Loading validates the
//! structure, stamps any activities missing an id, and normalizes legacy
//! single-object travel legs into arrays (the model deserializer handles
//! that). A malformed file is a typed error and leaves no state behind.

use std::path::Path;

use thiserror::Error;

use crate::identity;
use crate::model::SavedPlan;

/// Errors from reading or writing a saved plan document.
#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("failed to read plan file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("plan file {path} is not a valid itinerary document: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write plan file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load and validate a saved plan, stamping missing activity ids.
pub fn load_saved_plan(path: &Path) -> Result<SavedPlan, PlanFileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| PlanFileError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut saved: SavedPlan =
        serde_json::from_str(&contents).map_err(|e| PlanFileError::Malformed {
            path: path.display().to_string(),
            source: e,
        })?;

    identity::stamp_ids(&mut saved.plan);
    Ok(saved)
}

/// Serialize a saved plan to pretty JSON at `path`.
pub fn save_plan(path: &Path, saved: &SavedPlan) -> Result<(), PlanFileError> {
    let contents = serde_json::to_string_pretty(saved).map_err(|e| PlanFileError::Malformed {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, contents).map_err(|e| PlanFileError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

/// Derive a safe file name from a display name.
///
/// Keeps letters, digits, spaces, and dashes; spaces become underscores;
/// everything is lowercased. Falls back to `"itinerary"` when nothing
/// survives.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    if cleaned.is_empty() {
        "itinerary".to_string()
    } else {
        cleaned
    }
}

/// Default file name for a saved plan: sanitized display name plus `.json`.
pub fn default_file_name(name: &str) -> String {
    format!("{}.json", sanitize_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    use crate::model::{
        Activity, ActivityKind, CostBreakdown, CurrencyInfo, DayPlan, DestinationSummary,
        ItineraryStyle, Plan,
    };

    fn destination() -> DestinationSummary {
        DestinationSummary {
            name: "Italy".to_string(),
            country: "Italy".to_string(),
            description: "Renaissance cities and coastline.".to_string(),
            visa_note: "e-visa available".to_string(),
            average_cost: 1200.0,
            cost_breakdown: CostBreakdown::default(),
            currency: CurrencyInfo {
                code: "EUR".to_string(),
                symbol: "€".to_string(),
                usd_to_local_rate: 0.9,
                usd_to_home_rate: 1.0,
            },
        }
    }

    fn saved_plan() -> SavedPlan {
        SavedPlan {
            id: Uuid::new_v4(),
            name: "Trip to Italy".to_string(),
            plan: Plan {
                days: vec![DayPlan {
                    day: 1,
                    title: "Rome".to_string(),
                    activities: vec![Activity {
                        id: Some(Uuid::new_v4()),
                        name: "Colosseum".to_string(),
                        description: String::new(),
                        city: "Rome".to_string(),
                        kind: ActivityKind::Touristy,
                        average_cost: 20.0,
                        cost_breakdown: CostBreakdown::default(),
                        lat: 41.89,
                        lng: 12.49,
                        duration: None,
                        visiting_tip: None,
                        links: vec![],
                    }],
                    tips: vec![],
                    travel: None,
                    user_note: None,
                    weather: None,
                }],
                ..Plan::default()
            },
            destination: destination(),
            saved_at: Utc::now(),
            season: "October".to_string(),
            style: ItineraryStyle::Mixed,
            notes: String::new(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trip.json");
        let saved = saved_plan();

        save_plan(&path, &saved).unwrap();
        let loaded = load_saved_plan(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn load_stamps_missing_activity_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trip.json");
        let mut saved = saved_plan();
        saved.plan.days[0].activities[0].id = None;
        save_plan(&path, &saved).unwrap();

        let loaded = load_saved_plan(&path).unwrap();
        assert!(loaded.plan.days[0].activities[0].id.is_some());
    }

    #[test]
    fn load_migrates_bare_object_travel_leg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.json");
        let mut document = serde_json::to_value(saved_plan()).unwrap();
        document["plan"]["days"][0]["travel"] = serde_json::json!({
            "from_city": "Rome",
            "to_city": "Florence",
            "options": [{"mode": "Train", "duration": "90 minutes", "cost": 30.0}]
        });
        std::fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

        let loaded = load_saved_plan(&path).unwrap();
        let travel = loaded.plan.days[0].travel.as_ref().unwrap();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].to_city, "Florence");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_saved_plan(Path::new("/nonexistent/trip.json"));
        assert!(matches!(result, Err(PlanFileError::Read { .. })));
    }

    #[test]
    fn malformed_file_is_a_typed_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"name\": \"half a document\"").unwrap();

        let result = load_saved_plan(&path);
        assert!(matches!(result, Err(PlanFileError::Malformed { .. })));
    }

    #[test]
    fn sanitize_strips_and_lowercases() {
        assert_eq!(sanitize_file_name("Trip to Italy!"), "trip_to_italy");
        assert_eq!(sanitize_file_name("Côte d'Azur 2026"), "cte_dazur_2026");
        assert_eq!(sanitize_file_name("???"), "itinerary");
        assert_eq!(default_file_name("My Trip"), "my_trip.json");
    }
}
