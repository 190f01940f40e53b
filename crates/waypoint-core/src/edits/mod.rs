//! Pending-edit intents that must survive until the next refinement.
//!
//! Two sets: deleted-activity fingerprints (monotonic until cleared) and
//! city-sequence positions marked for removal (a toggle set). Cleared
//! exactly on: successful refinement, discard, full reset, or leaving the
//! plan view.

use std::collections::BTreeSet;

use crate::model::Activity;

/// Derive the tracking key for an activity.
///
/// Activity ids are regenerated on every oracle round-trip, so "the same
/// real-world place" is recognized by `lowercased(name)|lowercased(city)`
/// instead. This helper is the only place the heuristic lives; swap it here
/// if the provider ever starts issuing stable content hashes.
pub fn fingerprint(name: &str, city: &str) -> String {
    format!(
        "{}|{}",
        name.trim().to_lowercase(),
        city.trim().to_lowercase()
    )
}

/// Accumulated removal intents between oracle calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTracker {
    deleted: BTreeSet<String>,
    cities_to_remove: BTreeSet<usize>,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deleted activity's fingerprint. Idempotent.
    pub fn mark_deleted(&mut self, activity: &Activity) {
        self.deleted
            .insert(fingerprint(&activity.name, &activity.city));
    }

    /// Toggle a city-sequence position for removal.
    ///
    /// Indices are positions into the distinct-city sequence recomputed
    /// from the working plan at compile time, not stable identifiers; an
    /// out-of-range index is accepted here and skipped at compile time.
    pub fn toggle_city_removal(&mut self, index: usize) {
        if !self.cities_to_remove.remove(&index) {
            self.cities_to_remove.insert(index);
        }
    }

    pub fn is_city_marked(&self, index: usize) -> bool {
        self.cities_to_remove.contains(&index)
    }

    /// Deletion fingerprints in deterministic order.
    pub fn deleted_fingerprints(&self) -> Vec<String> {
        self.deleted.iter().cloned().collect()
    }

    /// Marked city positions in increasing order.
    pub fn marked_cities(&self) -> Vec<usize> {
        self.cities_to_remove.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.cities_to_remove.is_empty()
    }

    /// Empty both sets.
    pub fn clear(&mut self) {
        self.deleted.clear();
        self.cities_to_remove.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityKind, CostBreakdown};

    fn activity(name: &str, city: &str) -> Activity {
        Activity {
            id: None,
            name: name.to_string(),
            description: String::new(),
            city: city.to_string(),
            kind: ActivityKind::Touristy,
            average_cost: 0.0,
            cost_breakdown: CostBreakdown::default(),
            lat: 0.0,
            lng: 0.0,
            duration: None,
            visiting_tip: None,
            links: vec![],
        }
    }

    #[test]
    fn fingerprint_lowercases_and_trims() {
        assert_eq!(fingerprint("  The Colosseum ", "ROME"), "the colosseum|rome");
    }

    #[test]
    fn mark_deleted_is_idempotent() {
        let mut tracker = EditTracker::new();
        tracker.mark_deleted(&activity("Colosseum", "Rome"));
        tracker.mark_deleted(&activity("colosseum", "rome"));
        assert_eq!(tracker.deleted_fingerprints(), vec!["colosseum|rome"]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut tracker = EditTracker::new();
        tracker.toggle_city_removal(2);
        assert!(tracker.is_city_marked(2));
        tracker.toggle_city_removal(2);
        assert!(!tracker.is_city_marked(2));
        assert!(tracker.is_empty());
    }

    #[test]
    fn marked_cities_come_out_sorted() {
        let mut tracker = EditTracker::new();
        tracker.toggle_city_removal(3);
        tracker.toggle_city_removal(0);
        tracker.toggle_city_removal(1);
        assert_eq!(tracker.marked_cities(), vec![0, 1, 3]);
    }

    #[test]
    fn clear_empties_both_sets() {
        let mut tracker = EditTracker::new();
        tracker.mark_deleted(&activity("Duomo", "Florence"));
        tracker.toggle_city_removal(1);
        tracker.clear();
        assert!(tracker.is_empty());
    }
}
