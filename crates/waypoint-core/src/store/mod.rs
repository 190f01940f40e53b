//! Plan snapshots and local mutations.
//!
//! Holds exactly two snapshots: `baseline` (the last plan confirmed by the
//! oracle) and `working` (the user-editable copy). The modified flag is
//! derived from structural inequality, never stored. Every mutation is a
//! silent no-op when no working plan is present; this component has no
//! notion of invalid input beyond absence of a plan.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::identity;
use crate::model::{Activity, PackingCategory, Plan};

/// In-memory holder of the baseline and working plan snapshots.
#[derive(Debug, Clone, Default)]
pub struct PlanStore {
    baseline: Option<Plan>,
    working: Option<Plan>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> Option<&Plan> {
        self.baseline.as_ref()
    }

    pub fn working(&self) -> Option<&Plan> {
        self.working.as_ref()
    }

    /// Whether the working copy has diverged from the baseline.
    pub fn is_modified(&self) -> bool {
        self.working != self.baseline
    }

    /// Install a plan fresh from the oracle (or a loaded file).
    ///
    /// Stamps activity ids, then sets both snapshots to the result. The
    /// caller is responsible for clearing its edit tracker alongside.
    pub fn set_from_oracle(&mut self, mut plan: Plan) {
        identity::stamp_ids(&mut plan);
        self.working = Some(plan.clone());
        self.baseline = Some(plan);
    }

    /// Drop both snapshots (full reset).
    pub fn clear(&mut self) {
        self.baseline = None;
        self.working = None;
    }

    /// Reset the working copy to the baseline.
    pub fn discard(&mut self) {
        if let Some(baseline) = &self.baseline {
            self.working = Some(baseline.clone());
        }
    }

    // -----------------------------------------------------------------
    // Itinerary mutations
    // -----------------------------------------------------------------

    /// Remove an activity from a day of the working copy.
    ///
    /// Returns the removed activity so the caller can fingerprint it for
    /// exclusion tracking. `None` if the plan, day, or activity is absent.
    pub fn delete_activity(&mut self, day_index: usize, activity_id: Uuid) -> Option<Activity> {
        let day = self.working.as_mut()?.days.get_mut(day_index)?;
        let position = day
            .activities
            .iter()
            .position(|a| a.id == Some(activity_id))?;
        Some(day.activities.remove(position))
    }

    /// Replace a day's activities with a caller-supplied permutation.
    ///
    /// The caller guarantees the new order holds the same id set. The
    /// day's travel legs are untouched.
    pub fn reorder_activities(&mut self, day_index: usize, new_order: Vec<Activity>) {
        if let Some(day) = self
            .working
            .as_mut()
            .and_then(|plan| plan.days.get_mut(day_index))
        {
            day.activities = new_order;
        }
    }

    /// Replace a day's free-text user note.
    pub fn update_day_note(&mut self, day_index: usize, note: &str) {
        if let Some(day) = self
            .working
            .as_mut()
            .and_then(|plan| plan.days.get_mut(day_index))
        {
            day.user_note = Some(note.to_string());
        }
    }

    // -----------------------------------------------------------------
    // Packing list
    // -----------------------------------------------------------------

    /// Install a freshly generated packing list.
    ///
    /// Resets the checked-items map: a new list may contain different
    /// items, so prior check state is meaningless.
    pub fn update_packing_list(&mut self, list: Vec<PackingCategory>) {
        if let Some(plan) = self.working.as_mut() {
            plan.packing_list = Some(list);
            plan.checked_items = Some(BTreeMap::new());
        }
    }

    /// Flip an item's packed flag.
    pub fn toggle_checked(&mut self, item: &str) {
        if let Some(plan) = self.working.as_mut() {
            let map = plan.checked_items.get_or_insert_with(BTreeMap::new);
            let flag = map.entry(item.to_string()).or_insert(false);
            *flag = !*flag;
        }
    }

    /// Add an item to a packing category, keeping the category sorted.
    ///
    /// Rejects items already present in any category (exact, case-sensitive
    /// match) and returns whether the item was added. Unknown categories
    /// are not created.
    pub fn add_packing_item(&mut self, category: &str, item: &str) -> bool {
        let Some(plan) = self.working.as_mut() else {
            return false;
        };
        let Some(list) = plan.packing_list.as_mut() else {
            return false;
        };

        if list.iter().any(|c| c.items.iter().any(|i| i == item)) {
            tracing::warn!(item, "packing item already present, not adding");
            return false;
        }

        match list.iter_mut().find(|c| c.category == category) {
            Some(cat) => {
                cat.items.push(item.to_string());
                cat.items.sort();
                true
            }
            None => false,
        }
    }

    /// Remove an item from its category and from the checked-items map.
    pub fn remove_packing_item(&mut self, item: &str) {
        let Some(plan) = self.working.as_mut() else {
            return;
        };
        if let Some(list) = plan.packing_list.as_mut() {
            for category in list.iter_mut() {
                category.items.retain(|i| i != item);
            }
        }
        if let Some(map) = plan.checked_items.as_mut() {
            map.remove(item);
        }
    }
}
