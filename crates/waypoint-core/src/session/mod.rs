//! Plan request state machine and session coordinator.
//!
//! [`PlanSession`] plays the role the UI shell plays in a front-end: it
//! pairs every store mutation with its edit-tracker side, compiles
//! refinement instructions, drives the gateway, and applies oracle results
//! atomically. A failed generation or refinement leaves the store, the
//! tracker, and the caller's notes exactly as they were.

use std::fmt;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::edits::EditTracker;
use crate::model::{DestinationSummary, ItineraryStyle, PackingCategory, Plan, SavedPlan};
use crate::oracle::OracleGateway;
use crate::refine;
use crate::store::PlanStore;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Where the session is in the request lifecycle.
///
/// Valid transition graph (any state may also reset to `idle`):
///
/// ```text
/// idle              -> suggesting | detailing | ready (file load)
/// suggesting        -> awaiting_duration
/// detailing         -> awaiting_duration
/// awaiting_duration -> generating | ready (return to existing plan)
/// generating        -> ready | awaiting_duration (failure)
/// ready             -> rebuilding | awaiting_duration (leave plan view)
/// rebuilding        -> ready (success and failure)
/// ```
///
/// Local editing is a sub-state of `ready` and needs no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Idle,
    Suggesting,
    Detailing,
    AwaitingDuration,
    Generating,
    Ready,
    Rebuilding,
}

impl SessionStep {
    /// Check whether a transition from `from` to `to` is a valid edge in
    /// the state graph.
    pub fn is_valid_transition(from: SessionStep, to: SessionStep) -> bool {
        use SessionStep::*;
        if to == Idle {
            return true;
        }
        matches!(
            (from, to),
            (Idle, Suggesting)
                | (Idle, Detailing)
                | (Idle, Ready)
                | (Suggesting, AwaitingDuration)
                | (Detailing, AwaitingDuration)
                | (AwaitingDuration, Generating)
                | (AwaitingDuration, Ready)
                | (Generating, Ready)
                | (Generating, AwaitingDuration)
                | (Ready, Rebuilding)
                | (Ready, AwaitingDuration)
                | (Rebuilding, Ready)
        )
    }
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Suggesting => "suggesting",
            Self::Detailing => "detailing",
            Self::AwaitingDuration => "awaiting_duration",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Rebuilding => "rebuilding",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's plan-building session.
///
/// The design assumes at most one outstanding oracle call per session;
/// callers serialize requests. A resolved refinement is applied
/// unconditionally even if local edits happened while it was in flight
/// (last writer wins).
pub struct PlanSession {
    gateway: OracleGateway,
    store: PlanStore,
    edits: EditTracker,
    step: SessionStep,
    destination: Option<DestinationSummary>,
    style: ItineraryStyle,
    season: String,
    notes: String,
}

impl PlanSession {
    pub fn new(gateway: OracleGateway) -> Self {
        Self {
            gateway,
            store: PlanStore::new(),
            edits: EditTracker::new(),
            step: SessionStep::Idle,
            destination: None,
            style: ItineraryStyle::Mixed,
            season: String::new(),
            notes: String::new(),
        }
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn edits(&self) -> &EditTracker {
        &self.edits
    }

    pub fn destination(&self) -> Option<&DestinationSummary> {
        self.destination.as_ref()
    }

    pub fn style(&self) -> ItineraryStyle {
        self.style
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The working plan, if one is loaded.
    pub fn plan(&self) -> Option<&Plan> {
        self.store.working()
    }

    pub fn gateway_mut(&mut self) -> &mut OracleGateway {
        &mut self.gateway
    }

    fn transition(&mut self, to: SessionStep) -> Result<()> {
        if !SessionStep::is_valid_transition(self.step, to) {
            bail!("invalid session transition: {} -> {}", self.step, to);
        }
        self.step = to;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Oracle-backed operations
    // -----------------------------------------------------------------

    /// Fetch destination suggestions. On success the session stays in
    /// `suggesting` until a destination is selected.
    pub async fn suggest(
        &mut self,
        budget: &str,
        season: &str,
        continent: &str,
    ) -> Result<Vec<DestinationSummary>> {
        self.transition(SessionStep::Suggesting)?;
        self.season = season.trim().to_string();
        match self.gateway.suggestions(budget, season, continent).await {
            Ok(suggestions) => Ok(suggestions),
            Err(e) => {
                self.step = SessionStep::Idle;
                Err(e.into())
            }
        }
    }

    /// Fetch the curated off-the-beaten-path suggestions.
    pub async fn suggest_off_beat(&mut self) -> Result<Vec<DestinationSummary>> {
        self.transition(SessionStep::Suggesting)?;
        match self.gateway.off_beat_suggestions().await {
            Ok(suggestions) => Ok(suggestions),
            Err(e) => {
                self.step = SessionStep::Idle;
                Err(e.into())
            }
        }
    }

    /// Look up one named country directly and select it.
    pub async fn lookup_country(&mut self, country: &str, season: &str) -> Result<()> {
        self.transition(SessionStep::Detailing)?;
        self.season = season.trim().to_string();
        let country = country.trim();
        match self.gateway.country_brief(country).await {
            Ok(brief) => {
                self.destination = Some(brief.into_summary(country));
                self.transition(SessionStep::AwaitingDuration)
            }
            Err(e) => {
                self.step = SessionStep::Idle;
                Err(e.into())
            }
        }
    }

    /// Select a destination from a suggestion list.
    pub fn select_destination(&mut self, destination: DestinationSummary) -> Result<()> {
        self.transition(SessionStep::AwaitingDuration)?;
        self.destination = Some(destination);
        Ok(())
    }

    /// Generate a plan for the selected destination.
    ///
    /// `duration` 0 requests a comprehensive plan: the oracle chooses the
    /// length. On success both snapshots hold the stamped result and the
    /// edit tracker is cleared; on failure everything is untouched and the
    /// session returns to awaiting a duration.
    pub async fn generate(
        &mut self,
        duration: u32,
        style: ItineraryStyle,
        notes: &str,
    ) -> Result<()> {
        let Some(destination) = self.destination.clone() else {
            bail!("no destination selected");
        };
        self.transition(SessionStep::Generating)?;
        self.style = style;
        self.notes = notes.to_string();

        let result = if duration == 0 {
            self.gateway
                .comprehensive_plan(&destination.name, style, notes)
                .await
        } else {
            self.gateway
                .full_plan(&destination.name, duration, style, notes)
                .await
        };

        match result {
            Ok(plan) => {
                self.install_plan(plan);
                Ok(())
            }
            Err(e) => {
                self.step = SessionStep::AwaitingDuration;
                Err(e.into())
            }
        }
    }

    /// Compile the pending edits and notes into a refinement request and
    /// apply the oracle's replacement plan.
    ///
    /// On failure the working copy, baseline, and tracker are exactly as
    /// before the attempt; the caller decides whether to keep its notes
    /// buffer (this method never clears it on failure, only on success).
    pub async fn rebuild(&mut self, refinement_notes: &str) -> Result<()> {
        let Some(destination) = self.destination.clone() else {
            bail!("no destination selected");
        };
        let Some(working) = self.store.working().cloned() else {
            bail!("no plan to rebuild");
        };
        self.transition(SessionStep::Rebuilding)?;

        let instruction = refine::compile(&working, &self.edits, refinement_notes);
        let exclusions = self.edits.deleted_fingerprints();

        info!(
            destination = %destination.name,
            days = working.days.len(),
            exclusions = exclusions.len(),
            "dispatching refinement"
        );

        let result = self
            .gateway
            .refine_plan(
                &destination.name,
                working.days.len(),
                self.style,
                &working.days,
                &instruction,
                &exclusions,
            )
            .await;

        match result {
            Ok(plan) => {
                self.install_plan(plan);
                Ok(())
            }
            Err(e) => {
                self.step = SessionStep::Ready;
                Err(e).context("refinement failed; pending edits were kept")
            }
        }
    }

    /// Generate a packing list for the working plan and install it.
    pub async fn generate_packing_list(&mut self) -> Result<Vec<PackingCategory>> {
        let Some(destination) = self.destination.clone() else {
            bail!("no destination selected");
        };
        let Some(working) = self.store.working() else {
            bail!("no plan loaded");
        };
        let duration = working.days.len();
        let names = working.activity_names();

        let list = self
            .gateway
            .packing_list(&destination.name, duration, &names)
            .await?;
        self.store.update_packing_list(list.clone());
        Ok(list)
    }

    /// Apply an oracle plan: stamp, snapshot, clear pending edits.
    fn install_plan(&mut self, plan: Plan) {
        self.store.set_from_oracle(plan);
        self.edits.clear();
        self.step = SessionStep::Ready;
    }

    // -----------------------------------------------------------------
    // Local mutations (sub-state of ready)
    // -----------------------------------------------------------------

    /// Delete an activity, recording its fingerprint first so the next
    /// refinement excludes it. Returns whether anything was removed.
    pub fn delete_activity(&mut self, day_index: usize, activity_id: uuid::Uuid) -> bool {
        let found = self.plan().and_then(|plan| {
            plan.days.get(day_index).and_then(|day| {
                day.activities
                    .iter()
                    .find(|a| a.id == Some(activity_id))
                    .cloned()
            })
        });
        match found {
            Some(activity) => {
                self.edits.mark_deleted(&activity);
                self.store.delete_activity(day_index, activity_id);
                true
            }
            None => false,
        }
    }

    pub fn reorder_activities(&mut self, day_index: usize, new_order: Vec<crate::model::Activity>) {
        self.store.reorder_activities(day_index, new_order);
    }

    pub fn update_day_note(&mut self, day_index: usize, note: &str) {
        self.store.update_day_note(day_index, note);
    }

    pub fn toggle_city_removal(&mut self, index: usize) {
        self.edits.toggle_city_removal(index);
    }

    pub fn toggle_checked(&mut self, item: &str) {
        self.store.toggle_checked(item);
    }

    pub fn add_packing_item(&mut self, category: &str, item: &str) -> bool {
        self.store.add_packing_item(category, item)
    }

    pub fn remove_packing_item(&mut self, item: &str) {
        self.store.remove_packing_item(item);
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Throw away local edits: working copy back to baseline, tracker
    /// emptied. No oracle call.
    pub fn discard(&mut self) {
        self.store.discard();
        self.edits.clear();
    }

    /// Leave the plan view: un-rebuilt changes are discarded and the
    /// session returns to awaiting a duration for the same destination.
    pub fn leave_plan(&mut self) -> Result<()> {
        self.transition(SessionStep::AwaitingDuration)?;
        self.store.discard();
        self.edits.clear();
        Ok(())
    }

    /// Return to an already-generated plan without regenerating.
    pub fn return_to_plan(&mut self) -> Result<()> {
        if self.store.working().is_none() {
            bail!("no plan to return to");
        }
        self.transition(SessionStep::Ready)
    }

    /// Install a plan loaded from a saved document.
    pub fn load_saved(&mut self, saved: SavedPlan) -> Result<()> {
        self.transition(SessionStep::Ready)?;
        self.destination = Some(saved.destination);
        self.style = saved.style;
        self.season = saved.season;
        self.notes = saved.notes;
        self.store.set_from_oracle(saved.plan);
        self.edits.clear();
        Ok(())
    }

    /// Full reset to a blank session.
    pub fn reset(&mut self) {
        self.step = SessionStep::Idle;
        self.store.clear();
        self.edits.clear();
        self.destination = None;
        self.style = ItineraryStyle::Mixed;
        self.season.clear();
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_graph_allows_happy_path() {
        use SessionStep::*;
        for (from, to) in [
            (Idle, Suggesting),
            (Suggesting, AwaitingDuration),
            (AwaitingDuration, Generating),
            (Generating, Ready),
            (Ready, Rebuilding),
            (Rebuilding, Ready),
        ] {
            assert!(SessionStep::is_valid_transition(from, to), "{from} -> {to}");
        }
    }

    #[test]
    fn transition_graph_rejects_shortcuts() {
        use SessionStep::*;
        for (from, to) in [
            (Idle, Generating),
            (Suggesting, Ready),
            (Ready, Generating),
            (Rebuilding, AwaitingDuration),
        ] {
            assert!(!SessionStep::is_valid_transition(from, to), "{from} -> {to}");
        }
    }

    #[test]
    fn any_state_can_reset_to_idle() {
        use SessionStep::*;
        for from in [Idle, Suggesting, Detailing, AwaitingDuration, Generating, Ready, Rebuilding] {
            assert!(SessionStep::is_valid_transition(from, Idle));
        }
    }

    #[test]
    fn generating_failure_returns_to_duration() {
        assert!(SessionStep::is_valid_transition(
            SessionStep::Generating,
            SessionStep::AwaitingDuration
        ));
    }
}
