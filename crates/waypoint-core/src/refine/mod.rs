//! Refinement instruction compilation.
//!
//! Turns the working plan, the pending edit intents, and the user's
//! free-text notes into the single instruction string sent with a
//! refinement request. Pure and deterministic: the same inputs always
//! produce the same text.

use crate::edits::EditTracker;
use crate::model::Plan;

/// Substituted when the user supplied no refinement notes.
pub const EMPTY_NOTES_PLACEHOLDER: &str = "No specific notes provided.";

/// The distinct ordered city sequence of a plan.
///
/// Scans days in order and each day's activities in order, collapsing
/// consecutive repeats of the same city. A city that reappears later,
/// non-consecutively, produces a second entry: the sequence models visits,
/// not a set.
pub fn city_sequence(plan: &Plan) -> Vec<String> {
    let mut sequence: Vec<String> = Vec::new();
    for day in &plan.days {
        for activity in &day.activities {
            let city = activity.city.trim();
            if city.is_empty() {
                continue;
            }
            if sequence.last().map(String::as_str) != Some(city) {
                sequence.push(city.to_string());
            }
        }
    }
    sequence
}

/// Build the refinement instruction text.
///
/// City removals come first: each marked position, in increasing order, is
/// named by city and 1-based stop number against the full arrow-joined
/// sequence, so duplicate city names stay unambiguous. Positions past the
/// end of the current sequence are skipped. The free-text notes follow
/// verbatim (or the placeholder when empty). Deleted-activity fingerprints
/// are NOT part of this text; they travel to the gateway as a structured
/// exclusion list.
pub fn compile(plan: &Plan, edits: &EditTracker, notes: &str) -> String {
    let notes = notes.trim();
    let notes = if notes.is_empty() {
        EMPTY_NOTES_PLACEHOLDER
    } else {
        notes
    };

    let marked = edits.marked_cities();
    if marked.is_empty() {
        return notes.to_string();
    }

    let sequence = city_sequence(plan);
    let chain = sequence.join(" -> ");

    let mut lines = String::new();
    for index in marked {
        match sequence.get(index) {
            Some(city) => {
                lines.push_str(&format!(
                    "- The visit to {city} (stop number {} in the sequence: {chain})\n",
                    index + 1
                ));
            }
            None => {
                tracing::warn!(
                    index,
                    sequence_len = sequence.len(),
                    "city-removal index out of range, skipping"
                );
            }
        }
    }

    if lines.is_empty() {
        // Every marked index was stale; fall back to the notes alone.
        return notes.to_string();
    }

    let mut instruction = String::with_capacity(lines.len() + notes.len() + 256);
    instruction.push_str(
        "CRITICAL TASK: first, remove the following city stops and all of their \
         associated days and activities from the itinerary. This will make the \
         trip shorter.\n",
    );
    instruction.push_str(&lines);
    instruction.push_str(
        "\nOnce those cities are removed, apply the user's other refinement notes \
         (if any) to the REMAINING plan.\n",
    );
    instruction.push_str(&format!("\nOther refinement notes: {notes}"));
    instruction
}
