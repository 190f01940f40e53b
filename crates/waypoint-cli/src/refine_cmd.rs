//! `waypoint refine` command: apply local edits and run a refinement.
//!
//! Edits are applied to the loaded plan through a session (so deletions are
//! fingerprinted), then compiled and sent to the provider. The file is only
//! rewritten on success; a failed refinement leaves it untouched so the
//! same command can be retried.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;

use waypoint_core::model::SavedPlan;
use waypoint_core::planfile;
use waypoint_core::refine;
use waypoint_core::session::PlanSession;

use crate::config::WaypointConfig;

pub struct RefineArgs {
    pub file: PathBuf,
    pub notes: String,
    pub delete_activity: Vec<String>,
    pub remove_city: Vec<usize>,
    pub day_note: Vec<String>,
    pub out: Option<PathBuf>,
}

pub async fn run_refine(config: &WaypointConfig, args: RefineArgs) -> Result<()> {
    let saved = planfile::load_saved_plan(&args.file)
        .with_context(|| format!("failed to load plan from {}", args.file.display()))?;

    let mut session = PlanSession::new(config.build_gateway());
    session.load_saved(saved.clone())?;

    // 1. Day notes.
    for spec in &args.day_note {
        let (day, text) = parse_day_spec(spec)?;
        let day_index = day_to_index(&session, day)?;
        session.update_day_note(day_index, text);
    }

    // 2. Activity deletions (fingerprinted for the exclusion list).
    for spec in &args.delete_activity {
        let (day, name) = parse_day_spec(spec)?;
        let day_index = day_to_index(&session, day)?;
        let id = find_activity(&session, day_index, name)?;
        session.delete_activity(day_index, id);
        println!("Deleted {name:?} from day {day}.");
    }

    // 3. City removals, given as 1-based stop numbers from `show`.
    let route = refine::city_sequence(session.plan().context("no plan loaded")?);
    for stop in &args.remove_city {
        if *stop == 0 || *stop > route.len() {
            bail!(
                "stop number {stop} is out of range (route has {} stops; see `waypoint show`)",
                route.len()
            );
        }
        session.toggle_city_removal(stop - 1);
        println!("Marked stop {stop} ({}) for removal.", route[stop - 1]);
    }

    // 4. Refine. On failure the file is left alone and the edits above
    // can simply be re-run.
    println!("Requesting refinement from the provider...");
    session.rebuild(&args.notes).await?;

    let refined = session
        .plan()
        .context("refinement succeeded but no plan was produced")?
        .clone();

    let updated = SavedPlan {
        plan: refined,
        saved_at: Utc::now(),
        ..saved
    };
    let path = args.out.unwrap_or(args.file);
    planfile::save_plan(&path, &updated)?;

    println!();
    println!("Refined plan written to {}", path.display());
    println!("  Days:  {}", updated.plan.days.len());
    println!(
        "  Route: {}",
        refine::city_sequence(&updated.plan).join(" -> ")
    );
    if !updated.plan.optimization_note.is_empty() {
        println!("  Note:  {}", updated.plan.optimization_note);
    }
    Ok(())
}

/// Split a `"<day>:<text>"` argument into its parts.
fn parse_day_spec(spec: &str) -> Result<(usize, &str)> {
    let (day, rest) = spec
        .split_once(':')
        .with_context(|| format!("expected \"<day>:<value>\", got {spec:?}"))?;
    let day: usize = day
        .trim()
        .parse()
        .with_context(|| format!("invalid day number in {spec:?}"))?;
    Ok((day, rest.trim()))
}

/// Convert a user-facing 1-based day number to an index, bounds-checked.
fn day_to_index(session: &PlanSession, day: usize) -> Result<usize> {
    let count = session.plan().map(|p| p.days.len()).unwrap_or(0);
    if day == 0 || day > count {
        bail!("day {day} is out of range (plan has {count} days)");
    }
    Ok(day - 1)
}

/// Resolve an activity by case-insensitive name within a day.
fn find_activity(session: &PlanSession, day_index: usize, name: &str) -> Result<uuid::Uuid> {
    let plan = session.plan().context("no plan loaded")?;
    let day = &plan.days[day_index];
    day.activities
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .and_then(|a| a.id)
        .with_context(|| {
            let names: Vec<&str> = day.activities.iter().map(|a| a.name.as_str()).collect();
            format!(
                "no activity named {name:?} on day {} (have: {})",
                day_index + 1,
                names.join(", ")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_spec_splits_on_first_colon() {
        let (day, text) = parse_day_spec("2:Note: see the Duomo").unwrap();
        assert_eq!(day, 2);
        assert_eq!(text, "Note: see the Duomo");
    }

    #[test]
    fn day_spec_rejects_missing_colon() {
        assert!(parse_day_spec("just words").is_err());
        assert!(parse_day_spec("x:thing").is_err());
    }
}
