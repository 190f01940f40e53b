//! `waypoint packing` command: generate a packing list for a saved plan.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use waypoint_core::model::SavedPlan;
use waypoint_core::planfile;
use waypoint_core::session::PlanSession;

use crate::config::WaypointConfig;

pub async fn run_packing(config: &WaypointConfig, file: &Path) -> Result<()> {
    let saved = planfile::load_saved_plan(file)
        .with_context(|| format!("failed to load plan from {}", file.display()))?;

    let mut session = PlanSession::new(config.build_gateway());
    session.load_saved(saved.clone())?;

    println!(
        "Generating a packing list for {}...",
        saved.destination.name
    );
    let list = session.generate_packing_list().await?;

    let updated_plan = session
        .plan()
        .context("packing list generated but no plan present")?
        .clone();
    let updated = SavedPlan {
        plan: updated_plan,
        saved_at: Utc::now(),
        ..saved
    };
    planfile::save_plan(file, &updated)?;

    println!();
    for category in &list {
        println!("{}:", category.category);
        for item in &category.items {
            println!("  [ ] {item}");
        }
    }
    println!();
    println!("Packing list saved into {}", file.display());
    Ok(())
}
