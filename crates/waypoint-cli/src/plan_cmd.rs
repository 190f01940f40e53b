//! `waypoint plan` command: generate an itinerary and save it to a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use waypoint_core::model::{ItineraryStyle, SavedPlan};
use waypoint_core::planfile;
use waypoint_core::refine;
use waypoint_core::session::PlanSession;

use crate::config::WaypointConfig;

pub struct PlanArgs {
    pub destination: String,
    pub days: u32,
    pub style: String,
    pub notes: String,
    pub season: String,
    pub name: Option<String>,
    pub out: Option<PathBuf>,
}

pub async fn run_plan(config: &WaypointConfig, args: PlanArgs) -> Result<()> {
    let style: ItineraryStyle = args
        .style
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut session = PlanSession::new(config.build_gateway());

    // 1. Resolve the destination (cached lookup).
    session
        .lookup_country(&args.destination, &args.season)
        .await?;

    // 2. Generate; 0 days asks the provider to pick the duration.
    if args.days == 0 {
        println!("Generating a comprehensive tour of {}...", args.destination);
    } else {
        println!(
            "Generating a {}-day itinerary for {}...",
            args.days, args.destination
        );
    }
    session.generate(args.days, style, &args.notes).await?;

    let plan = session
        .plan()
        .context("generation succeeded but no plan was produced")?
        .clone();
    let destination = session
        .destination()
        .context("no destination resolved")?
        .clone();

    // 3. Save.
    let display_name = args
        .name
        .unwrap_or_else(|| format!("Trip to {}", destination.name));
    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(planfile::default_file_name(&display_name)));

    let saved = SavedPlan {
        id: Uuid::new_v4(),
        name: display_name,
        plan: plan.clone(),
        destination,
        saved_at: Utc::now(),
        season: args.season,
        style,
        notes: args.notes,
    };
    planfile::save_plan(&path, &saved)?;

    // 4. Summarize.
    let route = refine::city_sequence(&plan);
    println!();
    println!("Plan saved to {}", path.display());
    println!("  Days:   {}", plan.days.len());
    println!("  Route:  {}", route.join(" -> "));
    println!(
        "  Activities: {}",
        plan.days.iter().map(|d| d.activities.len()).sum::<usize>()
    );
    println!();
    println!("Inspect it with:  waypoint show {}", path.display());
    println!("Refine it with:   waypoint refine {} --notes \"...\"", path.display());
    Ok(())
}
