//! `waypoint suggest` command: destination suggestions and direct lookup.

use anyhow::{Context, Result};

use waypoint_core::model::DestinationSummary;
use waypoint_core::session::PlanSession;

use crate::config::WaypointConfig;

pub struct SuggestArgs {
    pub budget: String,
    pub season: String,
    pub continent: String,
    pub country: Option<String>,
    pub off_beat: bool,
}

pub async fn run_suggest(config: &WaypointConfig, args: SuggestArgs) -> Result<()> {
    let mut session = PlanSession::new(config.build_gateway());

    if let Some(country) = &args.country {
        session.lookup_country(country, &args.season).await?;
        let destination = session
            .destination()
            .context("lookup succeeded but no destination was resolved")?;
        print_summary(destination);
        println!();
        println!(
            "Generate a plan with: waypoint plan {:?} --days <N>",
            destination.name
        );
        return Ok(());
    }

    let suggestions = if args.off_beat {
        session.suggest_off_beat().await?
    } else {
        session
            .suggest(&args.budget, &args.season, &args.continent)
            .await?
    };

    if suggestions.is_empty() {
        println!("No suggestions returned. Try different preferences.");
        return Ok(());
    }

    println!("Suggested destinations:");
    println!();
    for destination in &suggestions {
        print_summary(destination);
        println!();
    }
    println!("Generate a plan with: waypoint plan <destination> --days <N>");
    Ok(())
}

fn print_summary(destination: &DestinationSummary) {
    println!("  {}", destination.name);
    println!("    {}", destination.description);
    println!("    Visa: {}", destination.visa_note);
    println!(
        "    7-day solo estimate: ${:.0} (stay ${:.0}, food ${:.0}, activities ${:.0})",
        destination.average_cost,
        destination.cost_breakdown.accommodation,
        destination.cost_breakdown.food,
        destination.cost_breakdown.activities,
    );
    println!(
        "    Currency: {} ({}), 1 USD = {:.2} {}",
        destination.currency.code,
        destination.currency.symbol,
        destination.currency.usd_to_local_rate,
        destination.currency.code,
    );
}
