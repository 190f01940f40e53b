//! `waypoint show` command: render a saved plan as text.

use std::path::Path;

use anyhow::{Context, Result};

use waypoint_core::model::{SavedPlan, TipKind};
use waypoint_core::planfile;
use waypoint_core::refine;

pub fn run_show(file: &Path) -> Result<()> {
    let saved = planfile::load_saved_plan(file)
        .with_context(|| format!("failed to load plan from {}", file.display()))?;
    print!("{}", render(&saved));
    Ok(())
}

/// Render the whole document. Separated from I/O for testing.
fn render(saved: &SavedPlan) -> String {
    let mut out = String::new();
    let plan = &saved.plan;

    out.push_str(&format!(
        "{} -- {} ({} days, {} style)\n",
        saved.name,
        saved.destination.name,
        plan.days.len(),
        saved.style
    ));
    if !saved.season.is_empty() {
        out.push_str(&format!("Season: {}\n", saved.season));
    }
    out.push_str(&format!(
        "Saved: {}\n",
        saved.saved_at.format("%Y-%m-%d %H:%M UTC")
    ));

    // City route with the stop numbers `refine --remove-city` accepts.
    let route = refine::city_sequence(plan);
    if !route.is_empty() {
        out.push_str("\nRoute: ");
        let stops: Vec<String> = route
            .iter()
            .enumerate()
            .map(|(i, city)| format!("{}. {city}", i + 1))
            .collect();
        out.push_str(&stops.join(" -> "));
        out.push('\n');
    }

    for day in &plan.days {
        out.push_str(&format!("\nDay {}: {}\n", day.day, day.title));
        if let Some(weather) = &day.weather {
            out.push_str(&format!("  Weather: {weather}\n"));
        }
        if let Some(travel) = &day.travel {
            for leg in travel {
                let cheapest = leg
                    .options
                    .iter()
                    .map(|o| o.cost)
                    .fold(f64::INFINITY, f64::min);
                out.push_str(&format!(
                    "  Travel: {} -> {} ({} option{}, from ${:.0})\n",
                    leg.from_city,
                    leg.to_city,
                    leg.options.len(),
                    if leg.options.len() == 1 { "" } else { "s" },
                    if cheapest.is_finite() { cheapest } else { 0.0 },
                ));
            }
        }
        for activity in &day.activities {
            out.push_str(&format!(
                "  - {} ({}, {}, ${:.0})\n",
                activity.name, activity.city, activity.kind, activity.average_cost
            ));
            if let Some(tip) = &activity.visiting_tip {
                out.push_str(&format!("      Tip: {tip}\n"));
            }
        }
        for tip in &day.tips {
            let label = match tip.kind {
                TipKind::Do => "do",
                TipKind::Dont => "don't",
                TipKind::Warning => "warning",
                TipKind::Info => "info",
            };
            out.push_str(&format!("  [{label}] {}\n", tip.tip));
        }
        if let Some(note) = &day.user_note {
            out.push_str(&format!("  Note: {note}\n"));
        }
    }

    if let Some(costs) = &plan.city_stay_costs {
        if !costs.is_empty() {
            out.push_str("\nAccommodation:\n");
            for cost in costs {
                out.push_str(&format!(
                    "  {} -- {} night{}, ${:.0}\n",
                    cost.city,
                    cost.nights,
                    if cost.nights == 1 { "" } else { "s" },
                    cost.estimated_cost
                ));
            }
        }
    }

    if let Some(list) = &plan.packing_list {
        out.push_str("\nPacking list:\n");
        let empty = std::collections::BTreeMap::new();
        let checked = plan.checked_items.as_ref().unwrap_or(&empty);
        for category in list {
            out.push_str(&format!("  {}:\n", category.category));
            for item in &category.items {
                let mark = if checked.get(item).copied().unwrap_or(false) {
                    'x'
                } else {
                    ' '
                };
                out.push_str(&format!("    [{mark}] {item}\n"));
            }
        }
    }

    if !plan.optimization_note.is_empty() {
        out.push_str(&format!("\nOptimization: {}\n", plan.optimization_note));
    }

    if let Some(links) = &plan.official_links {
        if !links.is_empty() {
            out.push_str("\nOfficial links:\n");
            for link in links {
                out.push_str(&format!("  {} -- {}\n", link.title, link.url));
            }
        }
    }

    out
}
