//! `waypoint cache` maintenance commands.

use anyhow::Result;

use crate::config::WaypointConfig;

pub fn run_sweep(config: &WaypointConfig) -> Result<()> {
    let mut cache = config.open_cache();
    let removed = cache.sweep();
    println!(
        "Removed {removed} expired cache entr{} from {}",
        if removed == 1 { "y" } else { "ies" },
        config.cache_file.display()
    );
    Ok(())
}
