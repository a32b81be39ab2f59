//! Stats command implementation

use anyhow::Result;
use wellstat::prelude::*;

pub fn execute(config: StoreConfig, wellbore: Option<String>, json: bool) -> Result<()> {
    let db = super::open(config)?;

    let counters = match wellbore {
        Some(id) => {
            let (succeed, fail) = db.store().get_data_statistics(&id).unwrap_or((0, 0));
            vec![WellboreCounter::new(id, succeed, fail)]
        }
        None => db.store().data_statistics(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&counters)?);
        return Ok(());
    }

    println!("\nWellbore Statistics");
    println!("{}", "=".repeat(60));
    if counters.is_empty() {
        println!("No statistics recorded.");
        return Ok(());
    }

    println!(
        "{:<34} {:>12} {:>12}",
        "Wellbore", "Succeeded", "Failed"
    );
    for counter in &counters {
        println!(
            "{:<34} {:>12} {:>12}",
            counter.wellbore_id, counter.succeed_count, counter.fail_count
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}
