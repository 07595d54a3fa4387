//! Inspect or drop the offline snapshot.

use anyhow::{Context, Result};

use super::{print_records, AppContext, PREVIEW_LIMIT};

/// Print the cached snapshot.
pub async fn show(ctx: &AppContext) -> Result<()> {
    let cache = ctx.snapshots().await?;
    match cache.load().await.context("Failed to read cached snapshot")? {
        Some(records) => {
            println!("{} cached images", records.len());
            print_records(&records, PREVIEW_LIMIT);
        }
        None => println!("No cached snapshot"),
    }
    Ok(())
}

/// Delete the cached snapshot.
pub async fn clear(ctx: &AppContext) -> Result<()> {
    let cache = ctx.snapshots().await?;
    if cache.clear().await.context("Failed to clear cached snapshot")? {
        println!("Cached snapshot cleared");
    } else {
        println!("No cached snapshot");
    }
    Ok(())
}
