//! Show feed status.

use anyhow::Result;

use super::AppContext;

/// Run the status command.
pub async fn run(ctx: &AppContext) -> Result<()> {
    println!("=== gallery status ===");
    println!();

    println!("Remote:");
    println!("  Endpoint:   {}", ctx.config.api.endpoint);
    println!("  Collection: {}", ctx.config.api.collection_id);
    println!("  Page size:  {}", ctx.config.feed.page_size);
    println!(
        "  Sort:       {} ({})",
        ctx.config.sort.field,
        if ctx.config.sort.direction.is_ascending() {
            "ascending"
        } else {
            "descending"
        }
    );
    println!();

    let network = ctx.connectivity()?.current_status().await;
    println!("Connection:");
    println!(
        "  Status: {}",
        if network.is_online() {
            "ONLINE"
        } else if ctx.offline {
            "OFFLINE (forced)"
        } else {
            "OFFLINE"
        }
    );
    println!();

    println!("Local data ({}):", ctx.store_dir().display());
    match ctx.snapshots().await?.load().await {
        Ok(Some(records)) => println!("  Cached images: {}", records.len()),
        Ok(None) => println!("  Cached images: none"),
        Err(e) => println!("  Cached images: unreadable ({e})"),
    }
    match ctx.favorites().await?.ids().await {
        Ok(ids) => println!("  Favorites:     {}", ids.len()),
        Err(e) => println!("  Favorites:     unreadable ({e})"),
    }

    Ok(())
}
