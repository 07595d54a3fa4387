//! Manage favorites.

use anyhow::{Context, Result};
use feed_types::ImageId;

use super::{print_records, AppContext};

/// Mark an image as favorite.
pub async fn add(ctx: &AppContext, id: ImageId) -> Result<()> {
    let favorites = ctx.favorites().await?;
    if favorites.add(id).await.context("Failed to update favorites")? {
        println!("Added {} to favorites", id);
    } else {
        println!("{} is already a favorite", id);
    }
    Ok(())
}

/// Unmark an image.
pub async fn remove(ctx: &AppContext, id: ImageId) -> Result<()> {
    let favorites = ctx.favorites().await?;
    if favorites.remove(id).await.context("Failed to update favorites")? {
        println!("Removed {} from favorites", id);
    } else {
        println!("{} is not a favorite", id);
    }
    Ok(())
}

/// Flip an image's membership.
pub async fn toggle(ctx: &AppContext, id: ImageId) -> Result<()> {
    let favorites = ctx.favorites().await?;
    let now = favorites
        .toggle(id)
        .await
        .context("Failed to update favorites")?;
    println!("{} is {}", id, if now { "a favorite" } else { "not a favorite" });
    Ok(())
}

/// Report whether an image is a favorite.
pub async fn check(ctx: &AppContext, id: ImageId) -> Result<()> {
    let favorites = ctx.favorites().await?;
    let is_favorite = favorites
        .contains(id)
        .await
        .context("Failed to read favorites")?;
    println!("{}", if is_favorite { "yes" } else { "no" });
    Ok(())
}

/// List favorites, with details for those present in the cached snapshot.
pub async fn list(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.favorites().await?;
    let ids = favorites.ids().await.context("Failed to read favorites")?;
    if ids.is_empty() {
        println!("No favorites");
        return Ok(());
    }

    // A missing or unreadable snapshot just means no details to show.
    let cached = ctx
        .snapshots()
        .await?
        .load()
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    let known = favorites
        .filter(&cached)
        .await
        .context("Failed to read favorites")?;

    println!("{} favorite(s)", ids.len());
    print_records(&known, known.len());
    for id in ids.iter().filter(|id| !known.iter().any(|r| r.id == **id)) {
        println!("  {:>12}  (not cached)", id.value());
    }
    Ok(())
}
