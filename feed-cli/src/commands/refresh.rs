//! Refresh and browse the feed.

use anyhow::{bail, Result};
use feed_client::FeedSnapshot;
use feed_types::SortParams;

use super::{print_records, AppContext, PREVIEW_LIMIT};

/// Run the refresh command: load page 0 and print it.
pub async fn run(ctx: &AppContext, sort: Option<SortParams>, search: Option<&str>) -> Result<()> {
    let feed = ctx.feed(sort).await?;
    feed.refresh().await;
    report(&feed.snapshot(), 1, search)
}

/// Run the browse command: refresh, then load up to `pages` pages in total.
pub async fn browse(
    ctx: &AppContext,
    pages: u32,
    sort: Option<SortParams>,
    search: Option<&str>,
) -> Result<()> {
    let feed = ctx.feed(sort).await?;
    feed.refresh().await;

    let mut loaded = 1;
    while loaded < pages {
        let view = feed.snapshot();
        if view.error.is_some() || !view.has_more {
            break;
        }
        feed.load_more().await;
        loaded += 1;
    }

    report(&feed.snapshot(), loaded, search)
}

fn report(view: &FeedSnapshot, pages: u32, search: Option<&str>) -> Result<()> {
    println!(
        "{} images from {} page(s), more available: {}",
        view.items.len(),
        pages,
        if view.has_more { "yes" } else { "no" }
    );
    match search {
        Some(query) => {
            let matches = view.matching(query);
            println!("{} matching \"{}\"", matches.len(), query);
            print_records(&matches, PREVIEW_LIMIT);
        }
        None => print_records(&view.items, PREVIEW_LIMIT),
    }

    if let Some(error) = &view.error {
        bail!("{error}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use feed_types::ImageRecord;
    use tempfile::tempdir;

    fn records(n: u64) -> Vec<ImageRecord> {
        (1..=n).map(|id| ImageRecord::new(id, "cached.jpg")).collect()
    }

    #[tokio::test]
    async fn offline_refresh_without_cache_fails() {
        let dir = tempdir().unwrap();
        let ctx = AppContext::new(dir.path(), AppConfig::default(), true);

        let err = run(&ctx, None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "offline and no cached data available");
    }

    #[tokio::test]
    async fn offline_refresh_serves_cache() {
        let dir = tempdir().unwrap();
        let ctx = AppContext::new(dir.path(), AppConfig::default(), true);
        ctx.snapshots().await.unwrap().save(&records(3)).await.unwrap();

        assert!(run(&ctx, None, None).await.is_ok());
    }

    #[tokio::test]
    async fn offline_browse_stops_after_cache() {
        let dir = tempdir().unwrap();
        let ctx = AppContext::new(dir.path(), AppConfig::default(), true);
        ctx.snapshots().await.unwrap().save(&records(5)).await.unwrap();

        assert!(browse(&ctx, 3, None, None).await.is_ok());
    }

    #[tokio::test]
    async fn offline_refresh_with_search() {
        let dir = tempdir().unwrap();
        let ctx = AppContext::new(dir.path(), AppConfig::default(), true);
        let mut cached = records(3);
        cached[1].note = Some("Reception".into());
        ctx.snapshots().await.unwrap().save(&cached).await.unwrap();

        assert!(run(&ctx, None, Some("reception")).await.is_ok());
    }

    #[test]
    fn report_with_search_still_surfaces_error() {
        let view = FeedSnapshot {
            items: records(2),
            loading: false,
            error: Some(feed_client::LoadError::OfflineNoCache),
            has_more: false,
        };

        assert!(report(&view, 1, Some("cached")).is_err());
    }

    #[test]
    fn report_surfaces_error() {
        let view = FeedSnapshot {
            items: records(2),
            loading: false,
            error: Some(feed_client::LoadError::Fetch("HTTP error! status: 500".into())),
            has_more: true,
        };

        let err = report(&view, 2, None).unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }
}
