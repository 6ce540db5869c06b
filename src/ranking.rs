//! Genre popularity ranking.
//!
//! The genre collection is enumerated cursor by cursor (no total is known up
//! front), then every candidate gets a minimal count query, fanned out
//! concurrently. A failing count downgrades that one genre to zero instead
//! of aborting the batch.

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use tracing::warn;

use crate::catalog::{CatalogApi, GenreFilter};
use crate::models::Genre;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGenre {
    pub name: String,
    pub count: u64,
}

/// Follows the collection's `next` cursor until exhausted. A cursor that
/// repeats (a misbehaving upstream) stops the walk instead of spinning.
pub async fn all_genres(api: &dyn CatalogApi) -> Result<Vec<Genre>> {
    let mut genres = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();
    loop {
        let page = api.genre_page(cursor.as_deref()).await?;
        genres.extend(page.results);
        match page.next {
            Some(next) if seen.insert(next.clone()) => cursor = Some(next),
            Some(next) => {
                warn!("genre pagination cursor repeats ({next}), stopping the walk");
                break;
            }
            None => break,
        }
    }
    Ok(genres)
}

/// Number of titles in a genre, read from a minimal one-item page.
async fn genre_count(api: &dyn CatalogApi, name: &str) -> Result<u64> {
    let page = api
        .titles_in_genre(&GenreFilter::Name(name.to_string()), 1, 1)
        .await?;
    Ok(page.count.unwrap_or(page.results.len() as u64))
}

/// Ranks all genres by title count, descending, excluding `excluded` names
/// (case-insensitive). Takes the top `top_n` and drops empty genres.
pub async fn rank_genres(
    api: &dyn CatalogApi,
    excluded: &[String],
    top_n: usize,
) -> Result<Vec<RankedGenre>> {
    let all = all_genres(api).await?;

    let excluded: HashSet<String> = excluded.iter().map(|n| n.to_lowercase()).collect();
    let eligible: Vec<String> = all
        .into_iter()
        .map(|g| g.name)
        .filter(|name| !name.is_empty() && !excluded.contains(&name.to_lowercase()))
        .collect();

    let counts = join_all(eligible.iter().map(|name| async move {
        match genre_count(api, name).await {
            Ok(count) => count,
            Err(err) => {
                warn!(genre = %name, "count query failed, treating as empty: {err:#}");
                0
            }
        }
    }))
    .await;

    let mut ranked: Vec<RankedGenre> = eligible
        .into_iter()
        .zip(counts)
        .map(|(name, count)| RankedGenre { name, count })
        .collect();
    // Stable sort: enumeration order breaks ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked.retain(|g| g.count > 0);
    Ok(ranked)
}
