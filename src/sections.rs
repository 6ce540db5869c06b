//! Home-page sections: best film, top rated, pinned genres, and the ranked
//! genre menu. Every section init catches its own failures and leaves the
//! grid in a defined empty state; raw errors never reach a sink.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::{CatalogApi, GenreFilter};
use crate::description::meaningful_description;
use crate::grid::{GridSection, RenderSink, GRID_MAX};
use crate::models::TitleSummary;
use crate::posters::PosterResolver;
use crate::ranking::{rank_genres, RankedGenre};
use crate::text::truncate;

/// Top-rated pool scanned for the best-film pick.
pub const BEST_FILM_POOL: usize = 15;
/// Cap on per-candidate description probes during that scan.
pub const BEST_FILM_MAX_CHECKS: usize = 10;
/// Extra titles fetched so the grid stays full after exclusion.
pub const TOP_RATED_HEADROOM: usize = 10;
/// Blurb length for the hero section.
pub const BLURB_MAX: usize = 240;
/// Entries exposed by the ranked genre menu.
pub const RANKED_MENU_SIZE: usize = 8;

/// Removes one title id from a list (the best film is excluded from the
/// top-rated grid).
pub fn filter_out_id(list: Vec<TitleSummary>, id: Option<u64>) -> Vec<TitleSummary> {
    match id {
        Some(id) => list.into_iter().filter(|t| t.id != id).collect(),
        None => list,
    }
}

pub struct BestFilm {
    pub movie: TitleSummary,
    pub blurb: String,
    pub poster_url: String,
}

/// Picks the first top-rated title with a non-empty meaningful description,
/// probing at most `BEST_FILM_MAX_CHECKS` candidates. `None` means no
/// candidate qualified; the caller renders a graceful fallback.
pub async fn pick_best_film(
    api: &dyn CatalogApi,
    posters: &PosterResolver,
) -> Result<Option<BestFilm>> {
    let page = api.top_rated(BEST_FILM_POOL, 1).await?;
    for candidate in page.results.into_iter().take(BEST_FILM_MAX_CHECKS) {
        let blurb = meaningful_description(api, &candidate).await;
        if blurb.is_empty() {
            continue;
        }
        let poster_url = posters.resolve(&candidate).await;
        return Ok(Some(BestFilm {
            blurb: truncate(&blurb, BLURB_MAX),
            poster_url,
            movie: candidate,
        }));
    }
    Ok(None)
}

pub struct TopRatedSection {
    api: Arc<dyn CatalogApi>,
    pub grid: GridSection,
}

impl TopRatedSection {
    pub fn new(api: Arc<dyn CatalogApi>, sink: Box<dyn RenderSink>, width: u32) -> Self {
        Self {
            api,
            grid: GridSection::new(sink, width),
        }
    }

    pub async fn load(&mut self, exclude_id: Option<u64>) {
        match self.api.top_rated(GRID_MAX + TOP_RATED_HEADROOM, 1).await {
            Ok(page) => {
                let mut items = filter_out_id(page.results, exclude_id);
                items.truncate(GRID_MAX);
                self.grid.set_items(items);
            }
            Err(err) => {
                error!("top rated fetch failed: {err:#}");
                self.grid.set_items(Vec::new());
            }
        }
    }
}

pub struct FixedGenreSection {
    api: Arc<dyn CatalogApi>,
    pub genre_name: String,
    pub grid: GridSection,
}

impl FixedGenreSection {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        genre_name: String,
        sink: Box<dyn RenderSink>,
        width: u32,
    ) -> Self {
        Self {
            api,
            genre_name,
            grid: GridSection::new(sink, width),
        }
    }

    pub async fn load(&mut self) {
        let filter = GenreFilter::Name(self.genre_name.clone());
        match self.api.titles_in_genre(&filter, GRID_MAX, 1).await {
            Ok(page) => {
                let mut items = page.results;
                items.truncate(GRID_MAX);
                self.grid.set_items(items);
            }
            Err(err) => {
                error!(genre = %self.genre_name, "genre fetch failed: {err:#}");
                self.grid.set_items(Vec::new());
            }
        }
    }
}

/// The "others" menu: ranked genres plus the grid of the active selection.
pub struct GenreMenuSection {
    api: Arc<dyn CatalogApi>,
    pub grid: GridSection,
    pub entries: Vec<RankedGenre>,
    pub active: Option<String>,
}

impl GenreMenuSection {
    pub fn new(api: Arc<dyn CatalogApi>, sink: Box<dyn RenderSink>, width: u32) -> Self {
        Self {
            api,
            grid: GridSection::new(sink, width),
            entries: Vec::new(),
            active: None,
        }
    }

    /// Runs the ranking aggregation once and activates the top entry. An
    /// empty result is the explicit "no genres available" state.
    pub async fn build(&mut self, excluded: &[String], top_n: usize) {
        match rank_genres(self.api.as_ref(), excluded, top_n).await {
            Ok(ranked) => self.entries = ranked,
            Err(err) => {
                error!("genre ranking failed: {err:#}");
                self.entries = Vec::new();
            }
        }
        match self.entries.first().map(|g| g.name.clone()) {
            Some(first) => self.select(&first).await,
            None => {
                info!("no genres available for the ranked menu");
                self.active = None;
                self.grid.set_items(Vec::new());
            }
        }
    }

    /// Switches the active genre and reloads the grid. Never re-runs the
    /// ranking aggregation.
    pub async fn select(&mut self, name: &str) {
        self.active = Some(name.to_string());
        let filter = GenreFilter::Name(name.to_string());
        match self.api.titles_in_genre(&filter, GRID_MAX, 1).await {
            Ok(page) => {
                let mut items = page.results;
                items.truncate(GRID_MAX);
                self.grid.set_items(items);
            }
            Err(err) => {
                error!(genre = %name, "genre titles fetch failed: {err:#}");
                self.grid.set_items(Vec::new());
            }
        }
    }

    pub fn has_genres(&self) -> bool {
        !self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_out_id_removes_only_the_matching_title() {
        let list: Vec<TitleSummary> = [1u64, 2, 3]
            .iter()
            .map(|&id| TitleSummary {
                id,
                ..Default::default()
            })
            .collect();
        let kept = filter_out_id(list.clone(), Some(2));
        let ids: Vec<u64> = kept.iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(filter_out_id(list, None).len(), 3);
    }
}
