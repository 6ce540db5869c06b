//! Composition root: builds the HTTP client, the poster cache, and the
//! render sinks, then drives the home-page sections in order.

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{CatalogApi, CatalogClient, DEFAULT_API_BASE};
use crate::description::sanitized_description;
use crate::detail_format::{
    format_gross, imdb_line, join_names, rated_runtime_line, year_genres_line,
};
use crate::grid::{RenderSink, ToggleState};
use crate::models::{TitleRef, TitleSummary};
use crate::posters::{HttpImageProbe, ImageProbe, PosterCache, PosterResolver, PosterUrls};
use crate::sections::{
    pick_best_film, FixedGenreSection, GenreMenuSection, TopRatedSection, RANKED_MENU_SIZE,
};

/// Width assumed by the headless renderer; sections re-render on resize
/// events when a real front end drives them.
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Render sink that logs cards instead of touching a DOM.
struct ConsoleSink {
    label: &'static str,
}

impl ConsoleSink {
    fn boxed(label: &'static str) -> Box<dyn RenderSink> {
        Box::new(Self { label })
    }
}

impl RenderSink for ConsoleSink {
    fn render(&mut self, visible: &[TitleSummary], toggle: ToggleState) {
        info!(
            section = self.label,
            cards = visible.len(),
            expanded = toggle.expanded,
            toggle_shown = toggle.visible,
            "render"
        );
        for item in visible {
            info!(section = self.label, id = item.id, title = %item.title, "card");
        }
    }
}

pub struct Config {
    pub api_base: String,
    pub genre_one: String,
    pub genre_two: String,
}

impl Config {
    pub fn from_env() -> Self {
        let config = Self {
            api_base: env::var("CATALOG_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            genre_one: env::var("CATALOG_GENRE_ONE").unwrap_or_else(|_| "Mystery".to_string()),
            genre_two: env::var("CATALOG_GENRE_TWO").unwrap_or_else(|_| "Action".to_string()),
        };
        info!(
            api_base = %config.api_base,
            genre_one = %config.genre_one,
            genre_two = %config.genre_two,
            "Catalog configuration resolved"
        );
        config
    }
}

pub async fn run(config: Config) -> Result<()> {
    let client = CatalogClient::new(&config.api_base)?;
    let http = client.http_client();
    let api: Arc<dyn CatalogApi> = Arc::new(client);

    let urls = PosterUrls::new(&config.api_base);
    let cache = Arc::new(PosterCache::new(urls.clone()));
    let probe: Arc<dyn ImageProbe> = Arc::new(HttpImageProbe::new(http));
    let posters = PosterResolver::new(urls, probe, cache);

    let width = DEFAULT_VIEWPORT_WIDTH;

    // 1) Best film hero.
    let best = match pick_best_film(api.as_ref(), &posters).await {
        Ok(best) => best,
        Err(err) => {
            warn!("best film init failed: {err:#}");
            None
        }
    };
    match &best {
        Some(best) => {
            info!(id = best.movie.id, title = %best.movie.title, "Best film");
            info!("{}", best.blurb);
            info!(poster = %best.poster_url, "Best film poster");
        }
        None => info!("No best film with a usable poster and description"),
    }

    // 2) Top rated, excluding the hero.
    let mut top_rated =
        TopRatedSection::new(api.clone(), ConsoleSink::boxed("top-rated"), width);
    top_rated.load(best.as_ref().map(|b| b.movie.id)).await;

    // 3) Two pinned genre sections.
    let mut genre_one = FixedGenreSection::new(
        api.clone(),
        config.genre_one.clone(),
        ConsoleSink::boxed("genre-one"),
        width,
    );
    genre_one.load().await;
    let mut genre_two = FixedGenreSection::new(
        api.clone(),
        config.genre_two.clone(),
        ConsoleSink::boxed("genre-two"),
        width,
    );
    genre_two.load().await;

    // 4) Ranked "others" menu, excluding the pinned genres.
    let mut menu = GenreMenuSection::new(api.clone(), ConsoleSink::boxed("others"), width);
    let excluded = vec![config.genre_one, config.genre_two];
    menu.build(&excluded, RANKED_MENU_SIZE).await;
    if menu.has_genres() {
        for entry in &menu.entries {
            info!(genre = %entry.name, count = entry.count, "ranked genre");
        }
    }

    // Resolve posters for the visible top-rated cards, as the grid would.
    let top_items: Vec<TitleSummary> = top_rated.grid.items().to_vec();
    for item in &top_items {
        let url = posters.resolve(item).await;
        info!(id = item.id, poster = %url, "poster resolved");
    }

    // Detail view for the hero, the way the modal renders it.
    if let Some(best) = &best {
        log_detail_view(api.as_ref(), &posters, &best.movie).await;
    }

    Ok(())
}

/// Modal-equivalent output: detail fields with their display formatting.
async fn log_detail_view(api: &dyn CatalogApi, posters: &PosterResolver, movie: &TitleSummary) {
    let detail = match api.title_detail(TitleRef::BySummary(movie)).await {
        Ok(detail) => detail,
        Err(err) => {
            warn!(id = movie.id, "detail fetch failed: {err:#}");
            return;
        }
    };
    info!(title = %detail.title, "{}", year_genres_line(&detail));
    info!("{}", rated_runtime_line(&detail));
    info!("IMDb: {}", imdb_line(&detail));
    info!("Box office: {}", format_gross(&detail));
    info!("Directors: {}", join_names(&detail.directors));
    info!("Actors: {}", join_names(&detail.actors));
    info!("Synopsis: {}", sanitized_description(api, movie).await);
    // Cache hit from the hero render; no re-probe.
    info!("Poster: {}", posters.resolve(movie).await);
}
