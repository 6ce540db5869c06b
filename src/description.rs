//! Best-effort description resolution.
//!
//! Inline list fields are tried first; when they are absent or placeholder
//! text, the title detail is fetched once and the same preference order is
//! applied to it. "Present but meaningless" and "absent" are distinct
//! terminal states: the modal resolver picks its fallback message from which
//! one was observed.

use tracing::debug;

use crate::catalog::CatalogApi;
use crate::models::{TitleRef, TitleSummary};
use crate::text::{is_placeholder, normalize};

/// Shown when some text was observed but all of it was placeholder noise.
pub const NO_DESCRIPTION_MESSAGE: &str = "Description does not currently exist.";
/// Shown when no text was observed at all.
pub const MISSING_DATA_MESSAGE: &str = "Description data is missing.";

/// Long description wins over the short one; the first normalized candidate
/// that is non-empty and not a placeholder is returned. `saw_text` records
/// whether any non-empty text (placeholder included) was seen.
fn first_usable(long: Option<&str>, short: Option<&str>, saw_text: &mut bool) -> Option<String> {
    for raw in [long, short] {
        let value = normalize(raw.unwrap_or(""));
        if value.is_empty() {
            continue;
        }
        *saw_text = true;
        if !is_placeholder(&value) {
            return Some(value);
        }
    }
    None
}

async fn resolve(api: &dyn CatalogApi, item: &TitleSummary) -> (Option<String>, bool) {
    let mut saw_text = false;
    if let Some(text) = first_usable(
        item.long_description.as_deref(),
        item.description.as_deref(),
        &mut saw_text,
    ) {
        return (Some(text), saw_text);
    }

    match api.title_detail(TitleRef::BySummary(item)).await {
        Ok(detail) => {
            if let Some(text) = first_usable(
                detail.long_description.as_deref(),
                detail.description.as_deref(),
                &mut saw_text,
            ) {
                return (Some(text), saw_text);
            }
        }
        Err(err) => {
            debug!(id = item.id, "detail fetch for description failed: {err:#}");
        }
    }
    (None, saw_text)
}

/// Grid context: empty string means "omit the blurb", silently.
pub async fn meaningful_description(api: &dyn CatalogApi, item: &TitleSummary) -> String {
    resolve(api, item).await.0.unwrap_or_default()
}

/// Modal context: always returns something user-facing.
pub async fn sanitized_description(api: &dyn CatalogApi, item: &TitleSummary) -> String {
    match resolve(api, item).await {
        (Some(text), _) => text,
        (None, true) => NO_DESCRIPTION_MESSAGE.to_string(),
        (None, false) => MISSING_DATA_MESSAGE.to_string(),
    }
}
