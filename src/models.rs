use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Score and vote fields arrive as strings from some list endpoints and as
/// numbers from others; both are kept as opaque display strings. Any other
/// shape is a data anomaly and resolves to absent rather than failing the
/// whole page.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// List-context payload for a title. Identity is `id`; every other field may
/// be missing or carry placeholder text, which is the resolvers' problem.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TitleSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub imdb_score: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub votes: Option<String>,
    /// Literal detail URL handed out by the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
    /// IMDb page hint, forwarded to the poster proxy as a resolution aid.
    #[serde(default)]
    pub imdb_url: Option<String>,
}

/// Single-item payload: a superset of the summary. Gross-income fields live
/// under inconsistent keys upstream, so anything unknown is kept in `extra`
/// for the display-formatting key probe.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TitleDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub imdb_score: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub votes: Option<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub rated: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub imdb_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a title list. `count` is the collection total when the API
/// sends it; `next` is an absolute cursor URL.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TitlePage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<TitleSummary>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Genre {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GenrePage {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<Genre>,
}

/// Explicit reference for a detail fetch: either a bare id or a summary whose
/// `url` field takes precedence. Replaces duck-typed "item or id" parameters.
#[derive(Debug, Clone, Copy)]
pub enum TitleRef<'a> {
    ById(u64),
    BySummary(&'a TitleSummary),
}
