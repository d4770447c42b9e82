//! Canonicalizes one raw heterogeneous record into a typed [`Entry`].
//!
//! Source schemas disagree on field names, so every attribute is resolved
//! through an ordered candidate list; every malformed value degrades to a
//! documented default instead of failing. The whole module is pure — same
//! record in, same entry out.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::algo::lexicon;

/// Top-level content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Single-release titles.
    Movie,
    /// Episodic titles.
    #[serde(rename = "TV")]
    Tv,
}

impl Category {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Tv => "TV",
        }
    }

    /// Episodic titles carry descriptive summaries worth mining for keywords.
    pub fn is_episodic(&self) -> bool {
        matches!(self, Self::Tv)
    }
}

/// Which viewing metric the pipeline aggregates. Each mode has its own
/// ordered list of acceptable source field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricMode {
    /// Total time spent watching.
    Hours,
    /// Number of times playback started.
    Views,
}

impl MetricMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hours" => Some(Self::Hours),
            "views" => Some(Self::Views),
            _ => None,
        }
    }

    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Hours => &[
                "Watch Time",
                "watch_time",
                "WatchTime",
                "Hours Viewed",
                "hours_viewed",
                "HoursViewed",
            ],
            Self::Views => &["View Count", "view_count", "ViewCount", "Views", "views"],
        }
    }
}

/// One normalized catalog record. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub category: Category,
    pub language: String,
    /// Never empty; defaults to `["Unspecified"]`.
    pub genres: Vec<String>,
    pub primary_genre: String,
    /// Active-mode metric; always >= 0.
    pub value: f64,
    pub release_year: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub title: String,
    pub country: String,
    pub poster: Option<String>,
    pub summary: Option<String>,
}

const LANGUAGE_FIELDS: &[&str] = &["originalLanguage", "language", "Language", "TMDBLanguage"];
const GENRE_FIELDS: &[&str] = &["TMDBGenres", "genres", "Genres"];
const TITLE_FIELDS: &[&str] = &[
    "TitleCanonical",
    "Title",
    "primaryTitle",
    "originalTitle",
    "name",
];
const YEAR_FIELDS: &[&str] = &["ReleaseYear", "Release Date", "startYear", "premiered"];
const RUNTIME_FIELDS: &[&str] = &["Runtime", "runtimeMinutes", "averageRuntime", "runtime"];
const COUNTRY_FIELDS: &[&str] = &[
    "country",
    "Country",
    "dvdCountry",
    "network.country",
    "TMDBCountry",
];
const POSTER_FIELDS: &[&str] = &["TMDBPoster", "poster"];
const SUMMARY_FIELDS: &[&str] = &["summary", "Summary"];

/// Canonicalize one raw record. Never fails; see module docs.
pub fn normalize_record(row: &Value, category: Category, mode: MetricMode) -> Entry {
    let title = sanitize_title(&first_text(row, TITLE_FIELDS).unwrap_or_default());
    let language = language_of(row, &title);
    let genres = genres_of(row);
    let primary_genre = genres[0].clone();
    let value = metric_value(row, mode);
    let release_year = release_year_of(row, &title);
    let runtime_minutes = RUNTIME_FIELDS
        .iter()
        .find_map(|f| row.get(*f).and_then(runtime_from_value));
    let country = country_of(row);
    let poster = poster_of(row);
    let summary = first_text(row, SUMMARY_FIELDS);

    Entry {
        category,
        language,
        genres,
        primary_genre,
        value,
        release_year,
        runtime_minutes,
        title,
        country,
        poster,
        summary,
    }
}

/// First candidate field whose value renders to a non-empty trimmed string.
fn first_text(row: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|f| {
        let text = match row.get(*f)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    })
}

/// Coerce a JSON value to a number; unparseable input becomes NaN so the
/// caller can apply its own default.
fn to_number(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            cleaned.trim().parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Resolve the active metric from the mode's candidate list.
/// Non-finite or negative values degrade to 0.
pub fn metric_value(row: &Value, mode: MetricMode) -> f64 {
    let num = mode
        .candidates()
        .iter()
        .find_map(|f| row.get(*f))
        .map(to_number)
        .unwrap_or(f64::NAN);
    if num.is_finite() && num >= 0.0 {
        num
    } else {
        0.0
    }
}

/// Parse a runtime string into whole minutes.
///
/// Accepts "H:MM:SS"-style clock strings (seconds are floored away) and bare
/// numeric strings (rounded to nearest). Anything non-positive or
/// unparseable yields `None`.
pub fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.contains(':') {
        let parts: Option<Vec<u32>> = s.split(':').map(|p| p.trim().parse().ok()).collect();
        if let Some(parts) = parts {
            let h = parts.first().copied().unwrap_or(0);
            let m = parts.get(1).copied().unwrap_or(0);
            let sec = parts.get(2).copied().unwrap_or(0);
            let total = h * 60 + m + sec / 60;
            return if total > 0 { Some(total) } else { None };
        }
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let num: f64 = cleaned.parse().ok()?;
    if num.is_finite() && num > 0.0 {
        Some(num.round() as u32)
    } else {
        None
    }
}

fn runtime_from_value(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => {
            let f = n.as_f64()?;
            if f.is_finite() && f > 0.0 {
                Some(f.round() as u32)
            } else {
                None
            }
        }
        Value::String(s) => parse_runtime_minutes(s),
        _ => None,
    }
}

/// Strip editorial noise from a title: `//` suffixes, underscores, trailing
/// colons, and runs of whitespace.
pub fn sanitize_title(raw: &str) -> String {
    let s = match raw.find("//") {
        Some(i) => &raw[..i],
        None => raw,
    };
    let s = s.replace('_', " ");
    let s = s.trim_end().trim_end_matches(':');
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn language_of(row: &Value, title: &str) -> String {
    if let Some(lang) = first_text(row, LANGUAGE_FIELDS) {
        return lang;
    }
    if !title.is_empty() {
        let lower = title.to_lowercase();
        for &(key, name) in lexicon::LANGUAGE_INFERENCES {
            if lower.contains(key) {
                return name.to_string();
            }
        }
        if title.chars().any(|c| !c.is_ascii()) {
            return "Non-English".to_string();
        }
    }
    "English".to_string()
}

fn clean_genre(g: &str) -> String {
    g.chars()
        .filter(|c| !matches!(c, '(' | ')' | '.' | ',' | ';' | '!' | '?' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

fn genres_of(row: &Value) -> Vec<String> {
    let raw = first_text(row, GENRE_FIELDS).unwrap_or_else(|| "Unspecified".to_string());
    let genres: Vec<String> = raw
        .split([',', '|', '/', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|g| lexicon::canonical_genre(&clean_genre(g)))
        .filter(|g| !g.is_empty())
        .collect();
    if genres.is_empty() {
        vec!["Unspecified".to_string()]
    } else {
        genres
    }
}

fn title_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year regex"))
}

fn release_year_of(row: &Value, title: &str) -> Option<String> {
    if let Some(y) = first_text(row, YEAR_FIELDS) {
        let year: String = y.chars().take(4).collect();
        if !year.is_empty() {
            return Some(year);
        }
    }
    title_year_regex()
        .find(title)
        .map(|m| m.as_str().to_string())
}

/// Normalize a multi-country string: split on separators, expand 2-letter
/// ISO codes, leave longer tokens untouched, rejoin with ", ".
pub fn normalize_country(raw: &str) -> String {
    raw.split([',', '/', '|', ';'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p.chars().count() == 2 {
                lexicon::country_name(&p.to_lowercase())
                    .map(str::to_string)
                    .unwrap_or_else(|| p.to_string())
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn country_of(row: &Value) -> String {
    let mapped = first_text(row, COUNTRY_FIELDS)
        .map(|c| normalize_country(&c))
        .unwrap_or_default();
    if !mapped.is_empty() {
        return mapped;
    }
    if let Some(lang) = first_text(row, LANGUAGE_FIELDS) {
        if let Some(c) = lexicon::country_for_language(&lang.to_lowercase()) {
            return c.to_string();
        }
    }
    "Unknown".to_string()
}

fn poster_of(row: &Value) -> Option<String> {
    let raw = first_text(row, POSTER_FIELDS)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Some(trimmed.to_string()),
        _ => None,
    }
}
