//! Value-weighted keyword tables over grouped title/summary text.
//!
//! Each surviving token accumulates the entry's metric value, so ranking
//! favors terms attached to heavily-watched titles rather than merely
//! frequent ones. Tables are kept at two granularities and queried with a
//! language-first fallback.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::algo::lexicon;
use crate::algo::normalize::{Category, Entry};

/// Per-token tally inside one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenStat {
    pub count: u32,
    /// Sum of the metric value of every entry occurrence of the token.
    pub weight: f64,
}

type GenreKey = (Category, String);
type LanguageKey = (Category, String, String);

/// Keyword tables keyed by (Category, Genre) and (Category, Genre, Language).
/// Token order inside a group is first-seen, which doubles as the tie-break
/// for ranking.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    genre_groups: IndexMap<GenreKey, IndexMap<String, TokenStat>>,
    language_groups: IndexMap<LanguageKey, IndexMap<String, TokenStat>>,
}

/// Lowercase word tokens: longer than 3 chars, purely alphabetic.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .unicode_words()
        .filter(|w| w.len() > 3 && w.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_string)
        .collect()
}

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Replace HTML markup with spaces so adjacent words stay separated.
fn strip_html(text: &str) -> String {
    html_tag_regex().replace_all(text, " ").into_owned()
}

impl KeywordIndex {
    /// Build both tables in one pass over the entries.
    pub fn build(entries: &[Entry]) -> Self {
        let mut index = Self::default();
        for entry in entries {
            let mut text_parts: Vec<String> = Vec::new();
            if entry.category.is_episodic() {
                if let Some(summary) = &entry.summary {
                    text_parts.push(strip_html(summary));
                }
            }
            if !entry.title.is_empty() {
                text_parts.push(entry.title.clone());
            }
            if text_parts.is_empty() {
                continue;
            }

            // A single-token title would echo itself into its own keyword
            // list; suppress that exact token for this entry.
            let title_tokens = tokenize(&entry.title);
            let own_token = if title_tokens.len() == 1 {
                Some(title_tokens[0].clone())
            } else {
                None
            };

            let words: Vec<String> = tokenize(&text_parts.join(" "))
                .into_iter()
                .filter(|w| !lexicon::is_stopword(w) && !lexicon::is_language_word(w))
                .filter(|w| own_token.as_deref() != Some(w.as_str()))
                .collect();

            let genre_key = (entry.category, entry.primary_genre.clone());
            let language_key = (
                entry.category,
                entry.primary_genre.clone(),
                entry.language.clone(),
            );

            let table = index.genre_groups.entry(genre_key).or_default();
            for word in &words {
                let stat = table.entry(word.clone()).or_default();
                stat.count += 1;
                stat.weight += entry.value;
            }

            let table = index.language_groups.entry(language_key).or_default();
            for word in &words {
                let stat = table.entry(word.clone()).or_default();
                stat.count += 1;
                stat.weight += entry.value;
            }
        }
        index
    }

    /// Top `limit` tokens for a group, heaviest first.
    ///
    /// Prefers the language-level table when it exists and is non-empty,
    /// otherwise the genre-level one; a missing group yields an empty list.
    /// The genre's own name is excluded. Stable for identical inputs.
    pub fn top_keywords(
        &self,
        category: Category,
        genre: &str,
        language: Option<&str>,
        limit: usize,
    ) -> Vec<String> {
        let table = language
            .and_then(|lang| {
                self.language_groups
                    .get(&(category, genre.to_string(), lang.to_string()))
            })
            .filter(|t| !t.is_empty())
            .or_else(|| self.genre_groups.get(&(category, genre.to_string())));
        let Some(table) = table else {
            return Vec::new();
        };

        let genre_lower = genre.to_lowercase();
        let mut ranked: Vec<(&str, f64)> = table
            .iter()
            .filter(|(token, _)| token.as_str() != genre_lower)
            .map(|(token, stat)| (token.as_str(), stat.weight))
            .collect();
        // Stable sort: ties keep first-seen order, no secondary key.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked.into_iter().map(|(t, _)| t.to_string()).collect()
    }
}
