//! Fixed lookup tables shared by the normalizer and the keyword extractor.
//!
//! Everything here is compile-time data: genre aliases, the language
//! inference lexicon, ISO country codes, and stop words. Callers query
//! through the lookup functions — the tables themselves are private.

/// Raw genre spellings that collapse to a canonical name.
/// Matching is case-insensitive after punctuation cleanup.
const GENRE_ALIASES: &[(&str, &str)] = &[
    ("sci-fi", "sci-fi"),
    ("sci fi", "sci-fi"),
    ("scifi", "sci-fi"),
    ("science", "sci-fi"),
    ("fiction", "sci-fi"),
    ("science fiction", "sci-fi"),
    ("science-fiction", "sci-fi"),
];

/// Map a cleaned genre token to its canonical spelling, or return it as-is.
pub fn canonical_genre(cleaned: &str) -> String {
    let lower = cleaned.to_lowercase();
    for &(alias, canonical) in GENRE_ALIASES {
        if lower == alias {
            return canonical.to_string();
        }
    }
    cleaned.to_string()
}

/// Language inference lexicon: a substring match of the key against a
/// lowercased title yields the language on the right.
pub const LANGUAGE_INFERENCES: &[(&str, &str)] = &[
    ("spanish", "Spanish"),
    ("french", "French"),
    ("german", "German"),
    ("korean", "Korean"),
    ("japanese", "Japanese"),
    ("chinese", "Chinese"),
    ("italian", "Italian"),
    ("portuguese", "Portuguese"),
    ("hindi", "Hindi"),
    ("russian", "Russian"),
    ("arabic", "Arabic"),
];

/// Full country name for a 2-letter ISO code (lowercased).
pub fn country_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "us" => "United States",
        "gb" | "uk" => "United Kingdom",
        "ca" => "Canada",
        "fr" => "France",
        "de" => "Germany",
        "jp" => "Japan",
        "kr" => "South Korea",
        "cn" => "China",
        "it" => "Italy",
        "es" => "Spain",
        "br" => "Brazil",
        "in" => "India",
        "mx" => "Mexico",
        "ar" => "Argentina",
        "au" => "Australia",
        "nz" => "New Zealand",
        "ru" => "Russia",
        "se" => "Sweden",
        "no" => "Norway",
        "dk" => "Denmark",
        "fi" => "Finland",
        "nl" => "Netherlands",
        "be" => "Belgium",
        "tr" => "Turkey",
        "ie" => "Ireland",
        "ch" => "Switzerland",
        "at" => "Austria",
        "pl" => "Poland",
        "cz" => "Czechia",
        "hu" => "Hungary",
        "gr" => "Greece",
        "pt" => "Portugal",
        "co" => "Colombia",
        "cl" => "Chile",
        "pe" => "Peru",
        "za" => "South Africa",
        "eg" => "Egypt",
        "ae" => "United Arab Emirates",
        "sa" => "Saudi Arabia",
        "il" => "Israel",
        "id" => "Indonesia",
        "th" => "Thailand",
        "vn" => "Vietnam",
        "ph" => "Philippines",
        "my" => "Malaysia",
        "sg" => "Singapore",
        "tw" => "Taiwan",
        "hk" => "Hong Kong",
        _ => return None,
    };
    Some(name)
}

/// Best-guess production country for a language code or name (lowercased).
pub fn country_for_language(lang: &str) -> Option<&'static str> {
    let name = match lang {
        "en" | "english" => "United States",
        "es" | "spanish" => "Spain",
        "pt" | "portuguese" => "Portugal",
        "fr" | "french" => "France",
        "de" | "german" => "Germany",
        "it" | "italian" => "Italy",
        "ja" | "japanese" => "Japan",
        "ko" | "korean" => "South Korea",
        "hi" | "hindi" => "India",
        "zh" | "chinese" => "China",
        "ru" | "russian" => "Russia",
        "sv" | "swedish" => "Sweden",
        "da" | "danish" => "Denmark",
        "fi" | "finnish" => "Finland",
        "no" | "norwegian" => "Norway",
        "nl" | "dutch" => "Netherlands",
        "tr" | "turkish" => "Turkey",
        "ar" | "arabic" => "United Arab Emirates",
        "th" | "thai" => "Thailand",
        "id" | "indonesian" => "Indonesia",
        "pl" | "polish" => "Poland",
        _ => return None,
    };
    Some(name)
}

/// Stop words excluded from keyword tables. Domain-tuned: alongside the
/// usual function words it drops catalog boilerplate ("series", "season",
/// "limited") that would otherwise dominate every group.
pub fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "the" | "a" | "an" | "of" | "in" | "on" | "at" | "to" | "for" | "and"
        | "or" | "is" | "are" | "was" | "were" | "be" | "been" | "has" | "have"
        | "had" | "with" | "from" | "by" | "this" | "that" | "will" | "who"
        | "what" | "when" | "where" | "how" | "their" | "into" | "out" | "about"
        | "after" | "his" | "her" | "she" | "they" | "them" | "series" | "movie"
        | "season" | "limited" | "some" | "life" | "world" | "every" | "story"
        | "while" | "being" | "more"
    )
}

/// Language names excluded from keyword tables (they echo the grouping).
pub fn is_language_word(word: &str) -> bool {
    matches!(
        word,
        "english" | "spanish" | "french" | "german" | "korean" | "japanese"
        | "chinese" | "italian" | "portuguese" | "hindi" | "russian" | "arabic"
    )
}
