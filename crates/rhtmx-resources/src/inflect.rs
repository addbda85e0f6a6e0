//! Word inflection used to derive singular names, controllers and entities.
//!
//! The expander never hardcodes English: it asks an [`Inflector`] for the
//! singular of `posts`, the plural of `account`, or the entity identifier of
//! `blog_post`. [`EnglishInflector`] covers regular English plus the common
//! irregular and uncountable words, and can be extended per application.

use once_cell::sync::Lazy;
use regex::Regex;

/// Inflection capability injected into the expander
pub trait Inflector: Send + Sync {
    /// `posts` → `post`
    fn singularize(&self, word: &str) -> String;

    /// `account` → `accounts`
    fn pluralize(&self, word: &str) -> String;

    /// Entity identifier for a name: `blog_posts` → `BlogPost`
    fn classify(&self, word: &str) -> String {
        camelize(&self.singularize(word))
    }
}

// ============================================================================
// Rule Tables
// ============================================================================

fn rules(table: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
        .collect()
}

// Evaluated top to bottom, first match wins.
static PLURAL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    rules(&[
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)([ml])ouse$", "${1}ice"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(octop|vir)us$", "${1}i"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(buffal|tomat)o$", "${1}oes"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)sis$", "ses"),
        (r"(?i)([^f])fe$", "${1}ves"),
        (r"(?i)([lr])f$", "${1}ves"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)s$", "s"),
        (r"$", "s"),
    ])
});

static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    rules(&[
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en$", "${1}"),
        (r"(?i)(alias|status)es$", "${1}"),
        (r"(?i)(octop|vir)i$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)es$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)es$", "${1}"),
        (r"(?i)([ml])ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(analy|ba|diagno|parenthe|progno|synop|the)ses$", "${1}sis"),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ])
});

const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
];

const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
];

// ============================================================================
// English Inflector
// ============================================================================

/// Rule-based English inflector
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{EnglishInflector, Inflector};
///
/// let inflector = EnglishInflector::new();
/// assert_eq!(inflector.singularize("categories"), "category");
/// assert_eq!(inflector.pluralize("person"), "people");
/// assert_eq!(inflector.classify("blog_posts"), "BlogPost");
///
/// let inflector = EnglishInflector::new().with_irregular("octopus", "octopodes");
/// assert_eq!(inflector.pluralize("octopus"), "octopodes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnglishInflector {
    irregulars: Vec<(String, String)>,
    uncountables: Vec<String>,
}

impl EnglishInflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an irregular singular/plural pair (takes precedence over the built-ins)
    pub fn with_irregular(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.irregulars.push((singular.into(), plural.into()));
        self
    }

    /// Registers a word whose singular and plural forms are identical
    pub fn with_uncountable(mut self, word: impl Into<String>) -> Self {
        self.uncountables.push(word.into());
        self
    }

    fn is_uncountable(&self, word: &str) -> bool {
        let last = last_word(word).to_ascii_lowercase();
        self.uncountables.iter().any(|w| *w == last) || UNCOUNTABLES.contains(&last.as_str())
    }

    fn irregular_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.irregulars
            .iter()
            .map(|(s, p)| (s.as_str(), p.as_str()))
            .chain(IRREGULARS.iter().copied())
    }
}

impl Inflector for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        if word.is_empty() || self.is_uncountable(word) {
            return word.to_string();
        }
        for (singular, plural) in self.irregular_pairs() {
            if let Some(stem) = strip_last_word(word, plural) {
                return format!("{stem}{singular}");
            }
            if strip_last_word(word, singular).is_some() {
                return word.to_string();
            }
        }
        apply_rules(&SINGULAR_RULES, word)
    }

    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() || self.is_uncountable(word) {
            return word.to_string();
        }
        for (singular, plural) in self.irregular_pairs() {
            if let Some(stem) = strip_last_word(word, singular) {
                return format!("{stem}{plural}");
            }
            if strip_last_word(word, plural).is_some() {
                return word.to_string();
            }
        }
        apply_rules(&PLURAL_RULES, word)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn apply_rules(rules: &[(Regex, &'static str)], word: &str) -> String {
    rules
        .iter()
        .find(|(regex, _)| regex.is_match(word))
        .map(|(regex, replacement)| regex.replace(word, *replacement).into_owned())
        .unwrap_or_else(|| word.to_string())
}

fn last_word(word: &str) -> &str {
    word.rsplit(|c: char| c == '_' || c == '/').next().unwrap_or(word)
}

/// Returns the text before `last` when `last` is the final `_`/`/`-separated word
fn strip_last_word<'a>(word: &'a str, last: &str) -> Option<&'a str> {
    let stem = word.strip_suffix(last)?;
    (stem.is_empty() || stem.ends_with('_') || stem.ends_with('/')).then_some(stem)
}

/// `blog_post` → `BlogPost`, `admin/blog_post` → `Admin::BlogPost`
///
/// # Examples
///
/// ```
/// use rhtmx_resources::inflect::camelize;
///
/// assert_eq!(camelize("blog_post"), "BlogPost");
/// assert_eq!(camelize("admin/user"), "Admin::User");
/// ```
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(|part| {
                    let mut chars = part.chars();
                    chars
                        .next()
                        .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                        .unwrap_or_default()
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}
