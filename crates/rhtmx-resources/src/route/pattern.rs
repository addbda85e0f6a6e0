//! Path patterns for generated resource routes
//!
//! A pattern is static text, `:name` placeholders and `( … )` optional
//! groups, e.g. `/posts/:id/edit(.:format)`. Parsing, matching and URL
//! generation are pure functions of the pattern and their input.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::ResourceError;

/// One parsed piece of a pattern
///
/// # Examples
///
/// ```
/// use rhtmx_resources::route::pattern::{PathPattern, PatternSegment};
///
/// let pattern = PathPattern::parse("/posts/:id(.:format)").unwrap();
/// assert_eq!(pattern.segments()[0], PatternSegment::Static("/posts/".to_string()));
/// assert_eq!(pattern.segments()[1], PatternSegment::Param("id".to_string()));
/// assert!(matches!(pattern.segments()[2], PatternSegment::Optional(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text, matched exactly
    Static(String),
    /// `:name` placeholder, matches one or more characters other than `/` and `.`
    Param(String),
    /// `( … )` group that may be absent
    Optional(Vec<PatternSegment>),
}

/// Parsed route pattern
///
/// # Examples
///
/// ```
/// use rhtmx_resources::PathPattern;
///
/// let pattern = PathPattern::parse("/posts/:id(.:format)").unwrap();
///
/// let params = pattern.matches("/posts/42").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
/// assert_eq!(params.get("format"), None);
///
/// let params = pattern.matches("/posts/42.json").unwrap();
/// assert_eq!(params.get("format"), Some(&"json".to_string()));
///
/// assert_eq!(pattern.required_params(), vec!["id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parses a pattern string
    pub fn parse(source: &str) -> Result<Self, ResourceError> {
        let mut chars = source.char_indices().peekable();
        let segments = parse_segments(source, &mut chars, 0)?;
        Ok(PathPattern {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Every placeholder name, in pattern order
    pub fn param_names(&self) -> Vec<&str> {
        fn collect<'a>(segments: &'a [PatternSegment], out: &mut Vec<&'a str>) {
            for segment in segments {
                match segment {
                    PatternSegment::Param(name) => out.push(name),
                    PatternSegment::Optional(inner) => collect(inner, out),
                    PatternSegment::Static(_) => {}
                }
            }
        }
        let mut names = Vec::new();
        collect(&self.segments, &mut names);
        names
    }

    /// Placeholders outside optional groups, which every URL must supply
    pub fn required_params(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                PatternSegment::Param(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Matches a request path, returning the captured placeholders
    ///
    /// Optional groups may be present or absent; absent placeholders are
    /// simply missing from the result.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        match_segments(&self.segments, &[], path, HashMap::new())
    }

    /// Builds a URL from placeholder values
    ///
    /// Returns `None` when a required placeholder is missing. An optional
    /// group is emitted only when it has placeholders and all of them are
    /// supplied, so `(.:format)` disappears without a `format` value and
    /// `(/index)` is never emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_resources::PathPattern;
    /// use std::collections::HashMap;
    ///
    /// let pattern = PathPattern::parse("/posts(/index)(.:format)").unwrap();
    /// assert_eq!(pattern.generate(&HashMap::new()).unwrap(), "/posts");
    ///
    /// let mut params = HashMap::new();
    /// params.insert("format".to_string(), "xml".to_string());
    /// assert_eq!(pattern.generate(&params).unwrap(), "/posts.xml");
    /// ```
    pub fn generate(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut url = String::new();
        render_segments(&self.segments, params, &mut url)?;
        Some(url)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

// ============================================================================
// Parsing
// ============================================================================

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn parse_segments(
    source: &str,
    chars: &mut Chars<'_>,
    depth: usize,
) -> Result<Vec<PatternSegment>, ResourceError> {
    let invalid = |reason: &str| ResourceError::InvalidPattern {
        pattern: source.to_string(),
        reason: reason.to_string(),
    };

    let mut segments = Vec::new();
    let mut text = String::new();

    while let Some((_, c)) = chars.next() {
        match c {
            '(' => {
                flush_static(&mut text, &mut segments);
                let inner = parse_segments(source, chars, depth + 1)?;
                if inner.is_empty() {
                    return Err(invalid("empty optional group"));
                }
                segments.push(PatternSegment::Optional(inner));
            }
            ')' if depth == 0 => return Err(invalid("unmatched ')'")),
            ')' => {
                flush_static(&mut text, &mut segments);
                return Ok(segments);
            }
            ':' => {
                flush_static(&mut text, &mut segments);
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(invalid("placeholder without a name"));
                }
                segments.push(PatternSegment::Param(name));
            }
            _ => text.push(c),
        }
    }

    if depth > 0 {
        return Err(invalid("unclosed '('"));
    }
    flush_static(&mut text, &mut segments);
    Ok(segments)
}

fn flush_static(text: &mut String, segments: &mut Vec<PatternSegment>) {
    if !text.is_empty() {
        segments.push(PatternSegment::Static(std::mem::take(text)));
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Backtracking matcher
///
/// `segments` is the sequence being consumed; `rest` holds what follows the
/// enclosing optional groups, so a group can be tried both present and
/// absent against the remainder of the pattern.
fn match_segments(
    segments: &[PatternSegment],
    rest: &[&PatternSegment],
    path: &str,
    params: HashMap<String, String>,
) -> Option<HashMap<String, String>> {
    let Some((first, tail)) = segments.split_first() else {
        return match rest.split_first() {
            Some((next, after)) => match_segments(std::slice::from_ref(*next), after, path, params),
            None if path.is_empty() => Some(params),
            None => None,
        };
    };

    match first {
        PatternSegment::Static(text) => {
            let remaining = path.strip_prefix(text.as_str())?;
            match_segments(tail, rest, remaining, params)
        }
        PatternSegment::Param(name) => {
            let max = path
                .find(|c: char| c == '/' || c == '.')
                .unwrap_or(path.len());
            // Longest capture first
            let ends: Vec<usize> = path[..max]
                .char_indices()
                .map(|(i, c)| i + c.len_utf8())
                .collect();
            ends.into_iter().rev().find_map(|len| {
                let mut captured = params.clone();
                captured.insert(name.clone(), path[..len].to_string());
                match_segments(tail, rest, &path[len..], captured)
            })
        }
        PatternSegment::Optional(inner) => {
            let continuation: Vec<&PatternSegment> = tail.iter().chain(rest.iter().copied()).collect();
            match_segments(inner, &continuation, path, params.clone())
                .or_else(|| match_segments(tail, rest, path, params))
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

fn render_segments(
    segments: &[PatternSegment],
    params: &HashMap<String, String>,
    out: &mut String,
) -> Option<()> {
    for segment in segments {
        match segment {
            PatternSegment::Static(text) => out.push_str(text),
            PatternSegment::Param(name) => out.push_str(params.get(name)?),
            PatternSegment::Optional(inner) => {
                let mut group = String::new();
                let has_params = inner_has_params(inner);
                if has_params && render_segments(inner, params, &mut group).is_some() {
                    out.push_str(&group);
                }
            }
        }
    }
    Some(())
}

fn inner_has_params(segments: &[PatternSegment]) -> bool {
    segments.iter().any(|segment| match segment {
        PatternSegment::Param(_) => true,
        PatternSegment::Optional(inner) => inner_has_params(inner),
        PatternSegment::Static(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_nested_groups() {
        let pattern = PathPattern::parse("/a(/b(/:c))").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Static("/a".to_string()),
                PatternSegment::Optional(vec![
                    PatternSegment::Static("/b".to_string()),
                    PatternSegment::Optional(vec![
                        PatternSegment::Static("/".to_string()),
                        PatternSegment::Param("c".to_string()),
                    ]),
                ]),
            ]
        );
        assert_eq!(pattern.param_names(), vec!["c"]);
        assert!(pattern.required_params().is_empty());
    }

    #[rstest]
    #[case("/posts(")]
    #[case("/posts)")]
    #[case("/posts/:")]
    #[case("/posts()")]
    fn test_parse_errors(#[case] source: &str) {
        assert!(matches!(
            PathPattern::parse(source),
            Err(ResourceError::InvalidPattern { .. })
        ));
    }

    #[rstest]
    #[case("/posts", true)]
    #[case("/posts/index", true)]
    #[case("/posts.json", true)]
    #[case("/posts/index.json", true)]
    #[case("/posts/", false)]
    #[case("/postsindex", false)]
    #[case("/posts/1", false)]
    fn test_index_pattern(#[case] path: &str, #[case] expected: bool) {
        let pattern = PathPattern::parse("/posts(/index)(.:format)").unwrap();
        assert_eq!(pattern.matches(path).is_some(), expected, "path {path}");
    }

    #[test]
    fn test_match_composite_keys() {
        let pattern = PathPattern::parse("/posts/:year/:slug/edit(.:format)").unwrap();
        assert_eq!(
            pattern.matches("/posts/2024/hello/edit.html").unwrap(),
            params(&[("year", "2024"), ("slug", "hello"), ("format", "html")])
        );
        assert!(pattern.matches("/posts/2024/edit").is_none());
    }

    #[test]
    fn test_param_stops_at_format_dot() {
        let pattern = PathPattern::parse("/posts/:id(.:format)").unwrap();
        assert_eq!(
            pattern.matches("/posts/7.xml").unwrap(),
            params(&[("id", "7"), ("format", "xml")])
        );
        assert_eq!(pattern.matches("/posts/7").unwrap(), params(&[("id", "7")]));
    }

    #[test]
    fn test_generate_requires_required_params() {
        let pattern = PathPattern::parse("/posts/:post_id/comments/:id(.:format)").unwrap();
        assert_eq!(pattern.generate(&params(&[("post_id", "1")])), None);
        assert_eq!(
            pattern
                .generate(&params(&[("post_id", "1"), ("id", "2")]))
                .unwrap(),
            "/posts/1/comments/2"
        );
        assert_eq!(
            pattern
                .generate(&params(&[("post_id", "1"), ("id", "2"), ("format", "json")]))
                .unwrap(),
            "/posts/1/comments/2.json"
        );
    }
}
