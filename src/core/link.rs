//! The Link entity and the rules that keep a collection of them consistent

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;
use validator::Validate;

use crate::core::error::ValidationError;

/// Latest accepted star time: the last millisecond of year 9999
pub const MAX_STARRED_AT: i64 = 253_402_300_799_999;

static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://").expect("scheme pattern is a valid regex")
});

/// A single bookmarked resource
///
/// Serialized with camelCase keys (`starredAt`) so the backing document stays
/// readable by other tooling that works with the same link collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Opaque identifier, unique within the collection
    pub id: String,

    pub title: String,

    /// Always carries an explicit `http://` or `https://` scheme once stored
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Labels in insertion order
    pub categories: Vec<String>,

    /// Hidden from anonymous readers when set
    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub starred: bool,

    /// Milliseconds since epoch of the most recent star, only while starred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_at: Option<i64>,
}

impl Link {
    /// Numeric value of the id, if it is a decimal string
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Overwrite the content fields with those of `draft`
    ///
    /// Identity and star state stay untouched.
    pub fn apply(&mut self, draft: NewLink) {
        self.title = draft.title;
        self.url = draft.url;
        self.description = draft.description;
        self.categories = draft.categories;
        self.private = draft.private;
    }
}

/// A link that has not been assigned an id yet
///
/// This is the shape accepted by create, update and bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "at least one category is required"))]
    pub categories: Vec<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub starred: bool,

    #[serde(default)]
    pub starred_at: Option<i64>,
}

impl NewLink {
    /// Convenience constructor for the three required fields
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Trim and normalize every field, then check the required ones
    ///
    /// Blank categories are dropped and duplicates collapse onto their first
    /// occurrence. A URL without an `http(s)://` scheme gets `https://`.
    /// A starred draft without a star time counts as starred at the epoch;
    /// star times are clamped to `0..=MAX_STARRED_AT`.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        let url = normalize_url(&self.url);
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let categories: IndexSet<String> = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let starred_at = self
            .starred
            .then(|| self.starred_at.unwrap_or(0).clamp(0, MAX_STARRED_AT));

        let link = Self {
            title,
            url,
            description,
            categories: categories.into_iter().collect(),
            private: self.private,
            starred: self.starred,
            starred_at,
        };
        link.validate()?;
        Ok(link)
    }

    /// Materialize the draft under the given id
    pub fn into_link(self, id: impl Into<String>) -> Link {
        Link {
            id: id.into(),
            title: self.title,
            url: self.url,
            description: self.description,
            categories: self.categories,
            private: self.private,
            starred: self.starred,
            starred_at: self.starred_at,
        }
    }
}

/// Give a URL an explicit scheme
///
/// Empty input stays empty so that validation reports it as missing.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() || SCHEME.is_match(url) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Next sequential id: one greater than the largest numeric id, or `"1"`
///
/// Ids that are not decimal numbers are ignored.
pub fn next_id(links: &[Link]) -> String {
    let max = links.iter().filter_map(Link::numeric_id).max().unwrap_or(0);
    (max + 1).to_string()
}

/// Comparator for the starred ordering
///
/// Starred links come first, most recently starred first. Unstarred links
/// compare equal so a stable sort keeps their relative order.
pub fn starred_order(a: &Link, b: &Link) -> Ordering {
    match (a.starred, b.starred) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b.starred_at.unwrap_or(0).cmp(&a.starred_at.unwrap_or(0)),
        (false, false) => Ordering::Equal,
    }
}

/// Stable sort of a collection into the starred ordering
pub fn sort_starred_first(links: &mut [Link]) {
    links.sort_by(starred_order);
}

/// Whether a collection already satisfies the starred ordering
pub fn is_starred_ordered(links: &[Link]) -> bool {
    links
        .windows(2)
        .all(|pair| starred_order(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Union of every link's categories in first-seen order
pub fn collect_categories<'a>(links: impl IntoIterator<Item = &'a Link>) -> Vec<String> {
    let set: IndexSet<&str> = links
        .into_iter()
        .flat_map(|l| l.categories.iter().map(String::as_str))
        .collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, starred: bool, starred_at: Option<i64>) -> Link {
        let mut link =
            NewLink::new(format!("Link {}", id), "https://example.com", ["ref"]).into_link(id);
        link.starred = starred;
        link.starred_at = starred_at;
        link
    }

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/path "), "https://example.com/path");
    }

    #[test]
    fn test_normalize_url_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://e.com"), "http://e.com");
        assert_eq!(normalize_url("HTTPS://E.com"), "HTTPS://E.com");
    }

    #[test]
    fn test_normalize_url_empty_stays_empty() {
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn test_normalized_requires_fields() {
        let err = NewLink::default().normalized().unwrap_err();
        match err {
            ValidationError::FieldErrors(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["categories", "title", "url"]);
            }
            other => panic!("Expected FieldErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_normalized_blank_categories_are_missing() {
        let draft = NewLink::new("Title", "e.com", ["  ", ""]);
        assert!(draft.normalized().is_err());
    }

    #[test]
    fn test_normalized_cleans_fields() {
        let draft = NewLink::new("  Rust  ", "rust-lang.org", ["lang", " lang ", "docs"])
            .with_description("   ");
        let clean = draft.normalized().unwrap();

        assert_eq!(clean.title, "Rust");
        assert_eq!(clean.url, "https://rust-lang.org");
        assert_eq!(clean.categories, vec!["lang", "docs"]);
        assert_eq!(clean.description, None);
    }

    #[test]
    fn test_normalized_drops_star_time_when_unstarred() {
        let mut draft = NewLink::new("T", "e.com", ["a"]);
        draft.starred_at = Some(10);
        assert_eq!(draft.normalized().unwrap().starred_at, None);
    }

    #[test]
    fn test_normalized_gives_starred_draft_a_star_time() {
        let mut draft = NewLink::new("T", "e.com", ["a"]);
        draft.starred = true;
        assert_eq!(draft.normalized().unwrap().starred_at, Some(0));
    }

    #[test]
    fn test_normalized_clamps_star_time() {
        let mut draft = NewLink::new("T", "e.com", ["a"]);
        draft.starred = true;
        draft.starred_at = Some(i64::MAX);
        assert_eq!(draft.clone().normalized().unwrap().starred_at, Some(MAX_STARRED_AT));

        draft.starred_at = Some(-5);
        assert_eq!(draft.normalized().unwrap().starred_at, Some(0));
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]), "1");
        let links = vec![link("3", false, None), link("10", false, None), link("x", false, None)];
        assert_eq!(next_id(&links), "11");
    }

    #[test]
    fn test_sort_starred_first() {
        let mut links = vec![
            link("1", false, None),
            link("2", true, Some(100)),
            link("3", false, None),
            link("4", true, Some(200)),
        ];
        sort_starred_first(&mut links);

        let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "2", "1", "3"]);
        assert!(is_starred_ordered(&links));
    }

    #[test]
    fn test_is_starred_ordered_detects_violation() {
        let links = vec![link("1", false, None), link("2", true, Some(1))];
        assert!(!is_starred_ordered(&links));
    }

    #[test]
    fn test_collect_categories_first_seen_order() {
        let mut a = link("1", false, None);
        a.categories = vec!["b".into(), "a".into()];
        let mut b = link("2", false, None);
        b.categories = vec!["a".into(), "c".into()];

        assert_eq!(collect_categories(&[a, b]), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_link_serializes_camel_case() {
        let l = link("1", true, Some(5));
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["starredAt"], 5);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_link_deserializes_with_defaults() {
        let l: Link = serde_json::from_str(
            r#"{"id":"1","title":"T","url":"https://e.com","categories":["a"]}"#,
        )
        .unwrap();
        assert!(!l.private);
        assert!(!l.starred);
        assert_eq!(l.starred_at, None);
    }
}
