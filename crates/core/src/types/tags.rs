//! Ordered, de-duplicated tag list.

use core::fmt;

/// An ordered set of customer/contact tags.
///
/// Shopify stores tags as a single comma-separated string on the customer
/// record, while Omnisend stores them as a JSON array. Both sides of the
/// subscription flow merge new tags into whatever is already present, so the
/// merge logic lives here once: tags are trimmed, empty entries are dropped,
/// and duplicates are removed while preserving first-seen order.
///
/// Trimming happens *before* de-duplication, so `"glow, vip"` merged with
/// `"vip"` yields `glow, vip` rather than keeping a ` vip` variant.
///
/// ## Examples
///
/// ```
/// use checkout_bridge_core::TagSet;
///
/// let mut tags = TagSet::parse("glow, vip,  , glow");
/// assert_eq!(tags.to_string(), "glow, vip");
///
/// tags.insert("post-checkout-signup");
/// tags.insert("vip");
/// assert_eq!(tags.to_string(), "glow, vip, post-checkout-signup");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a tag set from a comma-separated list.
    ///
    /// Entries are trimmed; empty entries and duplicates are dropped.
    /// First-seen order is preserved.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tags = Self::new();
        for tag in raw.split(',') {
            tags.insert(tag);
        }
        tags
    }

    /// Insert a tag, returning `true` if it was not already present.
    ///
    /// The tag is trimmed first; inserting an empty or whitespace-only tag
    /// is a no-op.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_owned());
        true
    }

    /// Merge all tags from `other` into this set.
    pub fn merge(&mut self, other: &Self) {
        for tag in &other.0 {
            self.insert(tag);
        }
    }

    /// Returns `true` if the (trimmed) tag is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.0.iter().any(|t| t == tag)
    }

    /// Number of tags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set contains no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The tags as an owned vector (the Omnisend wire form).
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Renders the Shopify wire form: tags joined with `", "`.
impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.insert(tag.as_ref());
        }
        tags
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_empties() {
        let tags = TagSet::parse(" glow ,, vip ,  ");
        assert_eq!(tags.to_vec(), vec!["glow", "vip"]);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(TagSet::parse("").is_empty());
        assert!(TagSet::parse("  , ,").is_empty());
    }

    #[test]
    fn test_parse_dedupes_preserving_order() {
        let tags = TagSet::parse("b, a, b, c, a");
        assert_eq!(tags.to_vec(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_dedupe_applies_after_trim() {
        // " vip" and "vip" are the same tag once trimmed
        let tags = TagSet::parse("glow,  vip, vip");
        assert_eq!(tags.to_string(), "glow, vip");
    }

    #[test]
    fn test_insert() {
        let mut tags = TagSet::new();
        assert!(tags.insert("glow"));
        assert!(!tags.insert("glow"));
        assert!(!tags.insert("  glow  "));
        assert!(!tags.insert("   "));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_insert_is_case_sensitive() {
        // Shopify preserves tag case; "VIP" and "vip" are distinct entries
        let mut tags = TagSet::parse("vip");
        assert!(tags.insert("VIP"));
        assert_eq!(tags.to_string(), "vip, VIP");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut existing = TagSet::parse("glow, vip");
        let incoming = TagSet::parse("vip, post-checkout-signup");

        existing.merge(&incoming);
        assert_eq!(existing.to_string(), "glow, vip, post-checkout-signup");

        // Merging again changes nothing
        existing.merge(&incoming);
        assert_eq!(existing.to_string(), "glow, vip, post-checkout-signup");
    }

    #[test]
    fn test_display_roundtrip() {
        let tags = TagSet::parse("glow, vip, post-checkout-signup");
        let reparsed = TagSet::parse(&tags.to_string());
        assert_eq!(tags, reparsed);
    }

    #[test]
    fn test_from_vec() {
        let tags = TagSet::from(vec![
            "a".to_string(),
            " b ".to_string(),
            "a".to_string(),
            String::new(),
        ]);
        assert_eq!(tags.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_contains_trims_needle() {
        let tags = TagSet::parse("glow, vip");
        assert!(tags.contains(" vip "));
        assert!(!tags.contains("glo"));
    }

    #[test]
    fn test_iter_order() {
        let tags = TagSet::parse("c, a, b");
        let collected: Vec<&str> = tags.iter().collect();
        assert_eq!(collected, vec!["c", "a", "b"]);
    }
}
