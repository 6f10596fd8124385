//! Marker-based pagination.
//!
//! The marker applies to entries, not to the aggregated listing: every entry
//! at or before the `(key, secondary)` marker is dropped, and common prefixes
//! are rolled up from the entries that remain. A page then holds at most
//! `max_items` items, flat entries and common prefixes counted together.
//!
//! Marker rules:
//!
//! - A key marker alone skips every entry of that key and everything before.
//! - A key marker with a secondary marker resumes right after that entry of
//!   the key. A secondary marker the key does not have skips the whole key.
//! - A key marker that is itself a common prefix skips every key beneath it,
//!   so a page that ended on that prefix resumes past it.
//!
//! When the page is truncated, the next markers name its last item: the key
//! and secondary ID of an entry, or the common prefix itself.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::aggregate::{ListingItem, aggregate, common_prefix_of};
use super::entry::ListEntry;

/// Where a listing resumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marker<'a> {
    /// The key marker (`marker`, `key-marker`, decoded continuation token
    /// or `start-after`).
    pub key: Option<&'a str>,
    /// The version-id or upload-id marker.
    pub secondary: Option<&'a str>,
}

impl<'a> Marker<'a> {
    /// A marker on a key only.
    #[must_use]
    pub fn key(key: &'a str) -> Self {
        Self {
            key: Some(key),
            secondary: None,
        }
    }

    /// A marker on an entry within a key.
    #[must_use]
    pub fn entry(key: &'a str, secondary: &'a str) -> Self {
        Self {
            key: Some(key),
            secondary: Some(secondary),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<E> {
    /// Entries listed individually, in listing order.
    pub entries: Vec<E>,
    /// Common prefixes on this page, ascending.
    pub common_prefixes: Vec<String>,
    /// Whether more items follow this page.
    pub is_truncated: bool,
    /// Key marker for the next page, set only when truncated.
    pub next_marker: Option<String>,
    /// Version-id / upload-id marker for the next page, set only when
    /// truncated on an entry that has one.
    pub next_secondary_marker: Option<String>,
}

impl<E> Default for ListingPage<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            common_prefixes: Vec::new(),
            is_truncated: false,
            next_marker: None,
            next_secondary_marker: None,
        }
    }
}

impl<E> ListingPage<E> {
    /// Number of entries plus common prefixes on the page.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.entries.len() + self.common_prefixes.len()
    }
}

/// Drop every entry at or before `marker`. `entries` must be in listing
/// order; `prefix` and `delimiter` are the listing's, used to tell whether
/// the key marker is itself a common prefix.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::listing::{Marker, ObjectSummary, skip_to_marker};
///
/// let entries = ["b/1", "b/2", "c"].map(|k| ObjectSummary { key: k.to_owned(), size: 0 });
/// let inside = skip_to_marker(entries.to_vec(), Marker::key("b/1"), "", Some("/"));
/// assert_eq!(inside.len(), 2);
///
/// let rolled_up = skip_to_marker(entries.to_vec(), Marker::key("b/"), "", Some("/"));
/// assert_eq!(rolled_up[0].key, "c");
/// ```
pub fn skip_to_marker<E: ListEntry>(
    entries: Vec<E>,
    marker: Marker<'_>,
    prefix: &str,
    delimiter: Option<&str>,
) -> Vec<E> {
    let Some(marker_key) = marker.key else {
        return entries;
    };
    let marker_is_prefix = common_prefix_of(marker_key, prefix, delimiter) == Some(marker_key);
    // Position of the secondary marker among the marker key's entries.
    let skip_upto = marker.secondary.and_then(|secondary| {
        entries
            .iter()
            .filter(|e| e.key() == marker_key)
            .position(|e| e.secondary_id() == Some(secondary))
    });

    let mut seen_in_key = 0;
    entries
        .into_iter()
        .filter(|entry| {
            let key = entry.key();
            if marker_is_prefix && key.starts_with(marker_key) {
                return false;
            }
            match key.cmp(marker_key) {
                Ordering::Less => false,
                Ordering::Greater => true,
                Ordering::Equal => {
                    let position = seen_in_key;
                    seen_in_key += 1;
                    skip_upto.is_some_and(|upto| position > upto)
                }
            }
        })
        .collect()
}

/// Cut the first page out of `items`, which must be in listing order and
/// already past the marker.
///
/// A `max_items` of zero yields an empty, untruncated page.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::listing::{ListingItem, ObjectSummary, paginate};
///
/// let items: Vec<_> = ["b", "c"]
///     .map(|k| ListingItem::Entry(ObjectSummary { key: k.to_owned(), size: 0 }))
///     .into();
/// let page = paginate(items, 1);
/// assert_eq!(page.entries[0].key, "b");
/// assert!(page.is_truncated);
/// assert_eq!(page.next_marker.as_deref(), Some("b"));
/// ```
pub fn paginate<E: ListEntry>(items: Vec<ListingItem<E>>, max_items: usize) -> ListingPage<E> {
    if max_items == 0 {
        return ListingPage::default();
    }

    let is_truncated = items.len() > max_items;
    let mut page = ListingPage {
        is_truncated,
        ..ListingPage::default()
    };

    let mut last: Option<(String, Option<String>)> = None;
    for item in items.into_iter().take(max_items) {
        match item {
            ListingItem::Entry(entry) => {
                last = Some((
                    entry.key().to_owned(),
                    entry.secondary_id().map(str::to_owned),
                ));
                page.entries.push(entry);
            }
            ListingItem::CommonPrefix(cp) => {
                last = Some((cp.clone(), None));
                page.common_prefixes.push(cp);
            }
        }
    }

    if is_truncated {
        if let Some((key, secondary)) = last {
            page.next_marker = Some(key);
            page.next_secondary_marker = secondary;
        }
    }
    page
}

/// Compute one listing page: skip past `marker`, filter by `prefix`, roll
/// keys up at `delimiter`, and cut at most `max_items` items.
pub fn list_page<E: ListEntry>(
    entries: Vec<E>,
    prefix: &str,
    delimiter: Option<&str>,
    marker: Marker<'_>,
    max_items: usize,
) -> ListingPage<E> {
    let remaining = skip_to_marker(entries, marker, prefix, delimiter);
    paginate(aggregate(remaining, prefix, delimiter), max_items)
}
