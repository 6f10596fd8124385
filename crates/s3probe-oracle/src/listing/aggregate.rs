//! Prefix/delimiter aggregation.
//!
//! Keeps entries whose key starts with the filter prefix. With a delimiter,
//! a key whose remainder after the prefix contains the delimiter is rolled
//! up into the common prefix `prefix + remainder[..=delimiter]` and left out
//! of the flat entries. A key equal to the filter prefix has an empty
//! remainder, so it is always listed flat.
//!
//! Keys sharing a common prefix are contiguous in key order, so the merged
//! sequence places each common prefix exactly where its first key would
//! have been, and the merged sequence stays sorted by key.

use std::collections::BTreeSet;

use super::entry::ListEntry;

/// One item of a delimited listing: a flat entry or a common prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingItem<E> {
    /// An entry listed individually.
    Entry(E),
    /// A common prefix standing for every key beneath it.
    CommonPrefix(String),
}

impl<E: ListEntry> ListingItem<E> {
    /// The key this item sorts under.
    pub fn key(&self) -> &str {
        match self {
            Self::Entry(entry) => entry.key(),
            Self::CommonPrefix(prefix) => prefix,
        }
    }
}

/// The common prefix `key` rolls up into, if any.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::listing::common_prefix_of;
///
/// assert_eq!(common_prefix_of("photos/2024/a.jpg", "photos/", Some("/")), Some("photos/2024/"));
/// assert_eq!(common_prefix_of("photos/a.jpg", "photos/", Some("/")), None);
/// assert_eq!(common_prefix_of("photos/", "photos/", Some("/")), None);
/// ```
#[must_use]
pub fn common_prefix_of<'k>(key: &'k str, prefix: &str, delimiter: Option<&str>) -> Option<&'k str> {
    let delimiter = delimiter.filter(|d| !d.is_empty())?;
    let remainder = key.strip_prefix(prefix)?;
    let pos = remainder.find(delimiter)?;
    Some(&key[..prefix.len() + pos + delimiter.len()])
}

/// Filter `entries` by `prefix` and merge keys sharing a common prefix into a
/// single [`ListingItem::CommonPrefix`]. `entries` must be in listing order.
pub fn aggregate<E, I>(entries: I, prefix: &str, delimiter: Option<&str>) -> Vec<ListingItem<E>>
where
    E: ListEntry,
    I: IntoIterator<Item = E>,
{
    let mut items = Vec::new();
    let mut last_prefix: Option<String> = None;

    for entry in entries {
        if !entry.key().starts_with(prefix) {
            continue;
        }
        match common_prefix_of(entry.key(), prefix, delimiter) {
            Some(cp) => {
                if last_prefix.as_deref() != Some(cp) {
                    last_prefix = Some(cp.to_owned());
                    items.push(ListingItem::CommonPrefix(cp.to_owned()));
                }
            }
            None => items.push(ListingItem::Entry(entry)),
        }
    }
    items
}

/// Split `entries` into the flat matching entries and the ordered,
/// de-duplicated common-prefix set.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::listing::{ObjectSummary, filter};
///
/// let keys = ["p/x", "p/y", "q"].map(|k| ObjectSummary { key: k.to_owned(), size: 0 });
/// let (flat, prefixes) = filter(keys, "", Some("/"));
/// assert_eq!(flat.len(), 1);
/// assert_eq!(flat[0].key, "q");
/// assert_eq!(prefixes.into_iter().collect::<Vec<_>>(), vec!["p/"]);
/// ```
pub fn filter<E, I>(entries: I, prefix: &str, delimiter: Option<&str>) -> (Vec<E>, BTreeSet<String>)
where
    E: ListEntry,
    I: IntoIterator<Item = E>,
{
    let mut flat = Vec::new();
    let mut prefixes = BTreeSet::new();
    for item in aggregate(entries, prefix, delimiter) {
        match item {
            ListingItem::Entry(entry) => flat.push(entry),
            ListingItem::CommonPrefix(cp) => {
                prefixes.insert(cp);
            }
        }
    }
    (flat, prefixes)
}
