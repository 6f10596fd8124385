//! Ordered key/version storage.
//!
//! [`VersionedKeyStore`] maps each key to its version history, newest first.
//! A `BTreeMap` keeps keys in byte-lexicographic order, which is what every
//! listing walks. Buckets that never had versioning enabled hold at most one
//! `null` version per key, so the same store serves every versioning state.

use std::collections::BTreeMap;

use super::object::VersionRecord;

/// Version histories keyed by object key.
#[derive(Debug, Default, Clone)]
pub struct VersionedKeyStore {
    /// Key -> versions, newest first. Never holds an empty list.
    objects: BTreeMap<String, Vec<VersionRecord>>,
}

impl VersionedKeyStore {
    /// Make `version` the latest version of its key.
    pub fn push(&mut self, version: VersionRecord) {
        self.objects
            .entry(version.key().to_owned())
            .or_default()
            .insert(0, version);
    }

    /// Remove the key's `null` version, wherever it sits in the history, and
    /// make `version` the latest. Returns the replaced entry.
    pub fn replace_null(&mut self, version: VersionRecord) -> Option<VersionRecord> {
        let versions = self.objects.entry(version.key().to_owned()).or_default();
        let replaced = versions
            .iter()
            .position(VersionRecord::is_null_version)
            .map(|idx| versions.remove(idx));
        versions.insert(0, version);
        replaced
    }

    /// Remove a key and its entire history.
    pub fn remove_key(&mut self, key: &str) -> Option<Vec<VersionRecord>> {
        self.objects.remove(key)
    }

    /// Remove exactly one version. The key disappears with its last version.
    pub fn remove_version(&mut self, key: &str, version_id: &str) -> Option<VersionRecord> {
        let versions = self.objects.get_mut(key)?;
        let idx = versions.iter().position(|v| v.version_id() == version_id)?;
        let removed = versions.remove(idx);
        if versions.is_empty() {
            self.objects.remove(key);
        }
        Some(removed)
    }

    /// The version history of a key, newest first.
    #[must_use]
    pub fn versions_of(&self, key: &str) -> &[VersionRecord] {
        self.objects.get(key).map_or(&[], Vec::as_slice)
    }

    /// The latest entry for a key, which may be a delete marker.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<&VersionRecord> {
        self.versions_of(key).first()
    }

    /// Mutable access to a specific version.
    pub fn version_mut(&mut self, key: &str, version_id: &str) -> Option<&mut VersionRecord> {
        self.objects
            .get_mut(key)?
            .iter_mut()
            .find(|v| v.version_id() == version_id)
    }

    /// Whether the key has a version with this ID.
    #[must_use]
    pub fn contains_version(&self, key: &str, version_id: &str) -> bool {
        self.versions_of(key)
            .iter()
            .any(|v| v.version_id() == version_id)
    }

    /// Every `(key, history)` pair in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VersionRecord])> {
        self.objects
            .iter()
            .map(|(k, versions)| (k.as_str(), versions.as_slice()))
    }

    /// Every version in `(key ascending, newest first)` order.
    pub fn all_entries(&self) -> impl Iterator<Item = &VersionRecord> {
        self.objects.values().flatten()
    }

    /// Number of keys with at least one version.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no key has any version.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
