//! Checksum grouping of report entries into originals and duplicates.
//!
//! # Overview
//!
//! [`ReportIndex::build`] turns the flat list of report entries into
//! [`DuplicateGroup`]s keyed by checksum. A group is kept only when it has an
//! original and at least one duplicate; anything else is a data-quality issue
//! in the report and is dropped without error.
//!
//! # Example
//!
//! ```
//! use rmlint_manager::report::{ReportEntry, ReportIndex};
//!
//! let index = ReportIndex::build(vec![
//!     ReportEntry::duplicate("/a/orig.txt", 100, "abc", true),
//!     ReportEntry::duplicate("/a/dup.txt", 100, "abc", false),
//! ]);
//!
//! assert_eq!(index.group_count(), 1);
//! assert_eq!(index.total_reclaimable_bytes(), 100);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::entry::ReportEntry;

/// One original file plus the duplicates that may be deleted in its favour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Checksum shared by every member.
    pub checksum: String,
    /// The file to keep.
    pub original: ReportEntry,
    /// Deletion candidates in report order (never empty).
    pub duplicates: Vec<ReportEntry>,
}

impl DuplicateGroup {
    /// Bytes reclaimable by removing every duplicate.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.duplicates.iter().map(ReportEntry::size).sum()
    }

    /// Number of duplicates in the group.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }
}

/// Immutable index over one loaded report.
///
/// A new report replaces the index wholesale; there is no incremental update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportIndex {
    groups: Vec<DuplicateGroup>,
    by_checksum: HashMap<String, usize>,
    type_counts: BTreeMap<String, usize>,
    entry_count: usize,
}

impl ReportIndex {
    /// Build the index from decoded report entries.
    ///
    /// Groups appear in the order their checksum is first seen. Within a
    /// group the first entry flagged `is_original` wins; later flagged
    /// entries are neither original nor duplicate.
    #[must_use]
    pub fn build(entries: Vec<ReportEntry>) -> Self {
        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut buckets: Vec<(String, Vec<ReportEntry>)> = Vec::new();
        let mut bucket_of: HashMap<String, usize> = HashMap::new();
        let entry_count = entries.len();

        for entry in entries {
            *type_counts.entry(entry.kind().to_string()).or_insert(0) += 1;

            if !entry.is_duplicate_candidate() {
                continue;
            }

            let checksum = entry.checksum().to_string();
            match bucket_of.get(&checksum) {
                Some(&i) => buckets[i].1.push(entry),
                None => {
                    bucket_of.insert(checksum.clone(), buckets.len());
                    buckets.push((checksum, vec![entry]));
                }
            }
        }

        let mut groups = Vec::new();
        let mut by_checksum = HashMap::new();

        for (checksum, files) in buckets {
            let mut original = None;
            let mut duplicates = Vec::new();
            let mut extra_originals = 0usize;

            for file in files {
                if !file.is_original() {
                    duplicates.push(file);
                } else if original.is_none() {
                    original = Some(file);
                } else {
                    extra_originals += 1;
                }
            }

            let Some(original) = original else {
                log::debug!("Dropping group {checksum}: no entry flagged as original");
                continue;
            };
            if duplicates.is_empty() {
                log::debug!("Dropping group {checksum}: original has no duplicates");
                continue;
            }
            if extra_originals > 0 {
                log::debug!(
                    "Group {checksum} has {} originals, keeping the first: {}",
                    extra_originals + 1,
                    original.path().display()
                );
            }

            by_checksum.insert(checksum.clone(), groups.len());
            groups.push(DuplicateGroup {
                checksum,
                original,
                duplicates,
            });
        }

        log::debug!(
            "Indexed {} entries into {} duplicate groups",
            entry_count,
            groups.len()
        );

        Self {
            groups,
            by_checksum,
            type_counts,
            entry_count,
        }
    }

    /// Count of entries per lint type over the whole report.
    #[must_use]
    pub fn summary(&self) -> &BTreeMap<String, usize> {
        &self.type_counts
    }

    /// Sum of the sizes of all duplicates.
    #[must_use]
    pub fn total_reclaimable_bytes(&self) -> u64 {
        self.duplicates().map(ReportEntry::size).sum()
    }

    /// The `n` largest duplicates, largest first. Ties keep report order.
    #[must_use]
    pub fn top_n_by_size(&self, n: usize) -> Vec<&ReportEntry> {
        let mut sorted: Vec<&ReportEntry> = self.duplicates().collect();
        sorted.sort_by(|a, b| b.size().cmp(&a.size()));
        sorted.truncate(n);
        sorted
    }

    /// Materialized groups in first-seen order.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Look up a group by checksum.
    #[must_use]
    pub fn group(&self, checksum: &str) -> Option<&DuplicateGroup> {
        self.by_checksum.get(checksum).map(|&i| &self.groups[i])
    }

    /// Originals, one per group.
    pub fn originals(&self) -> impl Iterator<Item = &ReportEntry> + '_ {
        self.groups.iter().map(|g| &g.original)
    }

    /// All duplicates, flattened in group order.
    pub fn duplicates(&self) -> impl Iterator<Item = &ReportEntry> + '_ {
        self.groups.iter().flat_map(|g| g.duplicates.iter())
    }

    /// Number of duplicates across all groups.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Number of materialized groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of raw entries the index was built from.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Whether there is nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
