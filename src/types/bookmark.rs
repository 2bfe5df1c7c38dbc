use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::errors::BookmarkError;

/// Variant of a stored bookmark record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Bookmark,
    Folder,
}

impl BookmarkKind {
    /// Column value used by the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkKind::Bookmark => "bookmark",
            BookmarkKind::Folder => "folder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bookmark" => Some(BookmarkKind::Bookmark),
            "folder" => Some(BookmarkKind::Folder),
            _ => None,
        }
    }
}

/// A bookmark or a folder.
///
/// Persisted records encode the hierarchy only through `parent`. The
/// `parents` path (filled by the importers) and the `children` list (filled
/// by the tree builder) are in-memory only and are never written to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: BookmarkKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<BookMark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookMark>,
}

impl BookMark {
    fn empty(kind: BookmarkKind, title: &str) -> Self {
        Self {
            id: None,
            kind,
            title: title.to_string(),
            parent: None,
            parents: Vec::new(),
            description: None,
            address: None,
            tags: BTreeSet::new(),
            created: String::new(),
            updated: String::new(),
            icon: None,
            children: Vec::new(),
        }
    }

    /// A leaf record pointing at `address`.
    pub fn leaf(title: &str, address: &str) -> Self {
        let mut leaf = Self::empty(BookmarkKind::Bookmark, title);
        leaf.address = Some(address.to_string());
        leaf
    }

    /// A folder with no children.
    pub fn folder(title: &str) -> Self {
        Self::empty(BookmarkKind::Folder, title)
    }

    pub fn with_parents(mut self, parents: Vec<BookMark>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_children(mut self, children: Vec<BookMark>) -> Self {
        self.children = children;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == BookmarkKind::Folder
    }

    /// The address a leaf is reconciled by. Empty addresses carry no identity.
    pub fn identity_address(&self) -> Option<&str> {
        match self.kind {
            BookmarkKind::Folder => None,
            BookmarkKind::Bookmark => self.address.as_deref().filter(|a| !a.is_empty()),
        }
    }

    /// Copy of this node as it should be written to a store under `parent`.
    pub fn to_record(&self, parent: Option<i64>) -> Self {
        Self {
            id: None,
            parent: parent.or(self.parent),
            parents: Vec::new(),
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Every persistable field of this node, as an update payload.
    pub fn to_patch(&self) -> BookmarkPatch {
        BookmarkPatch {
            kind: Some(self.kind),
            title: Some(self.title.clone()),
            parent: Some(self.parent),
            description: Some(self.description.clone().unwrap_or_default()),
            address: Some(self.address.clone().unwrap_or_default()),
            tags: Some(self.tags.clone()),
            created: Some(self.created.clone()),
            updated: Some(self.updated.clone()),
            icon: Some(self.icon.clone().unwrap_or_default()),
        }
    }
}

/// Partial set of fields for a targeted update. `None` leaves a field as is.
///
/// `parent: Some(None)` moves a record to the root; a JSON `null` parent
/// deserializes to `None` and therefore leaves the parent unchanged.
/// Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookmarkPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BookmarkKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl BookmarkPatch {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Either a single value or a list, as accepted by the batch operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // Listed first so a JSON array is never read as a single struct.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<i64> for OneOrMany<i64> {
    fn from(id: i64) -> Self {
        OneOrMany::One(id)
    }
}

impl From<Vec<i64>> for OneOrMany<i64> {
    fn from(ids: Vec<i64>) -> Self {
        OneOrMany::Many(ids)
    }
}

impl From<&[i64]> for OneOrMany<i64> {
    fn from(ids: &[i64]) -> Self {
        OneOrMany::Many(ids.to_vec())
    }
}

impl From<BookmarkPatch> for OneOrMany<BookmarkPatch> {
    fn from(patch: BookmarkPatch) -> Self {
        OneOrMany::One(patch)
    }
}

impl From<Vec<BookmarkPatch>> for OneOrMany<BookmarkPatch> {
    fn from(patches: Vec<BookmarkPatch>) -> Self {
        OneOrMany::Many(patches)
    }
}

/// Result of upserting a single leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    CreateFailed,
    Updated,
    UpdateFailed,
    Error,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "created",
            UpsertOutcome::CreateFailed => "create_failed",
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::UpdateFailed => "update_failed",
            UpsertOutcome::Error => "error",
        }
    }
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one node visited by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub outcome: UpsertOutcome,
}

/// Accumulated result of reconciling one or more forest nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertReport {
    pub entries: Vec<UpsertEntry>,
    pub folders_created: usize,
    pub folders_reused: usize,
}

impl UpsertReport {
    pub fn merge(&mut self, other: UpsertReport) {
        self.entries.extend(other.entries);
        self.folders_created += other.folders_created;
        self.folders_reused += other.folders_reused;
    }

    pub fn count(&self, outcome: UpsertOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// True when no entry reports a failure of any kind.
    pub fn is_clean(&self) -> bool {
        self.entries
            .iter()
            .all(|e| matches!(e.outcome, UpsertOutcome::Created | UpsertOutcome::Updated))
    }
}

/// Ids removed by a cascading delete, plus every failure met on the way.
///
/// Removals that happened before a failure stay applied; there is no rollback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteReport {
    pub removed: BTreeSet<i64>,
    pub errors: Vec<BookmarkError>,
}

impl DeleteReport {
    pub fn merge(&mut self, other: DeleteReport) {
        self.removed.extend(other.removed);
        self.errors.extend(other.errors);
    }

    pub fn failed(error: BookmarkError) -> Self {
        Self {
            removed: BTreeSet::new(),
            errors: vec![error],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
