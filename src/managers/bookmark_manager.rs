//! Bookmark Manager.
//!
//! Implements `BookmarkManagerTrait` on top of any [`BookmarkStore`]:
//! identity-based upsert of imported forests, batch update and lookup by id,
//! and cascading delete of folders.
//!
//! None of these operations is atomic. Sibling branches are dispatched
//! concurrently and whatever succeeded stays applied when another branch
//! fails; failures are reported, never rolled back.
//!
//! During upsert, folders of one forest are resolved one at a time so that
//! a folder lookup always sees folders created earlier in the same import;
//! only leaves run concurrently. Two leaves with the same address in one
//! forest may still both miss and both insert on a store that suspends.

use async_trait::async_trait;
use futures_util::future::{join, join_all, FutureExt, LocalBoxFuture};
use tracing::{debug, error, info, warn};

use crate::database::store::{BookmarkStore, Query};
use crate::types::bookmark::{
    BookMark, BookmarkKind, BookmarkPatch, DeleteReport, OneOrMany, UpsertEntry, UpsertOutcome,
    UpsertReport,
};
use crate::types::errors::BookmarkError;
use crate::types::settings::FolderScope;

/// Trait defining bookmark management operations.
#[async_trait(?Send)]
pub trait BookmarkManagerTrait {
    /// Persists `node` and its descendants under `parent`.
    async fn upsert_bookmark(&self, node: &BookMark, parent: Option<i64>) -> UpsertReport;
    /// Persists every root of a forest. Root leaves are processed
    /// concurrently; folders are resolved one at a time.
    async fn upsert_forest(&self, roots: &[BookMark]) -> UpsertReport;
    async fn try_update_bookmarks(
        &self,
        ids: OneOrMany<i64>,
        patches: OneOrMany<BookmarkPatch>,
    ) -> Result<(), BookmarkError>;
    /// `true` only if every targeted record was updated.
    async fn update_bookmarks(&self, ids: OneOrMany<i64>, patches: OneOrMany<BookmarkPatch>) -> bool;
    async fn try_get_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> Result<Vec<BookMark>, BookmarkError>;
    /// `Some(records)` (possibly empty) on success, `None` if the store failed.
    async fn get_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> Option<Vec<BookMark>>;
    async fn delete_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> DeleteReport;
    async fn get_all_bookmarks(&self) -> Vec<BookMark>;
}

/// Bookmark manager bound to a store handle.
pub struct BookmarkManager<'a, S: BookmarkStore + ?Sized> {
    store: &'a S,
    folder_scope: FolderScope,
}

impl<'a, S: BookmarkStore + ?Sized> BookmarkManager<'a, S> {
    /// Creates a manager using global folder matching.
    pub fn new(store: &'a S) -> Self {
        Self::with_folder_scope(store, FolderScope::Global)
    }

    pub fn with_folder_scope(store: &'a S, folder_scope: FolderScope) -> Self {
        Self { store, folder_scope }
    }

    pub fn folder_scope(&self) -> FolderScope {
        self.folder_scope
    }

    // ─── Upsert ───

    async fn upsert_node(&self, node: &BookMark, parent: Option<i64>) -> UpsertReport {
        match node.kind {
            BookmarkKind::Folder => self.upsert_folder(node, parent).await,
            BookmarkKind::Bookmark => UpsertReport {
                entries: vec![self.upsert_leaf(node, parent).await],
                ..UpsertReport::default()
            },
        }
    }

    /// Upserts one sibling list. Leaves run concurrently with each other and
    /// with the folders, which are walked one after another.
    fn upsert_scope<'b>(&'b self, nodes: &'b [BookMark], parent: Option<i64>) -> LocalBoxFuture<'b, UpsertReport> {
        async move {
            let leaves = join_all(
                nodes
                    .iter()
                    .filter(|node| !node.is_folder())
                    .map(|leaf| self.upsert_leaf(leaf, parent)),
            );
            let folders = async {
                let mut report = UpsertReport::default();
                for folder in nodes.iter().filter(|node| node.is_folder()) {
                    report.merge(self.upsert_folder(folder, parent).await);
                }
                report
            };

            let (leaf_entries, folder_report) = join(leaves, folders).await;
            let mut report = UpsertReport {
                entries: leaf_entries,
                ..UpsertReport::default()
            };
            report.merge(folder_report);
            report
        }
        .boxed_local()
    }

    async fn upsert_folder(&self, node: &BookMark, parent: Option<i64>) -> UpsertReport {
        let mut report = UpsertReport::default();

        let folder_id = match self.resolve_folder(node, parent).await {
            Ok((id, true)) => {
                report.folders_created += 1;
                id
            }
            Ok((id, false)) => {
                report.folders_reused += 1;
                id
            }
            Err(err) => {
                error!(title = %node.title, error = %err, "folder upsert failed, skipping its children");
                report.entries.push(UpsertEntry {
                    title: node.title.clone(),
                    address: None,
                    id: None,
                    outcome: UpsertOutcome::Error,
                });
                return report;
            }
        };

        report.merge(self.upsert_scope(&node.children, Some(folder_id)).await);
        report
    }

    /// Finds the folder `node` maps to, inserting it if missing.
    /// Returns the folder id and whether it was created. Existing folders are
    /// never modified.
    async fn resolve_folder(&self, node: &BookMark, parent: Option<i64>) -> Result<(i64, bool), BookmarkError> {
        let mut query = Query::new().title(&node.title).kind(BookmarkKind::Folder);
        if self.folder_scope == FolderScope::Parent {
            query = query.parent(parent.or(node.parent));
        }

        if let Some(existing) = self.store.find_first(&query).await? {
            let id = existing
                .id
                .ok_or_else(|| BookmarkError::Storage("stored folder has no id".to_string()))?;
            debug!(title = %node.title, id, "reusing folder");
            return Ok((id, false));
        }

        let id = self.store.add(&node.to_record(parent)).await?;
        debug!(title = %node.title, id, "created folder");
        Ok((id, true))
    }

    async fn upsert_leaf(&self, node: &BookMark, parent: Option<i64>) -> UpsertEntry {
        let (outcome, id) = match self.try_upsert_leaf(node, parent).await {
            Ok(result) => result,
            Err(err) => {
                error!(title = %node.title, error = %err, "bookmark upsert failed");
                (UpsertOutcome::Error, None)
            }
        };
        UpsertEntry {
            title: node.title.clone(),
            address: node.address.clone(),
            id,
            outcome,
        }
    }

    async fn try_upsert_leaf(
        &self,
        node: &BookMark,
        parent: Option<i64>,
    ) -> Result<(UpsertOutcome, Option<i64>), BookmarkError> {
        let record = node.to_record(parent);

        if let Some(address) = node.identity_address() {
            if let Some(existing) = self.store.find_first(&Query::new().address(address)).await? {
                let id = existing
                    .id
                    .ok_or_else(|| BookmarkError::Storage("stored bookmark has no id".to_string()))?;
                let affected = self.store.update(id, &record.to_patch()).await?;
                let outcome = if affected > 0 {
                    UpsertOutcome::Updated
                } else {
                    UpsertOutcome::UpdateFailed
                };
                return Ok((outcome, Some(id)));
            }
        }

        let id = self.store.add(&record).await?;
        if id > 0 {
            Ok((UpsertOutcome::Created, Some(id)))
        } else {
            Ok((UpsertOutcome::CreateFailed, None))
        }
    }

    // ─── Cascading delete ───

    async fn delete_target(&self, id: i64) -> DeleteReport {
        match self.store.get(id).await {
            Ok(Some(record)) => self.delete_record(record, Vec::new()).await,
            Ok(None) => {
                warn!(id, "delete target not found");
                DeleteReport::failed(BookmarkError::NotFound(id))
            }
            Err(err) => DeleteReport::failed(err),
        }
    }

    /// Deletes `record`, and for a folder its whole subtree first.
    ///
    /// `lineage` holds the folder ids above `record` in this walk; a child
    /// that points back into it is skipped rather than followed.
    fn delete_record<'b>(&'b self, record: BookMark, lineage: Vec<i64>) -> LocalBoxFuture<'b, DeleteReport> {
        async move {
            let Some(id) = record.id else {
                return DeleteReport::failed(BookmarkError::Storage("stored record has no id".to_string()));
            };
            let mut report = DeleteReport::default();

            if record.is_folder() {
                match self.store.find_all(&Query::new().parent(Some(id))).await {
                    Ok(children) => {
                        let mut below = lineage;
                        below.push(id);
                        let branches = children
                            .into_iter()
                            .filter(|child| match child.id {
                                Some(child_id) if below.contains(&child_id) => {
                                    warn!(id = child_id, "bookmark hierarchy loops back, not following");
                                    false
                                }
                                _ => true,
                            })
                            .map(|child| self.delete_record(child, below.clone()))
                            .collect::<Vec<_>>();
                        for child_report in join_all(branches).await {
                            report.merge(child_report);
                        }
                    }
                    Err(err) => report.errors.push(err),
                }

                // Keep the folder while any descendant survived.
                if !report.is_complete() {
                    return report;
                }
            }

            match self.store.delete(id).await {
                Ok(()) => {
                    report.removed.insert(id);
                }
                Err(err) => report.errors.push(err),
            }
            report
        }
        .boxed_local()
    }
}

/// Pairs ids with payloads. A single payload applies to every id; a list of
/// payloads must match the ids one to one.
fn pair_updates(
    ids: OneOrMany<i64>,
    patches: OneOrMany<BookmarkPatch>,
) -> Result<Vec<(i64, BookmarkPatch)>, BookmarkError> {
    let ids = ids.into_vec();
    match patches {
        OneOrMany::One(patch) => Ok(ids.into_iter().map(|id| (id, patch.clone())).collect()),
        OneOrMany::Many(patches) => {
            if ids.len() != patches.len() {
                return Err(BookmarkError::Validation(format!(
                    "{} ids but {} update payloads",
                    ids.len(),
                    patches.len()
                )));
            }
            Ok(ids.into_iter().zip(patches).collect())
        }
    }
}

#[async_trait(?Send)]
impl<'a, S: BookmarkStore + ?Sized> BookmarkManagerTrait for BookmarkManager<'a, S> {
    /// Per-node errors are reported as `error` entries and never abort
    /// sibling branches.
    async fn upsert_bookmark(&self, node: &BookMark, parent: Option<i64>) -> UpsertReport {
        self.upsert_node(node, parent).await
    }

    async fn upsert_forest(&self, roots: &[BookMark]) -> UpsertReport {
        let report = self.upsert_scope(roots, None).await;
        info!(
            created = report.count(UpsertOutcome::Created),
            updated = report.count(UpsertOutcome::Updated),
            failed = report.entries.len()
                - report.count(UpsertOutcome::Created)
                - report.count(UpsertOutcome::Updated),
            folders_created = report.folders_created,
            folders_reused = report.folders_reused,
            "upserted bookmark forest"
        );
        report
    }

    async fn try_update_bookmarks(
        &self,
        ids: OneOrMany<i64>,
        patches: OneOrMany<BookmarkPatch>,
    ) -> Result<(), BookmarkError> {
        let pairs = pair_updates(ids, patches)?;

        let results = join_all(pairs.iter().map(|(id, patch)| async move {
            (*id, self.store.update(*id, patch).await)
        }))
        .await;

        let mut errors = Vec::new();
        for (id, result) in results {
            match result {
                Ok(0) => errors.push(BookmarkError::NotFound(id)),
                Ok(_) => {}
                Err(err) => errors.push(err),
            }
        }

        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn update_bookmarks(&self, ids: OneOrMany<i64>, patches: OneOrMany<BookmarkPatch>) -> bool {
        match self.try_update_bookmarks(ids, patches).await {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "bookmark update failed");
                false
            }
        }
    }

    async fn try_get_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> Result<Vec<BookMark>, BookmarkError> {
        let mut ids = ids.into_vec();
        ids.sort_unstable();
        ids.dedup();

        let lookups = join_all(ids.iter().map(|id| self.store.get(*id))).await;
        let mut found = Vec::new();
        for lookup in lookups {
            if let Some(record) = lookup? {
                found.push(record);
            }
        }
        Ok(found)
    }

    async fn get_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> Option<Vec<BookMark>> {
        match self.try_get_bookmarks_by_id(ids).await {
            Ok(found) => Some(found),
            Err(err) => {
                error!(error = %err, "bookmark lookup failed");
                None
            }
        }
    }

    /// Removes each target; folders take their whole subtree with them.
    ///
    /// Targets are processed concurrently and independently: a missing id is
    /// reported in `errors` while the other targets are still removed.
    async fn delete_bookmarks_by_id(&self, ids: OneOrMany<i64>) -> DeleteReport {
        let targets = ids.into_vec();
        let mut report = DeleteReport::default();
        for target_report in join_all(targets.iter().map(|id| self.delete_target(*id))).await {
            report.merge(target_report);
        }

        if report.is_complete() {
            info!(removed = report.removed.len(), "deleted bookmarks");
        } else {
            error!(
                removed = report.removed.len(),
                failures = report.errors.len(),
                "bookmark delete finished with failures"
            );
        }
        report
    }

    async fn get_all_bookmarks(&self) -> Vec<BookMark> {
        self.store.all().await.unwrap_or_else(|err| {
            error!(error = %err, "listing bookmarks failed");
            Vec::new()
        })
    }
}
