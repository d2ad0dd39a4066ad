//! Repository service over the link collection
//!
//! Every mutation is a full cycle: load the collection, change it in memory,
//! replace the collection. Cycles are serialized by a single writer lock so
//! that two overlapping requests can never lose each other's update. Reads
//! skip the lock; the store's atomic replace guarantees they see a whole
//! collection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::core::error::{LinkError, ValidationError, VaultResult};
use crate::core::link::{self, Link, NewLink};
use crate::core::{AuthContext, LinkStore};

/// Full collection snapshot for download
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub links: Vec<Link>,
    pub export_date: DateTime<Utc>,
}

/// Business operations over the link collection
#[derive(Clone)]
pub struct LinkRepository {
    store: Arc<dyn LinkStore>,
    write_lock: Arc<Mutex<()>>,
}

impl LinkRepository {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The current collection in persisted order
    ///
    /// A store that cannot be read yields an empty collection; the failure is
    /// logged rather than surfaced so the read path stays available.
    pub async fn list(&self) -> Vec<Link> {
        match self.store.load().await {
            Ok(links) => links,
            Err(e) => {
                error!(backend = self.store.backend(), error = %e, "failed to load links, serving empty collection");
                Vec::new()
            }
        }
    }

    /// The collection as seen by `ctx`: anonymous callers lose private links
    pub async fn list_visible(&self, ctx: AuthContext) -> Vec<Link> {
        let links = self.list().await;
        if ctx.is_owner() {
            links
        } else {
            links.into_iter().filter(|l| !l.private).collect()
        }
    }

    pub async fn get(&self, id: &str) -> VaultResult<Link> {
        self.list()
            .await
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Union of all categories in first-seen order
    pub async fn categories(&self) -> Vec<String> {
        link::collect_categories(&self.list().await)
    }

    /// Categories of the links visible to `ctx`
    pub async fn categories_visible(&self, ctx: AuthContext) -> Vec<String> {
        link::collect_categories(&self.list_visible(ctx).await)
    }

    /// Create a link under the next sequential id
    ///
    /// New links always start unstarred, at the end of the collection.
    pub async fn add(&self, draft: NewLink) -> VaultResult<Link> {
        let mut draft = draft.normalized()?;
        draft.starred = false;
        draft.starred_at = None;

        let _guard = self.write_lock.lock().await;
        let mut links = self.store.load().await?;

        let created = draft.into_link(link::next_id(&links));
        links.push(created.clone());
        self.store.replace(&links).await?;

        info!(link_id = %created.id, "link created");
        Ok(created)
    }

    /// Replace the content of link `id` with `draft`
    ///
    /// Star state is kept, so the link keeps its place in the ordering.
    pub async fn update(&self, id: &str, draft: NewLink) -> VaultResult<Link> {
        let draft = draft.normalized()?;

        let _guard = self.write_lock.lock().await;
        let mut links = self.store.load().await?;

        let existing = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found(id))?;
        existing.apply(draft);
        let updated = existing.clone();

        self.store.replace(&links).await?;

        info!(link_id = %id, "link updated");
        Ok(updated)
    }

    /// Remove link `id`; false when there was nothing to remove
    pub async fn delete(&self, id: &str) -> VaultResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut links = self.store.load().await?;

        let before = links.len();
        links.retain(|l| l.id != id);
        if links.len() == before {
            debug!(link_id = %id, "delete of unknown link ignored");
            return Ok(false);
        }

        self.store.replace(&links).await?;

        info!(link_id = %id, "link deleted");
        Ok(true)
    }

    /// Flip the star on link `id` and re-sort the collection
    ///
    /// A new star time is strictly greater than every existing one, so the
    /// link just starred is always first even within the same millisecond.
    pub async fn toggle_star(&self, id: &str) -> VaultResult<Link> {
        let _guard = self.write_lock.lock().await;
        let mut links = self.store.load().await?;

        let newest = links.iter().filter_map(|l| l.starred_at).max();
        let target = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found(id))?;

        if target.starred {
            target.starred = false;
            target.starred_at = None;
        } else {
            let now = Utc::now().timestamp_millis();
            target.starred = true;
            target.starred_at = Some(newest.map_or(now, |n| now.max(n.saturating_add(1))));
        }
        let toggled = target.clone();

        link::sort_starred_first(&mut links);
        self.store.replace(&links).await?;

        info!(link_id = %id, starred = toggled.starred, "link star toggled");
        Ok(toggled)
    }

    /// Discard the collection and store `drafts` under ids `"1"`, `"2"`, ...
    ///
    /// Every record is validated before anything is written; one bad record
    /// rejects the whole import. Records keep their own star state and are
    /// stored in the starred ordering; ids follow input order.
    pub async fn replace_all(&self, drafts: Vec<NewLink>) -> VaultResult<usize> {
        let mut links = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .normalized()
                    .map(|d| d.into_link((index + 1).to_string()))
                    .map_err(|e| ValidationError::InvalidRecord {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        link::sort_starred_first(&mut links);

        let _guard = self.write_lock.lock().await;
        self.store.replace(&links).await?;

        info!(count = links.len(), "link collection replaced");
        Ok(links.len())
    }

    /// Snapshot of the whole collection for download
    ///
    /// Unlike [`list`](Self::list), a store failure is an error here: an
    /// empty export would look like a successful backup.
    pub async fn export(&self) -> VaultResult<ExportDocument> {
        let links = self.store.load().await?;
        Ok(ExportDocument {
            links,
            export_date: Utc::now(),
        })
    }
}

fn not_found(id: &str) -> crate::core::VaultError {
    LinkError::NotFound { id: id.to_string() }.into()
}
