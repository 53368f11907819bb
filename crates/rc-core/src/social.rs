//! # Social Interaction Store
//!
//! Holds the screen's working catalog and applies likes, comments, replies
//! and shares to it. Every mutation is a synchronous read-modify-write that
//! either succeeds completely or leaves the catalog untouched.
//!
//! The store is local-only: updates are applied immediately and there is no
//! pending/confirmed state. [`SocialInteractionStore::sync_catalog`] replaces
//! the catalog wholesale, so local mutations that the upstream snapshot does
//! not carry are discarded.

use std::collections::{BTreeSet, HashMap};

use crate::criteria::FilterCriteria;
use crate::error::{CoreError, Result};
use crate::filter::CatalogFilterEngine;
use crate::interaction::{Interaction, ShareChannel};
use crate::models::{CommentId, VehicleId, VehicleRecord, ViewerId};
use crate::traits::{Clock, SystemClock};

/// Default upper bound on comment length, in characters.
pub const DEFAULT_MAX_COMMENT_LEN: usize = 1000;

/// Host-supplied knobs for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePolicy {
    /// The viewer whose like flag the records expose.
    pub viewer: ViewerId,
    pub max_comment_len: usize,
}

impl StorePolicy {
    pub fn new(viewer: impl Into<ViewerId>) -> Self {
        Self {
            viewer: viewer.into(),
            max_comment_len: DEFAULT_MAX_COMMENT_LEN,
        }
    }

    pub fn with_max_comment_len(mut self, max_comment_len: usize) -> Self {
        self.max_comment_len = max_comment_len;
        self
    }
}

/// Likes on one vehicle: an anonymous count carried over from the snapshot
/// plus the viewers known to have liked it.
#[derive(Debug, Clone, Default)]
struct LikeLedger {
    others: u64,
    viewers: BTreeSet<ViewerId>,
}

impl LikeLedger {
    fn seed(record: &VehicleRecord, viewer: &ViewerId) -> Self {
        let mut ledger = Self {
            others: record.total_likes,
            viewers: BTreeSet::new(),
        };
        if record.is_liked_by_viewer {
            if record.total_likes == 0 {
                tracing::warn!(
                    vehicle_id = %record.id,
                    "liked by viewer but totalLikes is 0, counting the viewer's like"
                );
            }
            ledger.others = ledger.others.saturating_sub(1);
            ledger.viewers.insert(viewer.clone());
        }
        ledger
    }

    /// Flips the viewer's like. Returns the new state; a like that would
    /// push the total past `u64::MAX` is refused and nothing changes.
    fn toggle(&mut self, viewer: &ViewerId) -> Result<bool> {
        if self.viewers.remove(viewer) {
            return Ok(false);
        }
        if self.total().checked_add(1).is_none() {
            return Err(CoreError::validation("like counter is at its ceiling"));
        }
        self.viewers.insert(viewer.clone());
        Ok(true)
    }

    fn contains(&self, viewer: &ViewerId) -> bool {
        self.viewers.contains(viewer)
    }

    fn total(&self) -> u64 {
        self.others.saturating_add(self.viewers.len() as u64)
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    record: VehicleRecord,
    likes: LikeLedger,
}

impl CatalogEntry {
    fn new(mut record: VehicleRecord, viewer: &ViewerId) -> Self {
        let roots = record.comments.root_count() as u64;
        if record.total_comments != roots {
            tracing::warn!(
                vehicle_id = %record.id,
                reported = record.total_comments,
                present = roots,
                "comment counter disagrees with thread, using thread"
            );
            record.total_comments = roots;
        }
        let likes = LikeLedger::seed(&record, viewer);
        let mut entry = Self { record, likes };
        entry.refresh_likes(viewer);
        entry
    }

    fn refresh_likes(&mut self, viewer: &ViewerId) {
        self.record.total_likes = self.likes.total();
        self.record.is_liked_by_viewer = self.likes.contains(viewer);
    }
}

/// Per-vehicle social state for one mounted screen.
pub struct SocialInteractionStore {
    policy: StorePolicy,
    entries: Vec<CatalogEntry>,
    index: HashMap<VehicleId, usize>,
    clock: Box<dyn Clock>,
}

impl SocialInteractionStore {
    pub fn new(catalog: Vec<VehicleRecord>, policy: StorePolicy) -> Self {
        Self::with_clock(catalog, policy, Box::new(SystemClock))
    }

    pub fn with_clock(
        catalog: Vec<VehicleRecord>,
        policy: StorePolicy,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut store = Self {
            policy,
            entries: Vec::new(),
            index: HashMap::new(),
            clock,
        };
        store.sync_catalog(catalog);
        store
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, vehicle_id: VehicleId) -> Option<&VehicleRecord> {
        self.index.get(&vehicle_id).map(|&idx| &self.entries[idx].record)
    }

    /// Current records in catalog order.
    pub fn records(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Owned copy of the current catalog.
    pub fn catalog(&self) -> Vec<VehicleRecord> {
        self.records().cloned().collect()
    }

    /// Runs the filter engine over the live catalog.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<VehicleRecord> {
        CatalogFilterEngine::select(self.records(), criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether `viewer` is known to like the vehicle.
    pub fn is_liked_by(&self, vehicle_id: VehicleId, viewer: &ViewerId) -> Result<bool> {
        let idx = self.position(vehicle_id)?;
        Ok(self.entries[idx].likes.contains(viewer))
    }

    /// Replaces the working catalog. Local mutations are not carried over;
    /// a repeated id keeps its first occurrence.
    pub fn sync_catalog(&mut self, catalog: Vec<VehicleRecord>) {
        let incoming = catalog.len();
        self.entries.clear();
        self.index.clear();
        for record in catalog {
            if self.index.contains_key(&record.id) {
                tracing::warn!(vehicle_id = %record.id, "duplicate vehicle in snapshot, skipped");
                continue;
            }
            self.index.insert(record.id, self.entries.len());
            self.entries.push(CatalogEntry::new(record, &self.policy.viewer));
        }
        tracing::debug!(incoming, loaded = self.entries.len(), "catalog synced");
    }

    /// Flips `viewer`'s like on a vehicle and adjusts `totalLikes` by one.
    ///
    /// `isLikedByViewer` on the returned record always describes the store's
    /// configured viewer ([`StorePolicy::viewer`]). Toggling on behalf of any
    /// other viewer changes `totalLikes` only; use [`Self::is_liked_by`] to
    /// read that viewer's state.
    pub fn toggle_like(&mut self, vehicle_id: VehicleId, viewer: &ViewerId) -> Result<VehicleRecord> {
        let idx = self.position(vehicle_id)?;
        let entry = &mut self.entries[idx];
        let liked = entry.likes.toggle(viewer).inspect_err(|_| {
            tracing::warn!(%vehicle_id, %viewer, "like rejected, counter at ceiling");
        })?;
        entry.refresh_likes(&self.policy.viewer);
        tracing::debug!(
            %vehicle_id,
            %viewer,
            liked,
            total_likes = entry.record.total_likes,
            "like toggled"
        );
        Ok(entry.record.clone())
    }

    /// Appends a top-level comment and bumps `totalComments` by one.
    pub fn add_comment(
        &mut self,
        vehicle_id: VehicleId,
        author: &ViewerId,
        text: &str,
    ) -> Result<VehicleRecord> {
        let idx = self.position(vehicle_id)?;
        let text = self.checked_text(vehicle_id, text)?;
        let now = self.clock.now();

        let record = &mut self.entries[idx].record;
        let comment_id = record
            .comments
            .push_comment(author.clone(), text, now)
            .inspect_err(|_| {
                tracing::warn!(%vehicle_id, "comment rejected, no ids left");
            })?;
        record.total_comments = record.comments.root_count() as u64;
        tracing::debug!(
            %vehicle_id,
            %comment_id,
            total_comments = record.total_comments,
            "comment added"
        );
        Ok(record.clone())
    }

    /// Appends a reply under an existing comment. Replies are nested
    /// display-only and leave `totalComments` unchanged.
    pub fn add_reply(
        &mut self,
        vehicle_id: VehicleId,
        parent: CommentId,
        author: &ViewerId,
        text: &str,
    ) -> Result<VehicleRecord> {
        let idx = self.position(vehicle_id)?;
        let text = self.checked_text(vehicle_id, text)?;
        let now = self.clock.now();

        let record = &mut self.entries[idx].record;
        let comment_id = record
            .comments
            .push_reply(parent, author.clone(), text, now)
            .inspect_err(|err| {
                tracing::warn!(%vehicle_id, %parent, error = %err, "reply rejected");
            })?;
        tracing::debug!(%vehicle_id, %parent, %comment_id, "reply added");
        Ok(record.clone())
    }

    /// Counts one share. The channel is not interpreted.
    pub fn record_share(
        &mut self,
        vehicle_id: VehicleId,
        channel: ShareChannel,
    ) -> Result<VehicleRecord> {
        let idx = self.position(vehicle_id)?;
        let record = &mut self.entries[idx].record;
        record.total_shares = record.total_shares.checked_add(1).ok_or_else(|| {
            tracing::warn!(%vehicle_id, "share rejected, counter at ceiling");
            CoreError::validation("share counter is at its ceiling")
        })?;
        tracing::debug!(
            %vehicle_id,
            %channel,
            total_shares = record.total_shares,
            "share recorded"
        );
        Ok(record.clone())
    }

    /// Applies one queued gesture.
    pub fn dispatch(&mut self, interaction: &Interaction) -> Result<VehicleRecord> {
        match interaction {
            Interaction::Like {
                vehicle_id,
                viewer_id,
            } => self.toggle_like(*vehicle_id, viewer_id),
            Interaction::Comment {
                vehicle_id,
                author_id,
                text,
            } => self.add_comment(*vehicle_id, author_id, text),
            Interaction::Reply {
                vehicle_id,
                parent_id,
                author_id,
                text,
            } => self.add_reply(*vehicle_id, *parent_id, author_id, text),
            Interaction::Share {
                vehicle_id,
                channel,
            } => self.record_share(*vehicle_id, *channel),
        }
    }

    fn position(&self, vehicle_id: VehicleId) -> Result<usize> {
        self.index.get(&vehicle_id).copied().ok_or_else(|| {
            tracing::warn!(%vehicle_id, "interaction on unknown vehicle");
            CoreError::vehicle_not_found(vehicle_id)
        })
    }

    fn checked_text(&self, vehicle_id: VehicleId, text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::warn!(%vehicle_id, "blank comment rejected");
            return Err(CoreError::validation("comment text must not be empty"));
        }
        let chars = trimmed.chars().count();
        if chars > self.policy.max_comment_len {
            tracing::warn!(%vehicle_id, chars, "oversized comment rejected");
            return Err(CoreError::validation(format!(
                "comment is {} characters, the limit is {}",
                chars, self.policy.max_comment_len
            )));
        }
        Ok(trimmed.to_string())
    }
}

impl std::fmt::Debug for SocialInteractionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialInteractionStore")
            .field("policy", &self.policy)
            .field("vehicles", &self.entries.len())
            .finish_non_exhaustive()
    }
}
