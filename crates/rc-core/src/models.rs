//! # Domain Models
//!
//! These structs represent the catalog entities of the rental console.
//! Field names serialize in camelCase so snapshots line up with the
//! console's JSON catalog payloads.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comments::CommentThread;
use crate::error::{CoreError, Result};

/// Highest rating a vehicle can carry.
pub const MAX_RATING: f64 = 5.0;

/// Numeric catalog identity of a vehicle. Unique and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VehicleId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the person interacting with the catalog (liking, commenting).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(String);

impl ViewerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ViewerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Comment identity, unique within one vehicle's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment as it is rendered: the node plus its nested replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author_id: ViewerId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// A vehicle in the owner's catalog together with its social counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: VehicleId,
    pub brand: String,
    pub model: String,
    /// Body type (e.g. "SUV", "Berline")
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub year: i32,
    pub price_per_day: f64,
    pub passenger_capacity: u32,
    /// 0 to 5 stars; unrated vehicles carry `None`
    #[serde(default)]
    pub rating: Option<f64>,
    pub availability: bool,
    /// Named capabilities such as "airConditioning", "gps", "bluetooth".
    #[serde(default)]
    pub feature_flags: BTreeMap<String, bool>,

    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_shares: u64,
    #[serde(default)]
    pub is_liked_by_viewer: bool,
    #[serde(default)]
    pub comments: CommentThread,
}

impl VehicleRecord {
    /// Builds an unrated, available vehicle with zeroed social counters.
    pub fn new(
        id: u64,
        brand: impl Into<String>,
        model: impl Into<String>,
        vehicle_type: impl Into<String>,
        year: i32,
        price_per_day: f64,
        passenger_capacity: u32,
    ) -> Self {
        Self {
            id: VehicleId(id),
            brand: brand.into(),
            model: model.into(),
            vehicle_type: vehicle_type.into(),
            year,
            price_per_day,
            passenger_capacity,
            rating: None,
            availability: true,
            feature_flags: BTreeMap::new(),
            total_likes: 0,
            total_comments: 0,
            total_shares: 0,
            is_liked_by_viewer: false,
            comments: CommentThread::default(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.availability = available;
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.feature_flags.insert(name.into(), enabled);
        self
    }

    pub fn with_likes(mut self, total_likes: u64, is_liked_by_viewer: bool) -> Self {
        self.total_likes = total_likes;
        self.is_liked_by_viewer = is_liked_by_viewer;
        self
    }

    /// True only when the flag is present and set.
    pub fn has_feature(&self, name: &str) -> bool {
        self.feature_flags.get(name).copied().unwrap_or(false)
    }

    /// Checks the data-model invariants of a freshly loaded record.
    pub fn validate(&self) -> Result<()> {
        if !self.price_per_day.is_finite() || self.price_per_day < 0.0 {
            return Err(CoreError::validation(format!(
                "vehicle {}: price per day must be a non-negative number, got {}",
                self.id, self.price_per_day
            )));
        }
        if self.passenger_capacity == 0 {
            return Err(CoreError::validation(format!(
                "vehicle {}: passenger capacity must be positive",
                self.id
            )));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(CoreError::validation(format!(
                    "vehicle {}: rating {} is outside 0-{}",
                    self.id, rating, MAX_RATING
                )));
            }
        }
        if self.is_liked_by_viewer && self.total_likes == 0 {
            return Err(CoreError::validation(format!(
                "vehicle {}: liked by viewer but total likes is 0",
                self.id
            )));
        }
        if self.total_comments != self.comments.root_count() as u64 {
            return Err(CoreError::validation(format!(
                "vehicle {}: totalComments is {} but {} comments are present",
                self.id,
                self.total_comments,
                self.comments.root_count()
            )));
        }
        if self.total_likes == u64::MAX || self.total_shares == u64::MAX {
            return Err(CoreError::validation(format!(
                "vehicle {}: social counters are at their ceiling",
                self.id
            )));
        }
        if self.comments.max_id() == Some(CommentId(u64::MAX)) {
            return Err(CoreError::validation(format!(
                "vehicle {}: comment id {} leaves no room for new comments",
                self.id,
                u64::MAX
            )));
        }
        if !self.comments.has_unique_ids() {
            return Err(CoreError::validation(format!(
                "vehicle {}: comment ids are not unique",
                self.id
            )));
        }
        Ok(())
    }
}

/// Validates every record plus catalog-wide id uniqueness.
pub fn validate_catalog(catalog: &[VehicleRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(catalog.len());
    for vehicle in catalog {
        vehicle.validate()?;
        if !seen.insert(vehicle.id) {
            return Err(CoreError::validation(format!(
                "duplicate vehicle id {}",
                vehicle.id
            )));
        }
    }
    Ok(())
}
