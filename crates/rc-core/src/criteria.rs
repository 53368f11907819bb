//! # Filter Criteria
//!
//! The value object the filter panel hands to the engine. Empty sets and
//! `None` scalars impose no restriction. Ranges can only be built with
//! `min <= max`; an inverted range is rejected with
//! [`CoreError::MalformedCriteria`] instead of being swapped.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{VehicleRecord, MAX_RATING};

/// Values usable as range bounds.
pub trait RangeBound: PartialOrd + Copy + fmt::Display {}

impl<T: PartialOrd + Copy + fmt::Display> RangeBound for T {}

/// Closed interval `[min, max]`, always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawRange<T>",
    bound(deserialize = "T: Deserialize<'de> + RangeBound")
)]
pub struct InclusiveRange<T> {
    min: T,
    max: T,
}

#[derive(Deserialize)]
struct RawRange<T> {
    min: T,
    max: T,
}

impl<T: RangeBound> TryFrom<RawRange<T>> for InclusiveRange<T> {
    type Error = CoreError;

    fn try_from(raw: RawRange<T>) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl<T: RangeBound> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Result<Self> {
        Self::checked("range", min, max)
    }

    /// Like [`InclusiveRange::new`] but names the dimension in the error.
    pub fn checked(dimension: &str, min: T, max: T) -> Result<Self> {
        match min.partial_cmp(&max) {
            Some(Ordering::Less | Ordering::Equal) => Ok(Self { min, max }),
            _ => Err(CoreError::malformed(dimension, min, max)),
        }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// True when every value of `self` also lies in `other`.
    pub fn is_within(&self, other: &Self) -> bool {
        other.min <= self.min && self.max <= other.max
    }
}

/// One filterable aspect of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Price,
    Year,
    Passengers,
    Rating,
    Type,
    Brand,
    Features,
    Availability,
}

/// Combined user-selected constraints narrowing the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub price_range: Option<InclusiveRange<f64>>,
    pub year_range: Option<InclusiveRange<i32>>,
    pub passenger_range: Option<InclusiveRange<u32>>,
    pub rating_range: Option<InclusiveRange<f64>>,

    pub types: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    /// Required feature flags; a vehicle must have all of them.
    pub features: BTreeSet<String>,

    /// "At least N passengers"
    pub required_capacity: Option<u32>,
    pub min_rating: Option<f64>,
    /// `Some(true)` hides unavailable vehicles; `Some(false)` and `None` do not.
    pub available_only: Option<bool>,
}

impl FilterCriteria {
    /// Criteria with every dimension inactive.
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter panel's opening state: ranges seeded from the catalog's
    /// observed bounds, everything else inactive. Rating is left unset so
    /// unrated vehicles stay visible.
    pub fn seeded_from(catalog: &[VehicleRecord]) -> Self {
        match CatalogBounds::observe(catalog) {
            Some(bounds) => Self {
                price_range: Some(bounds.price),
                year_range: Some(bounds.year),
                passenger_range: Some(bounds.passengers),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Result<Self> {
        self.price_range = Some(InclusiveRange::checked("price", min, max)?);
        Ok(self)
    }

    pub fn with_year_range(mut self, min: i32, max: i32) -> Result<Self> {
        self.year_range = Some(InclusiveRange::checked("year", min, max)?);
        Ok(self)
    }

    pub fn with_passenger_range(mut self, min: u32, max: u32) -> Result<Self> {
        self.passenger_range = Some(InclusiveRange::checked("passengers", min, max)?);
        Ok(self)
    }

    pub fn with_rating_range(mut self, min: f64, max: f64) -> Result<Self> {
        self.rating_range = Some(InclusiveRange::checked("rating", min, max)?);
        Ok(self)
    }

    pub fn with_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.types.insert(vehicle_type.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn with_required_capacity(mut self, passengers: u32) -> Self {
        self.required_capacity = Some(passengers);
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_available_only(mut self, available_only: bool) -> Self {
        self.available_only = Some(available_only);
        self
    }

    /// Checks the scalar fields; ranges are well-formed by construction.
    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.min_rating {
            if rating.is_nan() {
                return Err(CoreError::validation("minimum rating is not a number"));
            }
            if rating > MAX_RATING {
                tracing::debug!(rating, "minimum rating above {MAX_RATING} matches nothing");
            }
        }
        Ok(())
    }

    /// Dimensions that currently restrict the catalog, in display order.
    pub fn active_dimensions(&self) -> Vec<FilterDimension> {
        let mut active = Vec::new();
        if self.price_range.is_some() {
            active.push(FilterDimension::Price);
        }
        if self.year_range.is_some() {
            active.push(FilterDimension::Year);
        }
        if self.passenger_range.is_some() || self.required_capacity.is_some() {
            active.push(FilterDimension::Passengers);
        }
        if self.rating_range.is_some() || self.min_rating.is_some() {
            active.push(FilterDimension::Rating);
        }
        if !self.types.is_empty() {
            active.push(FilterDimension::Type);
        }
        if !self.brands.is_empty() {
            active.push(FilterDimension::Brand);
        }
        if !self.features.is_empty() {
            active.push(FilterDimension::Features);
        }
        if self.available_only == Some(true) {
            active.push(FilterDimension::Availability);
        }
        active
    }

    pub fn is_unrestricted(&self) -> bool {
        self.active_dimensions().is_empty()
    }
}

/// Observed min/max of the catalog's numeric attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogBounds {
    pub price: InclusiveRange<f64>,
    pub year: InclusiveRange<i32>,
    pub passengers: InclusiveRange<u32>,
    /// Bounds over rated vehicles only; `None` when nothing is rated.
    pub rating: Option<InclusiveRange<f64>>,
}

impl CatalogBounds {
    /// `None` for an empty catalog.
    pub fn observe(catalog: &[VehicleRecord]) -> Option<Self> {
        let first = catalog.first()?;

        let mut price = (first.price_per_day, first.price_per_day);
        let mut year = (first.year, first.year);
        let mut passengers = (first.passenger_capacity, first.passenger_capacity);
        let mut rating: Option<(f64, f64)> = None;

        for v in catalog {
            price = (price.0.min(v.price_per_day), price.1.max(v.price_per_day));
            year = (year.0.min(v.year), year.1.max(v.year));
            passengers = (
                passengers.0.min(v.passenger_capacity),
                passengers.1.max(v.passenger_capacity),
            );
            if let Some(r) = v.rating {
                rating = Some(match rating {
                    Some((lo, hi)) => (lo.min(r), hi.max(r)),
                    None => (r, r),
                });
            }
        }

        Some(Self {
            price: InclusiveRange::checked("price", price.0, price.1).ok()?,
            year: InclusiveRange::checked("year", year.0, year.1).ok()?,
            passengers: InclusiveRange::checked("passengers", passengers.0, passengers.1).ok()?,
            rating: rating.and_then(|(lo, hi)| InclusiveRange::checked("rating", lo, hi).ok()),
        })
    }
}
