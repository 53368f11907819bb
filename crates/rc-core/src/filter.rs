//! # Catalog Filter Engine
//!
//! Pure predicate evaluation over a catalog. The engine holds no state:
//! the same catalog and criteria always produce the same subsequence, in
//! catalog order.

use crate::criteria::FilterCriteria;
use crate::models::VehicleRecord;

/// Narrows a catalog to the vehicles accepted by every active dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFilterEngine;

impl CatalogFilterEngine {
    /// Returns the matching vehicles, preserving catalog order.
    pub fn apply(catalog: &[VehicleRecord], criteria: &FilterCriteria) -> Vec<VehicleRecord> {
        Self::select(catalog, criteria).into_iter().cloned().collect()
    }

    /// Borrowing variant of [`CatalogFilterEngine::apply`].
    pub fn select<'a, I>(catalog: I, criteria: &FilterCriteria) -> Vec<&'a VehicleRecord>
    where
        I: IntoIterator<Item = &'a VehicleRecord>,
    {
        let mut total = 0usize;
        let selected: Vec<&VehicleRecord> = catalog
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|v| Self::matches(v, criteria))
            .collect();
        tracing::trace!(total, matched = selected.len(), "catalog filtered");
        selected
    }

    /// True when the vehicle passes every active dimension.
    pub fn matches(vehicle: &VehicleRecord, criteria: &FilterCriteria) -> bool {
        price_ok(vehicle, criteria)
            && year_ok(vehicle, criteria)
            && passengers_ok(vehicle, criteria)
            && rating_ok(vehicle, criteria)
            && type_ok(vehicle, criteria)
            && brand_ok(vehicle, criteria)
            && features_ok(vehicle, criteria)
            && availability_ok(vehicle, criteria)
    }
}

fn price_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.price_range.is_none_or(|r| r.contains(v.price_per_day))
}

fn year_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.year_range.is_none_or(|r| r.contains(v.year))
}

fn passengers_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.passenger_range.is_none_or(|r| r.contains(v.passenger_capacity))
        && c.required_capacity.is_none_or(|n| v.passenger_capacity >= n)
}

// A vehicle without a rating fails any active rating constraint.
fn rating_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    if c.min_rating.is_none() && c.rating_range.is_none() {
        return true;
    }
    let Some(rating) = v.rating else {
        return false;
    };
    c.min_rating.is_none_or(|min| rating >= min) && c.rating_range.is_none_or(|r| r.contains(rating))
}

fn type_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.types.is_empty() || c.types.contains(&v.vehicle_type)
}

fn brand_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.brands.is_empty() || c.brands.contains(&v.brand)
}

fn features_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.features.iter().all(|f| v.has_feature(f))
}

fn availability_ok(v: &VehicleRecord, c: &FilterCriteria) -> bool {
    c.available_only != Some(true) || v.availability
}
