//! Filter engine behaviour over whole catalogs: pass-through, conjunction,
//! monotonicity and idempotence.

use std::collections::BTreeSet;

use integration_tests::showroom;
use proptest::prelude::*;
use proptest::sample::subsequence;
use rc_core::{CatalogFilterEngine, FilterCriteria, InclusiveRange, VehicleRecord};

const BRANDS: &[&str] = &["Toyota", "BMW", "Kia", "Hyundai", "Peugeot"];
const TYPES: &[&str] = &["SUV", "Berline", "Citadine", "Minibus", "4x4"];
const FEATURES: &[&str] = &["gps", "bluetooth", "airConditioning"];

fn ids(vehicles: &[VehicleRecord]) -> Vec<u64> {
    vehicles.iter().map(|v| v.id.0).collect()
}

// ============================================================================
// Strategies
// ============================================================================

fn vehicle(id: u64) -> impl Strategy<Value = VehicleRecord> {
    (
        prop::sample::select(BRANDS),
        prop::sample::select(TYPES),
        2010i32..2025,
        0u32..100_000,
        1u32..15,
        prop::option::of(0u8..=50),
        any::<bool>(),
        prop::collection::vec(any::<bool>(), FEATURES.len()),
    )
        .prop_map(move |(brand, kind, year, price, seats, rating, available, flags)| {
            let mut v = VehicleRecord::new(id, brand, "Model", kind, year, price as f64, seats)
                .with_availability(available);
            v.rating = rating.map(|r| f64::from(r) / 10.0);
            for (name, on) in FEATURES.iter().zip(flags) {
                v = v.with_feature(*name, on);
            }
            v
        })
}

fn catalog() -> impl Strategy<Value = Vec<VehicleRecord>> {
    (0usize..12).prop_flat_map(|n| (0..n as u64).map(vehicle).collect::<Vec<_>>())
}

fn ordered<T: Ord + Copy>(a: T, b: T) -> (T, T) {
    (a.min(b), a.max(b))
}

fn string_set(pool: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<String>> {
    subsequence(pool, 0..=pool.len())
        .prop_map(|picked| picked.into_iter().map(str::to_string).collect::<BTreeSet<String>>())
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        (
            prop::option::of((0u32..100_000, 0u32..100_000)),
            prop::option::of((2010i32..2025, 2010i32..2025)),
            prop::option::of((1u32..15, 1u32..15)),
            prop::option::of((0u8..=50, 0u8..=50)),
        ),
        (string_set(TYPES), string_set(BRANDS), string_set(FEATURES)),
        (
            prop::option::of(1u32..15),
            prop::option::of(0u8..=50),
            prop::option::of(any::<bool>()),
        ),
    )
        .prop_map(|(ranges, sets, scalars)| {
            let (price, year, seats, rating) = ranges;
            let mut c = FilterCriteria::new();
            c.price_range = price
                .map(|(a, b)| ordered(a, b))
                .and_then(|(lo, hi)| InclusiveRange::new(lo as f64, hi as f64).ok());
            c.year_range = year
                .map(|(a, b)| ordered(a, b))
                .and_then(|(lo, hi)| InclusiveRange::new(lo, hi).ok());
            c.passenger_range = seats
                .map(|(a, b)| ordered(a, b))
                .and_then(|(lo, hi)| InclusiveRange::new(lo, hi).ok());
            c.rating_range = rating.map(|(a, b)| ordered(a, b)).and_then(|(lo, hi)| {
                InclusiveRange::new(f64::from(lo) / 10.0, f64::from(hi) / 10.0).ok()
            });
            (c.types, c.brands, c.features) = sets;
            let (capacity, min_rating, available_only) = scalars;
            c.required_capacity = capacity;
            c.min_rating = min_rating.map(|r| f64::from(r) / 10.0);
            c.available_only = available_only;
            c
        })
}

/// Intersects two ranges, falling back to `base` when they are disjoint.
fn narrow_range<T: rc_core::RangeBound>(
    base: Option<InclusiveRange<T>>,
    extra: Option<InclusiveRange<T>>,
) -> Option<InclusiveRange<T>> {
    match (base, extra) {
        (Some(b), Some(e)) => {
            let lo = if e.min() > b.min() { e.min() } else { b.min() };
            let hi = if e.max() < b.max() { e.max() } else { b.max() };
            InclusiveRange::new(lo, hi).ok().or(Some(b))
        }
        (None, e) => e,
        (b, None) => b,
    }
}

fn narrow_set(base: &BTreeSet<String>, extra: &BTreeSet<String>) -> BTreeSet<String> {
    if base.is_empty() {
        return extra.clone();
    }
    let common: BTreeSet<String> = base.intersection(extra).cloned().collect();
    if common.is_empty() {
        base.clone()
    } else {
        common
    }
}

/// Builds criteria at least as restrictive as `base` on every dimension.
fn narrow(base: &FilterCriteria, extra: &FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        price_range: narrow_range(base.price_range, extra.price_range),
        year_range: narrow_range(base.year_range, extra.year_range),
        passenger_range: narrow_range(base.passenger_range, extra.passenger_range),
        rating_range: narrow_range(base.rating_range, extra.rating_range),
        types: narrow_set(&base.types, &extra.types),
        brands: narrow_set(&base.brands, &extra.brands),
        features: base.features.union(&extra.features).cloned().collect(),
        required_capacity: match (base.required_capacity, extra.required_capacity) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        },
        min_rating: match (base.min_rating, extra.min_rating) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        },
        available_only: if base.available_only == Some(true) {
            Some(true)
        } else {
            extra.available_only
        },
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_unrestricted_criteria_pass_through(catalog in catalog()) {
        prop_assert_eq!(CatalogFilterEngine::apply(&catalog, &FilterCriteria::new()), catalog);
    }

    #[test]
    fn prop_seeded_criteria_pass_through(catalog in catalog()) {
        let seeded = FilterCriteria::seeded_from(&catalog);
        prop_assert_eq!(CatalogFilterEngine::apply(&catalog, &seeded), catalog);
    }

    #[test]
    fn prop_narrowing_never_grows_the_result(
        catalog in catalog(),
        base in criteria(),
        extra in criteria(),
    ) {
        let narrowed = narrow(&base, &extra);
        let wide = ids(&CatalogFilterEngine::apply(&catalog, &base));
        let tight = ids(&CatalogFilterEngine::apply(&catalog, &narrowed));

        prop_assert!(tight.len() <= wide.len());
        // Subsequence: every kept id appears in the wider result, in order.
        let mut wide_iter = wide.iter();
        for id in &tight {
            prop_assert!(wide_iter.any(|w| w == id), "{} missing from {:?}", id, wide);
        }
    }

    #[test]
    fn prop_apply_is_idempotent(catalog in catalog(), criteria in criteria()) {
        let once = CatalogFilterEngine::apply(&catalog, &criteria);
        prop_assert_eq!(&CatalogFilterEngine::apply(&catalog, &criteria), &once);
        prop_assert_eq!(CatalogFilterEngine::apply(&once, &criteria), once);
    }

    #[test]
    fn prop_result_preserves_catalog_order(catalog in catalog(), criteria in criteria()) {
        let result = ids(&CatalogFilterEngine::apply(&catalog, &criteria));
        prop_assert!(result.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Examples
// ============================================================================

#[test]
fn test_feature_conjunction() {
    let gps_only = vec![VehicleRecord::new(1, "Kia", "Rio", "Citadine", 2020, 10000.0, 4)
        .with_feature("gps", true)];

    let both = FilterCriteria::new().with_feature("gps").with_feature("bluetooth");
    assert!(CatalogFilterEngine::apply(&gps_only, &both).is_empty());

    let gps = FilterCriteria::new().with_feature("gps");
    assert_eq!(ids(&CatalogFilterEngine::apply(&gps_only, &gps)), vec![1]);
}

#[test]
fn test_feature_flag_set_false_counts_as_missing() {
    let criteria = FilterCriteria::new().with_feature("airConditioning");
    assert_eq!(ids(&CatalogFilterEngine::apply(&showroom(), &criteria)), vec![1, 3, 5]);
}

#[test]
fn test_combined_dimensions() {
    let criteria = FilterCriteria::new()
        .with_price_range(10000.0, 50000.0)
        .unwrap()
        .with_brand("Toyota")
        .with_brand("Kia")
        .with_min_rating(4.0)
        .with_available_only(true);
    assert_eq!(ids(&CatalogFilterEngine::apply(&showroom(), &criteria)), vec![1, 4]);
}

#[test]
fn test_zero_rating_is_a_rating() {
    let criteria = FilterCriteria::new().with_rating_range(0.0, 1.0).unwrap();
    assert_eq!(ids(&CatalogFilterEngine::apply(&showroom(), &criteria)), vec![6]);
}

#[test]
fn test_required_capacity_is_at_least() {
    let criteria = FilterCriteria::new().with_required_capacity(7);
    assert_eq!(ids(&CatalogFilterEngine::apply(&showroom(), &criteria)), vec![3, 5]);
}

#[test]
fn test_criteria_json_from_filter_panel() {
    let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
        "priceRange": { "min": 0, "max": 30000 },
        "types": [],
        "brands": [],
        "features": [],
        "minRating": 4
    }))
    .unwrap();
    assert_eq!(ids(&CatalogFilterEngine::apply(&showroom(), &criteria)), vec![1, 4]);
}
