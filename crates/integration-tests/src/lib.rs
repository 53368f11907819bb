//! Shared fixtures for the cross-crate test targets under `tests/`.

use rc_core::{VehicleRecord, ViewerId};

pub const VIEWER: &str = "viewer-a";

pub fn viewer() -> ViewerId {
    ViewerId::from(VIEWER)
}

/// The two-vehicle catalog used by the end-to-end scenario.
pub fn scenario_catalog() -> Vec<VehicleRecord> {
    vec![
        VehicleRecord::new(1, "Toyota", "RAV4", "SUV", 2022, 20000.0, 5)
            .with_rating(4.2)
            .with_availability(true)
            .with_likes(3, false),
        VehicleRecord::new(2, "BMW", "Serie 3", "Berline", 2019, 60000.0, 4)
            .with_rating(3.1)
            .with_availability(false),
    ]
}

/// A broader catalog covering every filter dimension.
pub fn showroom() -> Vec<VehicleRecord> {
    vec![
        VehicleRecord::new(1, "Toyota", "RAV4", "SUV", 2022, 20000.0, 5)
            .with_rating(4.2)
            .with_feature("gps", true)
            .with_feature("airConditioning", true),
        VehicleRecord::new(2, "BMW", "Serie 3", "Berline", 2019, 60000.0, 4)
            .with_rating(3.1)
            .with_availability(false)
            .with_feature("gps", true)
            .with_feature("bluetooth", true),
        VehicleRecord::new(3, "Hyundai", "H1", "Minibus", 2018, 45000.0, 12)
            .with_feature("airConditioning", true),
        VehicleRecord::new(4, "Kia", "Picanto", "Citadine", 2021, 12000.0, 4)
            .with_rating(4.8)
            .with_feature("bluetooth", true)
            .with_feature("airConditioning", false),
        VehicleRecord::new(5, "Toyota", "Land Cruiser", "4x4", 2020, 85000.0, 7)
            .with_rating(4.6)
            .with_feature("gps", true)
            .with_feature("bluetooth", true)
            .with_feature("airConditioning", true),
        VehicleRecord::new(6, "Peugeot", "208", "Citadine", 2023, 15000.0, 5)
            .with_rating(0.0)
            .with_availability(false),
    ]
}
