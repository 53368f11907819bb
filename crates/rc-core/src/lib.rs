//! rental-console/crates/rc-core/src/lib.rs
//!
//! Catalog filtering and social-interaction state for the rental owner's
//! console. Pure in-memory logic: the host feeds catalog snapshots in and
//! renders what comes out.

pub mod comments;
pub mod criteria;
pub mod error;
pub mod filter;
pub mod interaction;
pub mod models;
pub mod social;
pub mod traits;

// Re-exporting for easier access in other crates
pub use comments::*;
pub use criteria::*;
pub use error::*;
pub use filter::*;
pub use interaction::*;
pub use models::*;
pub use social::*;
pub use traits::*;
