//! Domain models for the gateway.
//!
//! These types represent validated domain objects, separate from the wire
//! DTOs declared next to the route handlers.

pub mod listing;
pub mod user;

pub use listing::{DatasetListing, ListingPatch, QueryPage, SampleResult};
pub use user::User;
