//! Booking marketplace backend: accounts, photographer listings, bookings, reviews, and the
//! report moderation pipeline.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod store;
pub mod telemetry;
