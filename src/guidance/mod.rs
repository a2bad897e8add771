//! Tiered safety guidance

pub mod table;

pub use table::{lookup, lookup_in, GuidanceTier, SAFETY_GUIDE};
