//! File operations module for Cardforge
//!
//! Native dialogs for picking photos and download locations.

pub mod dialogs;
