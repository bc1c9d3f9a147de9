//! Card data model for Cardforge
//!
//! This module defines the record behind an identity card, the closed set of
//! visual templates, and the photo payload shown on the card.
//!
//! # Architecture
//!
//! - `record.rs` - `CardRecord` and the `CardField` names used by the form
//! - `template.rs` - The three cosmetic card templates
//! - `photo.rs` - Uploaded photo payload with a decoded, cover-cropped image

mod photo;
mod record;
mod template;

pub use photo::Photo;
pub use record::{CardField, CardRecord};
pub use template::Template;
