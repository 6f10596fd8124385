//! Listing computation.
//!
//! - [`ListEntry`] and the summaries ([`ObjectSummary`], [`VersionSummary`],
//!   [`UploadSummary`]) -- ordered listing entries
//! - [`aggregate`] / [`filter`] -- prefix filtering and common-prefix roll-up
//! - [`skip_to_marker`] / [`paginate`] / [`list_page`] -- marker handling and
//!   page cutting with next-marker computation

mod aggregate;
mod entry;
mod paginate;

pub use aggregate::{ListingItem, aggregate, common_prefix_of, filter};
pub use entry::{ListEntry, ObjectSummary, UploadSummary, VersionSummary};
pub use paginate::{ListingPage, Marker, list_page, paginate, skip_to_marker};
