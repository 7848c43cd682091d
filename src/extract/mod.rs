//! Result extraction and normalization
//!
//! This module turns fetched listing pages into [`ResultItem`]s:
//! - Canonical search pages, including per-item detail lookups for
//!   attribution and publication date
//! - Satellite listings described by a [`SourceDescriptor`](crate::source::SourceDescriptor)
//! - Date normalization to `DD/MM/YYYY`

mod attribution;
mod canonical;
mod date;
mod document;
mod item;
mod satellite;

pub use attribution::{split_camel_case, Department, DepartmentDirectory};
pub use canonical::{read_declared_total, CanonicalEntry, CanonicalLayout, DetailInfo};
pub use date::{normalize_date, parse_date, DateError, DateLayout};
pub use document::{collect_anchors, element_text, Anchor};
pub use item::{Attribution, ResultItem, NOT_AVAILABLE};
pub use satellite::extract_satellite_page;
