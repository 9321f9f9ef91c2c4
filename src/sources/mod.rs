//! Module source discovery.

pub mod catalog;

pub use catalog::{compute_catalog, CatalogOptions, RECOGNIZED_TREES};
