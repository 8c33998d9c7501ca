//! Core type definitions used across the BlogDesk workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse, Pagination};
pub use sorting::{SortDirection, SortField};
