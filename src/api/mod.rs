//! # API Module
//!
//! Read endpoints over the stored calls.
//!
//! ## Modules
//!
//! - [`calls`] - Listing of calls and their compliance evaluation

pub mod calls;
pub mod routes;
