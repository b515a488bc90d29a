//! Request handlers, grouped by resource.

pub mod milestone;
pub mod payment;
pub mod project;
