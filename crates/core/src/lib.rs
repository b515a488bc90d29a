//! VEFA progress and payment tracking domain core.
//!
//! Pure domain logic for future-completion property sales (VEFA): a project
//! is divided into ordered construction milestones, each carrying a payment
//! obligation, a completion state, and evidentiary proofs. The crate models
//! the milestone ledger, the project-level aggregation, and the
//! payment-submission workflow.
//!
//! The crate contains no I/O and no async; callers own transport and any
//! persistence, and pass pre-loaded data in.

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod milestone;
pub mod payment;
pub mod progress;
pub mod project;
pub mod proof;
pub mod types;
pub mod workflow;
