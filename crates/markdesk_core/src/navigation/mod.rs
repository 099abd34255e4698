//! Route resolution and the selection/navigation state machine.
//!
//! # Responsibility
//! - Map locations to routes and back to canonical paths.
//! - Decide which document the editor shows and when it may change.
//!
//! # Invariants
//! - Unsaved edits are never dropped without an explicit confirmation.

pub mod confirm;
pub mod controller;
pub mod route;
