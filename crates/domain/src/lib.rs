//! Domain layer for the CourtHub backend.
//!
//! This crate contains:
//! - Domain models (AppUser, Park, Game, CheckIn, GameInvite)
//! - The core decision logic: QR payload parsing, scan resolution,
//!   invite recipient filtering
//! - Service traits for the external collaborators the logic depends on

pub mod models;
pub mod services;
