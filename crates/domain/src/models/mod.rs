//! Domain models for CourtHub.

pub mod check_in;
pub mod game;
pub mod group;
pub mod invite;
pub mod park;
pub mod user;

pub use check_in::CheckIn;
pub use game::Game;
pub use group::FriendGroup;
pub use invite::GameInvite;
pub use park::{Court, Park, ParkStatus, SportCategory, SportType};
pub use user::AppUser;
