//! Repository layer for database access.

pub mod check_in;
pub mod device_token;
pub mod game;
pub mod group;
pub mod invite;
pub mod park;
pub mod queue;
pub mod user;

pub use check_in::CheckInRepository;
pub use device_token::DeviceTokenRepository;
pub use game::GameRepository;
pub use group::GroupRepository;
pub use invite::InviteRepository;
pub use park::ParkRepository;
pub use queue::QueueRepository;
pub use user::UserRepository;
