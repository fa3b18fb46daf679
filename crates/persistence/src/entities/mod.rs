//! Database entity definitions (row mappings).

pub mod check_in;
pub mod device_token;
pub mod game;
pub mod group;
pub mod invite;
pub mod park;
pub mod queue;
pub mod user;

pub use check_in::CheckInEntity;
pub use device_token::DeviceTokenEntity;
pub use game::{GameEntity, GameParticipantEntity};
pub use group::{FriendGroupEntity, GroupMemberEntity};
pub use invite::{GameInviteEntity, InviteRecipientEntity, InviteTypeDb};
pub use park::{CourtEntity, ParkEntity, ParkStatusDb, SportTypeDb};
pub use queue::QueueEntryEntity;
pub use user::UserEntity;
