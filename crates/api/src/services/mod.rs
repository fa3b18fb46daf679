//! Application services backing the domain traits.

pub mod fcm;
pub mod stores;

pub use fcm::FcmNotificationService;
pub use stores::{PgCheckInService, PgGameService, PgParkService};
