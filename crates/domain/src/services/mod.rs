//! Domain services for CourtHub.
//!
//! Services contain the decision logic that operates on domain models:
//! QR payload parsing, scan resolution, and invite recipient filtering.

pub mod notification;
pub mod qr;
pub mod recipients;
pub mod scan;

pub use notification::{
    InviteReceivedPayload, MockNotificationService, NotificationResult, NotificationService,
    NotificationType,
};

pub use qr::{parse, CheckInParams, QrAction};

pub use recipients::{resolve_recipients, RecipientList};

pub use scan::{
    CheckInService, GameService, ParkService, PromptReply, PromptRequest, ScanError, ScanLatch,
    ScanOutcome, ScanPrompts, ScanResolver, ScanUser,
};
