//! Business services containing domain logic and use cases.

pub mod notification;
pub mod sweeper;
pub mod verification;

// Re-export commonly used types
pub use notification::{
    IssuedCodeEvent, NotificationQueue, NotificationSink, NotificationStatus, Notifier,
    NotifierReport,
};
pub use sweeper::{RetentionSweeper, RetentionSweeperConfig, SweepResult, SweeperHandle, SweeperReport};
pub use verification::{
    ActivationStatus, CodeGenerator, IssueOutcome, RandomCodeGenerator, RedeemOutcome,
    VerificationService, VerificationServiceConfig, VerificationStats,
};
