//! Issued-code notifications
//!
//! The verification engine never talks to a delivery channel directly. It
//! pushes an [`IssuedCodeEvent`] into a bounded queue and returns; a separate
//! [`Notifier`] task drains the queue into a [`NotificationSink`]. A slow or
//! failing sink therefore cannot delay or fail issuance.

mod notifier;

pub use notifier::{
    IssuedCodeEvent, NotificationQueue, NotificationSink, NotificationStatus, Notifier,
    NotifierReport,
};
