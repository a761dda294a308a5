//! Membership notification dispatch
//!
//! The engine only owns the trigger point: when an owner approves a
//! membership, a notice is handed to the configured [`Notifier`].
//! Delivery is fire-and-forget; a failing sink is logged and never rolls
//! back the approval that triggered it.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Payload for a membership-approved notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipApproved {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub club_id: Uuid,
    pub club_name: String,
}

#[derive(Debug, Error)]
#[error("notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Sink for membership notices
///
/// Implementations may hand off to a mailer, a queue, or anything else,
/// and may defer delivery.
pub trait Notifier: Send {
    fn membership_approved(&self, notice: &MembershipApproved) -> Result<(), NotifyError>;
}

/// Default sink: logs the notice payload via tracing
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn membership_approved(&self, notice: &MembershipApproved) -> Result<(), NotifyError> {
        let payload =
            serde_json::to_string(notice).map_err(|e| NotifyError(e.to_string()))?;
        info!(
            membership_id = %notice.membership_id,
            club = %notice.club_name,
            %payload,
            "membership approved"
        );
        Ok(())
    }
}

/// Sink that drops notices, for deployments with notifications disabled
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn membership_approved(&self, _notice: &MembershipApproved) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Sink that records notices in memory, for tests
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<MembershipApproved>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices dispatched so far
    pub fn sent(&self) -> Vec<MembershipApproved> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn membership_approved(&self, notice: &MembershipApproved) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(notice.clone());
        Ok(())
    }
}
