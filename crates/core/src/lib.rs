//! Rally Core Library
//!
//! Club registry, membership ledger, event catalog, and the registration
//! capacity engine for the Rally platform.

pub mod config;
pub mod engine;
pub mod error;
pub mod invariants;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod storage;

pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use models::*;
pub use notify::{
    LogNotifier, MembershipApproved, Notifier, NotifyError, NullNotifier, RecordingNotifier,
};
pub use permissions::*;
pub use storage::{
    ClubRepository, Database, EventRepository, MembershipRepository, RegistrationRepository,
    Storage, UserRepository,
};
