//! Hub services
//!
//! Shift ledger, tag registry, attendance feed and scan sessions, plus the
//! device bridge client and the supporting roster/expense projections.

pub mod attendance;
pub mod device_bridge;
pub mod expenses;
pub mod identity;
pub mod lighting;
pub mod roster;
pub mod scan_session;
pub mod shift_ledger;
pub mod tag_registry;

pub use attendance::{AttendanceCounts, AttendanceFeed, ScanOutcome};
pub use device_bridge::{BridgeError, DeviceBridge, ExclusiveBridge, HttpDeviceBridge};
pub use identity::{HeaderIdentityGate, IdentityGate};
pub use lighting::LightingController;
pub use scan_session::{ScanRegistry, SessionStatus};
