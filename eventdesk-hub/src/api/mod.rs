//! HTTP API handlers for eventdesk-hub

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod devices;
pub mod expenses;
pub mod health;
pub mod notifications;
pub mod rota;
pub mod sse;
pub mod tags;
pub mod team;

pub use attendance::attendance_routes;
pub use auth::CurrentOwner;
pub use dashboard::dashboard_routes;
pub use devices::device_routes;
pub use expenses::expense_routes;
pub use health::health_routes;
pub use notifications::notification_routes;
pub use rota::rota_routes;
pub use sse::event_stream;
pub use tags::tag_routes;
pub use team::team_routes;
