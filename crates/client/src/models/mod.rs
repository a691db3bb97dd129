//! Wire models for the Verkada API.

pub mod audit;
pub mod notifications;
pub mod token;
pub mod window;

pub use audit::{AuditLogEvent, AuditLogPage};
pub use notifications::{Notification, NotificationPage};
pub use token::TokenResponse;
pub use window::TimeWindow;
