//! Verkada REST API endpoint implementations.

mod audit;
mod notifications;
mod request;
mod token;

pub use audit::get_audit_logs_page;
pub use notifications::get_notifications_page;
pub use request::send_request_with_retry;
pub use token::get_token;
