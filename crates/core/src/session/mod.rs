pub mod review_session;
pub mod session_event;
pub mod session_logger;
