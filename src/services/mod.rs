pub mod backend;
pub mod calendar;
pub mod flow;
pub mod http;
pub mod loaders;
pub mod submitter;

pub use backend::{BackendError, BookingBackend};
pub use flow::{BookingSession, Clock};
pub use http::HttpBackend;
