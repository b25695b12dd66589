//! Standard observer implementations.

pub mod filter;
pub mod logging;

pub use filter::FilterObserver;
pub use logging::LoggingObserver;
