pub mod discarded_logger;
pub mod logger;

pub use discarded_logger::DiscardedLogger;
pub use logger::init_logging;
