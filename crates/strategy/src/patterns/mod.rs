pub mod sweep;
pub mod wick;

pub use sweep::SweepRejectDetector;
pub use wick::WickRejectionDetector;
