pub mod lifecycle;
pub mod mexc;
pub mod pacer;
pub mod scanner;
pub mod universe;

pub use lifecycle::{CycleSummary, ScanHandle, ScanLoop};
pub use mexc::MexcClient;
pub use scanner::{ScanCycle, ScanSettings, Scanner};
pub use universe::{select_universe, UniverseConfig};
