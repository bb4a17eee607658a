pub mod constants;
pub mod progress;
pub mod rounding;

pub use constants::*;
pub use progress::ProgressReporter;
pub use rounding::round_to_tenths;
