pub mod progress;
pub mod sequence;
