pub mod client;
pub mod error;
pub mod normalize;
pub mod predict;
pub mod types;

pub use client::EgovClient;
pub use error::EgovError;
pub use normalize::{normalize, WaitTimeRecord};
pub use predict::completion_window;
pub use types::{Office, ProcessingTimeReport, RangeBound, SubtypeReport};
