// Utility functions

pub mod logger;
pub mod response;

pub use logger::*;
pub use response::*;
