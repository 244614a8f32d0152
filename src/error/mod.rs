mod types;

pub use types::{ResizeError, Result};
