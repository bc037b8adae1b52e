//! Backend and graph runner traits plus shared types

mod traits;
mod types;

pub use traits::{Backend, GraphRunner};
pub use types::{names, BackendOptions, GraphBuffer};
