//! Shared backend infrastructure
//!
//! This module contains:
//! - `loader` - Descriptor and weight loading with progress reporting
//! - `interpreter` - Elementwise op execution and plan compilation

pub mod interpreter;
pub mod loader;

pub use interpreter::{execute_ops, CompiledPlan};
pub use loader::{load_graph, LoadedGraph, DEFAULT_CHUNK_SIZE};
