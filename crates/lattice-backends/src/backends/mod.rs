//! Backend implementations for different execution targets
//!
//! This module contains:
//! - `common` - Shared loading and op execution infrastructure
//! - `fallback` - Pure software backend (always available)
//! - `portable` - Portable precompiled backend
//! - `accelerated` - Device-accelerated backend

pub mod accelerated;
pub mod common;
pub mod fallback;
pub mod portable;

// Re-export backends
pub use accelerated::AcceleratedBackend;
pub use fallback::FallbackBackend;
pub use portable::PortableBackend;
