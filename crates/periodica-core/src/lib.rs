//! Periodica Core
//!
//! Time index, duration, frame and naming types shared by the periodica
//! feature computers.

pub mod duration;
pub mod error;
pub mod frame;
pub mod index;
pub mod naming;

// Re-export commonly used types
pub use duration::*;
pub use error::*;
pub use frame::*;
pub use index::*;
pub use naming::*;
