//! x86-64 architecture-specific components.
//!
//! - [`encoder`]: instruction construction and AT&T formatting via iced-x86
//! - [`backend`]: the [`Backend`](crate::codegen::Backend) implementation

pub mod backend;
pub mod encoder;

pub use backend::X64Backend;
pub use encoder::X64Encoder;
