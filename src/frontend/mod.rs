//! Frontend: source bytes to a resolved instruction sequence.
//!
//! - [`loader`] decodes bytes, skipping comments and folding runs
//! - [`resolver`] pairs brackets and produces a [`ResolvedProgram`](crate::core::ResolvedProgram)

pub mod loader;
pub mod resolver;

pub use loader::{load, Loader};
pub use resolver::resolve;
