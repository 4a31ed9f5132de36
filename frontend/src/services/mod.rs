//! Upload session and remote services.
//!
//! # Services
//!
//! - [`session`] - Record list, lifecycle rules and the sequential upload loop
//! - [`upload`] - Multipart upload to the classification endpoint
//! - [`samples`] - Bundled sample documents

pub mod session;
pub mod upload;
pub mod samples;

pub use session::*;
pub use upload::*;
pub use samples::*;
