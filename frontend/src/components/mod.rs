//! UI Components for the KYC upload page.
//!
//! # Layout Components
//! - [`Header`] - Breadcrumb navigation
//!
//! # Feature Components
//! - [`UploadSection`] - Document upload with drag & drop
//! - [`SampleGallery`] - One-click sample documents
//! - [`FileList`] - Upload records and their status
//! - [`ResultInspector`] - Image and extracted fields of a ready record

mod header;
mod upload;
mod samples;
mod file_list;
mod inspector;

pub use header::*;
pub use upload::*;
pub use samples::*;
pub use file_list::*;
pub use inspector::*;
