//! KYC PoV - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading identity documents (passports,
//! driver's licenses) to a classification API and inspecting the
//! extracted fields.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (breadcrumb)                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── UploadSection | SampleGallery                           │
//! │  ├── FileList (one row per upload record)                    │
//! │  └── ResultInspector (modal, when a ready row is opened)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (UploadRecord, UploadStatus, Rotation, AppError)
//! - [`components`] - UI components (Header, Upload, FileList, Inspector)
//! - [`services`] - Upload session and HTTP communication

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Records
    RawFile, RecordId, UploadRecord, UploadStatus,
    // Classification
    ClassificationFields, FieldRow,
    // Inspector
    Rotation,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Page state: the upload session and the record open in the inspector
    let session = create_rw_signal(UploadSession::<File>::new());
    let (selected, set_selected) = create_signal(None::<RecordId>);

    view! {
        <Header/>

        <div class="container">
            <div class="top-row">
                <UploadSection session=session/>
                <SampleGallery session=session/>
            </div>

            <FileList session=session set_selected=set_selected/>

            <ResultInspector session=session selected=selected set_selected=set_selected/>
        </div>
    }
}
