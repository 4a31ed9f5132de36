//! Application configuration.
//!
//! Centralized configuration for the KYC upload frontend.
//! Values are compiled in; the API base URL can be overridden at build
//! time with the `KYC_API_BASE_URL` environment variable.

/// Classification API base URL.
pub const API_BASE_URL: &str = match option_env!("KYC_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

/// Path of the classification endpoint, relative to [`API_BASE_URL`].
pub const UPLOAD_PATH: &str = "/fireworks";

/// Multipart field carrying the document bytes.
pub const UPLOAD_FIELD: &str = "file";

/// Upload timeout (in milliseconds).
///
/// The vision model behind the endpoint is slow; 90 seconds leaves room for
/// a cold start before the record is given up on.
pub const UPLOAD_TIMEOUT_MS: u32 = 90_000;

/// File extensions accepted for upload (lowercase, without the dot).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Bundled sample documents, served next to the application.
pub const SAMPLE_IMAGES: [&str; 5] = [
    "/passport-1.jpeg",
    "/License-2.jpg",
    "/License-3.jpeg",
    "/License-1.png",
    "/passport-2.jpg",
];

/// Application name, used for the document title and breadcrumb.
pub const APP_NAME: &str = "KYC PoV";

/// Full URL of the classification endpoint.
pub fn upload_url() -> String {
    format!("{}{}", API_BASE_URL.trim_end_matches('/'), UPLOAD_PATH)
}
