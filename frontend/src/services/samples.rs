//! Bundled sample documents.
//!
//! A sample is fetched as a static asset, wrapped into a browser `File`
//! and then goes through [`submit_batch`] like any dropped file.

use std::future::Future;

use gloo_net::http::Request;
use js_sys::{Array, Uint8Array};
use web_sys::{File, FilePropertyBag};

use crate::services::session::{submit_batch, Classifier, SessionStore};
use crate::types::{AppError, AppResult, RawFile, RecordId};

/// File name of a sample: the last path segment.
pub fn sample_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// MIME type for an image file name, used when the server sends none.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Fetch a sample asset and wrap it as a `File`.
pub async fn fetch_sample(path: &str) -> AppResult<File> {
    let sample_error = |reason: String| AppError::Sample {
        path: path.to_string(),
        reason,
    };

    let response = Request::get(path)
        .send()
        .await
        .map_err(|e| sample_error(e.to_string()))?;

    if !response.ok() {
        return Err(sample_error(format!("HTTP {}", response.status())));
    }

    let name = sample_file_name(path);
    let mime = response
        .headers()
        .get("content-type")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| guess_mime(name).to_string());

    let bytes = response
        .binary()
        .await
        .map_err(|e| sample_error(e.to_string()))?;

    let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
    let options = FilePropertyBag::new();
    options.set_type(&mime);

    File::new_with_u8_array_sequence_and_options(&parts, name, &options)
        .map_err(|e| AppError::Browser(format!("Failed to create File: {:?}", e)))
}

/// Load a sample and upload it through the regular batch path.
///
/// `fetch` produces the sample file, normally [`fetch_sample`]. A failed
/// fetch leaves the session untouched.
pub async fn load_sample<F, C, S, Fut>(
    store: &S,
    classifier: &C,
    path: &str,
    fetch: Fut,
) -> AppResult<Vec<RecordId>>
where
    F: RawFile,
    C: Classifier<F>,
    S: SessionStore<F>,
    Fut: Future<Output = AppResult<F>>,
{
    let file = fetch.await?;
    log::info!("🖼️ Loaded sample {}", sample_file_name(path));
    Ok(submit_batch(store, classifier, vec![file]).await)
}
