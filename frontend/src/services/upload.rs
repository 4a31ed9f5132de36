//! HTTP service uploading documents to the classification endpoint.

use std::future::Future;

use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use serde_json::{Map, Value};
use web_sys::{AbortController, AbortSignal, File, FormData, RequestCredentials};

use crate::config::{upload_url, UPLOAD_FIELD, UPLOAD_TIMEOUT_MS};
use crate::services::session::Classifier;
use crate::types::{AppError, AppResult, ClassificationFields};

/// Body returned by the classification endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    /// Human-readable summary
    #[serde(default)]
    pub message: Option<String>,
    /// Extracted fields, either inline or JSON-encoded in a string
    pub response: ResponsePayload,
}

/// The `response` field comes in two encodings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// Model output passed through as a JSON string
    Encoded(String),
    /// Already-decoded object
    Fields(Map<String, Value>),
}

impl ResponsePayload {
    /// Decode into fields; an encoded string must hold a JSON object.
    pub fn into_fields(self) -> AppResult<ClassificationFields> {
        match self {
            ResponsePayload::Fields(map) => Ok(ClassificationFields::new(map)),
            ResponsePayload::Encoded(text) => serde_json::from_str::<Map<String, Value>>(&text)
                .map(ClassificationFields::new)
                .map_err(|e| AppError::Malformed(format!("Invalid fields JSON: {}", e))),
        }
    }
}

/// Parse a 200 response body into classification fields.
pub fn parse_classification(body: &str) -> AppResult<ClassificationFields> {
    let envelope: ClassifyResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Malformed(format!("Failed to parse response: {}", e)))?;

    if let Some(message) = &envelope.message {
        log::debug!("Classifier says: {}", message);
    }

    envelope.response.into_fields()
}

/// Race `request` against `timer`.
///
/// If the timer fires first the request is dropped and
/// [`AppError::Timeout`] is returned with `millis` as the reported limit.
pub async fn with_timeout<T, Fut, Timer>(request: Fut, timer: Timer, millis: u32) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
    Timer: Future<Output = ()>,
{
    futures::pin_mut!(request, timer);

    match select(request, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(AppError::Timeout { millis }),
    }
}

/// Classifier backed by the remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    url: String,
    timeout_ms: u32,
}

impl Default for HttpClassifier {
    fn default() -> Self {
        Self::new(upload_url(), UPLOAD_TIMEOUT_MS)
    }
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
        }
    }

    /// Post the file as multipart form data, credentials included.
    async fn send(&self, file: &File, abort: Option<&AbortSignal>) -> AppResult<ClassificationFields> {
        let form_data =
            FormData::new().map_err(|e| AppError::Browser(format!("Failed to create FormData: {:?}", e)))?;

        form_data
            .append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
            .map_err(|e| AppError::Browser(format!("Failed to append file: {:?}", e)))?;

        let request = Request::post(&self.url)
            .credentials(RequestCredentials::Include)
            .abort_signal(abort)
            .body(form_data)
            .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read body: {}", e)))?;

        if response.status() != 200 {
            return Err(AppError::Status {
                code: response.status(),
                body,
            });
        }

        parse_classification(&body)
    }
}

impl Classifier<File> for HttpClassifier {
    async fn classify(&self, file: &File) -> AppResult<ClassificationFields> {
        let controller = AbortController::new()
            .map_err(|e| log::warn!("AbortController unavailable: {:?}", e))
            .ok();
        let signal = controller.as_ref().map(|c| c.signal());

        let outcome = with_timeout(
            self.send(file, signal.as_ref()),
            TimeoutFuture::new(self.timeout_ms),
            self.timeout_ms,
        )
        .await;

        // Dropping the future does not cancel the browser fetch.
        if let (Err(AppError::Timeout { .. }), Some(controller)) = (&outcome, &controller) {
            controller.abort();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::{submit_batch, UploadSession};
    use crate::test_utils::FakeFile;
    use crate::types::UploadStatus;
    use futures::executor::block_on;
    use futures::future::{pending, ready};
    use std::cell::RefCell;

    fn labels(fields: &ClassificationFields) -> Vec<String> {
        fields.display_rows().into_iter().map(|row| row.label).collect()
    }

    #[test]
    fn test_response_with_encoded_fields() {
        // The server passes the model output through as a string.
        let json = r#"{
            "status": "success",
            "message": "Image processed successfully",
            "response": "{\"first_name\": \"Jane\", \"last_name\": \"Doe\", \"dob\": \"1990-04-12\", \"doc_type\": \"passport\", \"middle_name\": null}"
        }"#;

        let fields = parse_classification(json).unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(
            labels(&fields),
            ["First Name", "Last Name", "Dob", "Doc Type", "Middle Name"]
        );
        assert_eq!(fields.display_rows()[3].value, "passport");
    }

    #[test]
    fn test_response_with_object_fields() {
        let json = r#"{"response": {"country": "FR", "doc_number": "12AB34567"}}"#;

        let fields = parse_classification(json).unwrap();
        assert_eq!(labels(&fields), ["Country", "Doc Number"]);
        assert_eq!(fields.display_rows()[0].value, "FR");
    }

    #[test]
    fn test_malformed_responses() {
        let cases = [
            "not json",
            r#"{"status": "success"}"#,
            r#"{"response": "{not valid"}"#,
            r#"{"response": "[1, 2, 3]"}"#,
            r#"{"response": 42}"#,
        ];
        for body in cases {
            assert!(
                matches!(parse_classification(body), Err(AppError::Malformed(_))),
                "expected malformed for {body}"
            );
        }
    }

    #[test]
    fn test_timer_expiry_is_a_timeout() {
        let outcome: AppResult<ClassificationFields> =
            block_on(with_timeout(pending(), ready(()), 90_000));
        assert!(matches!(outcome, Err(AppError::Timeout { millis: 90_000 })));
    }

    #[test]
    fn test_answer_before_timer_wins() {
        let outcome = block_on(with_timeout(
            ready(Ok(ClassificationFields::default())),
            pending::<()>(),
            90_000,
        ));
        assert_eq!(outcome.unwrap(), ClassificationFields::default());

        let outcome: AppResult<ClassificationFields> = block_on(with_timeout(
            ready(Err(AppError::Network("offline".into()))),
            pending::<()>(),
            90_000,
        ));
        assert!(matches!(outcome, Err(AppError::Network(_))));
    }

    /// Server that never answers, with a timer that has already fired.
    struct HungClassifier;

    impl Classifier<FakeFile> for HungClassifier {
        async fn classify(&self, _file: &FakeFile) -> AppResult<ClassificationFields> {
            with_timeout(pending(), ready(()), 10).await
        }
    }

    #[test]
    fn test_hung_upload_settles_as_error() {
        let store = RefCell::new(UploadSession::new());
        let files = vec![FakeFile::jpeg("a.jpg"), FakeFile::jpeg("b.jpg")];

        let ids = block_on(submit_batch(&store, &HungClassifier, files));

        let session = store.borrow();
        assert_eq!(ids.len(), 2);
        assert!(session.records().iter().all(|r| r.status == UploadStatus::Error));
        assert!(session.records().iter().all(|r| r.response.is_none()));
    }
}
