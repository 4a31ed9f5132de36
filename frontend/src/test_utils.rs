//! Test doubles shared by the session, upload and sample tests.

use crate::services::Classifier;
use crate::types::{AppResult, ClassificationFields, RawFile};

/// In-memory stand-in for a browser `File`.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeFile {
    pub name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl FakeFile {
    pub fn new(name: &'static str, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self { name, mime, bytes }
    }

    /// Four-byte JPEG header under the given name.
    pub fn jpeg(name: &'static str) -> Self {
        Self::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}

impl RawFile for FakeFile {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn mime_type(&self) -> String {
        self.mime.to_string()
    }

    fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Classifier answering every file with the same outcome.
pub struct FixedClassifier(pub AppResult<ClassificationFields>);

impl Classifier<FakeFile> for FixedClassifier {
    async fn classify(&self, _file: &FakeFile) -> AppResult<ClassificationFields> {
        self.0.clone()
    }
}
