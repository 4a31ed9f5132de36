//! Upload session: the record list and the sequential upload loop.
//!
//! [`UploadSession`] holds the records and enforces the lifecycle
//! (`processing` settles once, only errored records leave the list).
//! [`submit_batch`] and [`upload_one`] drive uploads against any
//! [`Classifier`], writing results through a [`SessionStore`] so the same
//! loop runs over a Leptos signal in the browser and a `RefCell` in tests.

use std::cell::RefCell;

use leptos::{RwSignal, SignalUpdate};

use crate::types::{
    has_accepted_extension, AppError, AppResult, ClassificationFields, RawFile, RecordId,
    UploadRecord, UploadStatus,
};

/// Remote service turning a document into classification fields.
#[allow(async_fn_in_trait)]
pub trait Classifier<F> {
    async fn classify(&self, file: &F) -> AppResult<ClassificationFields>;
}

/// Shared access to an [`UploadSession`].
///
/// Returns `None` when the underlying state is gone (unmounted page).
pub trait SessionStore<F> {
    fn with_session<R>(&self, f: impl FnOnce(&mut UploadSession<F>) -> R) -> Option<R>;
}

impl<F: 'static> SessionStore<F> for RwSignal<UploadSession<F>> {
    fn with_session<R>(&self, f: impl FnOnce(&mut UploadSession<F>) -> R) -> Option<R> {
        self.try_update(f)
    }
}

impl<F> SessionStore<F> for RefCell<UploadSession<F>> {
    fn with_session<R>(&self, f: impl FnOnce(&mut UploadSession<F>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Ordered list of upload records for one page session.
#[derive(Clone, Debug)]
pub struct UploadSession<F> {
    records: Vec<UploadRecord<F>>,
    next_id: u64,
}

impl<F> Default for UploadSession<F> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 0,
        }
    }
}

impl<F> UploadSession<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UploadRecord<F>] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: RecordId) -> Option<&UploadRecord<F>> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Current list position of a record.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Settle a `Processing` record with its upload outcome.
    ///
    /// Returns the new status, or `None` if the record is gone or already
    /// settled. Settled records are never touched again.
    pub fn settle(
        &mut self,
        id: RecordId,
        outcome: AppResult<ClassificationFields>,
    ) -> Option<UploadStatus> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        if record.status.is_terminal() {
            log::warn!("Ignoring second completion for {} ({})", record.name, id);
            return None;
        }

        match outcome {
            Ok(fields) => {
                record.status = UploadStatus::Ready;
                record.response = Some(fields);
            }
            Err(_) => {
                record.status = UploadStatus::Error;
                record.response = None;
            }
        }
        Some(record.status)
    }

    /// Remove an errored record.
    ///
    /// Records in any other state are rejected with [`AppError::NotRemovable`].
    pub fn remove_record(&mut self, index: usize) -> AppResult<UploadRecord<F>> {
        let status = self
            .records
            .get(index)
            .map(|r| r.status)
            .ok_or(AppError::NoSuchRecord(index))?;

        if status != UploadStatus::Error {
            return Err(AppError::NotRemovable { index, status });
        }

        Ok(self.records.remove(index))
    }

    /// Remove an errored record and hand back its file for re-submission.
    pub fn take_for_retry(&mut self, index: usize) -> AppResult<F> {
        self.remove_record(index).map(|record| record.raw_file)
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

impl<F: RawFile> UploadSession<F> {
    /// Append one `Processing` record per file, in order.
    ///
    /// Returns the new ids paired with their files, ready for upload.
    pub fn enqueue(&mut self, files: Vec<F>) -> Vec<(RecordId, F)> {
        files
            .into_iter()
            .map(|file| {
                let id = self.allocate_id();
                let record = UploadRecord::new(id, file.clone());
                log::debug!("Queued {} ({}, {} bytes)", record.name, id, record.size_bytes);
                self.records.push(record);
                (id, file)
            })
            .collect()
    }
}

/// Split files into accepted images and an [`AppError::UnsupportedFile`]
/// per rejected one, both in input order.
pub fn partition_accepted<F: RawFile>(files: Vec<F>) -> (Vec<F>, Vec<AppError>) {
    let mut accepted = Vec::with_capacity(files.len());
    let mut rejected = Vec::new();

    for file in files {
        let name = file.name();
        if has_accepted_extension(&name) {
            accepted.push(file);
        } else {
            rejected.push(AppError::UnsupportedFile(name));
        }
    }
    (accepted, rejected)
}

/// Upload a batch: enqueue every file, then upload them one at a time.
///
/// Each upload is awaited before the next starts. A failure settles only
/// its own record.
pub async fn submit_batch<F, C, S>(store: &S, classifier: &C, files: Vec<F>) -> Vec<RecordId>
where
    F: RawFile,
    C: Classifier<F>,
    S: SessionStore<F>,
{
    let jobs = store
        .with_session(|session| session.enqueue(files))
        .unwrap_or_default();
    let ids: Vec<RecordId> = jobs.iter().map(|(id, _)| *id).collect();

    for (id, file) in jobs {
        upload_one(store, classifier, id, &file).await;
    }

    ids
}

/// Upload one file and settle its record.
///
/// Errors are logged and folded into the `Error` status.
pub async fn upload_one<F, C, S>(store: &S, classifier: &C, id: RecordId, file: &F) -> Option<UploadStatus>
where
    F: RawFile,
    C: Classifier<F>,
    S: SessionStore<F>,
{
    let outcome = classifier.classify(file).await;
    match &outcome {
        Ok(fields) => log::info!("✅ {} classified ({} fields)", file.name(), fields.len()),
        Err(e) => log::warn!("❌ Upload failed for {}: {}", file.name(), e),
    }

    store.with_session(|session| session.settle(id, outcome)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeFile;
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    /// Fails files whose name is listed, records the store state at each call.
    struct ScriptedClassifier {
        store: Rc<RefCell<UploadSession<FakeFile>>>,
        failing: Vec<&'static str>,
        calls: RefCell<Vec<(String, Vec<UploadStatus>)>>,
    }

    impl ScriptedClassifier {
        fn new(store: Rc<RefCell<UploadSession<FakeFile>>>, failing: Vec<&'static str>) -> Self {
            Self { store, failing, calls: RefCell::new(Vec::new()) }
        }
    }

    impl Classifier<FakeFile> for ScriptedClassifier {
        async fn classify(&self, file: &FakeFile) -> AppResult<ClassificationFields> {
            let snapshot = self.store.borrow().records().iter().map(|r| r.status).collect();
            self.calls.borrow_mut().push((file.name.to_string(), snapshot));

            if self.failing.contains(&file.name) {
                return Err(AppError::Status { code: 500, body: "Internal Server Error".into() });
            }
            Ok(serde_json::from_value(json!({
                "first_name": "Jane",
                "doc_type": "passport",
            }))
            .unwrap())
        }
    }

    fn statuses(session: &UploadSession<FakeFile>) -> Vec<UploadStatus> {
        session.records().iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_enqueue_appends_processing_records() {
        let mut session = UploadSession::new();
        session.enqueue(vec![FakeFile::jpeg("a.jpg")]);
        let jobs = session.enqueue(vec![FakeFile::jpeg("b.jpg"), FakeFile::jpeg("c.png")]);

        assert_eq!(jobs.len(), 2);
        assert_eq!(session.records().len(), 3);
        assert!(session.records().iter().all(|r| r.status == UploadStatus::Processing));
        assert!(session.records().iter().all(|r| r.response.is_none()));
        assert_eq!(session.records()[1].name, "b.jpg");
        assert_eq!(session.records()[1].mime_type, "image/jpeg");
        assert_eq!(session.records()[1].size_bytes, 4);
        assert_ne!(jobs[0].0, jobs[1].0);
    }

    #[test]
    fn test_settle_is_monotonic() {
        let mut session = UploadSession::new();
        let jobs = session.enqueue(vec![FakeFile::jpeg("a.jpg")]);
        let id = jobs[0].0;

        assert_eq!(
            session.settle(id, Err(AppError::Network("offline".into()))),
            Some(UploadStatus::Error)
        );
        assert_eq!(session.settle(id, Ok(ClassificationFields::default())), None);
        assert_eq!(session.records()[0].status, UploadStatus::Error);
        assert!(session.records()[0].response.is_none());
    }

    #[test]
    fn test_remove_only_errored_records() {
        let mut session = UploadSession::new();
        let jobs = session.enqueue(vec![FakeFile::jpeg("a.jpg"), FakeFile::jpeg("b.jpg")]);
        session.settle(jobs[0].0, Ok(ClassificationFields::default()));

        assert!(matches!(
            session.remove_record(0),
            Err(AppError::NotRemovable { index: 0, status: UploadStatus::Ready })
        ));
        assert!(matches!(
            session.remove_record(1),
            Err(AppError::NotRemovable { status: UploadStatus::Processing, .. })
        ));
        assert!(matches!(session.remove_record(7), Err(AppError::NoSuchRecord(7))));

        session.settle(jobs[1].0, Err(AppError::Malformed("bad".into())));
        let removed = session.remove_record(1).unwrap();
        assert_eq!(removed.name, "b.jpg");
        assert_eq!(session.records().len(), 1);
    }

    #[test]
    fn test_take_for_retry_returns_file() {
        let mut session = UploadSession::new();
        let jobs = session.enqueue(vec![FakeFile::jpeg("a.jpg")]);
        session.settle(jobs[0].0, Err(AppError::Timeout { millis: 10 }));

        let file = session.take_for_retry(0).unwrap();
        assert_eq!(file.name, "a.jpg");
        assert!(session.is_empty());

        // Re-submission gets a fresh identity.
        let again = session.enqueue(vec![file]);
        assert_ne!(again[0].0, jobs[0].0);
        assert_eq!(session.records()[0].status, UploadStatus::Processing);
    }

    #[test]
    fn test_batch_with_middle_failure() {
        let store = Rc::new(RefCell::new(UploadSession::new()));
        let classifier = ScriptedClassifier::new(store.clone(), vec!["b.jpg"]);
        let files = vec![FakeFile::jpeg("a.jpg"), FakeFile::jpeg("b.jpg"), FakeFile::jpeg("c.jpg")];

        let ids = block_on(submit_batch(&*store, &classifier, files));

        assert_eq!(ids.len(), 3);
        assert_eq!(
            statuses(&store.borrow()),
            [UploadStatus::Ready, UploadStatus::Error, UploadStatus::Ready]
        );
        assert_eq!(classifier.calls.borrow().len(), 3);
        assert!(store.borrow().records()[1].response.is_none());
    }

    #[test]
    fn test_batch_uploads_sequentially() {
        let store = Rc::new(RefCell::new(UploadSession::new()));
        let classifier = ScriptedClassifier::new(store.clone(), vec![]);
        let files = vec![FakeFile::jpeg("a.jpg"), FakeFile::jpeg("b.jpg"), FakeFile::jpeg("c.jpg")];

        block_on(submit_batch(&*store, &classifier, files));

        use UploadStatus::*;
        let calls = classifier.calls.borrow();
        assert_eq!(calls[0], ("a.jpg".to_string(), vec![Processing, Processing, Processing]));
        assert_eq!(calls[1], ("b.jpg".to_string(), vec![Ready, Processing, Processing]));
        assert_eq!(calls[2], ("c.jpg".to_string(), vec![Ready, Ready, Processing]));
    }

    #[test]
    fn test_ready_record_exposes_parsed_fields() {
        let store = Rc::new(RefCell::new(UploadSession::new()));
        let classifier = ScriptedClassifier::new(store.clone(), vec![]);

        block_on(submit_batch(&*store, &classifier, vec![FakeFile::jpeg("id.png")]));

        let session = store.borrow();
        let rows = session.records()[0].response.as_ref().unwrap().display_rows();
        let pairs: Vec<_> = rows.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect();
        assert_eq!(pairs, [("First Name", "Jane"), ("Doc Type", "passport")]);
    }

    #[test]
    fn test_partition_accepted() {
        let files = vec![
            FakeFile::jpeg("a.jpg"),
            FakeFile::new("notes.pdf", "application/pdf", vec![]),
            FakeFile::new("b.PNG", "image/png", vec![]),
            FakeFile::new("scan", "", vec![]),
        ];
        let (accepted, rejected) = partition_accepted(files);

        let names: Vec<_> = accepted.iter().map(|f| f.name).collect();
        assert_eq!(names, ["a.jpg", "b.PNG"]);
        assert!(matches!(&rejected[..], [
            AppError::UnsupportedFile(first),
            AppError::UnsupportedFile(second),
        ] if first == "notes.pdf" && second == "scan"));
    }
}
