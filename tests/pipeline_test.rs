//! Integration tests for end-to-end pipeline runs against in-memory services.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use untextract::model::{Block, BlockType};
use untextract::service::DocumentLocation;
use untextract::{
    AnalysisPage, AnalysisService, Error, JobStatus, ObjectStore, Pipeline, PipelineOptions,
    PollOptions, Result,
};

struct FixedService {
    status: JobStatus,
    pages: Vec<AnalysisPage>,
    started: RefCell<Vec<DocumentLocation>>,
}

impl FixedService {
    fn new(status: JobStatus, pages: Vec<AnalysisPage>) -> Self {
        Self {
            status,
            pages,
            started: RefCell::new(Vec::new()),
        }
    }
}

impl AnalysisService for FixedService {
    fn start_analysis(&self, location: &DocumentLocation) -> Result<String> {
        self.started.borrow_mut().push(location.clone());
        Ok("job-42".to_string())
    }

    fn get_analysis(&self, _job_id: &str, next_token: Option<&str>) -> Result<AnalysisPage> {
        let position = next_token.map_or(0, |t| t.len());
        let mut page = self.pages.get(position).cloned().unwrap_or_default();
        page.job_status = Some(self.status);
        if self.status == JobStatus::Failed {
            page.status_message = Some("unsupported document".to_string());
        }
        Ok(page)
    }
}

#[derive(Default)]
struct MemoryStore {
    keys: Vec<String>,
    uploads: RefCell<Vec<(String, String, String)>>,
    fail_uploads: bool,
}

impl ObjectStore for MemoryStore {
    fn list_keys(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .keys
            .iter()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        if self.fail_uploads {
            return Err(Error::Storage("access denied".to_string()));
        }
        let content = fs::read_to_string(local_path)?;
        self.uploads
            .borrow_mut()
            .push((bucket.to_string(), key.to_string(), content));
        Ok(())
    }
}

/// Two result pages: the table sits on the first, its cells on the second.
fn document_pages() -> Vec<AnalysisPage> {
    vec![
        AnalysisPage::new(vec![
            Block::new("p1", BlockType::Page)
                .with_page(1)
                .with_children(["t1", "f1"]),
            Block::new("t1", BlockType::Table)
                .with_page(1)
                .with_children(["c1", "c2"]),
            Block::new("f1", BlockType::LayoutFigure)
                .with_page(0)
                .with_children(["l1"]),
            Block::new("f2", BlockType::LayoutFigure).with_page(0),
        ])
        .with_next_token("x"),
        AnalysisPage::new(vec![
            Block::cell("c1", 1, 1).with_children(["w1"]),
            Block::cell("c2", 1, 2).with_children(["w2"]),
            Block::word("w1", "Q1"),
            Block::word("w2", "Q2"),
            Block::new("l1", BlockType::Line).with_text("Quarterly revenue"),
        ]),
    ]
}

fn options(root: &Path) -> PipelineOptions {
    PipelineOptions::new()
        .with_output_root(root.join("outputs"))
        .with_source_bucket("scans")
        .with_destination_bucket("extracts")
        .with_poll_options(PollOptions::immediate())
}

#[test]
fn test_run_extracts_and_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, document_pages());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(&service, &store, options(dir.path()));
    let report = pipeline.run("report.pdf").unwrap();

    assert_eq!(report.job_id, "job-42");
    assert_eq!(report.status, JobStatus::Succeeded);
    assert_eq!(report.result_pages, 2);
    assert_eq!(report.stats.tables_written, 1);
    assert_eq!(report.stats.figures_written, 1);
    assert_eq!(report.stats.figures_skipped, 1);
    assert!(report.finished_at >= report.started_at);

    let started = service.started.borrow();
    assert_eq!(started[0], DocumentLocation::new("scans", "report.pdf"));

    let uploads = store.uploads.borrow();
    let keys: Vec<&str> = uploads.iter().map(|(_, key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "outputs/report/image/report.pdf__page__1__imgidx__0.txt",
            "outputs/report/tables/report.pdf__page__1__tableidx__0.html",
            "outputs/metadata/report/image/report.pdf__page__1__imgidx__0.txt.metadata.json",
            "outputs/metadata/report/tables/report.pdf__page__1__tableidx__0.html.metadata.json",
        ]
    );
    assert!(uploads.iter().all(|(bucket, _, _)| bucket == "extracts"));
    assert_eq!(uploads[0].2, "Quarterly revenue");
    assert_eq!(report.uploaded.len(), 4);
}

#[test]
fn test_run_without_upload() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, document_pages());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(
        &service,
        &store,
        options(dir.path())
            .with_upload(false)
            .with_destination_bucket(""),
    );
    let report = pipeline.run("report.pdf").unwrap();

    assert!(report.uploaded.is_empty());
    assert!(store.uploads.borrow().is_empty());
    assert!(dir
        .path()
        .join("outputs/report/tables/report.pdf__page__1__tableidx__0.html")
        .exists());
}

#[test]
fn test_failed_job_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Failed, Vec::new());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(&service, &store, options(dir.path()));
    match pipeline.run("bad.pdf") {
        Err(Error::JobFailed { job_id, message }) => {
            assert_eq!(job_id, "job-42");
            assert_eq!(message, "unsupported document");
        }
        other => panic!("expected JobFailed, got {:?}", other.map(|r| r.status)),
    }
    assert!(store.uploads.borrow().is_empty());
    assert!(!dir.path().join("outputs/bad").exists());
}

#[test]
fn test_failed_job_extracts_when_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Failed, document_pages());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(
        &service,
        &store,
        options(dir.path()).with_fail_on_job_failure(false),
    );
    let report = pipeline.run("report.pdf").unwrap();

    assert_eq!(report.status, JobStatus::Failed);
    assert_eq!(report.stats.tables_written, 1);
}

#[test]
fn test_save_responses() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, document_pages());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(
        &service,
        &store,
        options(dir.path()).with_saved_responses(true),
    );
    pipeline.run("report.pdf").unwrap();

    let saved = dir.path().join("outputs/responses/report");
    assert!(saved.join("page_1.json").exists());
    assert!(saved.join("page_2.json").exists());

    let paths = untextract::ArtifactPaths::new(dir.path().join("offline"), "report.pdf");
    let stats = untextract::extract_file(saved.join("page_2.json"), &paths).unwrap();
    assert_eq!(stats.tables_written, 0);
}

#[test]
fn test_upload_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, document_pages());
    let store = MemoryStore {
        fail_uploads: true,
        ..Default::default()
    };

    let pipeline = Pipeline::new(&service, &store, options(dir.path()));
    assert!(matches!(
        pipeline.run("report.pdf"),
        Err(Error::Storage(_))
    ));
}

#[test]
fn test_invalid_options_rejected_before_submit() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, document_pages());
    let store = MemoryStore::default();

    let pipeline = Pipeline::new(
        &service,
        &store,
        options(dir.path()).with_destination_bucket(""),
    );
    assert!(matches!(pipeline.run("report.pdf"), Err(Error::Config(_))));
    assert!(service.started.borrow().is_empty());
}

#[test]
fn test_list_documents() {
    let dir = tempfile::tempdir().unwrap();
    let service = FixedService::new(JobStatus::Succeeded, Vec::new());
    let store = MemoryStore {
        keys: vec![
            "2023/a.pdf".to_string(),
            "2023/a.json".to_string(),
            "2024/b.pdf".to_string(),
        ],
        ..Default::default()
    };

    let pipeline = Pipeline::new(&service, &store, options(dir.path()));
    assert_eq!(pipeline.list_documents("").unwrap(), vec!["2023/a.pdf", "2024/b.pdf"]);
    assert_eq!(pipeline.list_documents("2024/").unwrap(), vec!["2024/b.pdf"]);
}
