//! AWS backends: Textract for document analysis, S3 for object storage.
//!
//! The SDK is async; each backend shares a private current-thread tokio
//! runtime and blocks on every call, so the rest of the crate stays
//! synchronous.
//!
//! ## Authentication
//!
//! When both an access key and a secret key are configured they are used
//! directly. Otherwise the default AWS credentials chain applies
//! (environment, `~/.aws/credentials`, instance role).

use super::{AnalysisService, DocumentLocation, ObjectStore};
use crate::error::{Error, Result};
use crate::model::{
    AnalysisPage, Block, BlockType, JobStatus, Relationship, RelationshipType, SelectionStatus,
};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_textract::operation::get_document_analysis::GetDocumentAnalysisOutput;
use aws_sdk_textract::types as textract;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// AWS connection settings.
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    /// Region (e.g. "us-east-1"); default chain when unset
    pub region: Option<String>,

    /// Access key id
    pub access_key_id: Option<String>,

    /// Secret access key
    pub secret_access_key: Option<String>,

    /// Custom endpoint (e.g. a local S3-compatible server)
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    /// Create an empty configuration (default provider chain).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set a custom endpoint.
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }
}

/// Loaded AWS configuration plus the runtime used to drive SDK calls.
pub struct AwsSession {
    runtime: Arc<Runtime>,
    sdk_config: aws_config::SdkConfig,
    custom_endpoint: bool,
}

impl AwsSession {
    /// Resolve configuration and credentials.
    pub fn connect(config: &AwsConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        match (&config.access_key_id, &config.secret_access_key) {
            (Some(key), Some(secret)) => {
                let credentials = aws_sdk_s3::config::Credentials::new(
                    key.clone(),
                    secret.clone(),
                    None,
                    None,
                    "untextract",
                );
                loader = loader.credentials_provider(credentials);
            }
            (None, None) => {}
            _ => {
                return Err(Error::Config(
                    "access key and secret key must be given together".to_string(),
                ))
            }
        }
        if let Some(url) = &config.endpoint_url {
            loader = loader.endpoint_url(url.clone());
        }

        let sdk_config = runtime.block_on(loader.load());
        log::debug!(
            "AWS session ready (region: {})",
            sdk_config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "default".to_string())
        );

        Ok(Self {
            runtime: Arc::new(runtime),
            sdk_config,
            custom_endpoint: config.endpoint_url.is_some(),
        })
    }

    /// Textract analysis client.
    pub fn textract(&self) -> TextractService {
        TextractService {
            client: aws_sdk_textract::Client::new(&self.sdk_config),
            runtime: Arc::clone(&self.runtime),
        }
    }

    /// S3 storage client.
    pub fn s3(&self) -> S3Store {
        // path-style addressing is required by most S3-compatible servers
        let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .force_path_style(self.custom_endpoint)
            .build();
        S3Store {
            client: aws_sdk_s3::Client::from_conf(config),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

/// Textract asynchronous document analysis.
pub struct TextractService {
    client: aws_sdk_textract::Client,
    runtime: Arc<Runtime>,
}

impl AnalysisService for TextractService {
    fn start_analysis(&self, location: &DocumentLocation) -> Result<String> {
        let document = textract::DocumentLocation::builder()
            .s3_object(
                textract::S3Object::builder()
                    .bucket(&location.bucket)
                    .name(&location.name)
                    .build(),
            )
            .build();

        let output = self
            .runtime
            .block_on(
                self.client
                    .start_document_analysis()
                    .document_location(document)
                    .feature_types(textract::FeatureType::Tables)
                    .feature_types(textract::FeatureType::Layout)
                    .send(),
            )
            .map_err(|e| {
                Error::Service(aws_sdk_textract::error::DisplayErrorContext(&e).to_string())
            })?;

        output
            .job_id()
            .map(str::to_string)
            .ok_or_else(|| Error::Service("no job id returned".to_string()))
    }

    fn get_analysis(&self, job_id: &str, next_token: Option<&str>) -> Result<AnalysisPage> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .get_document_analysis()
                    .job_id(job_id)
                    .set_next_token(next_token.map(str::to_string))
                    .send(),
            )
            .map_err(|e| {
                Error::Service(aws_sdk_textract::error::DisplayErrorContext(&e).to_string())
            })?;

        convert_page(&output)
    }
}

/// S3 object storage.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    runtime: Arc<Runtime>,
}

impl ObjectStore for S3Store {
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .runtime
                .block_on(
                    self.client
                        .list_objects_v2()
                        .bucket(bucket)
                        .prefix(prefix)
                        .set_continuation_token(continuation.take())
                        .send(),
                )
                .map_err(|e| {
                    Error::Storage(aws_sdk_s3::error::DisplayErrorContext(&e).to_string())
                })?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match output.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = self
            .runtime
            .block_on(ByteStream::from_path(local_path))
            .map_err(|e| Error::Storage(format!("{}: {}", local_path.display(), e)))?;

        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(body)
                    .send(),
            )
            .map_err(|e| Error::Storage(aws_sdk_s3::error::DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

fn convert_page(output: &GetDocumentAnalysisOutput) -> Result<AnalysisPage> {
    let blocks = output
        .blocks()
        .iter()
        .map(convert_block)
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisPage {
        job_status: output
            .job_status()
            .and_then(|s| JobStatus::from_name(s.as_str())),
        blocks,
        next_token: output.next_token().map(str::to_string),
        status_message: output.status_message().map(str::to_string),
    })
}

fn convert_block(block: &textract::Block) -> Result<Block> {
    let id = block
        .id()
        .ok_or_else(|| Error::MalformedBlockGraph("block without Id".to_string()))?;
    let block_type = block
        .block_type()
        .ok_or_else(|| Error::MalformedBlockGraph(format!("block {} has no BlockType", id)))?;

    let relationships = block
        .relationships()
        .iter()
        .map(|r| Relationship {
            kind: r.r#type().map(|t| RelationshipType::from_name(t.as_str())),
            ids: r.ids().to_vec(),
        })
        .collect();

    let selection_status = match block.selection_status() {
        Some(textract::SelectionStatus::Selected) => Some(SelectionStatus::Selected),
        Some(textract::SelectionStatus::NotSelected) => Some(SelectionStatus::NotSelected),
        _ => None,
    };

    Ok(Block {
        id: id.to_string(),
        block_type: BlockType::from_name(block_type.as_str()),
        page: non_negative(block.page()),
        text: block.text().map(str::to_string),
        relationships,
        row_index: non_negative(block.row_index()),
        column_index: non_negative(block.column_index()),
        row_span: non_negative(block.row_span()),
        column_span: non_negative(block.column_span()),
        selection_status,
        confidence: block.confidence(),
    })
}

fn non_negative(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_block() {
        let sdk_block = textract::Block::builder()
            .id("c1")
            .block_type(textract::BlockType::Cell)
            .page(1)
            .row_index(2)
            .column_index(3)
            .relationships(
                textract::Relationship::builder()
                    .r#type(textract::RelationshipType::Child)
                    .ids("w1")
                    .ids("w2")
                    .build(),
            )
            .build();

        let block = convert_block(&sdk_block).unwrap();
        assert_eq!(block.block_type, BlockType::Cell);
        assert_eq!(block.page, Some(1));
        assert_eq!(block.row_index, Some(2));
        assert_eq!(block.column_index, Some(3));
        assert_eq!(block.child_ids().collect::<Vec<_>>(), vec!["w1", "w2"]);
    }

    #[test]
    fn test_convert_block_without_type() {
        let sdk_block = textract::Block::builder().id("x").build();
        assert!(matches!(
            convert_block(&sdk_block),
            Err(Error::MalformedBlockGraph(_))
        ));
    }

    #[test]
    fn test_convert_page() {
        let output = GetDocumentAnalysisOutput::builder()
            .job_status(textract::JobStatus::InProgress)
            .next_token("t2")
            .blocks(
                textract::Block::builder()
                    .id("f")
                    .block_type(textract::BlockType::LayoutFigure)
                    .page(0)
                    .build(),
            )
            .build();

        let page = convert_page(&output).unwrap();
        assert_eq!(page.job_status, Some(JobStatus::InProgress));
        assert_eq!(page.next_token.as_deref(), Some("t2"));
        assert!(page.blocks[0].is_figure());
    }

    #[test]
    fn test_mismatched_credentials() {
        let mut config = AwsConfig::new();
        config.access_key_id = Some("key".to_string());
        assert!(matches!(
            AwsSession::connect(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(Some(3)), Some(3));
        assert_eq!(non_negative(Some(-1)), None);
        assert_eq!(non_negative(None), None);
    }
}
