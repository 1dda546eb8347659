//! Notion API client.
//!
//! The importer only needs three operations: appending content blocks to a
//! page, creating a database under a page, and inserting a record into a
//! database. They are grouped behind the [`NotionApi`] trait so the import
//! driver can run against an in-memory fake in tests.

use anyhow::{bail, Context};
use async_trait::async_trait;
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Pinned Notion API revision, sent on every request.
const NOTION_VERSION: &str = "2022-06-28";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A content block appended under a page. Each carries one plain-text run.
#[derive(Clone, Debug)]
pub enum Block {
    Heading(String),
    Paragraph(String),
}

/// Kind of a database column. Notion requires exactly one `Title` column.
#[derive(Clone, Copy, Debug)]
pub enum ColumnKind {
    Title,
    RichText,
}

/// A value for one record field, matching the column's declared kind.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Title(String),
    RichText(String),
}

/// The remote operations the importer consumes.
///
/// All three can fail for reasons opaque to this tool (auth, rate limits,
/// malformed input); callers only inspect the error message for logging.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Appends `blocks` as children of the page `parent_id` and returns the
    /// ids of the created blocks, in order.
    async fn append_blocks(&self, parent_id: &str, blocks: &[Block]) -> Result<Vec<String>>;

    /// Creates a database titled `title` under the page `parent_id` with the
    /// given named columns. Returns the new database's id.
    async fn create_database(
        &self,
        parent_id: &str,
        title: &str,
        columns: &[(&str, ColumnKind)],
    ) -> Result<String>;

    /// Inserts one record into the database `database_id`. Returns the new
    /// record's id.
    async fn create_record(
        &self,
        database_id: &str,
        fields: &[(&str, FieldValue)],
    ) -> Result<String>;
}

/// Real client over the Notion HTTP API.
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ObjectResponse {
    id: String,
}

#[derive(Deserialize)]
struct AppendBlocksResponse {
    results: Vec<ObjectResponse>,
}

impl NotionClient {
    pub fn new(token: &str) -> Result<NotionClient> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// `base_url` is injectable so a test server can stand in for the real
    /// API host.
    pub fn with_base_url(token: &str, base_url: &str) -> Result<NotionClient> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::try_from(format!("Bearer {token}"))
            .context("Notion token is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(NotionClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Notion API request failed: {status}: {body}");
        }
        Ok(response)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn append_blocks(&self, parent_id: &str, blocks: &[Block]) -> Result<Vec<String>> {
        let body = json!({
            "children": blocks.iter().map(block_json).collect::<Vec<serde_json::Value>>(),
        });

        let response = self.client
            .patch(format!("{base}/v1/blocks/{parent_id}/children", base = self.base_url))
            .json(&body)
            .send()
            .await
            .context("appending blocks")?;

        let parsed: AppendBlocksResponse = Self::expect_success(response)
            .await
            .context("appending blocks")?
            .json()
            .await
            .context("decoding append blocks response")?;

        Ok(parsed.results.into_iter().map(|block| block.id).collect())
    }

    async fn create_database(
        &self,
        parent_id: &str,
        title: &str,
        columns: &[(&str, ColumnKind)],
    ) -> Result<String> {
        let properties = columns.iter()
            .map(|(name, kind)| (name.to_string(), column_json(*kind)))
            .collect::<serde_json::Map<String, serde_json::Value>>();

        let body = json!({
            "parent": {
                "type": "page_id",
                "page_id": parent_id,
            },
            "title": [text_run(title)],
            "properties": properties,
        });

        let response = self.client
            .post(format!("{base}/v1/databases", base = self.base_url))
            .json(&body)
            .send()
            .await
            .context("creating database")?;

        let parsed: ObjectResponse = Self::expect_success(response)
            .await
            .context("creating database")?
            .json()
            .await
            .context("decoding create database response")?;

        Ok(parsed.id)
    }

    async fn create_record(
        &self,
        database_id: &str,
        fields: &[(&str, FieldValue)],
    ) -> Result<String> {
        let properties = fields.iter()
            .map(|(name, value)| (name.to_string(), field_json(value)))
            .collect::<serde_json::Map<String, serde_json::Value>>();

        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        let response = self.client
            .post(format!("{base}/v1/pages", base = self.base_url))
            .json(&body)
            .send()
            .await
            .context("creating record")?;

        let parsed: ObjectResponse = Self::expect_success(response)
            .await
            .context("creating record")?
            .json()
            .await
            .context("decoding create record response")?;

        Ok(parsed.id)
    }
}

fn text_run(content: &str) -> serde_json::Value {
    json!({
        "type": "text",
        "text": { "content": content },
    })
}

fn block_json(block: &Block) -> serde_json::Value {
    match block {
        Block::Heading(text) => json!({
            "object": "block",
            "type": "heading_1",
            "heading_1": { "rich_text": [text_run(text)] },
        }),
        Block::Paragraph(text) => json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": [text_run(text)] },
        }),
    }
}

fn column_json(kind: ColumnKind) -> serde_json::Value {
    match kind {
        ColumnKind::Title => json!({ "title": {} }),
        ColumnKind::RichText => json!({ "rich_text": {} }),
    }
}

fn field_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Title(text) => json!({ "title": [{ "text": { "content": text } }] }),
        FieldValue::RichText(text) => json!({ "rich_text": [{ "text": { "content": text } }] }),
    }
}

impl FieldValue {
    /// The plain text inside the value, whichever kind it is.
    #[allow(dead_code)] // Used by the import driver's tests
    pub fn text(&self) -> &str {
        match self {
            FieldValue::Title(text) | FieldValue::RichText(text) => text,
        }
    }
}
