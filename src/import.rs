//! Drives the migration: one database per chapter, one record per entry.

use anyhow::bail;
use crate::{
    chapters,
    chunked_json::{self, Entry},
    notion::{Block, ColumnKind, FieldValue, NotionApi},
    Result,
    sanitize,
    source::{self, ChapterFile},
};
use std::{
    path::Path,
    time::Duration,
};

/// Notion rejects text property values longer than this.
pub const MAX_CONTENT_CHARS: usize = 2000;

const ELLIPSIS: &str = "...";

/// Delays inserted between remote calls to stay under Notion's request-rate
/// limit. They exist for pacing only, not for ordering correctness.
#[derive(Clone, Debug)]
pub struct Pacing {
    pub between_entries: Duration,
    pub after_entry_error: Duration,
    pub between_chapters: Duration,
}

impl Pacing {
    /// The standard policy: a fixed delay after each record insertion,
    /// doubled after a failed one, and a longer delay between chapters.
    pub fn standard(entry_delay_ms: u64, chapter_delay_ms: u64) -> Pacing {
        Pacing {
            between_entries: Duration::from_millis(entry_delay_ms),
            after_entry_error: Duration::from_millis(entry_delay_ms * 2),
            between_chapters: Duration::from_millis(chapter_delay_ms),
        }
    }

    /// No delays at all. For tests.
    #[allow(dead_code)]
    pub fn none() -> Pacing {
        Pacing {
            between_entries: Duration::ZERO,
            after_entry_error: Duration::ZERO,
            between_chapters: Duration::ZERO,
        }
    }

    /// The delay to wait after submitting one entry, given its outcome.
    pub fn after_entry(&self, succeeded: bool) -> Duration {
        if succeeded {
            self.between_entries
        } else {
            self.after_entry_error
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EntryCounts {
    pub created: usize,
    pub failed: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChapterOutcome {
    /// The chapter's database could not be created; no entries were
    /// attempted.
    Skipped,

    Imported(EntryCounts),
}

#[derive(Clone, Debug)]
pub struct ChapterReport {
    pub chapter_key: String,
    pub outcome: ChapterOutcome,
}

/// Imports every chapter file found in `source_dir`, in chapter order.
///
/// Fails only when no chapter files are discovered; every failure past that
/// point is contained to the chapter or entry it occurred in, and shows up
/// in the returned reports.
pub async fn run(
    api: &dyn NotionApi,
    pacing: &Pacing,
    root_page_id: &str,
    source_dir: &Path,
) -> Result<Vec<ChapterReport>> {
    let files = source::find_chapter_files(source_dir);
    if files.is_empty() {
        bail!("no chapter JSON files found in '{dir}'", dir = source_dir.display());
    }

    tracing::info!(files_count = files.len(),
                   dir = %source_dir.display(),
                   "chapter files to process");

    let mut reports = Vec::<ChapterReport>::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        tracing::info!(chapter = %file.chapter_key(),
                       position = index + 1,
                       total = files.len(),
                       "processing chapter");

        let outcome = import_chapter(api, pacing, root_page_id, file).await;
        reports.push(ChapterReport {
            chapter_key: file.chapter_key().to_string(),
            outcome,
        });

        // Pacing between chapters, but not after the last one.
        if index + 1 < files.len() {
            tokio::time::sleep(pacing.between_chapters).await;
        }
    }

    Ok(reports)
}

/// Runs one chapter through its stages: title blocks, database, entries.
async fn import_chapter(
    api: &dyn NotionApi,
    pacing: &Pacing,
    root_page_id: &str,
    file: &ChapterFile,
) -> ChapterOutcome {
    let chapter_key = file.chapter_key();

    create_chapter_title(api, root_page_id, chapter_key).await;
    // TODO: a failed title step currently does not skip the chapter the way
    // a failed database creation does. Decide whether it should.

    let Some(database_id) = create_database(api, root_page_id, chapter_key).await else {
        tracing::warn!(chapter = %chapter_key, "skipping chapter without a database");
        return ChapterOutcome::Skipped;
    };

    let entries = chunked_json::parse_chapter_file(&file.path);
    let counts = import_entries(api, pacing, &database_id, &entries).await;

    ChapterOutcome::Imported(counts)
}

/// Appends the chapter's heading and description under the root page.
async fn create_chapter_title(api: &dyn NotionApi, root_page_id: &str, chapter_key: &str) {
    let (Some(title), Some(description)) =
        (chapters::full_title(chapter_key), chapters::description(chapter_key)) else
    {
        tracing::error!(chapter = %chapter_key,
                        "unknown chapter key, no title blocks created");
        return;
    };

    let blocks = [Block::Heading(title), Block::Paragraph(description)];

    match api.append_blocks(root_page_id, &blocks).await {
        Ok(ids) => {
            tracing::debug!(chapter = %chapter_key,
                            blocks_count = ids.len(),
                            "chapter title blocks created");
        }
        Err(err) => {
            tracing::error!(chapter = %chapter_key,
                            error = %err,
                            "failed to create chapter title blocks");
        }
    }
}

/// Creates the chapter's database. `None` means the chapter cannot proceed.
async fn create_database(
    api: &dyn NotionApi,
    root_page_id: &str,
    chapter_key: &str,
) -> Option<String> {
    let Some(title) = chapters::database_title(chapter_key) else {
        tracing::error!(chapter = %chapter_key,
                        "unknown chapter key, cannot create database");
        return None;
    };

    let columns = [
        ("장", ColumnKind::Title),
        ("내용", ColumnKind::RichText),
        ("색인", ColumnKind::RichText),
        ("대종경", ColumnKind::RichText),
    ];

    match api.create_database(root_page_id, &title, &columns).await {
        Ok(id) => {
            tracing::info!(chapter = %chapter_key,
                           database_id = %id,
                           "database created");
            Some(id)
        }
        Err(err) => {
            tracing::error!(chapter = %chapter_key,
                            error = %err,
                            "failed to create database");
            None
        }
    }
}

/// Inserts one record per importable entry, pacing between submissions.
async fn import_entries(
    api: &dyn NotionApi,
    pacing: &Pacing,
    database_id: &str,
    entries: &[(String, Entry)],
) -> EntryCounts {
    tracing::info!(entries_count = entries.len(), "entries found");

    let mut counts = EntryCounts::default();

    for (index, (key, entry)) in entries.iter().enumerate() {
        if !entry.is_importable() {
            // Not counted as a failure.
            tracing::debug!(key = %key,
                            "entry is missing contents or chapter title, skipping");
            continue;
        }

        let chapter_title = entry.chapter_title.as_deref().unwrap_or("");
        let content =
            truncate_content(&sanitize::clean_html_content(entry.contents
                                                                .as_deref()
                                                                .unwrap_or("")));

        let fields = [
            ("장", FieldValue::Title(chapter_title.to_string())),
            ("내용", FieldValue::RichText(content)),
            ("색인", FieldValue::RichText(key.clone())),
            ("대종경", FieldValue::RichText(citation(entry))),
        ];

        let succeeded = match api.create_record(database_id, &fields).await {
            Ok(record_id) => {
                tracing::info!(key = %key,
                               record_id = %record_id,
                               position = index + 1,
                               total = entries.len(),
                               "entry added");
                counts.created += 1;
                true
            }
            Err(err) => {
                tracing::error!(key = %key,
                                error = %err,
                                position = index + 1,
                                total = entries.len(),
                                "failed to add entry");
                counts.failed += 1;
                false
            }
        };

        tokio::time::sleep(pacing.after_entry(succeeded)).await;
    }

    tracing::info!(created = counts.created,
                   failed = counts.failed,
                   "chapter entries processed");

    counts
}

/// The combined citation string, e.g. `대종경 1 총서편 서품 1장`.
///
/// A missing volume title leaves an empty segment (and the double space
/// around it), matching the established record format.
fn citation(entry: &Entry) -> String {
    let volume = entry.volume_title
                      .as_deref()
                      .map(|v| v.strip_prefix('제').unwrap_or(v))
                      .unwrap_or("");
    format!("대종경 {volume} {chapter}",
            chapter = entry.chapter_title.as_deref().unwrap_or(""))
}

/// Caps `content` at [`MAX_CONTENT_CHARS`] characters. When cut, the last
/// three characters of the result are `...` so the truncation is visible.
fn truncate_content(content: &str) -> String {
    if content.chars().count() <= MAX_CONTENT_CHARS {
        return content.to_string();
    }

    let mut truncated = content.chars()
                               .take(MAX_CONTENT_CHARS - ELLIPSIS.len())
                               .collect::<String>();
    truncated.push_str(ELLIPSIS);
    truncated
}
