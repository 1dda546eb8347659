use anyhow::bail;
use crate::{
    args::{CommonArgs, NotionArgs},
    import::{self, ChapterOutcome, Pacing},
    notion::NotionClient,
    Result,
};

/// Import every chapter file into Notion: one database per chapter, one
/// record per entry.
#[derive(clap::Args, Clone, Debug)]
pub struct Args {
    #[clap(flatten)]
    common: CommonArgs,

    #[clap(flatten)]
    notion: NotionArgs,

    /// Delay in milliseconds after each record insertion. Doubled after a
    /// failed insertion.
    ///
    /// If not present tries to read the environment variable `DJN_ENTRY_DELAY_MS`.
    #[arg(long, default_value_t = 350, env = "DJN_ENTRY_DELAY_MS")]
    entry_delay_ms: u64,

    /// Delay in milliseconds between chapters.
    ///
    /// If not present tries to read the environment variable `DJN_CHAPTER_DELAY_MS`.
    #[arg(long, default_value_t = 1000, env = "DJN_CHAPTER_DELAY_MS")]
    chapter_delay_ms: u64,
}

#[tracing::instrument(level = "trace")]
pub async fn main(args: Args) -> Result<()> {
    // Checked up front: without a token no chapter can be processed at all.
    let Some(token) = args.notion.notion_token.as_deref() else {
        bail!("no Notion API token is configured. \
               Pass --notion-token or set the environment variable NOTION_TOKEN.");
    };

    let client = NotionClient::new(token)?;
    let pacing = Pacing::standard(args.entry_delay_ms, args.chapter_delay_ms);

    let reports = import::run(&client,
                              &pacing,
                              &*args.notion.page_id,
                              &*args.common.source_dir).await?;

    for report in reports.iter() {
        match &report.outcome {
            ChapterOutcome::Skipped =>
                println!("{chapter}: skipped", chapter = report.chapter_key),
            ChapterOutcome::Imported(counts) =>
                println!("{chapter}: {created} created, {failed} failed",
                         chapter = report.chapter_key,
                         created = counts.created,
                         failed = counts.failed),
        }
    }

    Ok(())
}
