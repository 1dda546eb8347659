use crate::{
    args::JsonOutputArg,
    chunked_json,
    Result,
};
use std::path::PathBuf;

/// Parse one chapter file and print the entries recovered from it.
///
/// Useful for checking what an import run would submit, without touching
/// Notion.
#[derive(clap::Args, Clone, Debug)]
pub struct Args {
    /// Path of the chapter file to parse.
    #[arg(long)]
    file: PathBuf,

    #[clap(flatten)]
    json: JsonOutputArg,
}

#[tracing::instrument(level = "trace")]
pub async fn main(args: Args) -> Result<()> {
    let entries = chunked_json::parse_chapter_file(&*args.file);

    tracing::info!(path = %args.file.display(),
                   entries_count = entries.len(),
                   "entries recovered");

    if args.json.value {
        for (key, entry) in entries.iter() {
            serde_json::to_writer_pretty(
                &std::io::stdout(),
                &serde_json::json!({ "key": key, "entry": entry }))?;
            println!();
        }
    } else {
        for (key, _entry) in entries.iter() {
            println!("{key}");
        }
    }

    Ok(())
}
