use crate::{
    args::{CommonArgs, JsonOutputArg},
    Result,
    source,
};

/// List the chapter files that would be imported, in import order.
#[derive(clap::Args, Clone, Debug)]
pub struct Args {
    #[clap(flatten)]
    common: CommonArgs,

    #[clap(flatten)]
    json: JsonOutputArg,
}

#[tracing::instrument(level = "trace")]
pub async fn main(args: Args) -> Result<()> {
    let files = source::find_chapter_files(&*args.common.source_dir);

    if args.json.value {
        for file in files.iter() {
            serde_json::to_writer_pretty(
                &std::io::stdout(),
                &serde_json::json!({
                    "name": file.name,
                    "chapter_key": file.chapter_key(),
                    "number": file.number,
                    "path": file.path,
                }))?;
            println!();
        }
    } else {
        for file in files.iter() {
            println!("{}", file.name);
        }
    }

    Ok(())
}
