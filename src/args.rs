use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub struct CommonArgs {
    /// The directory containing the chapter JSON files, e.g. `~/Desktop/대종경`.
    ///
    /// If not present tries to read the environment variable `DAEJONG_FOLDER_PATH`.
    #[arg(id = "source-dir", long = "source-dir", env = "DAEJONG_FOLDER_PATH")]
    pub source_dir: PathBuf,
}

#[derive(clap::Args, Clone)]
pub struct NotionArgs {
    /// The Notion integration token used to authenticate API requests.
    ///
    /// If not present tries to read the environment variable `NOTION_TOKEN`.
    /// A missing token is a fatal error, checked before any chapter is processed.
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,

    /// The ID of the Notion page under which chapter headings and databases are created.
    ///
    /// If not present tries to read the environment variable `NOTION_PAGE_ID`,
    /// finally falls back to a default page.
    #[arg(long, env = "NOTION_PAGE_ID",
          default_value = "1ca2394e-5e9d-80b9-8d1b-f3a9b2ff1312")]
    pub page_id: String,
}

// Keeps the token out of `--log-json` / debug output of parsed args.
impl std::fmt::Debug for NotionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionArgs")
         .field("notion_token", &self.notion_token.as_ref().map(|_| "<redacted>"))
         .field("page_id", &self.page_id)
         .finish()
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct JsonOutputArg {
    /// Print the output as JSON. By default prints file or entry names only.
    #[arg(id = "json", long = "json", default_value_t = false)]
    pub value: bool,
}
