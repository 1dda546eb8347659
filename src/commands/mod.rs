pub mod completion;
pub mod import;
pub mod list_files;
pub mod parse_file;
