//! Discovers chapter files in the source directory.

use std::{
    fs::DirEntry,
    path::{Path, PathBuf},
};

/// A discovered input file, one per chapter.
#[derive(Clone, Debug)]
pub struct ChapterFile {
    /// Plain file name, e.g. `1장 서품.json`.
    pub name: String,

    pub path: PathBuf,

    /// First integer appearing in the file name. Chapter files are
    /// processed in ascending order of this number.
    pub number: u64,
}

impl ChapterFile {
    /// The chapter key used to look up titles, e.g. `1장 서품`.
    pub fn chapter_key(&self) -> &str {
        self.name.strip_suffix(".json").unwrap_or(&*self.name)
    }
}

/// Lists the chapter files in `dir`, ordered by chapter number.
///
/// Eligible files end in `.json`, are not dot-prefixed, and contain a
/// chapter number pattern (digits followed by `장`). Ordering is numeric by
/// the first integer in the name, so `2장.json` sorts before `10장.json`.
///
/// An unreadable directory is logged and returns an empty list; the caller
/// decides whether that is fatal.
pub fn find_chapter_files(dir: &Path) -> Vec<ChapterFile> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            tracing::error!(dir = %dir.display(),
                            error = %err,
                            "failed to read source directory");
            return Vec::new();
        }
    };

    let mut files = read_dir
        .filter_map(|dir_entry| match dir_entry {
            Ok(dir_entry) => chapter_file(dir_entry),
            Err(err) => {
                tracing::error!(dir = %dir.display(),
                                error = %err,
                                "failed to read directory entry, skipping it");
                None
            }
        })
        .collect::<Vec<ChapterFile>>();

    files.sort_by_key(|file| file.number);

    tracing::debug!(dir = %dir.display(),
                    files_count = files.len(),
                    "chapter files discovered");

    files
}

fn chapter_file(dir_entry: DirEntry) -> Option<ChapterFile> {
    let is_file = dir_entry.file_type().map_or(false, |t| t.is_file());
    if !is_file {
        return None;
    }

    let name = dir_entry.file_name().to_string_lossy().into_owned();
    if !name.ends_with(".json") || name.starts_with('.') {
        return None;
    }
    if !lazy_regex!(r"\d+장").is_match(&*name) {
        return None;
    }

    // The filter above guarantees at least one digit run.
    let number = lazy_regex!(r"\d+")
        .find(&*name)
        .and_then(|m| m.as_str().parse::<u64>().ok())?;

    Some(ChapterFile {
        path: dir_entry.path(),
        name,
        number,
    })
}

#[cfg(test)]
mod tests {
    use super::find_chapter_files;
    use std::{fs, path::Path};

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn orders_numerically_not_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "10장 신성품.json");
        touch(dir.path(), "2장 교의품.json");
        touch(dir.path(), "1장 서품.json");

        let names = find_chapter_files(dir.path())
            .into_iter()
            .map(|f| f.name)
            .collect::<Vec<String>>();

        assert_eq!(names,
                   vec!["1장 서품.json", "2장 교의품.json", "10장 신성품.json"]);
    }

    #[test]
    fn filters_by_naming_convention() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "3장 수행품.json");
        touch(dir.path(), ".3장 수행품.json");   // hidden
        touch(dir.path(), "notes.json");         // no digits + 장
        touch(dir.path(), "4장 인도품.txt");     // wrong extension
        touch(dir.path(), "장.json");            // unit char without digits
        fs::create_dir(dir.path().join("5장 인과품.json")).unwrap(); // not a file

        let files = find_chapter_files(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "3장 수행품.json");
        assert_eq!(files[0].number, 3);
        assert_eq!(files[0].chapter_key(), "3장 수행품");
    }

    #[test]
    fn unreadable_directory_yields_empty_list() {
        let files = find_chapter_files(Path::new("/nonexistent/대종경"));
        assert!(files.is_empty());
    }
}
