//! Recovers entries from the chapter files' chunked-JSON format.
//!
//! A chapter file is not one valid JSON document. It is a sequence of
//! top-level records, each introduced by a line starting with a quoted key
//! and a colon (`"daejong0101": {...`), whose object body may span multiple
//! lines. There is no enclosing `{}` or `[]` and the separators between
//! records are not recognizable as JSON, so record boundaries are
//! reconstructed from the key-line pattern and a leading-brace check.
//!
//! The key-line pattern cannot distinguish a top-level key from an object
//! field starting a line, so a body only survives line breaks placed where
//! the continuation does not itself begin with `"name":`. The source files
//! honor that; bodies that don't are dropped as decode failures.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One text record of a chapter.
///
/// All fields are optional at the parse layer; whether an entry is complete
/// enough to import is the caller's decision.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Entry {
    #[serde(default)]
    pub chapter_title: Option<String>,

    #[serde(default)]
    pub volume_title: Option<String>,

    #[serde(default)]
    pub contents: Option<String>,
}

impl Entry {
    /// Returns true when both `contents` and `chapter_title` are present
    /// and non-empty. Entries failing this are skipped by the importer.
    pub fn is_importable(&self) -> bool {
        fn filled(value: &Option<String>) -> bool {
            value.as_deref().map_or(false, |s| !s.is_empty())
        }

        filled(&self.contents) && filled(&self.chapter_title)
    }
}

/// Line-scanning state: at most one record is being accumulated at a time.
#[derive(Debug, Default)]
struct Scanner {
    pending: Option<Pending>,
    entries: Vec<(String, Entry)>,
}

#[derive(Debug)]
struct Pending {
    key: String,
    buf: String,
}

impl Scanner {
    /// Finalizes any record in progress, then begins a new one under `key`.
    ///
    /// `rest` is the trimmed text following the colon on the key line. If it
    /// does not open a JSON object the line is not a record and the scanner
    /// goes idle until the next key line.
    fn start_record(&mut self, key: &str, rest: &str) {
        self.finish_record();

        if rest.starts_with('{') {
            self.pending = Some(Pending {
                key: key.to_string(),
                buf: rest.to_string(),
            });
        }
    }

    /// Appends a continuation line to the record in progress, if any.
    ///
    /// Lines are joined with no separator; the source format never splits
    /// a JSON token across lines.
    fn append(&mut self, line: &str) {
        if let Some(pending) = self.pending.as_mut() {
            pending.buf.push_str(line);
        }
    }

    /// Decodes the accumulated buffer and stores the entry.
    ///
    /// A decode failure drops just this record; scanning continues with
    /// whatever follows.
    fn finish_record(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.buf.is_empty() {
            return;
        }

        match serde_json::from_str::<Entry>(&pending.buf) {
            Ok(entry) => self.store(pending.key, entry),
            Err(err) => {
                tracing::warn!(key = %pending.key,
                               error = %err,
                               "entry body failed to decode as JSON, dropping entry");
            }
        }
    }

    /// The source format has object semantics: a duplicate key replaces the
    /// earlier value but keeps its first-seen position.
    fn store(&mut self, key: String, entry: Entry) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key, entry)),
        }
    }
}

/// Parses chunked-JSON text into `(key, entry)` pairs in discovery order.
pub fn parse_chapter_text(text: &str) -> Vec<(String, Entry)> {
    let mut scanner = Scanner::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match split_key_line(line) {
            Some((key, rest)) => scanner.start_record(key, rest),
            None => scanner.append(line),
        }
    }

    scanner.finish_record();
    scanner.entries
}

/// Reads and parses one chapter file.
///
/// A read failure is not fatal: it is logged and an empty result is
/// returned, leaving the decision of how to proceed to the caller.
pub fn parse_chapter_file(path: &Path) -> Vec<(String, Entry)> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_chapter_text(&text),
        Err(err) => {
            tracing::error!(path = %path.display(),
                            error = %err,
                            "failed to read chapter file, treating it as empty");
            Vec::new()
        }
    }
}

/// Matches a trimmed line against the key pattern `"<key>":` and returns
/// the key together with the trimmed remainder of the line.
fn split_key_line(line: &str) -> Option<(&str, &str)> {
    let caps = lazy_regex!(r#"^"([^"]+)":"#).captures(line)?;
    let matched = caps.get(0)?;
    let key = caps.get(1)?.as_str();
    Some((key, line[matched.end()..].trim()))
}

#[cfg(test)]
mod tests {
    use super::{Entry, parse_chapter_file, parse_chapter_text};

    fn keys(entries: &[(String, Entry)]) -> Vec<&str> {
        entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn single_line_records() {
        let text = r#"
            "daejong0101": {"chapter_title": "서품 1장", "contents": "원기 원년"}
            "daejong0102": {"chapter_title": "서품 2장", "contents": "물질이 개벽되니"}
        "#;

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["daejong0101", "daejong0102"]);
        assert_eq!(entries[1].1.chapter_title.as_deref(), Some("서품 2장"));
        assert_eq!(entries[1].1.contents.as_deref(), Some("물질이 개벽되니"));
    }

    #[test]
    fn record_body_spanning_multiple_lines() {
        // Continuation lines start with a field's value, never with a
        // quoted field name, so they don't read as key lines.
        let text = concat!(
            "\"daejong0101\": {\"chapter_title\":\n",
            "    \"서품 1장\", \"volume_title\":\n",
            "    \"제1 총서편\", \"contents\":\n",
            "    \"대종사 말씀하시기를\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert_eq!(entries.len(), 1);
        let (key, entry) = &entries[0];
        assert_eq!(key, "daejong0101");
        assert_eq!(entry.volume_title.as_deref(), Some("제1 총서편"));
        assert_eq!(entry.contents.as_deref(), Some("대종사 말씀하시기를"));
    }

    #[test]
    fn last_record_is_finalized_at_end_of_input() {
        // No trailing newline, closing brace on the final line.
        let text =
            "\"daejong0915\": {\"chapter_title\":\n\"천도품 15장\", \"contents\": \"열반\"}";

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["daejong0915"]);
    }

    #[test]
    fn inner_field_at_line_start_terminates_the_record() {
        // The key-line pattern cannot tell a top-level key from an object
        // field that happens to start a line. A pretty-printed body whose
        // fields open their own lines is therefore not recoverable: the
        // field line finalizes the half-built buffer (which fails to
        // decode) and its non-`{` trailer leaves the scanner idle.
        let text = concat!(
            "\"daejong0101\": {\n",
            "    \"chapter_title\": \"서품 1장\", \"contents\": \"본문\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert!(entries.is_empty());
    }

    #[test]
    fn key_line_without_object_value_yields_no_entry() {
        let text = concat!(
            "\"version\": 3\n",
            "\"daejong0101\": {\"chapter_title\": \"서품 1장\", \"contents\": \"본문\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["daejong0101"]);
    }

    #[test]
    fn lines_after_a_non_record_key_are_ignored_until_the_next_key() {
        // The scanner goes idle after `"note":` because its value is not an
        // object; the stray continuation line must not leak anywhere.
        let text = concat!(
            "\"note\": stray\n",
            "orphan line\n",
            "\"daejong0201\": {\"chapter_title\": \"교의품 1장\", \"contents\": \"본문\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["daejong0201"]);
        assert_eq!(entries[0].1.contents.as_deref(), Some("본문"));
    }

    #[test]
    fn malformed_body_is_dropped_without_corrupting_later_records() {
        let text = concat!(
            "\"bad\": {\"chapter_title\": \"서품 1장\", \n",
            "\"good\": {\"chapter_title\": \"서품 2장\", \"contents\": \"본문\"}\n",
        );

        // The second key line terminates the first record, whose buffer is
        // not valid JSON; only the well-formed record survives.
        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["good"]);
    }

    #[test]
    fn blank_lines_are_skipped_mid_record() {
        let text = concat!(
            "\"daejong0301\": {\"chapter_title\":\n",
            "\n",
            "   \t\n",
            "\"수행품 1장\", \"contents\": \"본문\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["daejong0301"]);
    }

    #[test]
    fn duplicate_key_replaces_earlier_value_in_place() {
        let text = concat!(
            "\"dup\": {\"chapter_title\": \"첫번째\", \"contents\": \"a\"}\n",
            "\"other\": {\"chapter_title\": \"다른\", \"contents\": \"b\"}\n",
            "\"dup\": {\"chapter_title\": \"두번째\", \"contents\": \"c\"}\n",
        );

        let entries = parse_chapter_text(text);
        assert_eq!(keys(&entries), vec!["dup", "other"]);
        assert_eq!(entries[0].1.chapter_title.as_deref(), Some("두번째"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let text =
            "\"k\": {\"chapter_title\": \"서품 1장\", \"contents\": \"x\", \"extra\": [1, 2]}";

        let entries = parse_chapter_text(text);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].1.is_importable());
    }

    #[test]
    fn missing_file_parses_as_empty() {
        let entries = parse_chapter_file(std::path::Path::new("/nonexistent/99장.json"));
        assert!(entries.is_empty());
    }

    #[test]
    fn importable_requires_non_empty_contents_and_chapter_title() {
        let cases: &[(&str, bool)] = &[
            (r#"{"chapter_title": "서품 1장", "contents": "본문"}"#, true),
            (r#"{"chapter_title": "서품 1장"}"#, false),
            (r#"{"contents": "본문"}"#, false),
            (r#"{"chapter_title": "", "contents": "본문"}"#, false),
            (r#"{"chapter_title": "서품 1장", "contents": ""}"#, false),
            (r#"{}"#, false),
        ];

        for (input, expected) in cases.iter() {
            let entry: Entry = serde_json::from_str(input).unwrap();
            assert_eq!(entry.is_importable(), *expected, "input: {input}");
        }
    }
}
