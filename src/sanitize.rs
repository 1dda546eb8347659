//! Strips HTML markup from raw entry text.
//!
//! The source files carry a small fixed set of named entities and occasional
//! inline tags. Entities are decoded first, then anything shaped like a tag
//! is deleted, so an entity-encoded tag such as `&lt;b&gt;` decodes to `<b>`
//! and is then stripped like any other tag. That cascade matches the source
//! data's conventions and is relied on by callers.

/// Decodes the known entities and removes HTML tags from `raw`.
///
/// No other normalization is performed: whitespace is kept as-is, including
/// any left behind by a removed tag.
pub fn clean_html_content(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = raw.replace("&nbsp;", " ")
                     .replace("&lt;", "<")
                     .replace("&gt;", ">")
                     .replace("&amp;", "&")
                     .replace("&quot;", "\"");

    lazy_regex!(r"<[^>]*>").replace_all(&decoded, "").into_owned()
}
