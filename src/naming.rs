//! Page-name and artifact-name conventions shared by server and client.
//!
//! The page name is the only channel through which the client recovers
//! which source file a page belongs to, so construction
//! ([`page_name`]) and inversion ([`split_page_name`]) live side by side
//! in this module. Keeping both halves here means a change to one cannot
//! silently break the other.
//!
//! ## Conventions
//!
//! * A single-page source submitted on its own keys its page by the bare
//!   base name: `report.pdf` → `report`.
//! * Every page of a multi-page source, and every page in a batch
//!   request, carries a zero-based index: `a.pdf` (2 pages) + `b.png`
//!   → `a_0`, `a_1`, `b_0`.
//! * The structured-data artifact on disk is `<page_name>_res.json`; its
//!   markdown companion is `<page_name>.md`.

use std::path::Path;

/// File extensions accepted by both endpoints, lower-case.
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["pdf", "png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// Suffix distinguishing the structured-data artifact from its markdown
/// companion, e.g. `report_res.json` vs `report.md`.
pub const RES_SUFFIX: &str = "_res";

/// Separator between a base name and a page index.
pub const INDEX_SEPARATOR: char = '_';

/// Whether `filename` carries one of the supported extensions
/// (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// The file name without its extension, used as the grouping key for
/// results. `scan.tar.gz`-style names keep everything before the last dot.
pub fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Build the page name for page `index` of the source `stem`.
///
/// `indexed` is true when the request contains more than one file or the
/// source produced more than one page; only a lone single-page source
/// keeps the bare stem.
pub fn page_name(stem: &str, index: usize, indexed: bool) -> String {
    if indexed {
        format!("{stem}{INDEX_SEPARATOR}{index}")
    } else {
        stem.to_string()
    }
}

/// Split a page name back into `(base_name, page_index)`.
///
/// Splits on the *last* underscore; a name without one is a lone
/// single-page result and maps entirely to the base name. The suffix is
/// not validated as numeric.
///
/// A source file whose own base name ends in `_<digits>` (say
/// `scan_2.pdf`) is indistinguishable from page 2 of `scan` here; that
/// ambiguity is inherent to the encoding and is not disambiguated.
pub fn split_page_name(page_name: &str) -> (&str, Option<&str>) {
    match page_name.rsplit_once(INDEX_SEPARATOR) {
        Some((base, index)) if !base.is_empty() => (base, Some(index)),
        _ => (page_name, None),
    }
}

/// File name of the structured-data artifact for `page_name`.
pub fn json_artifact(page_name: &str) -> String {
    format!("{page_name}{RES_SUFFIX}.json")
}

/// File name of the markdown artifact for `page_name`.
pub fn markdown_artifact(page_name: &str) -> String {
    format!("{page_name}.md")
}

/// Recover the page name from a structured-data artifact stem, i.e. strip
/// the `_res` suffix when present.
pub fn page_name_from_artifact_stem(stem: &str) -> &str {
    stem.strip_suffix(RES_SUFFIX).unwrap_or(stem)
}
