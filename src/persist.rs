//! Persistence of recognition results to the stable on-disk layout.
//!
//! One subdirectory per source file under the output root:
//!
//! ```text
//! <output_root>/<base_name>/<page_name>.md
//! <output_root>/<base_name>/<page_name>.json
//! ```
//!
//! The two artifacts are written independently; a page carrying only
//! markdown produces only the `.md` file. JSON is written as UTF-8 with
//! two-space indentation and non-ASCII text preserved verbatim.

use crate::error::OcrError;
use crate::types::PageData;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Write every page of one source file's group under
/// `<output_root>/<base_name>/`. Returns the number of files written.
///
/// Creating an already-existing group directory is not an error, so
/// repeated runs over the same output root are allowed.
pub async fn save_group(
    output_root: &Path,
    base_name: &str,
    pages: &BTreeMap<String, PageData>,
) -> Result<usize, OcrError> {
    let group_dir = output_root.join(base_name);
    tokio::fs::create_dir_all(&group_dir)
        .await
        .map_err(|source| OcrError::OutputWrite {
            path: group_dir.clone(),
            source,
        })?;

    let mut written = 0;
    for (page_name, data) in pages {
        if let Some(markdown) = &data.markdown {
            let path = group_dir.join(format!("{page_name}.md"));
            tokio::fs::write(&path, markdown)
                .await
                .map_err(|source| OcrError::OutputWrite {
                    path: path.clone(),
                    source,
                })?;
            info!("saved {}", path.display());
            written += 1;
        }

        if let Some(json) = &data.json {
            let path = group_dir.join(format!("{page_name}.json"));
            let pretty = serde_json::to_string_pretty(json).map_err(|e| OcrError::OutputWrite {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            tokio::fs::write(&path, pretty)
                .await
                .map_err(|source| OcrError::OutputWrite {
                    path: path.clone(),
                    source,
                })?;
            info!("saved {}", path.display());
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ModelSettings, OcrResultJson};

    fn page(markdown: Option<&str>, json: Option<OcrResultJson>) -> PageData {
        PageData {
            json,
            markdown: markdown.map(str::to_string),
        }
    }

    fn result_with_text(text: &str) -> OcrResultJson {
        OcrResultJson {
            input_path: "/in/doc.pdf".into(),
            page_index: Some(0),
            page_count: Some(1),
            width: 10,
            height: 10,
            model_settings: ModelSettings::default(),
            parsing_res_list: vec![crate::types::ParsingBlock {
                block_label: "text".into(),
                block_content: text.into(),
                block_bbox: [0, 0, 5, 5],
                block_id: 0,
                block_order: None,
                group_id: None,
                global_block_id: None,
                global_group_id: None,
                block_polygon_points: None,
            }],
        }
    }

    #[tokio::test]
    async fn round_trip_preserves_both_artifacts() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut pages = BTreeMap::new();
        pages.insert(
            "doc".to_string(),
            page(Some("# Başlık\n"), Some(result_with_text("Türkçe metin"))),
        );

        let written = save_group(root.path(), "doc", &pages).await.expect("save");
        assert_eq!(written, 2);

        let md = tokio::fs::read_to_string(root.path().join("doc/doc.md"))
            .await
            .expect("read md");
        assert_eq!(md, "# Başlık\n");

        let raw = tokio::fs::read_to_string(root.path().join("doc/doc.json"))
            .await
            .expect("read json");
        // Two-space indentation, non-ASCII preserved unescaped.
        assert!(raw.contains("\n  \"input_path\""), "got: {raw}");
        assert!(raw.contains("Türkçe metin"), "got: {raw}");
        let parsed: OcrResultJson = serde_json::from_str(&raw).expect("reparse");
        assert_eq!(parsed, result_with_text("Türkçe metin"));
    }

    #[tokio::test]
    async fn markdown_only_page_writes_only_markdown() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut pages = BTreeMap::new();
        pages.insert("a_0".to_string(), page(Some("text"), None));

        let written = save_group(root.path(), "a", &pages).await.expect("save");
        assert_eq!(written, 1);
        assert!(root.path().join("a/a_0.md").exists());
        assert!(!root.path().join("a/a_0.json").exists());
    }

    #[tokio::test]
    async fn existing_group_dir_is_not_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        tokio::fs::create_dir_all(root.path().join("a"))
            .await
            .unwrap();
        let pages = BTreeMap::new();
        save_group(root.path(), "a", &pages).await.expect("save");
    }
}
