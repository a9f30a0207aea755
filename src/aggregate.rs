//! Result aggregation: staging artifacts → page-keyed response map.
//!
//! The structured-data artifacts (`*_res.json`) drive the scan; the
//! markdown companion path is derived by stripping the `_res` suffix.
//! Either representation may be absent for a page — a page with only a
//! markdown document still appears in the map, keyed off whichever
//! artifact exists.

use crate::error::OcrError;
use crate::naming;
use crate::types::{OcrResultJson, PageData};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Read every persisted page artifact in `output_dir` back into memory,
/// keyed by page name. Scanning is in sorted file order, so the map
/// construction order matches the pipeline's deterministic naming.
pub fn collect_pages(output_dir: &Path) -> Result<BTreeMap<String, PageData>, OcrError> {
    let mut pages: BTreeMap<String, PageData> = BTreeMap::new();

    let entries = std::fs::read_dir(output_dir).map_err(|source| OcrError::ArtifactRead {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| OcrError::ArtifactRead {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        names.push(naming::page_name_from_artifact_stem(stem).to_string());
    }
    names.sort();
    names.dedup();

    for page_name in names {
        let json_path = output_dir.join(naming::json_artifact(&page_name));
        let md_path = output_dir.join(naming::markdown_artifact(&page_name));

        let json = if json_path.exists() {
            let raw =
                std::fs::read_to_string(&json_path).map_err(|source| OcrError::ArtifactRead {
                    path: json_path.clone(),
                    source,
                })?;
            let parsed: OcrResultJson =
                serde_json::from_str(&raw).map_err(|source| OcrError::ArtifactParse {
                    path: json_path.clone(),
                    source,
                })?;
            Some(parsed)
        } else {
            None
        };

        let markdown = if md_path.exists() {
            Some(
                std::fs::read_to_string(&md_path).map_err(|source| OcrError::ArtifactRead {
                    path: md_path.clone(),
                    source,
                })?,
            )
        } else {
            None
        };

        pages.insert(page_name, PageData { json, markdown });
    }

    debug!("aggregated {} page(s) from {}", pages.len(), output_dir.display());
    Ok(pages)
}
