//! Wire schemas for the HTTP API.
//!
//! Every payload is an explicit struct with typed optional fields rather
//! than a free-form JSON map: `PageData.json` and `PageData.markdown` are
//! *independently* nullable, and that contract is part of the API, not an
//! accident of serialisation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One uploaded file, as received from a multipart field. Lives only for
/// the duration of the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, used to derive the page names.
    pub name: String,
    pub bytes: Bytes,
}

/// Recognition results for a single page: the structured layout document
/// and/or the rendered markdown. A page may legitimately have only one of
/// the two representations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageData {
    /// Structured OCR result, when the pipeline produced one.
    pub json: Option<OcrResultJson>,
    /// Markdown rendering of the page, when the pipeline produced one.
    pub markdown: Option<String>,
}

/// Full structured OCR result for one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcrResultJson {
    pub input_path: String,
    #[serde(default)]
    pub page_index: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub model_settings: ModelSettings,
    #[serde(default)]
    pub parsing_res_list: Vec<ParsingBlock>,
}

/// Recognition-model configuration echoed back with every page result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    pub use_doc_preprocessor: bool,
    pub use_layout_detection: bool,
    pub use_chart_recognition: bool,
    pub use_seal_recognition: bool,
    pub use_ocr_for_image_block: bool,
    pub format_block_content: bool,
    pub merge_layout_blocks: bool,
    pub markdown_ignore_labels: Vec<String>,
    pub return_layout_polygon_points: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            use_doc_preprocessor: false,
            use_layout_detection: true,
            use_chart_recognition: false,
            use_seal_recognition: false,
            use_ocr_for_image_block: false,
            format_block_content: false,
            merge_layout_blocks: true,
            markdown_ignore_labels: Vec::new(),
            return_layout_polygon_points: true,
        }
    }
}

/// A single layout block recognised on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsingBlock {
    pub block_label: String,
    pub block_content: String,
    /// `[x0, y0, x1, y1]` in rendered-page pixels.
    pub block_bbox: [i32; 4],
    pub block_id: i32,
    #[serde(default)]
    pub block_order: Option<i32>,
    #[serde(default)]
    pub group_id: Option<i32>,
    #[serde(default)]
    pub global_block_id: Option<i32>,
    #[serde(default)]
    pub global_group_id: Option<i32>,
    #[serde(default)]
    pub block_polygon_points: Option<Vec<[f64; 2]>>,
}

/// Response of `POST /ocr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Original file name as uploaded.
    pub filename: String,
    /// Number of pages recognised; always equals `pages.len()`.
    pub page_count: usize,
    /// Results keyed by page name.
    pub pages: BTreeMap<String, PageData>,
}

/// Response of `POST /ocr/batch`.
///
/// Page names are unique across the whole batch; `page_count` equals
/// `pages.len()` and therefore the sum of per-file page counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOcrResponse {
    /// Original file names, in submission order.
    pub filenames: Vec<String>,
    pub page_count: usize,
    pub pages: BTreeMap<String, PageData>,
}
