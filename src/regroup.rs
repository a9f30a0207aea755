//! Client-side regrouping: flat batch pages → per-source-file groups.
//!
//! A batch response flattens every file's pages into one map; the page
//! name is the only channel carrying the source identity. This module
//! inverts the server's naming exactly by delegating the split to
//! [`crate::naming::split_page_name`].

use crate::naming;
use crate::types::PageData;
use std::collections::BTreeMap;

/// Group a flat page map by source base name.
///
/// `a_0`, `a_1`, `b_0` become `{a: {a_0, a_1}, b: {b_0}}`; a name with no
/// index separator (lone single-page result) forms its own group.
pub fn by_source(
    pages: BTreeMap<String, PageData>,
) -> BTreeMap<String, BTreeMap<String, PageData>> {
    let mut grouped: BTreeMap<String, BTreeMap<String, PageData>> = BTreeMap::new();
    for (page_name, data) in pages {
        let (base, _index) = naming::split_page_name(&page_name);
        grouped
            .entry(base.to_string())
            .or_default()
            .insert(page_name, data);
    }
    grouped
}
