//! Positional render model of the file list.

use serde::Serialize;
use std::fmt;

use crate::list::FileList;

/// One displayed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    /// 1-based position.
    pub position: usize,
    /// File name.
    pub name: String,
    /// Size in KiB, rounded to the nearest whole number.
    pub size_kb: u64,
    /// Whether the "move up" control is active.
    pub can_move_up: bool,
    /// Whether the "move down" control is active.
    pub can_move_down: bool,
}

impl fmt::Display for ListRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({} KB)", self.position, self.name, self.size_kb)
    }
}

/// Everything needed to draw the list and its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    /// Rows in list order.
    pub rows: Vec<ListRow>,
    /// Whether the merge trigger is active.
    pub merge_enabled: bool,
    /// Revision of the list this view was rendered from.
    pub revision: u64,
}

impl ListView {
    /// Render `list`. While `merging` is true the merge trigger stays disabled.
    pub fn render(list: &FileList, merging: bool) -> Self {
        let len = list.len();
        let rows = list
            .files()
            .iter()
            .enumerate()
            .map(|(idx, file)| ListRow {
                position: idx + 1,
                name: file.name().to_string(),
                size_kb: size_in_kb(file.size()),
                can_move_up: idx > 0,
                can_move_down: idx + 1 < len,
            })
            .collect();

        Self {
            rows,
            merge_enabled: len > 0 && !merging,
            revision: list.revision(),
        }
    }

    /// Whether this view reflects the current state of `list`.
    pub fn is_current(&self, list: &FileList) -> bool {
        self.revision == list.revision()
    }
}

/// Bytes to KiB, rounding half up.
fn size_in_kb(size: u64) -> u64 {
    (size + 512) / 1024
}
