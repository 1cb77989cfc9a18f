use std::collections::HashSet;

use crate::error::{AtlasError, Result};
use crate::render::RenderRow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderStateStore {
    group_rows: HashSet<usize>,
    collapsed: HashSet<usize>,
}

impl FolderStateStore {
    /// Start a store for `rows` with every folder expanded
    pub fn new(rows: &[RenderRow]) -> Self {
        let group_rows = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_group())
            .map(|(index, _)| index)
            .collect();
        Self {
            group_rows,
            collapsed: HashSet::new(),
        }
    }

    pub fn is_group_row(&self, row: usize) -> bool {
        self.group_rows.contains(&row)
    }

    /// Flip the collapsed flag of the folder at `row`; returns the new state.
    pub fn toggle(&mut self, row: usize) -> Result<bool> {
        if !self.is_group_row(row) {
            return Err(AtlasError::NoSuchGroup(row));
        }
        if self.collapsed.remove(&row) {
            Ok(false)
        } else {
            self.collapsed.insert(row);
            Ok(true)
        }
    }

    pub fn is_collapsed(&self, row: usize) -> bool {
        self.collapsed.contains(&row)
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }

    /// Indices of the rows still shown once every collapsed folder hides its
    /// descendants.
    pub fn visible_rows(&self, rows: &[RenderRow]) -> Vec<usize> {
        let mut visible = Vec::with_capacity(rows.len());
        let mut hidden_below: Option<usize> = None;

        for (index, row) in rows.iter().enumerate() {
            if let Some(depth) = hidden_below {
                if row.depth > depth {
                    continue;
                }
                hidden_below = None;
            }

            visible.push(index);
            if row.is_group() && self.is_collapsed(index) {
                hidden_below = Some(row.depth);
            }
        }

        visible
    }
}
