// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::{FilterMode, Task};
use serde::Serialize;

use crate::categories::palette_entry;
use crate::filter;

/// One visible row of the task list.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    /// Palette entry of the task's category, if it has one.
    pub palette: Option<&'static str>,
    /// Short due date, e.g. "Mar 4".
    pub due_label: Option<String>,
}

/// Rows for the tasks visible under `mode`, in list order.
pub fn rows(tasks: &[Task], mode: FilterMode) -> Vec<TaskRow<'_>> {
    filter::filter(tasks, mode)
        .into_iter()
        .map(|task| TaskRow {
            task,
            palette: task.category.as_ref().map(|c| palette_entry(c.color)),
            due_label: task.due_date.map(|due| due.format("%b %-d").to_string()),
        })
        .collect()
}

/// Computes the full list order after rows were dragged within a filtered view.
///
/// Tasks hidden by `mode` stay where they are; the slots of visible tasks are
/// refilled with `visible` in order. Returns `None` when `visible` does not
/// have one entry per visible task.
pub fn merge_visible_order(
    tasks: &[Task],
    mode: FilterMode,
    visible: &[String],
) -> Option<Vec<String>> {
    let shown = tasks.iter().filter(|task| filter::matches(mode, task)).count();
    if shown != visible.len() {
        return None;
    }

    let mut dropped = visible.iter();
    tasks
        .iter()
        .map(|task| {
            if filter::matches(mode, task) {
                dropped.next().cloned()
            } else {
                Some(task.id.clone())
            }
        })
        .collect()
}
