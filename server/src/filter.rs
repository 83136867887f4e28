// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::{FilterMode, Task, TaskCounts};

pub fn matches(mode: FilterMode, task: &Task) -> bool {
    match mode {
        FilterMode::All => true,
        FilterMode::Active => !task.completed,
        FilterMode::Completed => task.completed,
    }
}

/// Returns the tasks visible under `mode`, in list order.
pub fn filter(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| matches(mode, task)).collect()
}

pub fn counts(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskCounts {
        all: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}
