//! Dependency gate for the video task.
//!
//! Pure functions over the current prerequisite tasks. Nothing here is cached;
//! callers re-evaluate on every read.

use crate::task::{ArtifactTask, TaskId};

/// Returns true iff both characters and the script hold an artifact,
/// genuine or placeholder.
pub fn can_start_video(
    character_1: &ArtifactTask,
    character_2: &ArtifactTask,
    script: &ArtifactTask,
) -> bool {
    [character_1, character_2, script]
        .iter()
        .all(|task| task.is_available())
}

/// Returns the prerequisite tasks that currently keep the gate closed.
pub fn blocking_tasks(
    character_1: &ArtifactTask,
    character_2: &ArtifactTask,
    script: &ArtifactTask,
) -> Vec<TaskId> {
    [character_1, character_2, script]
        .iter()
        .filter(|task| !task.is_available())
        .map(|task| task.id())
        .collect()
}
