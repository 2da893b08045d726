//! The workflow state record.

use crate::gate;
use crate::task::{ArtifactTask, TaskId};

/// All tasks of one workflow.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    character_1: ArtifactTask,
    character_2: ArtifactTask,
    script: ArtifactTask,
    video: ArtifactTask,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    /// Every task starts `Unconfigured`.
    pub fn new() -> Self {
        Self {
            character_1: ArtifactTask::new(TaskId::Character1),
            character_2: ArtifactTask::new(TaskId::Character2),
            script: ArtifactTask::new(TaskId::Script),
            video: ArtifactTask::new(TaskId::Video),
        }
    }

    pub fn task(&self, id: TaskId) -> &ArtifactTask {
        match id {
            TaskId::Character1 => &self.character_1,
            TaskId::Character2 => &self.character_2,
            TaskId::Script => &self.script,
            TaskId::Video => &self.video,
        }
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> &mut ArtifactTask {
        match id {
            TaskId::Character1 => &mut self.character_1,
            TaskId::Character2 => &mut self.character_2,
            TaskId::Script => &mut self.script,
            TaskId::Video => &mut self.video,
        }
    }

    /// Tasks in slot order.
    pub fn tasks(&self) -> [&ArtifactTask; 4] {
        [&self.character_1, &self.character_2, &self.script, &self.video]
    }

    pub fn can_start_video(&self) -> bool {
        gate::can_start_video(&self.character_1, &self.character_2, &self.script)
    }

    pub fn blocking_tasks(&self) -> Vec<TaskId> {
        gate::blocking_tasks(&self.character_1, &self.character_2, &self.script)
    }
}
