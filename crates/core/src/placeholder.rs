//! Deterministic placeholder artifacts substituted when generation fails.

use serde::{Deserialize, Serialize};

use crate::task::{ImageRef, ScriptBody, TaskId, TaskKind, TaskResult, VideoMarker};

/// Configuration for placeholder artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Base reference for placeholder portraits.
    #[serde(default = "default_image_base")]
    pub image_base: String,

    #[serde(default = "default_image_width")]
    pub image_width: u32,

    #[serde(default = "default_image_height")]
    pub image_height: u32,

    /// Script used when script generation fails.
    #[serde(default = "default_script_text")]
    pub script_text: String,
}

fn default_image_base() -> String {
    "/placeholder.svg".to_string()
}

fn default_image_width() -> u32 {
    240
}

fn default_image_height() -> u32 {
    300
}

fn default_script_text() -> String {
    "HOST 1: Welcome to today's episode! I'm excited to discuss this fascinating topic.\n\n\
     HOST 2: This is going to be an incredible conversation. Let me start by sharing some insights..."
        .to_string()
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            image_base: default_image_base(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            script_text: default_script_text(),
        }
    }
}

/// Builds the fallback artifact for a task from its identity alone.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderPolicy {
    config: PlaceholderConfig,
}

impl PlaceholderPolicy {
    pub fn new(config: PlaceholderConfig) -> Self {
        Self { config }
    }

    /// Placeholder portrait for character slot `number`.
    pub fn character_image(&self, number: u8) -> ImageRef {
        ImageRef::new(format!(
            "{}?height={}&width={}&text=Character+{}",
            self.config.image_base, self.config.image_height, self.config.image_width, number
        ))
    }

    pub fn script(&self) -> ScriptBody {
        ScriptBody::Text(self.config.script_text.clone())
    }

    pub fn video(&self) -> VideoMarker {
        VideoMarker {
            url: None,
            placeholder: true,
        }
    }

    /// The result stored when the task's remote call fails.
    pub fn for_task(&self, id: TaskId) -> TaskResult {
        match id.kind() {
            TaskKind::Character => {
                TaskResult::Image(self.character_image(id.character_number().unwrap_or(0)))
            }
            TaskKind::Script => TaskResult::Script(self.script()),
            TaskKind::Video => TaskResult::Video(self.video()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_placeholder_format() {
        let policy = PlaceholderPolicy::default();
        assert_eq!(
            policy.for_task(TaskId::Character2),
            TaskResult::Image(ImageRef::new(
                "/placeholder.svg?height=300&width=240&text=Character+2"
            ))
        );
    }

    #[test]
    fn test_placeholders_are_deterministic_per_task() {
        let policy = PlaceholderPolicy::default();
        for id in TaskId::ALL {
            assert_eq!(policy.for_task(id), policy.for_task(id));
        }
        assert_ne!(
            policy.for_task(TaskId::Character1),
            policy.for_task(TaskId::Character2)
        );
    }

    #[test]
    fn test_script_placeholder_has_two_hosts() {
        let policy = PlaceholderPolicy::default();
        match policy.for_task(TaskId::Script) {
            TaskResult::Script(ScriptBody::Text(text)) => {
                assert!(text.starts_with("HOST 1: "));
                assert!(text.contains("\n\nHOST 2: "));
            }
            other => panic!("unexpected placeholder {:?}", other),
        }
    }

    #[test]
    fn test_video_placeholder_is_flagged() {
        let policy = PlaceholderPolicy::default();
        let marker = policy.video();
        assert!(marker.placeholder);
        assert!(marker.url.is_none());
    }

    #[test]
    fn test_custom_image_base() {
        let policy = PlaceholderPolicy::new(PlaceholderConfig {
            image_base: "https://cdn.example/blank.png".to_string(),
            image_width: 64,
            image_height: 80,
            ..Default::default()
        });
        assert_eq!(
            policy.character_image(1).as_str(),
            "https://cdn.example/blank.png?height=80&width=64&text=Character+1"
        );
    }
}
