//! Core task data types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Task identity
// ============================================================================

/// Identifies one of the four task slots of a workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    #[serde(rename = "character_1")]
    Character1,
    #[serde(rename = "character_2")]
    Character2,
    Script,
    Video,
}

impl TaskId {
    /// All task slots, prerequisites first.
    pub const ALL: [TaskId; 4] = [
        TaskId::Character1,
        TaskId::Character2,
        TaskId::Script,
        TaskId::Video,
    ];

    /// The tasks that must be available before the video may start.
    pub const PREREQUISITES: [TaskId; 3] = [TaskId::Character1, TaskId::Character2, TaskId::Script];

    /// Returns the kind of artifact this slot produces.
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskId::Character1 | TaskId::Character2 => TaskKind::Character,
            TaskId::Script => TaskKind::Script,
            TaskId::Video => TaskKind::Video,
        }
    }

    /// Returns the 1-based character number for character slots.
    pub fn character_number(&self) -> Option<u8> {
        match self {
            TaskId::Character1 => Some(1),
            TaskId::Character2 => Some(2),
            _ => None,
        }
    }

    /// Returns the slot name as used in paths and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::Character1 => "character_1",
            TaskId::Character2 => "character_2",
            TaskId::Script => "script",
            TaskId::Video => "video",
        }
    }

    /// Parses a slot name as produced by [`TaskId::as_str`].
    pub fn parse(name: &str) -> Option<Self> {
        TaskId::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of artifact a task produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Character,
    Script,
    Video,
}

impl TaskKind {
    /// Returns true if a task of this kind can be configured with `mode`.
    ///
    /// The video task is always derived from the other artifacts, so it
    /// accepts no mode at all.
    pub fn supports(&self, mode: Mode) -> bool {
        match self {
            TaskKind::Character | TaskKind::Script => {
                matches!(mode, Mode::ByUpload | Mode::ByDescription)
            }
            TaskKind::Video => false,
        }
    }

    /// Returns the input shape accepted for `mode`, if the mode is supported.
    pub fn expected_input(&self, mode: Mode) -> Option<InputShape> {
        match (self, mode) {
            (TaskKind::Character, Mode::ByUpload) => Some(InputShape::Image),
            (TaskKind::Character, Mode::ByDescription) => Some(InputShape::Text),
            (TaskKind::Script, Mode::ByUpload | Mode::ByDescription) => Some(InputShape::Text),
            _ => None,
        }
    }
}

// ============================================================================
// Mode and status
// ============================================================================

/// How the user chose to produce an artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Unset,
    /// The user supplies the artifact (an image, or pasted script text).
    ByUpload,
    /// The artifact is generated from a description or topic.
    ByDescription,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Unset => "unset",
            Mode::ByUpload => "by_upload",
            Mode::ByDescription => "by_description",
        })
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Unconfigured,
    Configuring,
    Submitting,
    /// The remote collaborator produced the artifact.
    Ready,
    /// The remote call failed and a placeholder artifact was substituted.
    Degraded,
}

impl TaskStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Unconfigured,
        TaskStatus::Configuring,
        TaskStatus::Submitting,
        TaskStatus::Ready,
        TaskStatus::Degraded,
    ];

    /// Returns true if the task holds an artifact (genuine or placeholder).
    pub fn is_available(&self) -> bool {
        matches!(self, TaskStatus::Ready | TaskStatus::Degraded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Unconfigured => "unconfigured",
            TaskStatus::Configuring => "configuring",
            TaskStatus::Submitting => "submitting",
            TaskStatus::Ready => "ready",
            TaskStatus::Degraded => "degraded",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Input
// ============================================================================

/// Raw image supplied by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Shape of a task input, used for mode validation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
    Text,
    Image,
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputShape::Text => "text",
            InputShape::Image => "image",
        })
    }
}

/// User-provided payload for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    /// A description, a topic or pasted script text, depending on the mode.
    Text(String),
    /// An uploaded character image.
    Image(ImageUpload),
}

impl TaskInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn shape(&self) -> InputShape {
        match self {
            TaskInput::Text(_) => InputShape::Text,
            TaskInput::Image(_) => InputShape::Image,
        }
    }

    /// Whitespace-only text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            TaskInput::Text(text) => text.trim().is_empty(),
            TaskInput::Image(image) => image.bytes.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TaskInput::Text(text) => Some(text),
            TaskInput::Image(_) => None,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Reference to a character image (usually a URL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Script body exactly as produced (pasted text or the generator response).
///
/// The task never validates which shape it holds; see
/// [`crate::script::ScriptView`] for interpretation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScriptBody {
    Text(String),
    Document(serde_json::Value),
}

impl ScriptBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Marker that the podcast video is ready.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VideoMarker {
    /// Location of the rendered video, when the generator reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// True when this marker was substituted after a failed generation.
    #[serde(default)]
    pub placeholder: bool,
}

/// Artifact held by a task in `Ready` or `Degraded`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TaskResult {
    Image(ImageRef),
    Script(ScriptBody),
    Video(VideoMarker),
}

impl TaskResult {
    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            TaskResult::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptBody> {
        match self {
            TaskResult::Script(script) => Some(script),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoMarker> {
        match self {
            TaskResult::Video(video) => Some(video),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_names_round_trip() {
        for id in TaskId::ALL {
            assert_eq!(TaskId::parse(id.as_str()), Some(id));
        }
        assert_eq!(TaskId::parse("character_3"), None);
    }

    #[test]
    fn test_task_id_serializes_with_slot_name() {
        let json = serde_json::to_string(&TaskId::Character2).unwrap();
        assert_eq!(json, "\"character_2\"");
    }

    #[test]
    fn test_supported_modes() {
        assert!(TaskKind::Character.supports(Mode::ByUpload));
        assert!(TaskKind::Script.supports(Mode::ByDescription));
        assert!(!TaskKind::Character.supports(Mode::Unset));
        assert!(!TaskKind::Video.supports(Mode::ByUpload));
        assert!(!TaskKind::Video.supports(Mode::ByDescription));
    }

    #[test]
    fn test_expected_input_shapes() {
        assert_eq!(
            TaskKind::Character.expected_input(Mode::ByUpload),
            Some(InputShape::Image)
        );
        assert_eq!(
            TaskKind::Character.expected_input(Mode::ByDescription),
            Some(InputShape::Text)
        );
        assert_eq!(
            TaskKind::Script.expected_input(Mode::ByUpload),
            Some(InputShape::Text)
        );
        assert_eq!(TaskKind::Video.expected_input(Mode::ByUpload), None);
    }

    #[test]
    fn test_input_emptiness() {
        assert!(TaskInput::text("   \n").is_empty());
        assert!(!TaskInput::text("a wizard").is_empty());
        assert!(TaskInput::Image(ImageUpload::new(Vec::new())).is_empty());
        assert!(!TaskInput::Image(ImageUpload::new(vec![0x89, 0x50])).is_empty());
    }

    #[test]
    fn test_script_body_untagged() {
        let text: ScriptBody = serde_json::from_str("\"HOST 1: Hi\"").unwrap();
        assert_eq!(text, ScriptBody::text("HOST 1: Hi"));

        let doc: ScriptBody = serde_json::from_str(r#"{"dialogues": []}"#).unwrap();
        assert!(matches!(doc, ScriptBody::Document(_)));
    }

    #[test]
    fn test_image_upload_debug_hides_bytes() {
        let upload = ImageUpload::new(vec![1, 2, 3]).with_file_name("me.png");
        let debug = format!("{:?}", upload);
        assert!(debug.contains("<3 bytes>"));
        assert!(debug.contains("me.png"));
    }
}
