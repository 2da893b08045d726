//! Interpretation of script bodies for display.
//!
//! Tasks store whatever the generator returned. Consumers call
//! [`ScriptView::interpret`] to get either ordered dialogue lines or plain text.

use serde::{Deserialize, Serialize};

use crate::task::ScriptBody;

/// One line of dialogue, spoken by character 1 or 2.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueLine {
    pub character: u8,
    pub text: String,
}

/// Structured script payload: `{ "dialogues": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueScript {
    pub dialogues: Vec<DialogueLine>,
}

/// A script as it should be rendered.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ScriptView {
    Structured(Vec<DialogueLine>),
    Plain(String),
}

impl ScriptView {
    /// Try the structured form first and fall back to verbatim text. Never fails.
    pub fn interpret(body: &ScriptBody) -> Self {
        match body {
            ScriptBody::Document(value) => {
                match serde_json::from_value::<DialogueScript>(value.clone()) {
                    Ok(script) => ScriptView::Structured(script.dialogues),
                    Err(_) => ScriptView::Plain(value.to_string()),
                }
            }
            ScriptBody::Text(text) => {
                if text.trim_start().starts_with('{') {
                    if let Ok(script) = serde_json::from_str::<DialogueScript>(text) {
                        return ScriptView::Structured(script.dialogues);
                    }
                }
                ScriptView::Plain(text.clone())
            }
        }
    }

    /// Display label for a dialogue speaker.
    pub fn speaker_label(line: &DialogueLine) -> String {
        format!("Character {}", line.character)
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ScriptView::Structured(_))
    }
}
