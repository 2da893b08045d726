//! Testing utilities and a mock generation service.
//!
//! Lets workflow tests run without a live generation API.
//!
//! # Example
//!
//! ```rust,ignore
//! use posecast_core::testing::MockGenerator;
//! use posecast_core::{Orchestrator, PlaceholderPolicy};
//!
//! let generator = Arc::new(MockGenerator::new());
//! let orchestrator = Orchestrator::new(generator.clone(), PlaceholderPolicy::default());
//! ```

mod mock_generator;

pub use mock_generator::MockGenerator;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::task::{ImageUpload, ScriptBody};

    /// A small PNG-looking upload.
    pub fn image_upload() -> ImageUpload {
        ImageUpload::new(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
            .with_file_name("portrait.png")
            .with_content_type("image/png")
    }

    /// A two-line structured dialogue.
    pub fn dialogue_document() -> Value {
        json!({
            "dialogues": [
                {"character": 1, "text": "Welcome to the show!"},
                {"character": 2, "text": "Glad to be here."}
            ]
        })
    }

    /// A plain-text script in the HOST 1 / HOST 2 layout.
    pub fn plain_script() -> ScriptBody {
        ScriptBody::text("HOST 1: Welcome to the show!\n\nHOST 2: Glad to be here.")
    }
}
