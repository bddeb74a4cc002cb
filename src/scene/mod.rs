mod parser;

pub use parser::parse_script;

use serde::{Deserialize, Serialize};

/// One narrative unit of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Visual prompt sent to the image generator
    pub description: String,
    /// Characters and props declared for the scene
    pub characters: Vec<String>,
    /// Narration lines, in script order
    pub actions: Vec<String>,
}

impl Scene {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            characters: Vec::new(),
            actions: Vec::new(),
        }
    }
}
