use std::fmt;
use std::sync::Arc;

/// Behaviour script text, kept verbatim as supplied.
///
/// Cheap to clone; duplicates of a character share the text but each gets
/// its own interpreter.
#[derive(Clone, PartialEq, Eq)]
pub struct ScriptSource {
    name: String,
    text: Arc<str>,
}

impl ScriptSource {
    pub fn new(name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Chunk name reported in script errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptSource")
            .field("name", &self.name)
            .field("bytes", &self.text.len())
            .finish()
    }
}
