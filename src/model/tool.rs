use serde::{Deserialize, Serialize};

/// One EDAM concept reference.
///
/// `uri` always points into the ontology namespace; `term` is the resolved
/// display text and is never empty (rows whose label cannot be resolved are
/// dropped during extraction instead of producing a bare-URI term).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationTerm {
    pub term: String,
    pub uri: String,
}

/// Wrapper for operation annotations inside the `function` field.
///
/// The registry schema nests operation terms one level deeper than topic
/// terms: `"function": [{"operation": [...]}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationGroup {
    pub operation: Vec<AnnotationTerm>,
}

/// Canonical record for one catalogued tool, ready for submission.
///
/// Field declaration order is load-bearing: serialization must render keys
/// as `function`, `topic`, `toolType`, `name`, `id`, `description`, which is
/// exactly what serde emits for this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub function: Vec<OperationGroup>,
    pub topic: Vec<AnnotationTerm>,
    #[serde(rename = "toolType")]
    pub tool_type: Vec<String>,
    pub name: String,
    pub id: String,
    pub description: String,
}

impl ToolRecord {
    /// Assemble a record from its extracted parts.
    ///
    /// The registry identifier is derived from the display name by replacing
    /// every space with an underscore; no other character is altered and no
    /// uniqueness is guaranteed.
    pub fn new(
        tool_type: &str,
        name: String,
        description: String,
        topic: Vec<AnnotationTerm>,
        operation: Vec<AnnotationTerm>,
    ) -> Self {
        let id = derive_id(&name);
        Self {
            function: vec![OperationGroup { operation }],
            topic,
            tool_type: vec![tool_type.to_string()],
            name,
            id,
            description,
        }
    }
}

fn derive_id(name: &str) -> String {
    name.replace(' ', "_")
}
