use serde::{Deserialize, Serialize};

/// Categories recognized in prescription text by the entity extraction
/// service. Each list keeps the service's order and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    #[serde(default)]
    pub diagnoses: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty() && self.symptoms.is_empty() && self.medications.is_empty()
    }

    /// All entity strings, diagnoses first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.diagnoses
            .iter()
            .chain(&self.symptoms)
            .chain(&self.medications)
            .map(String::as_str)
    }
}
