//! Local keyword-to-test table.
//!
//! Deterministic stand-in for the entity extraction service: scans free
//! text for known keywords and maps each hit to a fixed set of lab tests.

use crate::models::entities::ExtractedEntities;

/// Keyword (lower-case) to suggested tests.
pub const KEYWORD_TESTS: &[(&str, &[&str])] = &[
    ("diabetes", &["HbA1c", "FBS", "PPBS"]),
    ("diabetic", &["HbA1c", "FBS", "PPBS"]),
    ("thirst", &["Fasting Glucose", "HbA1c"]),
    ("fatigue", &["CBC", "Thyroid Profile"]),
    ("tiredness", &["CBC", "Thyroid Profile"]),
    ("fever", &["CBC", "Malaria", "Dengue"]),
    ("thyroid", &["Thyroid Profile", "TSH"]),
    ("hypothyroid", &["Thyroid Profile", "TSH"]),
    ("hyperthyroid", &["Thyroid Profile", "TSH"]),
    ("cough", &["CBC", "Chest X-Ray"]),
    ("anemia", &["CBC", "Iron Studies", "Vitamin B12"]),
    ("anaemia", &["CBC", "Iron Studies", "Vitamin B12"]),
    ("weakness", &["CBC", "Vitamin D", "Vitamin B12"]),
    ("dizziness", &["CBC", "Blood Pressure Monitoring"]),
    ("headache", &["CBC"]),
    ("cholesterol", &["Lipid Profile"]),
    ("hypertension", &["Lipid Profile", "Kidney Function Test"]),
    ("kidney", &["Kidney Function Test", "Urine Routine"]),
    ("liver", &["Liver Function Test"]),
    ("jaundice", &["Liver Function Test", "Bilirubin"]),
    ("nausea", &["Liver Function Test", "Electrolytes"]),
    ("vomiting", &["Liver Function Test", "Electrolytes"]),
    ("pain", &["CBC", "ESR"]),
    ("infection", &["CBC", "CRP"]),
    ("urine", &["Urine Routine"]),
];

/// Case-insensitively match `text` against [`KEYWORD_TESTS`].
///
/// A keyword matches where a word starts with it, so "fevers" and
/// "painful" hit while "Spain" and "deliver" do not. Returns the
/// de-duplicated union of the tests of every matched keyword, in first-seen
/// order. Empty when nothing matches.
pub fn match_tests(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tests: Vec<String> = Vec::new();

    for (keyword, mapped) in KEYWORD_TESTS {
        if !starts_a_word(&lower, keyword) {
            continue;
        }
        for test in *mapped {
            if !tests.iter().any(|t| t == test) {
                tests.push((*test).to_string());
            }
        }
    }

    tests
}

fn starts_a_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Derive tests from extracted entities by running every entity string
/// through the same table.
pub fn suggest_from_entities(entities: &ExtractedEntities) -> Vec<String> {
    let joined = entities.iter().collect::<Vec<_>>().join("\n");
    match_tests(&joined)
}
