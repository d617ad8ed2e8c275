use serde::{Deserialize, Serialize};

/// Mutable demographic and address details, stored in the `profiles`
/// collection under the owner's normalized email.
///
/// Every field is optional: an update only overwrites the fields it
/// carries (see [`Profile::apply`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Profile {
    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: Profile) {
        macro_rules! set {
            ($($field:ident),+ $(,)?) => {
                $(if patch.$field.is_some() {
                    self.$field = patch.$field;
                })+
            };
        }

        set!(
            date_of_birth,
            blood_group,
            gender,
            address_line1,
            address_line2,
            city,
            state,
            postal_code,
            country,
            alternate_phones,
            language,
            timezone,
        );
    }
}
