//! Parsing of the requested test list.

/// Split a comma-separated test list, trimming each entry and dropping
/// empty ones. `"CBC, Thyroid Profile, "` yields `["CBC", "Thyroid Profile"]`.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize test names submitted as separate values.
///
/// A single value may itself be comma-separated (the browser client joins
/// its list before submitting), so each entry is split as well.
pub fn parse_many<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|v| parse_csv(v.as_ref()))
        .collect()
}
