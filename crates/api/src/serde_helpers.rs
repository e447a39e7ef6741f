use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default (Go encodes empty slices as `null`).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode `""` and `null` as `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TerminalTarget {
    Flag(bool),
    Name(String),
}

/// Accept either a boolean or a tmux session name (non-empty = present).
pub(crate) fn terminal_target<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TerminalTarget>::deserialize(deserializer)? {
        Some(TerminalTarget::Flag(flag)) => flag,
        Some(TerminalTarget::Name(name)) => !name.trim().is_empty(),
        None => false,
    })
}
