// Lenient deserializers for values that may arrive from the environment,
// where figment parses `12345` as a number and `a,b` as one string.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<Scalar>),
    Csv(Scalar),
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// A list, or a comma-separated string. Items are trimmed and empty
/// items dropped.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items.into_iter().map(Scalar::into_string).collect(),
        ListOrCsv::Csv(s) => s
            .into_string()
            .split(',')
            .map(str::to_owned)
            .collect::<Vec<_>>(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect())
}
