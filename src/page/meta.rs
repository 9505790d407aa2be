//! Page metadata decoded from the front matter block.
//!
//! The front matter is YAML. Unknown keys are ignored and missing keys take
//! their zero value, so a page may declare as little as a title.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PageError;
use crate::object::GameObject;

/// Structured page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetadata {
    /// Display hint, e.g. `fa-question`.
    #[serde(deserialize_with = "scalar_string")]
    pub icon: String,
    /// Page title.
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,
    /// Enables the editing affordance.
    pub editor: bool,
    /// Lock conditions, checked in order. Duplicates are legal.
    pub required: Vec<GameObject>,
    /// Objects granted to the player on view, regardless of lock state.
    pub discovered: Vec<GameObject>,
}

/// Decodes page metadata from raw front matter.
///
/// Blank front matter and an explicit YAML null both decode to
/// [`PageMetadata::default`].
///
/// # Errors
///
/// Returns [`PageError::MetadataDecode`] wrapping the YAML error when the
/// front matter is not valid YAML or does not fit the metadata schema.
pub fn decode(front_matter: &[u8]) -> Result<PageMetadata, PageError> {
    if front_matter.iter().all(u8::is_ascii_whitespace) {
        return Ok(PageMetadata::default());
    }

    let meta: Option<PageMetadata> =
        serde_yaml::from_slice(front_matter).map_err(PageError::MetadataDecode)?;
    Ok(meta.unwrap_or_default())
}

/// Encodes page metadata back into front matter YAML.
///
/// # Errors
///
/// Returns the serializer error; plain metadata never triggers one.
pub fn encode(meta: &PageMetadata) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(meta)
}

/// Scalar value accepted where the schema expects a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Deserializes any YAML scalar (or null) into its string form.
///
/// Authors write `value: 1984` as readily as `value: "1984"`; both mean the
/// same object.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
    })
}
