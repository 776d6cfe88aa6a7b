// Course record type

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single course record
///
/// `courseId` and `title` are the only fields the service interprets.
/// Everything else in the JSON object is kept in `extra` and written back
/// out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Missing or null ids deserialize as 0 and are rejected on create
    #[serde(default, deserialize_with = "lenient_course_id")]
    pub course_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(course_id: i64, title: impl Into<String>) -> Self {
        Self {
            course_id,
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCourseId {
    Integer(i64),
    Float(f64),
}

/// Accept integers, integral floats such as `2.0`, and null as 0
fn lenient_course_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawCourseId>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawCourseId::Integer(id)) => Ok(id),
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        Some(RawCourseId::Float(id))
            if id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64 =>
        {
            Ok(id as i64)
        }
        Some(RawCourseId::Float(id)) => Err(de::Error::custom(format!(
            "courseId must be an integer, got {id}"
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
