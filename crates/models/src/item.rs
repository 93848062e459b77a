use serde::{de, Deserialize, Deserializer, Serialize};

/// A stored item. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
}

/// Create/update input. Any `id` sent by the client is validated and ignored;
/// `done` defaults to `false` when omitted, on update as well as on create.
///
/// `id` and `done` accept the loose encodings form-style clients send:
/// numeric strings for `id`, `0`/`1` and words like `"true"`/`"no"` for `done`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "deserialize_loose_id")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_loose_bool")]
    pub done: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseBool {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

fn deserialize_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match LooseBool::deserialize(deserializer)? {
        LooseBool::Bool(b) => Some(b),
        LooseBool::Int(0) => Some(false),
        LooseBool::Int(1) => Some(true),
        LooseBool::Int(_) => None,
        LooseBool::Float(f) if f == 0.0 => Some(false),
        LooseBool::Float(f) if f == 1.0 => Some(true),
        LooseBool::Float(_) => None,
        LooseBool::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
            _ => None,
        },
    };
    parsed.ok_or_else(|| de::Error::custom("done must be a valid boolean"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Float(f64),
    Str(String),
}

fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<LooseInt>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match raw {
        LooseInt::Int(i) => Some(i),
        LooseInt::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        LooseInt::Float(_) => None,
        LooseInt::Str(s) => s.trim().parse().ok(),
    };
    parsed
        .map(Some)
        .ok_or_else(|| de::Error::custom("id must be a valid integer"))
}

impl ItemInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: None, title: title.into(), description: description.into(), done: false }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Turn the input into a stored record under `id`, discarding the client's id.
    pub fn into_item(self, id: i64) -> Item {
        Item { id, title: self.title, description: self.description, done: self.done }
    }
}
