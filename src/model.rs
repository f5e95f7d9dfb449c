use std::cmp::Ordering;
use std::str::FromStr;

use serde_json::{self, Map, Value};

use error::{Field, PostError};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(id: u64, title: &str, content: &str) -> Post {
        Post {
            id: id,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    /// Case-insensitive substring match on either field.
    /// An empty query matches everything for its field.
    pub fn matches(&self, title_query: &str, content_query: &str) -> bool {
        contains_ignore_case(&self.title, title_query) ||
        contains_ignore_case(&self.content, content_query)
    }

    /// Apply the fields present in `update`, keeping the rest.
    pub fn apply(&mut self, update: PostUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
    }

    fn field(&self, field: SortField) -> &str {
        match field {
            SortField::Title => &self.title,
            SortField::Content => &self.content,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A validated body for creating a post.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    /// Decode a create request body.
    ///
    /// The body must be a JSON object. `title` and `content` must both be
    /// non-empty strings; any that are not are reported together.
    pub fn from_json(payload: &str) -> Result<NewPost, PostError> {
        let object = parse_object(payload)?;

        let title = required_str(&object, "title");
        let content = required_str(&object, "content");

        match (title, content) {
            (Some(title), Some(content)) => {
                Ok(NewPost {
                    title: title,
                    content: content,
                })
            }
            (title, content) => {
                let mut missing = vec![];
                if title.is_none() {
                    missing.push(Field::Title);
                }
                if content.is_none() {
                    missing.push(Field::Content);
                }
                Err(PostError::MissingFields(missing))
            }
        }
    }
}

fn required_str(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_object(payload: &str) -> Result<Map<String, Value>, PostError> {
    match serde_json::from_str(payload) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(PostError::InvalidRequest),
    }
}

/// A partial update. Absent or `null` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn from_json(payload: &str) -> Result<PostUpdate, PostError> {
        let object = parse_object(payload)?;
        serde_json::from_value(Value::Object(object)).map_err(|_| PostError::InvalidRequest)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl FromStr for SortField {
    type Err = PostError;

    fn from_str(s: &str) -> Result<SortField, PostError> {
        match s {
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            _ => Err(PostError::InvalidSortField),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Direction, PostError> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(PostError::InvalidDirection),
        }
    }
}

/// Order two posts by `field`, case-sensitively, in `direction`.
pub fn compare(a: &Post, b: &Post, field: SortField, direction: Direction) -> Ordering {
    let ordering = a.field(field).cmp(b.field(field));
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
