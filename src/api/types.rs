//! Wire types for the wall and profile endpoints
//!
//! The wall endpoint has shipped two response shapes: the legacy array whose
//! first element is the total post count, and the paged object carrying
//! `count` and `items`. Both are decoded into [`WallPage`], which keeps the
//! total count as its own field. Posts stay raw until [`Post::from_value`]
//! so one odd entry never spoils the rest of its batch.

use crate::api::ApiError;
use serde::Deserialize;
use serde_json::Value;

/// The `{"error": {...}}` body returned instead of a response
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteError {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<RemoteError>,
}

impl<T> Envelope<T> {
    fn into_response(self) -> Result<T, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Remote {
                code: error.error_code,
                message: error.error_msg,
            });
        }

        self.response
            .ok_or_else(|| ApiError::Malformed("missing `response` field".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WallPayload {
    Legacy(Vec<Value>),
    Paged {
        count: u64,
        #[serde(default)]
        items: Vec<Value>,
    },
}

/// One decoded batch of the wall endpoint
#[derive(Debug, Clone)]
pub struct WallPage {
    /// Total number of posts on the wall at the time of the call
    pub total_count: u64,

    /// Raw post objects in the order the API returned them
    pub items: Vec<Value>,
}

impl WallPage {
    /// Decodes a raw wall response body
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        let envelope: Envelope<WallPayload> = serde_json::from_str(body)?;

        let (total_count, items) = match envelope.into_response()? {
            WallPayload::Legacy(values) => {
                let mut values = values.into_iter();
                let total_count = values.next().and_then(|v| v.as_u64()).ok_or_else(|| {
                    ApiError::Malformed("wall response is missing the total count".to_string())
                })?;
                (total_count, values.collect::<Vec<_>>())
            }
            WallPayload::Paged { count, items } => (count, items),
        };

        Ok(Self { total_count, items })
    }
}

/// Decodes a raw profiles response body
pub fn parse_profiles(body: &str) -> Result<Vec<Author>, ApiError> {
    let envelope: Envelope<Vec<Author>> = serde_json::from_str(body)?;
    envelope.into_response()
}

/// A single wall entry
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: i64,

    /// `"post"` for original entries; reposts and others carry different values
    #[serde(default)]
    pub post_type: String,

    #[serde(default)]
    pub signer_id: Option<i64>,

    #[serde(default)]
    pub text: String,

    /// Seconds since the Unix epoch
    pub date: i64,

    #[serde(default)]
    pub from_id: i64,

    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Post {
    /// Decodes one raw wall item
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns true for original posts (everything else is skipped)
    pub fn is_original(&self) -> bool {
        self.post_type == "post"
    }
}

/// Post attachment; only photos and links are archived
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Photo { photo: Photo },
    Link { link: Value },
    #[serde(other)]
    Other,
}

/// Photo attachment payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPhoto")]
pub struct Photo {
    pub id: i64,
    pub source_url: Option<String>,
    pub caption: String,
}

#[derive(Deserialize)]
struct RawPhoto {
    pid: Option<i64>,
    id: Option<i64>,
    src: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl TryFrom<RawPhoto> for Photo {
    type Error = String;

    fn try_from(raw: RawPhoto) -> Result<Self, Self::Error> {
        let id = raw
            .pid
            .or(raw.id)
            .ok_or_else(|| "photo has neither `pid` nor `id`".to_string())?;

        Ok(Self {
            id,
            source_url: raw.src,
            caption: raw.text.unwrap_or_default(),
        })
    }
}

/// A resolved profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAuthor")]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// `"{first_name} {last_name}"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Deserialize)]
struct RawAuthor {
    uid: Option<i64>,
    id: Option<i64>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

impl TryFrom<RawAuthor> for Author {
    type Error = String;

    fn try_from(raw: RawAuthor) -> Result<Self, Self::Error> {
        let id = raw
            .uid
            .or(raw.id)
            .ok_or_else(|| "profile has neither `uid` nor `id`".to_string())?;

        Ok(Self {
            id,
            first_name: raw.first_name,
            last_name: raw.last_name,
        })
    }
}
