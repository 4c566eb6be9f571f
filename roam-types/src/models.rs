use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{BadgeKind, ListingStatus, NotificationKind};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

// Post images arrive either as a bare list of urls or as `{url, order}` objects.
// Bare urls take their list position as order; the result is always sorted.
mod image_list {
    use serde::{Deserialize, Deserializer};

    use super::PostImage;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ImageEntry {
        Url(String),
        Ordered(PostImage),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<PostImage>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<ImageEntry>::deserialize(deserializer)?;
        let mut images: Vec<PostImage> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                ImageEntry::Url(url) => PostImage {
                    url,
                    order: index as u32,
                },
                ImageEntry::Ordered(image) => image,
            })
            .collect();
        images.sort_by_key(|image| image.order);
        Ok(images)
    }
}

/// Minimal author reference embedded in posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Minimal user reference embedded in notifications and conversations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub url: String,
    pub order: u32,
}

impl PostImage {
    /// Build an ordered image list from urls, using list position as order
    pub fn from_urls<I, S>(urls: I) -> Vec<PostImage>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| PostImage {
                url: url.into(),
                order: index as u32,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: AuthorRef,
    pub content: String,
    #[serde(default, deserialize_with = "image_list::deserialize")]
    pub images: Vec<PostImage>,
    pub likes_count: u32,
    pub comments_count: u32,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub updated_at: DateTime<Utc>,
    /// Whether the viewing user has liked this post
    #[serde(default)]
    pub viewer_has_liked: bool,
}

impl Post {
    /// Image urls in display order
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    #[serde(with = "datetime_format")]
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelListing {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participants: u32,
    pub max_participants: u32,
    #[serde(default)]
    pub status: ListingStatus,
}

impl TravelListing {
    pub fn is_full(&self) -> bool {
        self.participants >= self.max_participants
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub cover_image: String,
    pub bio: String,
    pub followers_count: u32,
    pub following_count: u32,
    pub points: u32,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub travel_listings: Vec<TravelListing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub actor: ActorRef,
    /// Thumbnail of the liked post
    #[serde(default)]
    pub post_image: Option<String>,
    /// Text of the comment that triggered the notification
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub community_name: Option<String>,
    /// Human readable age label, e.g. "2 hours ago"
    pub time: String,
    pub is_read: bool,
}

/// Conversation summary shown in the messages list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub counterpart: ActorRef,
    pub last_message: String,
    pub time: String,
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub username: String,
    pub text: String,
    pub time: String,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub followers: u32,
    pub following: u32,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl SessionUser {
    pub fn author_ref(&self) -> AuthorRef {
        AuthorRef {
            id: self.id.clone(),
            name: self.name.clone(),
            username: self.username.clone(),
            profile_image: self.profile_image.clone(),
        }
    }
}

// Request/Response types for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub tagged_user_ids: Vec<String>,
    #[serde(default)]
    pub community_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub to_user_id: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub session_token: String,
}
