//! Seed data served by the fixture backend.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use roam_types::*;

/// Every collection the fixture backend can answer from
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub posts: Vec<Post>,
    pub profiles: Vec<UserProfile>,
    pub notifications: Vec<Notification>,
    pub conversations: Vec<Conversation>,
    pub comments: Vec<Comment>,
    /// Template for the user returned by a successful login
    pub session_user: SessionUser,
}

impl FixtureSet {
    /// The built-in seed data
    pub fn seed() -> Self {
        Self {
            posts: seed_posts(Utc::now()),
            profiles: seed_profiles(),
            notifications: seed_notifications(),
            conversations: seed_conversations(),
            comments: seed_comments(),
            session_user: seed_session_user(),
        }
    }

    /// Seed data with the post list swapped out
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::seed()
        }
    }
}

impl Default for FixtureSet {
    fn default() -> Self {
        Self::seed()
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn author(id: &str, name: &str, username: &str, image: &str) -> AuthorRef {
    AuthorRef {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        profile_image: Some(image.to_string()),
    }
}

fn actor(id: &str, name: &str, image: &str) -> ActorRef {
    ActorRef {
        id: id.to_string(),
        name: name.to_string(),
        image: Some(image.to_string()),
    }
}

fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    let yesterday = now - Duration::days(1);
    vec![
        Post {
            id: "1".to_string(),
            author: author("1", "John Doe", "johndoe", "https://picsum.photos/200"),
            content: "What a great day! #travel #wanderer".to_string(),
            images: PostImage::from_urls(["https://picsum.photos/400/300"]),
            likes_count: 42,
            comments_count: 5,
            created_at: now,
            updated_at: now,
            viewer_has_liked: false,
        },
        Post {
            id: "2".to_string(),
            author: author("2", "Jane Smith", "janesmith", "https://picsum.photos/201"),
            content: "New routes, new adventures!".to_string(),
            images: PostImage::from_urls(["https://picsum.photos/400/301"]),
            likes_count: 28,
            comments_count: 3,
            created_at: yesterday,
            updated_at: yesterday,
            viewer_has_liked: false,
        },
    ]
}

fn badge(id: &str, name: &str, description: &str, kind: BadgeKind, earned_at: DateTime<Utc>) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        image: format!("https://picsum.photos/{}", 99 + id.parse::<u32>().unwrap_or(0)),
        kind,
        earned_at,
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    destination: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    participants: u32,
    max_participants: u32,
    status: ListingStatus,
) -> TravelListing {
    TravelListing {
        id: id.to_string(),
        title: title.to_string(),
        destination: destination.to_string(),
        start_date,
        end_date,
        participants,
        max_participants,
        status,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn seed_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: "1".to_string(),
            name: "Deniz Ayhan".to_string(),
            username: "@denizayhan04".to_string(),
            email: "deniz@example.com".to_string(),
            profile_image: "https://picsum.photos/200".to_string(),
            cover_image: "https://picsum.photos/800/400".to_string(),
            bio: "React Native Developer".to_string(),
            followers_count: 120,
            following_count: 150,
            points: 750,
            badges: vec![
                badge("1", "One Year Member", "With us for a year", BadgeKind::Time, at(2024, 3, 21, 10)),
                badge("2", "Wanderer", "Shared 10 travel posts", BadgeKind::Achievement, at(2024, 3, 21, 10)),
            ],
            hobbies: strings(&["Coding", "Photography", "Travel"]),
            languages: strings(&["Turkish", "English", "German"]),
            created_at: at(2024, 1, 1, 0),
            updated_at: at(2024, 3, 21, 10),
            is_following: false,
            travel_listings: vec![
                listing("1", "Cappadocia Trip", "Nevsehir, Turkey", day(2024, 4, 15), day(2024, 4, 20), 4, 6, ListingStatus::Active),
                listing("2", "Amsterdam Tour", "Amsterdam, Netherlands", day(2024, 5, 1), day(2024, 5, 7), 3, 5, ListingStatus::Active),
            ],
        },
        UserProfile {
            id: "2".to_string(),
            name: "Ahmet Yilmaz".to_string(),
            username: "@ahmetyilmaz".to_string(),
            email: "ahmet@example.com".to_string(),
            profile_image: "https://picsum.photos/201".to_string(),
            cover_image: "https://picsum.photos/800/401".to_string(),
            bio: "Travel enthusiast".to_string(),
            followers_count: 250,
            following_count: 200,
            points: 1200,
            badges: vec![
                badge("3", "Super Wanderer", "Shared 50 travel posts", BadgeKind::Achievement, at(2024, 3, 21, 11)),
                badge("4", "Social Butterfly", "Reached 100 followers", BadgeKind::Achievement, at(2024, 3, 21, 11)),
            ],
            hobbies: strings(&["Travel", "Photography"]),
            languages: strings(&["Turkish", "English"]),
            created_at: at(2024, 1, 2, 0),
            updated_at: at(2024, 3, 21, 11),
            is_following: false,
            travel_listings: vec![
                listing("3", "Italy Tour", "Rome, Italy", day(2024, 6, 1), day(2024, 6, 10), 2, 4, ListingStatus::Active),
                listing("4", "Barcelona Trip", "Barcelona, Spain", day(2024, 4, 1), day(2024, 4, 5), 3, 3, ListingStatus::Completed),
            ],
        },
        UserProfile {
            id: "3".to_string(),
            name: "Mehmet Kaya".to_string(),
            username: "@mehmetkaya".to_string(),
            email: "mehmet@example.com".to_string(),
            profile_image: "https://picsum.photos/202".to_string(),
            cover_image: "https://picsum.photos/800/402".to_string(),
            bio: "Professional photographer".to_string(),
            followers_count: 1500,
            following_count: 800,
            points: 2500,
            badges: vec![
                badge("5", "Engagement Master", "Reached 1000 likes", BadgeKind::Achievement, at(2024, 3, 21, 12)),
                badge("6", "Verified", "Verified account", BadgeKind::Special, at(2024, 3, 21, 12)),
            ],
            hobbies: strings(&["Photography", "Art"]),
            languages: strings(&["Turkish", "English", "Spanish"]),
            created_at: at(2024, 1, 3, 0),
            updated_at: at(2024, 3, 21, 12),
            is_following: true,
            travel_listings: Vec::new(),
        },
    ]
}

fn seed_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1".to_string(),
            kind: NotificationKind::Follow,
            actor: actor("2", "Ahmet Yilmaz", "https://picsum.photos/200"),
            post_image: None,
            comment: None,
            community_name: None,
            time: "2 hours ago".to_string(),
            is_read: false,
        },
        Notification {
            id: "2".to_string(),
            kind: NotificationKind::Like,
            actor: actor("3", "Mehmet Kaya", "https://picsum.photos/201"),
            post_image: Some("https://picsum.photos/400".to_string()),
            comment: None,
            community_name: None,
            time: "3 hours ago".to_string(),
            is_read: false,
        },
        Notification {
            id: "3".to_string(),
            kind: NotificationKind::Comment,
            actor: actor("4", "Ayse Demir", "https://picsum.photos/202"),
            post_image: None,
            comment: Some("Great place! I want to go too".to_string()),
            community_name: None,
            time: "5 hours ago".to_string(),
            is_read: true,
        },
    ]
}

fn seed_conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: "1".to_string(),
            counterpart: actor("1", "Ahmet Yilmaz", "https://picsum.photos/200"),
            last_message: "Hi, are you joining the trip tomorrow?".to_string(),
            time: "10:30".to_string(),
            unread_count: 2,
        },
        Conversation {
            id: "2".to_string(),
            counterpart: actor("2", "Mehmet Kaya", "https://picsum.photos/201"),
            last_message: "Could you share the photos?".to_string(),
            time: "Yesterday".to_string(),
            unread_count: 0,
        },
        Conversation {
            id: "3".to_string(),
            counterpart: actor("3", "Ayse Demir", "https://picsum.photos/202"),
            last_message: "Thanks!".to_string(),
            time: "Yesterday".to_string(),
            unread_count: 0,
        },
    ]
}

fn seed_comments() -> Vec<Comment> {
    vec![
        Comment {
            id: "1".to_string(),
            post_id: "1".to_string(),
            author_id: "2".to_string(),
            username: "ahmetyilmaz".to_string(),
            text: "Great post!".to_string(),
            time: "2 hours ago".to_string(),
        },
        Comment {
            id: "2".to_string(),
            post_id: "1".to_string(),
            author_id: "3".to_string(),
            username: "mehmetkaya".to_string(),
            text: "Agreed".to_string(),
            time: "1 hour ago".to_string(),
        },
    ]
}

fn seed_session_user() -> SessionUser {
    SessionUser {
        id: "1".to_string(),
        name: "John Doe".to_string(),
        username: "johndoe".to_string(),
        profile_image: Some("https://picsum.photos/200".to_string()),
        cover_image: None,
        bio: Some("A traveller who loves exploring new places and taking photos.".to_string()),
        followers: 1234,
        following: 891,
        hobbies: strings(&["Photography", "Travel", "Swimming", "Reading"]),
        languages: strings(&["Turkish", "English", "Spanish"]),
    }
}
