//! Records returned by the API plus the locally persisted session

use serde::{Deserialize, Serialize};

/// The persisted identity of a logged in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Login token issued by the server at login or signup
    pub token: String,
    /// Username the token belongs to
    pub username: String,
}

/// Server assigned story identifier
///
/// Opaque to the client; the only meaningful operation is equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(pub String);

/// A story on the board
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Server assigned identity of the story
    pub story_id: StoryId,
    /// Title shown in story lists
    pub title: String,
    /// Author of the linked article
    pub author: String,
    /// Address the story links to
    pub url: String,
    /// Username of the submitter
    pub username: String,
    /// When the story was submitted (ISO 8601)
    pub created_at: String,
    /// When the story was last changed (ISO 8601)
    pub updated_at: String,
}

/// A user record with the stories they favourited and submitted
///
/// `login_token` never arrives inside the user record itself; the client
/// fills it in from the auth envelope when one is available.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique account name
    pub username: String,
    /// Display name
    pub name: String,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    /// Token to authenticate requests with, when known
    #[serde(skip)]
    pub login_token: Option<String>,
    /// Stories this user starred
    #[serde(default)]
    pub favorites: Vec<Story>,
    /// Stories submitted by this user (`stories` on the wire)
    #[serde(rename = "stories", default)]
    pub own_stories: Vec<Story>,
}

/// Fields for a story submission
#[derive(Debug, Clone, Serialize)]
pub struct NewStory {
    /// Title for the new story
    pub title: String,
    /// Author of the linked article
    pub author: String,
    /// Address the story links to
    pub url: String,
}

impl User {
    /// The session this user record carries, if it was obtained through
    /// login or signup
    pub fn session(&self) -> Option<Session> {
        self.login_token.as_ref().map(|token| Session {
            token: token.clone(),
            username: self.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_story() {
        let json = r#"{
            "storyId": "5f8cf573-4296-4a71-96c8-7a848c7a72a4",
            "title": "Rise of the mechanical keyboard",
            "author": "A. Hacker",
            "url": "https://www.example.com/keebs",
            "username": "ahacker",
            "createdAt": "2019-03-10T18:05:19.931Z",
            "updatedAt": "2019-03-10T18:05:19.931Z"
        }"#;

        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.story_id.0, "5f8cf573-4296-4a71-96c8-7a848c7a72a4");
        assert_eq!(story.title, "Rise of the mechanical keyboard");
        assert_eq!(story.username, "ahacker");
    }

    #[test]
    fn test_deserialize_user() {
        let json = r#"{
            "username": "ahacker",
            "name": "A. Hacker",
            "createdAt": "2019-01-01T00:00:00.000Z",
            "favorites": [],
            "stories": [{
                "storyId": "abc",
                "title": "t",
                "author": "a",
                "url": "http://example.com/",
                "username": "ahacker",
                "createdAt": "2019-01-02T00:00:00.000Z",
                "updatedAt": "2019-01-02T00:00:00.000Z"
            }]
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.own_stories.len(), 1);
        assert!(user.favorites.is_empty());
        assert!(user.login_token.is_none());
        assert!(user.session().is_none());
    }

    #[test]
    fn test_user_session() {
        let mut user: User = serde_json::from_str(
            r#"{"username": "ahacker", "name": "A. Hacker", "createdAt": ""}"#,
        )
        .unwrap();
        user.login_token = Some("secret".to_string());

        let session = user.session().unwrap();
        assert_eq!(session.token, "secret");
        assert_eq!(session.username, "ahacker");
    }
}
