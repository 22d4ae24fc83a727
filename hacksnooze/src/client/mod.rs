//! The asynchronous API client
//!
//! Endpoint methods return `futures` 0.1 futures; drive them with a
//! `tokio` runtime, typically `Runtime::block_on` per action.

use futures::future::{self, Either, Future};
use reqwest::r#async::{ClientBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::Error;
use crate::models::{NewStory, Session, Story, StoryId, User};

mod http_client;

use http_client::HttpClient;

/// The client used to make API calls
pub struct Client {
    http: HttpClient,
}

#[derive(Deserialize)]
struct AuthEnvelope {
    token: String,
    user: User,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct StoriesEnvelope {
    stories: Vec<Story>,
}

#[derive(Deserialize)]
struct StoryEnvelope {
    story: Story,
}

impl AuthEnvelope {
    fn into_user(self) -> User {
        let AuthEnvelope { token, mut user } = self;
        user.login_token = Some(token);
        user
    }
}

impl Client {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: Url) -> Result<Self, Error> {
        let reqwest = ClientBuilder::new().use_rustls_tls().build()?;

        Ok(Client {
            http: HttpClient::new(base_url, reqwest),
        })
    }

    /// Attempt to authenticate with the server
    ///
    /// On success the returned user carries the login token issued by the
    /// server.
    pub fn login(&self, username: &str, password: &str) -> impl Future<Item = User, Error = Error> {
        let body = json!({ "user": { "username": username, "password": password } });

        self.http
            .post("login", body)
            .and_then(|res| {
                parse_json::<AuthEnvelope, _>(res, |status| {
                    // The server answers 404 for an unknown username
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
                        Error::InvalidCredentials
                    } else {
                        Error::UnexpectedStatus(status)
                    }
                })
            })
            .map(AuthEnvelope::into_user)
    }

    /// Create an account and authenticate as it
    pub fn signup(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> impl Future<Item = User, Error = Error> {
        let body = json!({ "user": { "username": username, "password": password, "name": name } });

        self.http
            .post("signup", body)
            .and_then(|res| {
                parse_json::<AuthEnvelope, _>(res, |status| {
                    if status == StatusCode::CONFLICT {
                        Error::UsernameTaken
                    } else if status == StatusCode::BAD_REQUEST {
                        Error::Validation("signup fields rejected by the server".to_string())
                    } else {
                        Error::UnexpectedStatus(status)
                    }
                })
            })
            .map(AuthEnvelope::into_user)
    }

    /// Fetch the user record a persisted session belongs to
    ///
    /// A stale or revoked token resolves to `None` rather than an error,
    /// so callers degrade to an anonymous view.
    pub fn logged_in_user(
        &self,
        session: &Session,
    ) -> impl Future<Item = Option<User>, Error = Error> {
        let token = session.token.clone();
        let path = format!("users/{}", session.username);

        self.http
            .get(&path, Some(&session.token))
            .and_then(|mut res| {
                let status = res.status();
                if status.is_success() {
                    Either::A(
                        res.json::<UserEnvelope>()
                            .map_err(Error::from)
                            .map(|envelope| Some(envelope.user)),
                    )
                } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
                    Either::B(future::ok(None))
                } else {
                    Either::B(future::err(Error::UnexpectedStatus(status)))
                }
            })
            .map(move |user| {
                user.map(|mut user| {
                    user.login_token = Some(token);
                    user
                })
            })
    }

    /// Retrieve the story list in the order the service keeps it
    pub fn stories(&self) -> impl Future<Item = Vec<Story>, Error = Error> {
        self.http
            .get("stories", None)
            .and_then(|res| parse_json::<StoriesEnvelope, _>(res, Error::UnexpectedStatus))
            .map(|envelope| envelope.stories)
    }

    /// Submit a new story; the server assigns its id
    pub fn create_story(
        &self,
        token: &str,
        story: &NewStory,
    ) -> impl Future<Item = Story, Error = Error> {
        let body = json!({ "token": token, "story": story });

        self.http
            .post("stories", body)
            .and_then(|res| {
                parse_json::<StoryEnvelope, _>(res, |status| {
                    if status == StatusCode::BAD_REQUEST {
                        Error::Validation("story fields rejected by the server".to_string())
                    } else if status == StatusCode::UNAUTHORIZED {
                        Error::NotAuthenticated
                    } else {
                        Error::UnexpectedStatus(status)
                    }
                })
            })
            .map(|envelope| envelope.story)
    }

    /// Delete a story this user submitted
    pub fn delete_story(
        &self,
        token: &str,
        id: &StoryId,
    ) -> impl Future<Item = (), Error = Error> {
        let body = json!({ "token": token });
        let path = format!("stories/{}", id.0);

        self.http.delete(&path, body).and_then(|res| {
            expect_success(res, |status| {
                if status == StatusCode::NOT_FOUND {
                    Error::NotFound
                } else if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
                    Error::NotAuthorized
                } else {
                    Error::UnexpectedStatus(status)
                }
            })
        })
    }

    /// Mark a story as one of this user's favourites
    pub fn add_favorite(
        &self,
        token: &str,
        username: &str,
        id: &StoryId,
    ) -> impl Future<Item = (), Error = Error> {
        let body = json!({ "token": token });
        let path = format!("users/{}/favorites/{}", username, id.0);

        self.http
            .post(&path, body)
            .and_then(|res| expect_success(res, favorite_error))
    }

    /// Remove a story from this user's favourites
    pub fn remove_favorite(
        &self,
        token: &str,
        username: &str,
        id: &StoryId,
    ) -> impl Future<Item = (), Error = Error> {
        let body = json!({ "token": token });
        let path = format!("users/{}/favorites/{}", username, id.0);

        self.http
            .delete(&path, body)
            .and_then(|res| expect_success(res, favorite_error))
    }
}

fn favorite_error(status: StatusCode) -> Error {
    if status == StatusCode::NOT_FOUND {
        Error::NotFound
    } else if status == StatusCode::UNAUTHORIZED {
        Error::NotAuthenticated
    } else {
        Error::UnexpectedStatus(status)
    }
}

fn parse_json<T, F>(mut res: Response, reject: F) -> impl Future<Item = T, Error = Error>
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(StatusCode) -> Error,
{
    let status = res.status();
    if status.is_success() {
        Either::A(res.json::<T>().map_err(Error::from))
    } else {
        Either::B(future::err(reject(status)))
    }
}

fn expect_success<F>(res: Response, reject: F) -> Result<(), Error>
where
    F: FnOnce(StatusCode) -> Error,
{
    let status = res.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(reject(status))
    }
}
