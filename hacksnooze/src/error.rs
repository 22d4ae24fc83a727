//! Errors

use std::io;

use reqwest::StatusCode;

/// The main error type of the library
#[derive(Debug)]
pub enum Error {
    /// An error related to performing a HTTP request
    Http(reqwest::Error),
    /// An I/O error
    Io(io::Error),
    /// An attempt to parse a string that was not a valid URL
    Url(url::ParseError),
    /// User home directory could not be determined
    HomeNotFound,
    /// The username or password supplied at login was rejected
    InvalidCredentials,
    /// The username requested at signup is already taken
    UsernameTaken,
    /// The server rejected the submitted fields
    Validation(String),
    /// The action requires a logged in user and there is none
    NotAuthenticated,
    /// The story the action referred to does not exist
    NotFound,
    /// The server refused the action for this user
    NotAuthorized,
    /// The server answered with a status the client does not know how to
    /// interpret
    UnexpectedStatus(StatusCode),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::Url(error)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
