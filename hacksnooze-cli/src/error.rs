use hacksnooze::url;
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct ParseThemeError(pub String);

#[derive(Debug)]
pub enum Error {
    Api(hacksnooze::Error),
    InvalidDate(chrono::ParseError),
}

impl From<hacksnooze::Error> for Error {
    fn from(err: hacksnooze::Error) -> Self {
        Error::Api(err)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::InvalidDate(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Api(hacksnooze::Error::Io(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Api(hacksnooze::Error::Url(err))
    }
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a valid theme. Options are: true, 256, mono, grey or gray",
            self.0
        )
    }
}
