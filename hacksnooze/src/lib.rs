#![warn(rust_2018_idioms)]
#![warn(missing_docs)]

//! # Hack or Snooze client for Rust
//!
//! An asynchronous HTTP client for Hack or Snooze style link boards: sites
//! where users submit stories, favourite them with a star, and delete
//! their own submissions.
//!
//! The crate covers:
//!
//! * Logging in and creating accounts (token based)
//! * Fetching the story list and the logged in user's record
//! * Submitting and deleting stories
//! * Adding and removing favourites
//! * Persisting the session (token + username) across runs
//!
//! Check out the `hacksnooze-cli` crate in this workspace for sample
//! usage.

pub mod client;
pub mod error;
pub mod models;
pub mod session;

pub use client::Client;
pub use error::Error;
pub use models::Session;
pub use session::SessionStore;
pub use url;

/// URL of the public Hack or Snooze API. Useful as `base_url` to `Client`
pub const URL: &str = "https://hack-or-snooze-v3.herokuapp.com/";
