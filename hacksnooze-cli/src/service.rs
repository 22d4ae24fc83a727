//! The seam between the view layer and the remote story service

use std::cell::RefCell;

use tokio::runtime::Runtime;

use hacksnooze::models::{NewStory, Session, Story, StoryId, User};
use hacksnooze::{Client, Error};

/// Blocking facade over the remote story service
///
/// View state mutations go through this trait so tests can substitute an
/// in-memory service. The real implementation drives the async client
/// with a runtime, one action at a time; the handler that initiated the
/// action is the only thing suspended while it runs.
pub trait StoryService {
    fn login(&self, username: &str, password: &str) -> Result<User, Error>;
    fn signup(&self, username: &str, password: &str, name: &str) -> Result<User, Error>;
    fn logged_in_user(&self, session: &Session) -> Result<Option<User>, Error>;
    fn stories(&self) -> Result<Vec<Story>, Error>;
    fn create_story(&self, user: &User, story: &NewStory) -> Result<Story, Error>;
    fn delete_story(&self, user: &User, id: &StoryId) -> Result<(), Error>;
    fn add_favorite(&self, user: &User, id: &StoryId) -> Result<(), Error>;
    fn remove_favorite(&self, user: &User, id: &StoryId) -> Result<(), Error>;
}

/// The remote service reached through `hacksnooze::Client`
pub struct Remote {
    client: Client,
    rt: RefCell<Runtime>,
}

impl Remote {
    pub fn new(client: Client) -> Result<Self, Error> {
        let rt = Runtime::new()?;

        Ok(Remote {
            client,
            rt: RefCell::new(rt),
        })
    }
}

fn token(user: &User) -> Result<&str, Error> {
    user.login_token
        .as_ref()
        .map(String::as_str)
        .ok_or(Error::NotAuthenticated)
}

impl StoryService for Remote {
    fn login(&self, username: &str, password: &str) -> Result<User, Error> {
        let work = self.client.login(username, password);
        self.rt.borrow_mut().block_on(work)
    }

    fn signup(&self, username: &str, password: &str, name: &str) -> Result<User, Error> {
        let work = self.client.signup(username, password, name);
        self.rt.borrow_mut().block_on(work)
    }

    fn logged_in_user(&self, session: &Session) -> Result<Option<User>, Error> {
        let work = self.client.logged_in_user(session);
        self.rt.borrow_mut().block_on(work)
    }

    fn stories(&self) -> Result<Vec<Story>, Error> {
        let work = self.client.stories();
        self.rt.borrow_mut().block_on(work)
    }

    fn create_story(&self, user: &User, story: &NewStory) -> Result<Story, Error> {
        let work = self.client.create_story(token(user)?, story);
        self.rt.borrow_mut().block_on(work)
    }

    fn delete_story(&self, user: &User, id: &StoryId) -> Result<(), Error> {
        let work = self.client.delete_story(token(user)?, id);
        self.rt.borrow_mut().block_on(work)
    }

    fn add_favorite(&self, user: &User, id: &StoryId) -> Result<(), Error> {
        let work = self.client.add_favorite(token(user)?, &user.username, id);
        self.rt.borrow_mut().block_on(work)
    }

    fn remove_favorite(&self, user: &User, id: &StoryId) -> Result<(), Error> {
        let work = self.client.remove_favorite(token(user)?, &user.username, id);
        self.rt.borrow_mut().block_on(work)
    }
}
