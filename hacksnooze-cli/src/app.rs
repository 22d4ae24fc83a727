//! In-memory view state
//!
//! `ViewState` is the single owner of the current user, the story list
//! and the cursor. Mutations that depend on the remote service apply
//! only after the call has succeeded; on failure the state is left
//! untouched. Handlers re-derive list membership when they run instead
//! of trusting what was true when the user clicked, so the last resolved
//! response is always the one the screen reflects.

use std::collections::HashSet;
use std::ops::Range;

use hacksnooze::models::{NewStory, Story, StoryId, User};
use hacksnooze::{Error, SessionStore};

use crate::panel::{PanelId, Panels};
use crate::service::StoryService;

const STORY_HEIGHT: usize = 2;

pub struct ViewState {
    current_user: Option<User>,
    stories: Vec<Story>,
    current_story: usize,
    row_offset: usize,
    col_offset: usize,
}

impl ViewState {
    pub fn new() -> Self {
        ViewState {
            current_user: None,
            stories: Vec::new(),
            current_story: 0,
            row_offset: 0,
            col_offset: 0,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Replace the current user wholesale; `None` drops to anonymous
    pub fn set_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    /// Replace the story list wholesale with a fresh fetch
    pub fn set_stories(&mut self, stories: Vec<Story>) {
        self.stories = stories;
        self.clamp_cursor();
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// The story list a panel shows; anonymous favourites and own
    /// stories are empty
    pub fn panel_stories(&self, panel: PanelId) -> &[Story] {
        match panel {
            PanelId::Favorites => self
                .current_user
                .as_ref()
                .map(|user| user.favorites.as_slice())
                .unwrap_or(&[]),
            PanelId::MyStories => self
                .current_user
                .as_ref()
                .map(|user| user.own_stories.as_slice())
                .unwrap_or(&[]),
            _ => &self.stories,
        }
    }

    pub fn story_count(&self, panel: PanelId) -> usize {
        self.panel_stories(panel).len()
    }

    pub fn story_at_cursor(&self, panel: PanelId) -> Option<&Story> {
        self.panel_stories(panel).get(self.current_story)
    }

    /// The ids of the current user's favourites, built once per render
    /// pass so membership checks are O(1) per story
    pub fn favorite_ids(&self) -> HashSet<&str> {
        self.current_user
            .as_ref()
            .map(|user| {
                user.favorites
                    .iter()
                    .map(|story| story.story_id.0.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, id: &StoryId) -> bool {
        self.current_user
            .as_ref()
            .map(|user| user.favorites.iter().any(|story| story.story_id == *id))
            .unwrap_or(false)
    }

    /// Favourite or unfavourite a story, remote call first
    ///
    /// Membership is derived fresh on every call, never from the
    /// click-time belief, so rapid repeated toggles settle on whatever
    /// the last resolved call did. Returns the new membership.
    pub fn toggle_favorite(
        &mut self,
        service: &dyn StoryService,
        id: &StoryId,
    ) -> Result<bool, Error> {
        let is_favorite = {
            let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
            user.favorites.iter().any(|story| story.story_id == *id)
        };

        if is_favorite {
            {
                let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
                service.remove_favorite(user, id)?;
            }
            if let Some(user) = self.current_user.as_mut() {
                user.favorites.retain(|story| story.story_id != *id);
            }
            Ok(false)
        } else {
            let story = self
                .stories
                .iter()
                .find(|story| story.story_id == *id)
                .cloned()
                .ok_or(Error::NotFound)?;
            {
                let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
                service.add_favorite(user, id)?;
            }

            // The story may have been deleted while the call was in
            // flight; completing the toggle would resurrect it
            let still_listed = self.stories.iter().any(|story| story.story_id == *id);
            if let Some(user) = self.current_user.as_mut() {
                if still_listed && !user.favorites.iter().any(|story| story.story_id == *id) {
                    user.favorites.push(story);
                }
            }
            Ok(self.is_favorite(id))
        }
    }

    /// Delete a story, remote call first
    ///
    /// An id that is no longer in the story list fails `NotFound` with
    /// the state untouched, which makes a retry after a successful
    /// delete an idempotent failure.
    pub fn delete_story(&mut self, service: &dyn StoryService, id: &StoryId) -> Result<(), Error> {
        {
            let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
            let known = self.stories.iter().any(|story| story.story_id == *id)
                || user.own_stories.iter().any(|story| story.story_id == *id);
            if !known {
                return Err(Error::NotFound);
            }
            service.delete_story(user, id)?;
        }

        self.stories.retain(|story| story.story_id != *id);
        if let Some(user) = self.current_user.as_mut() {
            user.own_stories.retain(|story| story.story_id != *id);
            user.favorites.retain(|story| story.story_id != *id);
        }
        self.clamp_cursor();

        Ok(())
    }

    /// Submit a story, remote call first
    ///
    /// The story the server answers with (carrying the assigned id) is
    /// prepended to the list and the cursor moves to it. The user's own
    /// stories stay a fetch-time snapshot.
    pub fn add_story(
        &mut self,
        service: &dyn StoryService,
        new_story: NewStory,
    ) -> Result<StoryId, Error> {
        if new_story.title.trim().is_empty()
            || new_story.author.trim().is_empty()
            || new_story.url.trim().is_empty()
        {
            return Err(Error::Validation(
                "title, author and url are all required".to_string(),
            ));
        }

        let story = {
            let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
            service.create_story(user, &new_story)?
        };

        let id = story.story_id.clone();
        self.stories.insert(0, story);
        self.current_story = 0;
        self.row_offset = 0;

        Ok(id)
    }

    pub fn current_story_index(&self) -> usize {
        self.current_story
    }

    pub fn current_story_offset(&self) -> usize {
        self.current_story * STORY_HEIGHT
    }

    pub fn visible_range(&self, height: usize) -> Range<usize> {
        self.row_offset..self.row_offset + height
    }

    pub fn story_range(&self) -> Range<usize> {
        self.current_story_offset()..self.current_story_offset() + STORY_HEIGHT
    }

    pub fn row_offset_get_mut(&mut self) -> &mut usize {
        &mut self.row_offset
    }

    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    pub fn next_story(&mut self, count: usize) -> bool {
        if count > 0 && self.current_story < count - 1 {
            self.current_story += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_story(&mut self) -> bool {
        if let Some(index) = self.current_story.checked_sub(1) {
            self.current_story = index;
            true
        } else {
            false
        }
    }

    pub fn scroll_left(&mut self, amount: usize) -> bool {
        self.col_offset += amount;
        true
    }

    pub fn scroll_right(&mut self, amount: usize) -> bool {
        if let Some(new_offset) = self.col_offset.checked_sub(amount) {
            self.col_offset = new_offset;
            true
        } else {
            false
        }
    }

    /// Reset the cursor to the top of the visible list
    pub fn reset_cursor(&mut self) {
        self.current_story = 0;
        self.row_offset = 0;
    }

    fn clamp_cursor(&mut self) {
        let count = self.stories.len();
        self.current_story = self.current_story.min(count.saturating_sub(1));
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new()
    }
}

/// Wrap up a successful login or signup: persist the session, install
/// the user and return to the story list
pub fn complete_login(
    state: &mut ViewState,
    panels: &mut Panels,
    store: &SessionStore,
    user: User,
) -> Result<(), Error> {
    if let Some(session) = user.session() {
        store.save(&session)?;
    }

    state.set_user(Some(user));
    panels.show(PanelId::AllStories);

    Ok(())
}

/// Forget the session durably and in memory, back to the anonymous view
pub fn log_out(
    state: &mut ViewState,
    panels: &mut Panels,
    store: &SessionStore,
) -> Result<(), Error> {
    store.clear()?;
    state.set_user(None);
    panels.show(PanelId::AllStories);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    use hacksnooze::models::Session;

    /// In-memory stand-in for the remote service
    ///
    /// Records the calls it sees and can be armed to fail the next one.
    #[derive(Default)]
    struct FakeService {
        calls: RefCell<Vec<String>>,
        fail_next: RefCell<Option<Error>>,
    }

    impl FakeService {
        fn fail_next(&self, err: Error) {
            *self.fail_next.borrow_mut() = Some(err);
        }

        fn check(&self, call: &str) -> Result<(), Error> {
            self.calls.borrow_mut().push(call.to_string());
            match self.fail_next.borrow_mut().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl StoryService for FakeService {
        fn login(&self, username: &str, _password: &str) -> Result<User, Error> {
            self.check(&format!("login {}", username))?;
            Ok(user(username))
        }

        fn signup(&self, username: &str, _password: &str, _name: &str) -> Result<User, Error> {
            self.check(&format!("signup {}", username))?;
            Ok(user(username))
        }

        fn logged_in_user(&self, session: &Session) -> Result<Option<User>, Error> {
            self.check(&format!("logged_in_user {}", session.username))?;
            Ok(Some(user(&session.username)))
        }

        fn stories(&self) -> Result<Vec<Story>, Error> {
            self.check("stories")?;
            Ok(Vec::new())
        }

        fn create_story(&self, _user: &User, story: &NewStory) -> Result<Story, Error> {
            self.check(&format!("create_story {}", story.title))?;
            Ok(Story {
                story_id: StoryId("server-assigned".to_string()),
                title: story.title.clone(),
                author: story.author.clone(),
                url: story.url.clone(),
                username: "ahacker".to_string(),
                created_at: "2019-03-10T18:05:19.931Z".to_string(),
                updated_at: "2019-03-10T18:05:19.931Z".to_string(),
            })
        }

        fn delete_story(&self, _user: &User, id: &StoryId) -> Result<(), Error> {
            self.check(&format!("delete_story {}", id.0))
        }

        fn add_favorite(&self, _user: &User, id: &StoryId) -> Result<(), Error> {
            self.check(&format!("add_favorite {}", id.0))
        }

        fn remove_favorite(&self, _user: &User, id: &StoryId) -> Result<(), Error> {
            self.check(&format!("remove_favorite {}", id.0))
        }
    }

    fn story(id: &str) -> Story {
        Story {
            story_id: StoryId(id.to_string()),
            title: format!("story {}", id),
            author: "A. Hacker".to_string(),
            url: "https://example.com/".to_string(),
            username: "ahacker".to_string(),
            created_at: "2019-03-10T18:05:19.931Z".to_string(),
            updated_at: "2019-03-10T18:05:19.931Z".to_string(),
        }
    }

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            name: "A. Hacker".to_string(),
            created_at: "2019-01-01T00:00:00.000Z".to_string(),
            login_token: Some("token".to_string()),
            favorites: Vec::new(),
            own_stories: Vec::new(),
        }
    }

    fn logged_in_state(stories: Vec<Story>) -> ViewState {
        let mut state = ViewState::new();
        state.set_user(Some(user("ahacker")));
        state.set_stories(stories);
        state
    }

    #[test]
    fn test_toggle_favorite_negates_membership() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1"), story("s2")]);
        let id = StoryId("s1".to_string());

        assert_eq!(state.toggle_favorite(&service, &id).unwrap(), true);
        assert!(state.is_favorite(&id));
        assert!(state.favorite_ids().contains("s1"));

        assert_eq!(state.toggle_favorite(&service, &id).unwrap(), false);
        assert!(!state.is_favorite(&id));

        assert_eq!(service.calls(), vec!["add_favorite s1", "remove_favorite s1"]);
    }

    #[test]
    fn test_toggle_favorite_failure_leaves_membership_unchanged() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1")]);
        let id = StoryId("s1".to_string());

        service.fail_next(Error::NotFound);
        assert!(state.toggle_favorite(&service, &id).is_err());
        assert!(!state.is_favorite(&id));

        // And the other direction
        state.toggle_favorite(&service, &id).unwrap();
        service.fail_next(Error::NotFound);
        assert!(state.toggle_favorite(&service, &id).is_err());
        assert!(state.is_favorite(&id));
    }

    #[test]
    fn test_toggle_favorite_requires_user() {
        let service = FakeService::default();
        let mut state = ViewState::new();
        state.set_stories(vec![story("s1")]);

        match state.toggle_favorite(&service, &StoryId("s1".to_string())) {
            Err(Error::NotAuthenticated) => (),
            other => panic!("expected NotAuthenticated, got {:?}", other),
        }
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_toggle_favorite_after_delete_is_rejected() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1")]);
        let id = StoryId("s1".to_string());

        state.delete_story(&service, &id).unwrap();

        // A queued click on the now deleted story resolves against the
        // current list, not the one the click was made in
        match state.toggle_favorite(&service, &id) {
            Err(Error::NotFound) => (),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(!state.is_favorite(&id));
    }

    #[test]
    fn test_delete_story_removes_everywhere() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1"), story("s2")]);
        let id = StoryId("s1".to_string());

        state.toggle_favorite(&service, &id).unwrap();
        if let Some(user) = state.current_user.as_mut() {
            user.own_stories.push(story("s1"));
        }

        state.delete_story(&service, &id).unwrap();

        assert!(state.stories().iter().all(|story| story.story_id != id));
        let user = state.current_user().unwrap();
        assert!(user.favorites.is_empty());
        assert!(user.own_stories.is_empty());
    }

    #[test]
    fn test_delete_story_absent_id_is_not_found() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1")]);
        let id = StoryId("s1".to_string());

        state.delete_story(&service, &id).unwrap();

        // Retrying the delete is an idempotent failure
        match state.delete_story(&service, &id) {
            Err(Error::NotFound) => (),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(state.stories().is_empty());
        assert_eq!(service.calls(), vec!["delete_story s1"]);
    }

    #[test]
    fn test_delete_story_remote_failure_leaves_state_unchanged() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1")]);
        let id = StoryId("s1".to_string());

        service.fail_next(Error::NotAuthorized);
        assert!(state.delete_story(&service, &id).is_err());
        assert_eq!(state.stories().len(), 1);
    }

    #[test]
    fn test_add_story_prepends_once() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1"), story("s2")]);

        let id = state
            .add_story(
                &service,
                NewStory {
                    title: "Fresh off the press".to_string(),
                    author: "A. Hacker".to_string(),
                    url: "https://example.com/fresh".to_string(),
                },
            )
            .unwrap();

        assert_eq!(state.stories()[0].story_id, id);
        let occurrences = state
            .stories()
            .iter()
            .filter(|story| story.story_id == id)
            .count();
        assert_eq!(occurrences, 1);
        assert_eq!(state.current_story_index(), 0);

        // Snapshot semantics: own stories only change on a user fetch
        assert!(state.current_user().unwrap().own_stories.is_empty());
    }

    #[test]
    fn test_add_story_validates_fields_before_calling_out() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1")]);

        let result = state.add_story(
            &service,
            NewStory {
                title: "  ".to_string(),
                author: "A. Hacker".to_string(),
                url: "https://example.com/".to_string(),
            },
        );

        match result {
            Err(Error::Validation(_)) => (),
            other => panic!("expected Validation, got {:?}", other),
        }
        assert!(service.calls().is_empty());
        assert_eq!(state.stories().len(), 1);
    }

    #[test]
    fn test_complete_login_persists_session_and_shows_all_stories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());
        let mut state = ViewState::new();
        let mut panels = Panels::new();
        panels.show(PanelId::LoginForm);

        complete_login(&mut state, &mut panels, &store, user("ahacker")).unwrap();

        assert!(state.is_authenticated());
        assert_eq!(panels.visible(), vec![PanelId::AllStories]);
        let session = store.restore().unwrap().unwrap();
        assert_eq!(session.username, "ahacker");
        assert_eq!(session.token, "token");
    }

    #[test]
    fn test_log_out_clears_session_and_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());
        let mut state = ViewState::new();
        let mut panels = Panels::new();

        complete_login(&mut state, &mut panels, &store, user("ahacker")).unwrap();
        panels.nav(PanelId::Favorites, state.is_authenticated());

        log_out(&mut state, &mut panels, &store).unwrap();

        assert!(!state.is_authenticated());
        assert_eq!(panels.visible(), vec![PanelId::AllStories]);
        assert_eq!(store.restore().unwrap(), None);
    }

    #[test]
    fn test_cursor_clamps_when_the_list_shrinks() {
        let service = FakeService::default();
        let mut state = logged_in_state(vec![story("s1"), story("s2")]);

        state.next_story(2);
        assert_eq!(state.current_story_index(), 1);

        state.delete_story(&service, &StoryId("s2".to_string())).unwrap();
        assert_eq!(state.current_story_index(), 0);

        assert!(!state.next_story(1));
        assert!(!state.prev_story());
    }
}
