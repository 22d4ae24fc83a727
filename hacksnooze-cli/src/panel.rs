//! Exclusive visibility over the named regions of the screen

/// The named regions of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelId {
    AllStories,
    Favorites,
    MyStories,
    SubmitForm,
    LoginForm,
    CreateAccountForm,
    Profile,
}

pub const ALL_PANELS: [PanelId; 7] = [
    PanelId::AllStories,
    PanelId::Favorites,
    PanelId::MyStories,
    PanelId::SubmitForm,
    PanelId::LoginForm,
    PanelId::CreateAccountForm,
    PanelId::Profile,
];

const STORY_PANELS: [PanelId; 3] = [PanelId::AllStories, PanelId::Favorites, PanelId::MyStories];

impl PanelId {
    /// Panels that only make sense with a logged in user
    pub fn requires_auth(self) -> bool {
        match self {
            PanelId::Favorites | PanelId::MyStories | PanelId::SubmitForm | PanelId::Profile => {
                true
            }
            PanelId::AllStories | PanelId::LoginForm | PanelId::CreateAccountForm => false,
        }
    }

    fn index(self) -> usize {
        match self {
            PanelId::AllStories => 0,
            PanelId::Favorites => 1,
            PanelId::MyStories => 2,
            PanelId::SubmitForm => 3,
            PanelId::LoginForm => 4,
            PanelId::CreateAccountForm => 5,
            PanelId::Profile => 6,
        }
    }
}

/// Which panels are currently on screen
///
/// `show` hides everything before showing the requested panel. Several
/// entry points do not know what was visible before they fire, so the
/// transition must not depend on prior visibility.
pub struct Panels {
    visible: [bool; 7],
}

impl Panels {
    /// The initial screen shows the full story list
    pub fn new() -> Self {
        let mut panels = Panels {
            visible: [false; 7],
        };
        panels.show(PanelId::AllStories);
        panels
    }

    /// Hide every panel, then show `panel`
    ///
    /// Showing the login form also shows the create account form; the
    /// two auth forms are the one pair that coexists on screen.
    pub fn show(&mut self, panel: PanelId) {
        self.visible = [false; 7];
        self.visible[panel.index()] = true;

        if panel == PanelId::LoginForm {
            self.visible[PanelId::CreateAccountForm.index()] = true;
        }
    }

    /// Navigate to `panel`
    ///
    /// A no-op returning false when the panel needs a session and there
    /// is none.
    pub fn nav(&mut self, panel: PanelId, authenticated: bool) -> bool {
        if panel.requires_auth() && !authenticated {
            return false;
        }

        self.show(panel);
        true
    }

    pub fn is_visible(&self, panel: PanelId) -> bool {
        self.visible[panel.index()]
    }

    pub fn visible(&self) -> Vec<PanelId> {
        ALL_PANELS
            .iter()
            .cloned()
            .filter(|panel| self.is_visible(*panel))
            .collect()
    }

    /// The story list on screen, if one of the list panels is visible
    pub fn story_panel(&self) -> Option<PanelId> {
        STORY_PANELS
            .iter()
            .cloned()
            .find(|panel| self.is_visible(*panel))
    }
}

impl Default for Panels {
    fn default() -> Self {
        Panels::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_shows_all_stories() {
        let panels = Panels::new();
        assert_eq!(panels.visible(), vec![PanelId::AllStories]);
    }

    #[test]
    fn test_show_is_exclusive() {
        let mut panels = Panels::new();

        for &panel in ALL_PANELS.iter() {
            if panel == PanelId::LoginForm {
                continue;
            }
            panels.show(panel);
            assert_eq!(panels.visible(), vec![panel], "showing {:?}", panel);
        }
    }

    #[test]
    fn test_show_login_form_shows_both_auth_forms() {
        let mut panels = Panels::new();
        panels.show(PanelId::LoginForm);

        assert_eq!(
            panels.visible(),
            vec![PanelId::LoginForm, PanelId::CreateAccountForm]
        );
        assert!(!panels.is_visible(PanelId::AllStories));
    }

    #[test]
    fn test_nav_guard_blocks_anonymous_users() {
        let mut panels = Panels::new();

        for &panel in &[
            PanelId::SubmitForm,
            PanelId::Favorites,
            PanelId::MyStories,
            PanelId::Profile,
        ] {
            assert!(!panels.nav(panel, false), "nav to {:?}", panel);
            // No panel change on a blocked nav
            assert_eq!(panels.visible(), vec![PanelId::AllStories]);
        }
    }

    #[test]
    fn test_nav_with_session() {
        let mut panels = Panels::new();

        assert!(panels.nav(PanelId::Favorites, true));
        assert_eq!(panels.visible(), vec![PanelId::Favorites]);

        assert!(panels.nav(PanelId::AllStories, false));
        assert_eq!(panels.visible(), vec![PanelId::AllStories]);
    }

    #[test]
    fn test_story_panel() {
        let mut panels = Panels::new();
        assert_eq!(panels.story_panel(), Some(PanelId::AllStories));

        panels.nav(PanelId::MyStories, true);
        assert_eq!(panels.story_panel(), Some(PanelId::MyStories));

        panels.show(PanelId::LoginForm);
        assert_eq!(panels.story_panel(), None);
    }
}
