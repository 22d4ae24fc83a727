use std::io::{stdin, stdout, Write};
use std::str::FromStr;

use structopt::StructOpt;
use termion::cursor;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::{IntoRawMode, RawTerminal};
use termion::screen::AlternateScreen;

use hacksnooze::models::{NewStory, StoryId};
use hacksnooze::url::Url;
use hacksnooze::{Client, SessionStore};

use hacksnooze_cli::{
    app::{self, ViewState},
    error::{Error, ParseThemeError},
    panel::{PanelId, Panels},
    render::{self, Line},
    service::{Remote, StoryService},
    text::Fancy,
    theme::{Theme, HACK_256, HACK_GREY, HACK_MONO, HACK_TRUE},
    util,
};

#[derive(Debug, StructOpt)]
struct App {
    /// Base URL of the remote site
    #[structopt(
        short = "b",
        long = "base-url",
        raw(default_value = "hacksnooze::URL"),
        parse(try_from_str = "util::parse_url")
    )]
    base_url: Url,

    /// Theme to use. Options: true, 256, grey or gray, mono
    #[structopt(
        short = "t",
        long = "theme",
        default_value = "256",
        parse(try_from_str)
    )]
    theme: UiTheme,
}

#[derive(Debug)]
enum UiTheme {
    Grey,
    Color256,
    Mono,
    TrueColor,
}

fn main() {
    env_logger::init();
    let app = App::from_args();

    let result = run(app);

    match &result {
        Ok(()) => (),
        Err(Error::Api(hacksnooze::Error::Http(err))) => {
            eprintln!("HTTP error, caused by: {:?}", err)
        }
        Err(Error::Api(hacksnooze::Error::Io(err))) => eprintln!("IO error, caused by: {:?}", err),
        Err(Error::Api(hacksnooze::Error::Url(err))) => eprintln!("Invalid URL: {:?}", err),
        Err(Error::Api(hacksnooze::Error::HomeNotFound)) => {
            eprintln!("Error: Unable to determine home directory of user")
        }
        Err(Error::Api(err)) => eprintln!("Error: {}", describe_api(err)),
        Err(Error::InvalidDate(err)) => eprintln!("Unable to parse date: {:?}", err),
    }

    if result.is_err() {
        std::process::exit(1);
    }
}

fn run(app: App) -> Result<(), Error> {
    let client = Client::new(app.base_url)?;
    let service = Remote::new(client)?;
    let store = SessionStore::new()?;

    let mut state = ViewState::new();
    if let Some(session) = store.restore()? {
        // A dead token degrades to an anonymous view
        state.set_user(service.logged_in_user(&session)?);
    }

    print!("Loading...");
    stdout().flush()?;
    state.set_stories(service.stories()?);
    println!(" done.");

    let theme = match app.theme {
        UiTheme::Color256 => &HACK_256,
        UiTheme::TrueColor => &HACK_TRUE,
        UiTheme::Mono => &HACK_MONO,
        UiTheme::Grey => &HACK_GREY,
    };

    ui_loop(state, store, &service, theme)
}

fn ui_loop(
    mut state: ViewState,
    store: SessionStore,
    service: &dyn StoryService,
    theme: &Theme,
) -> Result<(), Error> {
    let mut panels = Panels::new();

    let screen = AlternateScreen::from(stdout());
    let mut screen = screen.into_raw_mode()?;
    write!(screen, "{}", cursor::Hide)?;
    let stdin = stdin();

    let mut status = String::new();
    draw(&mut state, &panels, theme, &mut screen, &status)?;

    for key in stdin.keys() {
        status.clear();

        match key? {
            Key::Char('q') => break,
            Key::Esc => {
                if panels.story_panel().is_none() {
                    panels.show(PanelId::AllStories);
                } else {
                    break;
                }
            }
            Key::Char('j') | Key::Down => {
                let count = active_count(&state, &panels);
                state.next_story(count);
            }
            Key::Char('k') | Key::Up => {
                state.prev_story();
            }
            Key::Char('h') => {
                state.scroll_left(10);
            }
            Key::Char('l') => {
                state.scroll_right(10);
            }
            Key::Char('\n') => {
                if let Some(panel) = panels.story_panel() {
                    if let Some(story) = state.story_at_cursor(panel) {
                        let _ = opener::open(&story.url);
                    }
                }
            }
            Key::Char('a') => match service.stories() {
                Ok(stories) => {
                    state.set_stories(stories);
                    state.reset_cursor();
                    panels.show(PanelId::AllStories);
                }
                Err(err) => status = describe_api(&err),
            },
            Key::Char('f') => {
                if panels.nav(PanelId::Favorites, state.is_authenticated()) {
                    state.reset_cursor();
                }
            }
            Key::Char('m') => {
                if panels.nav(PanelId::MyStories, state.is_authenticated()) {
                    state.reset_cursor();
                }
            }
            Key::Char('p') => {
                panels.nav(PanelId::Profile, state.is_authenticated());
            }
            Key::Char('s') => {
                if panels.nav(PanelId::SubmitForm, state.is_authenticated()) {
                    draw(&mut state, &panels, theme, &mut screen, &status)?;
                    status = submit_flow(&mut screen, &mut state, &mut panels, service)?;
                }
            }
            Key::Char('g') => {
                if !state.is_authenticated() {
                    panels.show(PanelId::LoginForm);
                    draw(&mut state, &panels, theme, &mut screen, &status)?;
                    status = auth_flow(&mut screen, &mut state, &mut panels, &store, service)?;
                }
            }
            Key::Char('o') => {
                if state.is_authenticated() {
                    app::log_out(&mut state, &mut panels, &store)?;
                    status = "Logged out".to_string();
                }
            }
            Key::Char(' ') => {
                if let Some(panel) = panels.story_panel() {
                    let id = state
                        .story_at_cursor(panel)
                        .map(|story| story.story_id.clone());
                    if let Some(id) = id {
                        status = match state.toggle_favorite(service, &id) {
                            Ok(true) => "Added to favorites".to_string(),
                            Ok(false) => "Removed from favorites".to_string(),
                            Err(err) => describe_api(&err),
                        };
                    }
                }
            }
            Key::Char('d') => {
                if panels.is_visible(PanelId::MyStories) {
                    let id = state
                        .story_at_cursor(PanelId::MyStories)
                        .map(|story| story.story_id.clone());
                    if let Some(id) = id {
                        status = delete_story(&mut state, service, &id);
                    }
                }
            }
            _ => (),
        }

        draw(&mut state, &panels, theme, &mut screen, &status)?;
    }

    write!(screen, "{}", cursor::Show)?;

    Ok(())
}

fn active_count(state: &ViewState, panels: &Panels) -> usize {
    panels
        .story_panel()
        .map(|panel| state.story_count(panel))
        .unwrap_or(0)
}

fn draw<W: Write>(
    state: &mut ViewState,
    panels: &Panels,
    theme: &Theme,
    screen: &mut RawTerminal<W>,
    status: &str,
) -> Result<(), Error> {
    let (_width, height) = util::as_usize(termion::terminal_size()?);
    let content_height = height.saturating_sub(2);

    let mut lines = if let Some(panel) = panels.story_panel() {
        render::render_stories(state, panel, theme, content_height)?
    } else if panels.is_visible(PanelId::LoginForm) {
        render::render_auth_forms(theme)
    } else if panels.is_visible(PanelId::SubmitForm) {
        render::render_submit_form(theme)
    } else if panels.is_visible(PanelId::Profile) {
        state
            .current_user()
            .map(|user| render::render_profile(user, theme))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    if !status.is_empty() {
        lines.push(Line::new());
        lines.push(vec![Fancy::new(status).fg(theme.status)]);
    }

    render::render_lines(&lines, screen, state.col_offset())
}

/// Delete a story and reconcile with the server when it disagrees
fn delete_story(state: &mut ViewState, service: &dyn StoryService, id: &StoryId) -> String {
    match state.delete_story(service, id) {
        Ok(()) => "Story deleted".to_string(),
        Err(hacksnooze::Error::NotFound) | Err(hacksnooze::Error::NotAuthorized) => {
            // The client's belief was stale; refresh rather than assume
            match service.stories() {
                Ok(stories) => {
                    state.set_stories(stories);
                    "Story was already gone; list refreshed".to_string()
                }
                Err(err) => describe_api(&err),
            }
        }
        Err(err) => describe_api(&err),
    }
}

/// Run the auth forms the login nav shows: Enter logs in, n creates an
/// account, anything else cancels
fn auth_flow<W: Write>(
    screen: &mut RawTerminal<W>,
    state: &mut ViewState,
    panels: &mut Panels,
    store: &SessionStore,
    service: &dyn StoryService,
) -> Result<String, Error> {
    let stdin = stdin();
    let choice = stdin.lock().keys().next();

    match choice {
        Some(Ok(Key::Char('\n'))) => login_flow(screen, state, panels, store, service),
        Some(Ok(Key::Char('n'))) => signup_flow(screen, state, panels, store, service),
        _ => {
            panels.show(PanelId::AllStories);
            Ok(String::new())
        }
    }
}

fn login_flow<W: Write>(
    screen: &mut RawTerminal<W>,
    state: &mut ViewState,
    panels: &mut Panels,
    store: &SessionStore,
    service: &dyn StoryService,
) -> Result<String, Error> {
    let username = match prompt(screen, "username: ")? {
        Some(username) => username,
        None => return Ok("Login cancelled".to_string()),
    };
    let password = match prompt_passwd(screen, "password: ")? {
        Some(password) => password,
        None => return Ok("Login cancelled".to_string()),
    };

    match service.login(&username, &password) {
        Ok(user) => {
            app::complete_login(state, panels, store, user)?;
            Ok(format!("Logged in as {}", username))
        }
        // The forms stay on screen so the input can be corrected
        Err(err) => Ok(describe_api(&err)),
    }
}

fn signup_flow<W: Write>(
    screen: &mut RawTerminal<W>,
    state: &mut ViewState,
    panels: &mut Panels,
    store: &SessionStore,
    service: &dyn StoryService,
) -> Result<String, Error> {
    let name = match prompt(screen, "name: ")? {
        Some(name) => name,
        None => return Ok("Signup cancelled".to_string()),
    };
    let username = match prompt(screen, "username: ")? {
        Some(username) => username,
        None => return Ok("Signup cancelled".to_string()),
    };
    let password = match prompt_passwd(screen, "password: ")? {
        Some(password) => password,
        None => return Ok("Signup cancelled".to_string()),
    };

    match service.signup(&username, &password, &name) {
        Ok(user) => {
            app::complete_login(state, panels, store, user)?;
            Ok(format!("Welcome, {}", username))
        }
        Err(err) => Ok(describe_api(&err)),
    }
}

fn submit_flow<W: Write>(
    screen: &mut RawTerminal<W>,
    state: &mut ViewState,
    panels: &mut Panels,
    service: &dyn StoryService,
) -> Result<String, Error> {
    let title = prompt(screen, "title: ")?;
    let author = prompt(screen, "author: ")?;
    let url = prompt(screen, "url: ")?;

    let (title, author, url) = match (title, author, url) {
        (Some(title), Some(author), Some(url)) => (title, author, url),
        _ => {
            panels.show(PanelId::AllStories);
            return Ok("Submission cancelled".to_string());
        }
    };

    let result = state.add_story(service, NewStory { title, author, url });
    panels.show(PanelId::AllStories);

    match result {
        Ok(_) => Ok("Story submitted".to_string()),
        Err(err) => Ok(describe_api(&err)),
    }
}

/// Read one line of input with the terminal back in cooked mode
///
/// Empty input reads as `None` so callers can treat it as a cancel.
fn prompt<W: Write>(screen: &mut RawTerminal<W>, label: &str) -> Result<Option<String>, Error> {
    write!(screen, "\r\n{}", label)?;
    screen.flush()?;

    screen.suspend_raw_mode()?;
    let stdin = stdin();
    let line = stdin.lock().read_line()?;
    screen.activate_raw_mode()?;

    Ok(line
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty()))
}

/// Read a password without echoing it
fn prompt_passwd<W: Write>(
    screen: &mut RawTerminal<W>,
    label: &str,
) -> Result<Option<String>, Error> {
    write!(screen, "\r\n{}", label)?;
    screen.flush()?;

    let stdin = stdin();
    let passwd = stdin.lock().read_passwd(screen)?;

    Ok(passwd.filter(|passwd| !passwd.is_empty()))
}

fn describe_api(err: &hacksnooze::Error) -> String {
    match err {
        hacksnooze::Error::InvalidCredentials => "Invalid username or password".to_string(),
        hacksnooze::Error::UsernameTaken => "That username is already taken".to_string(),
        hacksnooze::Error::Validation(msg) => msg.clone(),
        hacksnooze::Error::NotAuthenticated => "You must be logged in to do that".to_string(),
        hacksnooze::Error::NotFound => "That story no longer exists".to_string(),
        hacksnooze::Error::NotAuthorized => "You can only delete your own stories".to_string(),
        hacksnooze::Error::UnexpectedStatus(status) => {
            format!("Unexpected response from the server: {}", status)
        }
        hacksnooze::Error::Http(err) => format!("Network error: {}", err),
        hacksnooze::Error::Io(err) => format!("IO error: {}", err),
        hacksnooze::Error::Url(err) => format!("Invalid URL: {}", err),
        hacksnooze::Error::HomeNotFound => {
            "Unable to determine home directory of user".to_string()
        }
    }
}

impl FromStr for UiTheme {
    type Err = ParseThemeError;

    fn from_str(theme: &str) -> Result<Self, Self::Err> {
        match theme {
            "true" => Ok(UiTheme::TrueColor),
            "256" => Ok(UiTheme::Color256),
            "mono" => Ok(UiTheme::Mono),
            "grey" | "gray" => Ok(UiTheme::Grey),
            _ => Err(ParseThemeError(theme.to_string())),
        }
    }
}
