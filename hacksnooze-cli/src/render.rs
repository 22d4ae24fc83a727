//! Turning stories and panels into styled terminal lines
//!
//! `render_story` is a pure mapping from a story plus the viewer's
//! context to display lines; everything the output depends on arrives
//! through its arguments.

use std::io::Write;

use chrono::prelude::*;
use chrono_humanize::HumanTime;
use termion::raw::RawTerminal;

use hacksnooze::models::{Story, User};

use crate::{
    app::ViewState,
    error::Error,
    panel::PanelId,
    text::Fancy,
    theme::{Colour, Theme},
    util,
};

pub type Line = Vec<Fancy>;
pub type Lines = Vec<Line>;

/// How the current viewer relates to a story
pub struct ViewerContext {
    /// The story is one of the viewer's favourites
    pub is_favorite: bool,
    /// Offer the delete affordance (my-stories panel only)
    pub show_delete: bool,
}

/// Render one story as two lines: affordances + title, then the byline
pub fn render_story(
    story: &Story,
    viewer: &ViewerContext,
    theme: &Theme,
) -> Result<Lines, Error> {
    let mut line1 = Line::new();

    if viewer.show_delete {
        line1.push(Fancy::new("✖ ").fg(theme.trash));
    }
    let star = if viewer.is_favorite {
        Fancy::new("★").fg(theme.star)
    } else {
        Fancy::new("☆").fg(theme.star_empty)
    };
    line1.push(star);
    line1.push(
        Fancy::new(format!(" {}", story.title))
            .fg(theme.title)
            .bold(),
    );
    if let Some(host) = util::host_name(&story.url) {
        line1.push(
            Fancy::new(format!(" ({})", host))
                .fg(theme.domain)
                .italic(),
        );
    }

    let created_at = story.created_at.parse::<DateTime<FixedOffset>>()?;
    let byline = format!(
        "  by {author} | posted by {submitter} {when}",
        author = story.author,
        submitter = story.username,
        when = HumanTime::from(created_at),
    );
    let line2 = vec![Fancy::new(byline).fg(theme.byline)];

    Ok(vec![line1, line2])
}

/// Render the story list a panel shows, cursor row highlighted, windowed
/// to the terminal height
pub fn render_stories(
    state: &mut ViewState,
    panel: PanelId,
    theme: &Theme,
    height: usize,
) -> Result<Lines, Error> {
    let mut lines = Vec::new();

    {
        let favorites = state.favorite_ids();
        let stories = state.panel_stories(panel);

        if stories.is_empty() {
            return Ok(vec![vec![
                Fancy::new(empty_message(panel)).fg(theme.byline)
            ]]);
        }

        let show_delete = panel == PanelId::MyStories;
        for (i, story) in stories.iter().enumerate() {
            let viewer = ViewerContext {
                is_favorite: favorites.contains(story.story_id.0.as_str()),
                show_delete,
            };
            let mut story_lines = render_story(story, &viewer, theme)?;

            if i == state.current_story_index() {
                story_lines = story_lines
                    .into_iter()
                    .map(|line| highlight_line(line, theme.cursor))
                    .collect();
            }
            lines.extend(story_lines);
        }
    }

    Ok(limit_lines(state, lines, height))
}

/// Render the profile panel
pub fn render_profile(user: &User, theme: &Theme) -> Lines {
    let joined = user.created_at.get(0..10).unwrap_or(&user.created_at);

    vec![
        vec![Fancy::new("User Profile").fg(theme.title).bold()],
        Line::new(),
        vec![
            Fancy::new("Name: ").fg(theme.byline),
            Fancy::new(user.name.as_str()),
        ],
        vec![
            Fancy::new("Username: ").fg(theme.byline),
            Fancy::new(user.username.as_str()),
        ],
        vec![
            Fancy::new("Account Created: ").fg(theme.byline),
            Fancy::new(joined),
        ],
    ]
}

/// Render the two auth forms; both are on screen at once by design
pub fn render_auth_forms(theme: &Theme) -> Lines {
    vec![
        vec![Fancy::new("Login").fg(theme.title).bold()],
        vec![Fancy::new("  press Enter to log in with an existing account").fg(theme.byline)],
        Line::new(),
        vec![Fancy::new("Create Account").fg(theme.title).bold()],
        vec![Fancy::new("  press n to sign up for a new account").fg(theme.byline)],
        Line::new(),
        vec![Fancy::new("  Esc returns to the stories").fg(theme.byline)],
    ]
}

/// Render the submit form header shown while the prompts run
pub fn render_submit_form(theme: &Theme) -> Lines {
    vec![
        vec![Fancy::new("Submit a Story").fg(theme.title).bold()],
        vec![Fancy::new("  title, author and url are all required").fg(theme.byline)],
    ]
}

fn empty_message(panel: PanelId) -> &'static str {
    match panel {
        PanelId::Favorites => "No favorites added!",
        PanelId::MyStories => "No stories added by user yet!",
        _ => "There are no stories to show.",
    }
}

fn highlight_line(line: Line, colour: Colour) -> Line {
    line.into_iter().map(|span| span.bg(colour)).collect()
}

trait Encompass<T> {
    fn encompass(&self, other: &std::ops::Range<T>) -> Option<std::cmp::Ordering>
    where
        T: PartialOrd<T>;
}

impl<T> Encompass<T> for std::ops::Range<T> {
    fn encompass(&self, other: &std::ops::Range<T>) -> Option<std::cmp::Ordering>
    where
        T: PartialOrd<T>,
    {
        if other.start < self.start {
            Some(std::cmp::Ordering::Less)
        } else if other.end > self.end {
            Some(std::cmp::Ordering::Greater)
        } else {
            Some(std::cmp::Ordering::Equal)
        }
    }
}

fn limit_lines(state: &mut ViewState, lines: Lines, height: usize) -> Lines {
    // Work out the range of lines to render, ensuring the current story is visible
    let story_range = state.story_range();
    let ordering = state.visible_range(height).encompass(&story_range);
    let row_offset = state.row_offset_get_mut();

    match ordering {
        Some(std::cmp::Ordering::Less) => *row_offset = story_range.start,
        Some(std::cmp::Ordering::Equal) => (),
        Some(std::cmp::Ordering::Greater) => *row_offset = story_range.end - height,
        None => (),
    }

    lines
        .into_iter()
        .skip(*row_offset)
        .take(height)
        .collect()
}

/// Write the lines to the terminal, clipped to its width
pub fn render_lines<W: Write>(
    lines: &[Line],
    screen: &mut RawTerminal<W>,
    col_offset: usize,
) -> Result<(), Error> {
    let (width, _height) = util::as_usize(termion::terminal_size()?);
    let empty_line = vec![0x20; width];

    write!(screen, "{}", termion::cursor::Goto(1, 1))?;

    for (row, line) in lines.iter().enumerate() {
        if row != 0 {
            write!(screen, "\r\n")?;
        }

        let mut col: usize = 0;
        let mut skip = col_offset;
        let mut last_span: Option<Fancy> = None;

        for span in line {
            let mut span = span.clone();

            // Horizontal scroll: drop leading columns before clipping
            if skip > 0 {
                let span_cols = span.cols();
                if span_cols <= skip {
                    skip -= span_cols;
                    continue;
                }
                span = span.truncate_front(skip);
                skip = 0;
            }

            let span_cols = span.cols();
            if col + span_cols < width {
                write!(screen, "{}", span)?;
                col += span_cols;
                last_span = Some(span);
            } else {
                let truncated = span.truncate(width - col);
                write!(screen, "{}", truncated)?;
                col = width;
                last_span = Some(truncated);
                break;
            }
        }

        // Erase the rest of the line
        // This is done in favor of ClearAll to reduce flicker
        if col < width {
            if let Some(bg) = last_span.and_then(|span| span.get_bg()) {
                // NOTE(unwrap): Safe because empty_line is all spaces
                let blank = String::from_utf8(empty_line[0..width - col].to_vec()).unwrap();
                let blank_with_bg = Fancy::new(blank).bg(bg);
                write!(screen, "{}", blank_with_bg)?;
            } else {
                screen.write_all(&empty_line[0..width - col])?;
            }
        }
    }

    write!(screen, "{}", termion::clear::AfterCursor)?;
    screen.flush().map_err(Error::from)
}
