use std::fmt;

use termion::color::{AnsiValue, Color, Reset, Rgb};

/// A colour a theme can assign to a screen element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Colour {
    /// One of the 256 ANSI palette colours
    C256(u8),
    /// A 24-bit colour
    True(u8, u8, u8),
    /// The terminal's default colour
    Default,
}

impl Color for Colour {
    fn write_fg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Colour::C256(value) => AnsiValue(value).write_fg(f),
            Colour::True(r, g, b) => Rgb(r, g, b).write_fg(f),
            Colour::Default => Reset.write_fg(f),
        }
    }

    fn write_bg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Colour::C256(value) => AnsiValue(value).write_bg(f),
            Colour::True(r, g, b) => Rgb(r, g, b).write_bg(f),
            Colour::Default => Reset.write_bg(f),
        }
    }
}

pub struct Theme {
    /// Star of a favourited story
    pub star: Colour,
    /// Star of a story that is not a favourite
    pub star_empty: Colour,
    /// Delete marker in the my-stories panel
    pub trash: Colour,
    pub title: Colour,
    pub domain: Colour,
    pub byline: Colour,
    /// Background of the row under the cursor
    pub cursor: Colour,
    /// The status line at the bottom of the screen
    pub status: Colour,
}

pub static HACK_256: Theme = Theme {
    star: Colour::C256(214),
    star_empty: Colour::C256(242),
    trash: Colour::C256(160),
    title: Colour::C256(33),
    domain: Colour::C256(245),
    byline: Colour::C256(250),
    cursor: Colour::C256(236),
    status: Colour::C256(173),
};

pub static HACK_TRUE: Theme = Theme {
    star: Colour::True(0xff, 0x66, 0x00),
    star_empty: Colour::True(0x6c, 0x6c, 0x6c),
    trash: Colour::True(0xd7, 0x00, 0x00),
    title: Colour::True(0x00, 0x87, 0xff),
    domain: Colour::True(0x8a, 0x8a, 0x8a),
    byline: Colour::True(0xbc, 0xbc, 0xbc),
    cursor: Colour::True(0x30, 0x30, 0x30),
    status: Colour::True(0xd7, 0x87, 0x5f),
};

pub static HACK_GREY: Theme = Theme {
    star: Colour::C256(253),
    star_empty: Colour::C256(242),
    trash: Colour::C256(248),
    title: Colour::C256(255),
    domain: Colour::C256(245),
    byline: Colour::C256(250),
    cursor: Colour::C256(237),
    status: Colour::C256(252),
};

pub static HACK_MONO: Theme = Theme {
    star: Colour::Default,
    star_empty: Colour::Default,
    trash: Colour::Default,
    title: Colour::Default,
    domain: Colour::Default,
    byline: Colour::Default,
    cursor: Colour::Default,
    status: Colour::Default,
};
