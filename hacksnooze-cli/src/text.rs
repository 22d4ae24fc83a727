use std::fmt::{self, Display};

use termion::color::{Bg, Fg, Reset};
use termion::style::{Bold, Italic, NoBold, NoItalic, NoUnderline, Underline};

use crate::theme::Colour;

/// Fancy text (styled)
///
/// Example:
///
/// ```
/// use hacksnooze_cli::text::Fancy;
/// use hacksnooze_cli::theme::Colour;
///
/// let fancy_text = Fancy::new("Hello").fg(Colour::C256(196)).bold();
/// ```
#[derive(Debug, Clone)]
pub struct Fancy {
    text: String,
    fg: Option<Colour>,
    bg: Option<Colour>,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl Fancy {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Fancy {
            text: text.into(),
            fg: None,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub fn fg(mut self, colour: Colour) -> Self {
        self.fg = Some(colour);
        self
    }

    pub fn bg(mut self, colour: Colour) -> Self {
        self.bg = Some(colour);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn get_bg(&self) -> Option<Colour> {
        self.bg
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Width of the text in terminal columns
    pub fn cols(&self) -> usize {
        self.text.chars().map(char_cols).sum()
    }

    /// Keep only as much leading text as fits in `cols` columns
    pub fn truncate(&self, cols: usize) -> Fancy {
        let mut width = 0;
        let mut text = String::new();

        for c in self.text.chars() {
            let w = char_cols(c);
            if width + w > cols {
                break;
            }
            width += w;
            text.push(c);
        }

        self.with_text(text)
    }

    /// Drop the first `cols` columns of the text
    pub fn truncate_front(&self, cols: usize) -> Fancy {
        let mut dropped = 0;
        let mut text = String::new();

        for c in self.text.chars() {
            if dropped < cols {
                dropped += char_cols(c);
                continue;
            }
            text.push(c);
        }

        self.with_text(text)
    }

    fn with_text(&self, text: String) -> Fancy {
        Fancy {
            text,
            ..self.clone()
        }
    }
}

fn char_cols(c: char) -> usize {
    wcwidth::char_width(c).map(usize::from).unwrap_or(0)
}

impl Display for Fancy {
    // This is not exactly efficient generation of escape sequences but will do for now.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(colour) = self.bg {
            write!(f, "{}", Bg(colour))?;
        }
        if let Some(colour) = self.fg {
            write!(f, "{}", Fg(colour))?;
        }
        if self.bold {
            write!(f, "{}", Bold)?;
        }
        if self.italic {
            write!(f, "{}", Italic)?;
        }
        if self.underline {
            write!(f, "{}", Underline)?;
        }

        write!(f, "{}", self.text)?;

        if self.underline {
            write!(f, "{}", NoUnderline)?;
        }
        if self.italic {
            write!(f, "{}", NoItalic)?;
        }
        if self.bold {
            write!(f, "{}", NoBold)?;
        }
        if self.fg.is_some() {
            write!(f, "{}", Fg(Reset))?;
        }
        if self.bg.is_some() {
            write!(f, "{}", Bg(Reset))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fancy_text() {
        let fancy_text = Fancy::new("Test")
            .fg(Colour::C256(15))
            .bg(Colour::C256(4))
            .bold()
            .underline()
            .italic();

        let expected = format!(
            "{}{}{}{}{}{}{}{}{}{}{}",
            Bg(Colour::C256(4)),
            Fg(Colour::C256(15)),
            Bold,
            Italic,
            Underline,
            "Test",
            NoUnderline,
            NoItalic,
            NoBold,
            Fg(Reset),
            Bg(Reset),
        );

        assert_eq!(fancy_text.to_string(), expected);
    }

    #[test]
    fn test_cols_counts_wide_chars() {
        assert_eq!(Fancy::new("hello").cols(), 5);
        assert_eq!(Fancy::new("漢字").cols(), 4);
    }

    #[test]
    fn test_truncate() {
        let span = Fancy::new("a漢b");
        assert_eq!(span.truncate(1).cols(), 1);
        // The wide char does not fit in the second column
        assert_eq!(span.truncate(2).cols(), 1);
        assert_eq!(span.truncate(3).cols(), 3);
        assert_eq!(span.truncate(10).cols(), 4);
    }

    #[test]
    fn test_truncate_front() {
        let span = Fancy::new("a漢b");
        assert_eq!(span.truncate_front(1).cols(), 3);
        assert_eq!(span.truncate_front(3).cols(), 1);
        assert!(span.truncate_front(10).is_empty());
    }
}
