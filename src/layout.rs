//! Utility functions and structures to lay out text within boxes

use crate::font::Font;
use crate::units::Pt;

/// Margins are used when laying out content on a page. There is no control
/// preventing content on pages from overflowing the margins—the margins are
/// there as guidelines for layout. Additionally, the margins are applied to
/// pages to determine the content box of each page in the generated PDF
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Pt(0.0))
    }
}

/// Calculates the vertical offset from a text coordinate to the font's baseline.
///
/// In PDF, text coordinates specify the baseline position. This function returns
/// the negative ascent value, which can be added to a y-coordinate to account
/// for the font's ascender height when positioning text from a top reference point.
pub fn baseline_offset(font: &Font, size: Pt) -> Pt {
    Pt(0.0) - font.ascent(size)
}

/// Breaks text into lines no wider than `max_width` when set in `font` at
/// `size`.
///
/// Tabs are expanded to four spaces and newlines are normalized before
/// breaking. Lines prefer to break at a space; a word wider than the whole
/// line is split at the exact character that overflows so text never
/// escapes its box. An empty input still produces one (empty) line, so
/// flowing it advances the cursor by one line.
pub fn break_into_lines(font: &Font, size: Pt, max_width: Pt, text: &str) -> Vec<String> {
    const TABSIZE: usize = 4;

    let text = text.replace('\t', &" ".repeat(TABSIZE));
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut line_start = 0usize;
        let mut width = Pt(0.0);
        let mut last_space: Option<usize> = None;
        let mut ci = 0usize;
        while ci < chars.len() {
            let ch = chars[ci];
            let advance = font.advance(ch, size);

            if width + advance > max_width && ci > line_start {
                // prefer the most recent space; fall back to a hard break
                let break_at = match last_space {
                    Some(space) if space > line_start => space,
                    _ => ci,
                };
                lines.push(chars[line_start..break_at].iter().collect());

                // resume after any whitespace consumed by the break
                let mut next = break_at;
                while next < chars.len() && chars[next] == ' ' {
                    next += 1;
                }
                line_start = next;
                ci = next;
                width = Pt(0.0);
                last_space = None;
                continue;
            }

            if ch == ' ' {
                last_space = Some(ci);
            }
            width += advance;
            ci += 1;
        }

        if line_start < chars.len() {
            lines.push(chars[line_start..].iter().collect());
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;

    fn courier() -> Font {
        Font::builtin(BuiltinFont::Courier)
    }

    #[test]
    fn breaks_at_spaces() {
        // courier at 10pt advances 6pt per character: 10 characters per 60pt line
        let lines = break_into_lines(&courier(), Pt(10.0), Pt(60.0), "aaa bbb ccc ddd");
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn splits_words_wider_than_the_line() {
        let lines = break_into_lines(&courier(), Pt(10.0), Pt(60.0), "abcdefghijklmnop");
        assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        let lines = break_into_lines(&courier(), Pt(10.0), Pt(600.0), "one\ntwo\n\nthree");
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn empty_input_is_one_empty_line() {
        let lines = break_into_lines(&courier(), Pt(10.0), Pt(60.0), "");
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn expands_tabs() {
        let lines = break_into_lines(&courier(), Pt(10.0), Pt(600.0), "a\tb");
        assert_eq!(lines, vec!["a    b"]);
    }
}
