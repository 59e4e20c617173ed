use crate::colour::Colour;
use crate::font::Font;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::Error;
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;
use std::rc::Rc;

/// Which font (by its index in the document's font table) to draw a span
/// with, and at what size
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub index: usize,
    pub size: Pt,
}

/// A single run of laid-out text: where it starts (the baseline of its first
/// character), what it says, and how it is drawn
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// A single page of a document: its size, the region within the margins that
/// content flows in, and the text that has been laid out on it so far
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid-out text
    pub contents: Vec<SpanLayout>,
}

impl Page {
    pub fn new(size: PageSize, margins: Margins) -> Page {
        let (width, height) = size;
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: width - margins.right,
                y2: height - margins.top,
            },
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(span);
    }

    #[allow(clippy::write_with_newline)]
    fn render(&self, fonts: &[Rc<Font>]) -> Result<Vec<u8>, std::io::Error> {
        if self.contents.is_empty() {
            return Ok(Vec::default());
        }

        let mut content: Vec<u8> = Vec::default();
        write!(&mut content, "q\n")?;

        // unwrap is safe, as we know contents isn't empty
        let mut current_font: SpanFont = self.contents.first().unwrap().font;
        let mut current_colour: Colour = self.contents.first().unwrap().colour;
        write_font(&mut content, current_font)?;
        write_colour(&mut content, current_colour)?;

        for span in self.contents.iter() {
            if span.font != current_font {
                current_font = span.font;
                write_font(&mut content, current_font)?;
            }
            if span.colour != current_colour {
                current_colour = span.colour;
                write_colour(&mut content, current_colour)?;
            }

            write!(&mut content, "BT\n")?;
            write!(&mut content, "{} {} Td\n", span.coords.0, span.coords.1)?;
            let font = &fonts[span.font.index];
            if font.is_builtin() {
                write_literal_string(&mut content, &span.text)?;
            } else {
                write_glyph_string(&mut content, font, &span.text)?;
            }
            write!(&mut content, "ET\n")?;
        }

        write!(&mut content, "Q\n")?;
        Ok(content)
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &[Rc<Font>],
        writer: &mut Pdf,
    ) -> Result<(), Error> {
        let id = refs
            .get(RefType::Page(page_index))
            .expect("page ref was pre-generated");
        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(refs.get(RefType::PageTree).expect("page tree ref exists"));

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter().enumerate() {
            resource_fonts.pair(
                Name(format!("F{i}").as_bytes()),
                refs.get(RefType::Font(i)).expect("font refs exist"),
            );
        }
        resource_fonts.finish();
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts)?;
        writer.stream(content_id, rendered.as_slice());

        Ok(())
    }
}

#[allow(clippy::write_with_newline)]
fn write_font(content: &mut Vec<u8>, font: SpanFont) -> Result<(), std::io::Error> {
    write!(content, "/F{} {} Tf\n", font.index, font.size)
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

/// Built-in fonts are written with a standard single-byte encoding, so their
/// text is shown as a literal string. Characters outside the encoding are
/// replaced rather than dropped.
#[allow(clippy::write_with_newline)]
fn write_literal_string(content: &mut Vec<u8>, text: &str) -> Result<(), std::io::Error> {
    write!(content, "(")?;
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                content.push(b'\\');
                content.push(ch as u8);
            }
            ' '..='~' => content.push(ch as u8),
            _ => content.push(b'?'),
        }
    }
    write!(content, ") Tj\n")
}

/// Embedded fonts use the Identity-H encoding, where each two-byte code is a
/// glyph id in the face
#[allow(clippy::write_with_newline)]
fn write_glyph_string(
    content: &mut Vec<u8>,
    font: &Font,
    text: &str,
) -> Result<(), std::io::Error> {
    write!(content, "<")?;
    for ch in text.chars() {
        write!(content, "{:04x}", font.glyph_id(ch).unwrap_or_default())?;
    }
    write!(content, "> Tj\n")
}
