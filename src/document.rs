use crate::font::{BuiltinFont, Font};
use crate::info::Info;
use crate::layout::{self, Margins};
use crate::page::{Page, SpanFont, SpanLayout};
use crate::pagesize::{self, PageLayout, PageSize};
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::style::TextStyle;
use crate::units::Pt;
use crate::Error;
use id_arena::{Arena, Id};
use log::debug;
use pdf_writer::{Finish, Pdf, Ref};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

/// The page geometry a document is created with: margins, page size, and
/// layout. Every page of the document shares this geometry.
///
/// Sizes from [pagesize](crate::pagesize) are portrait; setting
/// [PageLayout::Landscape] re-orients the dimensions held at the time, so
/// `page_size` is always the actual (width, height) pages will have.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    pub margins: Margins,
    pub page_size: PageSize,
    pub page_layout: PageLayout,
}

impl Default for DocumentOptions {
    fn default() -> DocumentOptions {
        DocumentOptions {
            margins: Margins::all(Pt(36.0)),
            page_size: pagesize::LETTER,
            page_layout: PageLayout::Portrait,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> DocumentOptions {
        DocumentOptions::default()
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the exact page dimensions. Dimensions set here are used as-is;
    /// call [page_layout](DocumentOptions::page_layout) afterwards to
    /// re-orient a named size.
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    pub fn page_layout(mut self, layout: PageLayout) -> Self {
        self.page_layout = layout;
        self.page_size = layout.apply(self.page_size);
        self
    }
}

/// A document that content flows through from top to bottom, page by page.
///
/// The document keeps a vertical cursor; flowing text advances it, and when
/// a line no longer fits above the bottom of the current box the document
/// starts a fresh page on its own. The three built-in core fonts are
/// registered on every new document, with Helvetica at 12pt active.
pub struct Document {
    pub info: Option<Info>,
    pub(crate) pages: Arena<Page>,
    pub(crate) page_order: Vec<Id<Page>>,
    pub(crate) fonts: Vec<Rc<Font>>,
    pub(crate) families: HashMap<String, usize>,
    pub(crate) style: TextStyle,
    pub(crate) cursor: Pt,
    pub(crate) box_override: Option<Rect>,
    pub(crate) options: DocumentOptions,
}

impl Document {
    /// Create a document with one empty page and the cursor at the top of
    /// its content box
    pub fn new(options: DocumentOptions) -> Document {
        let mut document = Document {
            info: None,
            pages: Arena::new(),
            page_order: Vec::new(),
            fonts: Vec::new(),
            families: HashMap::new(),
            style: TextStyle::default(),
            cursor: Pt(0.0),
            box_override: None,
            options,
        };
        for builtin in [
            BuiltinFont::Helvetica,
            BuiltinFont::TimesRoman,
            BuiltinFont::Courier,
        ] {
            document.register_font(builtin.base_name(), Font::builtin(builtin));
        }
        document.start_page();
        document
    }

    /// Sets information about the document. If not provided, no information
    /// block will be written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    fn register_font(&mut self, family: &str, font: Font) {
        self.fonts.push(Rc::new(font));
        self.families.insert(family.to_string(), self.fonts.len() - 1);
    }

    /// Register a font under a family name so [set_font](Document::set_font)
    /// can select it. Registering a name again replaces the earlier mapping;
    /// content already laid out keeps the font it was laid out with.
    pub fn add_font_family<S: ToString>(&mut self, family: S, font: Font) {
        self.register_font(&family.to_string(), font);
    }

    /// The family names registered on this document
    pub fn font_families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Select the active font family. Fails if no font was registered under
    /// the name.
    pub fn set_font<S: ToString>(&mut self, family: S) -> Result<(), Error> {
        let family = family.to_string();
        if !self.families.contains_key(&family) {
            return Err(Error::UnknownFontFamily { family });
        }
        self.style.family = family;
        Ok(())
    }

    /// The name of the active font family
    pub fn font_family(&self) -> &str {
        &self.style.family
    }

    /// The active font
    pub fn font(&self) -> &Font {
        let index = self.families[&self.style.family];
        &self.fonts[index]
    }

    pub fn set_font_size(&mut self, size: Pt) {
        self.style.size = size;
    }

    pub fn font_size(&self) -> Pt {
        self.style.size
    }

    /// Extra leading inserted between lines, on top of the font's own line
    /// height. Zero unless set.
    pub fn set_default_leading(&mut self, leading: Pt) {
        self.style.leading = leading;
    }

    pub fn default_leading(&self) -> Pt {
        self.style.leading
    }

    /// The whole text-formatting state at once
    pub fn text_style(&self) -> &TextStyle {
        &self.style
    }

    /// Replace the whole text-formatting state. Fails if the style names a
    /// font family that is not registered on this document.
    pub fn set_text_style(&mut self, style: TextStyle) -> Result<(), Error> {
        if !self.families.contains_key(&style.family) {
            return Err(Error::UnknownFontFamily {
                family: style.family,
            });
        }
        self.style = style;
        Ok(())
    }

    /// The current vertical position content flows from, in absolute page
    /// coordinates (larger is higher on the page)
    pub fn cursor(&self) -> Pt {
        self.cursor
    }

    pub fn set_cursor(&mut self, y: Pt) {
        self.cursor = y;
    }

    /// How many pages the document holds so far. Content overflowing the
    /// bottom of a box increments this as fresh pages are started.
    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    pub fn margins(&self) -> Margins {
        self.options.margins
    }

    /// The actual (width, height) of the document's pages
    pub fn page_size(&self) -> PageSize {
        self.options.page_size
    }

    pub fn page_layout(&self) -> PageLayout {
        self.options.page_layout
    }

    /// The box content currently flows within: the page's content box, or
    /// the override set by [bounding_box](Document::bounding_box)
    pub fn bounds(&self) -> Rect {
        self.box_override
            .unwrap_or_else(|| self.current_page().content_box)
    }

    fn current_page(&self) -> &Page {
        let id = *self.page_order.last().expect("a document always has a page");
        self.pages.get(id).expect("page order entries are valid")
    }

    fn current_page_mut(&mut self) -> &mut Page {
        let id = *self.page_order.last().expect("a document always has a page");
        self.pages.get_mut(id).expect("page order entries are valid")
    }

    fn start_page(&mut self) {
        let page = Page::new(self.options.page_size, self.options.margins);
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        self.cursor = self.bounds().y2;
    }

    /// Move the cursor down the page by `distance`
    pub fn move_down(&mut self, distance: Pt) {
        self.cursor -= distance;
    }

    /// Advance past the bottom of the current box: a fresh page is started
    /// and the cursor returns to the top of the box
    pub fn move_past_bottom(&mut self) {
        self.start_page();
        debug!(
            "moved past the bottom of the box; now on page {} at {}",
            self.page_count(),
            self.cursor
        );
    }

    /// Run `f` with content constrained to `rect` (in absolute page
    /// coordinates) instead of the page's content box. Text flowed inside
    /// wraps at the rect's width and overflows past its bottom edge. The
    /// cursor starts at the top of the rect, and is left wherever the
    /// content finished.
    pub fn bounding_box<F, T>(&mut self, rect: Rect, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Document) -> Result<T, Error>,
    {
        let previous = self.box_override.replace(rect);
        self.cursor = rect.y2;
        let result = f(self);
        self.box_override = previous;
        result
    }

    /// Flow text at the cursor in the active style, wrapping at the width of
    /// the current box and starting fresh pages as lines pass its bottom.
    pub fn text(&mut self, text: &str) -> Result<(), Error> {
        let (font_index, font) = self.resolve_font()?;
        let TextStyle {
            size,
            leading: extra_leading,
            colour,
            ..
        } = self.style.clone();
        let ascent = font.ascent(size);
        let descent = font.descent(size);
        let font_leading = font.leading(size);

        let lines = layout::break_into_lines(&font, size, self.bounds().width(), text);
        for line in lines {
            let mut baseline = self.cursor - ascent;
            if baseline + descent < self.bounds().y1 {
                self.move_past_bottom();
                baseline = self.cursor - ascent;
            }

            if !line.is_empty() {
                let x = self.bounds().x1;
                self.current_page_mut().add_span(SpanLayout {
                    text: line,
                    font: SpanFont {
                        index: font_index,
                        size,
                    },
                    colour,
                    coords: (x, baseline),
                });
            }

            self.cursor = baseline + descent - font_leading - extra_leading;
        }

        Ok(())
    }

    fn resolve_font(&self) -> Result<(usize, Rc<Font>), Error> {
        let index = *self
            .families
            .get(&self.style.family)
            .ok_or_else(|| Error::UnknownFontFamily {
                family: self.style.family.clone(),
            })?;
        Ok((index, Rc::clone(&self.fonts[index])))
    }

    /// Write the entire document to the writer. Note: although this can write
    /// to arbitrary streams, the entire document is "rendered" in memory
    /// first. If you have a very large document, this could allocate a
    /// significant amount of memory.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), Error> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = page_order
            .iter()
            .enumerate()
            .map(|(i, _id)| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter().enumerate() {
            font.write(&mut refs, i, &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(Error::PageMissing)?;
            page.write(&mut refs, page_index, &fonts, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}
