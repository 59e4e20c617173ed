use crate::document::{Document, DocumentOptions};
use crate::layout::Margins;
use crate::units::Pt;
use crate::Error;
use log::debug;

type OutcomeCallback<'a> = Box<dyn FnMut() + 'a>;

/// Optional hooks fired by [Document::group] to report which way the content
/// fit, each at most once, always before the content is rendered for real.
///
/// ```
/// use pdf_group::{Document, DocumentOptions, GroupOptions};
///
/// let mut doc = Document::new(DocumentOptions::default());
/// doc.group(
///     GroupOptions::new().fits_new_context(|| println!("moved to a fresh page")),
///     |doc| doc.text("a block that stays together"),
/// )?;
/// # Ok::<(), pdf_group::Error>(())
/// ```
#[derive(Default)]
pub struct GroupOptions<'a> {
    pub(crate) too_tall: Option<OutcomeCallback<'a>>,
    pub(crate) fits_new_context: Option<OutcomeCallback<'a>>,
    pub(crate) fits_current_context: Option<OutcomeCallback<'a>>,
}

impl<'a> GroupOptions<'a> {
    /// Create options with no callbacks set
    pub fn new() -> GroupOptions<'a> {
        GroupOptions::default()
    }

    /// Called when the content fits neither the space left in the current
    /// box nor a fresh box, before it is rendered (overflowing) anyway
    pub fn too_tall<F: FnMut() + 'a>(mut self, callback: F) -> Self {
        self.too_tall = Some(Box::new(callback));
        self
    }

    /// Called when the content does not fit the space left in the current
    /// box but does fit a fresh one, before the document advances to it
    pub fn fits_new_context<F: FnMut() + 'a>(mut self, callback: F) -> Self {
        self.fits_new_context = Some(Box::new(callback));
        self
    }

    /// Called when the content fits the space left in the current box,
    /// before it is rendered there
    pub fn fits_current_context<F: FnMut() + 'a>(mut self, callback: F) -> Self {
        self.fits_current_context = Some(Box::new(callback));
        self
    }
}

impl Document {
    /// Keep a block of content together vertically, if possible.
    ///
    /// `content` draws the block into whatever document it is handed. It is
    /// first rendered into a throwaway clone of this document to find out
    /// whether it fits the space left in the current box; if it does not, a
    /// second clone measures whether it would fit a box with its full height
    /// available. Based on those measurements, exactly one of three things
    /// happens to the real document:
    ///
    /// - the content fits where the cursor is: it is rendered in place, and
    ///   `group` returns `true`;
    /// - the content only fits a fresh box: the document
    ///   [moves past the bottom](Document::move_past_bottom) of the current
    ///   box, the content is rendered there, and `group` returns `false`;
    /// - the content does not fit even a fresh box: it is rendered at the
    ///   cursor anyway, overflowing onto as many pages as it needs, and
    ///   `group` returns `false`.
    ///
    /// The matching [GroupOptions] callback (if any) fires before the final
    /// render. The returned boolean does not distinguish the two `false`
    /// outcomes; use the callbacks when that matters.
    ///
    /// Since `content` runs up to twice against probe documents before the
    /// real render, it must be prepared to be called more than once, and
    /// should not have side effects beyond drawing into the document it is
    /// given (counters, sequence numbers, and the like will advance once per
    /// invocation, not once per block).
    ///
    /// Errors from `content` propagate out unchanged, whichever document it
    /// was rendering into at the time.
    pub fn group<F>(&mut self, options: GroupOptions, content: F) -> Result<bool, Error>
    where
        F: Fn(&mut Document) -> Result<(), Error>,
    {
        let GroupOptions {
            mut too_tall,
            mut fits_new_context,
            mut fits_current_context,
        } = options;

        // measure with the probe positioned where the cursor is now
        let mut probe = self.probe_document();
        probe.set_cursor(self.cursor());
        content(&mut probe)?;

        if probe.page_count() > 1 {
            // measure again with the full box height available
            let mut probe = self.probe_document();
            content(&mut probe)?;

            if probe.page_count() > 1 {
                debug!("grouped content is too tall for any box; rendering it overflowing");
                if let Some(callback) = too_tall.as_mut() {
                    callback();
                }
                content(self)?;
            } else {
                debug!("grouped content fits a fresh box; moving past the current one");
                if let Some(callback) = fits_new_context.as_mut() {
                    callback();
                }
                self.move_past_bottom();
                content(self)?;
            }
            Ok(false)
        } else {
            debug!("grouped content fits the current box");
            if let Some(callback) = fits_current_context.as_mut() {
                callback();
            }
            content(self)?;
            Ok(true)
        }
    }

    /// Build a throwaway document that paginates the same way this one does
    /// right now: same vertical margins and page height, but no horizontal
    /// margins and a page exactly as wide as the current box, so measurements
    /// hold even when flowing inside a narrower region. The font table and
    /// text-formatting state are copied over, never shared.
    fn probe_document(&self) -> Document {
        let margins = self.margins();
        let options = DocumentOptions {
            margins: Margins::trbl(margins.top, Pt(0.0), margins.bottom, Pt(0.0)),
            page_size: (self.bounds().width(), self.page_size().1),
            page_layout: self.page_layout(),
        };

        let mut probe = Document::new(options);
        probe.fonts = self.fonts.clone();
        probe.families = self.families.clone();
        probe.style = self.style.clone();
        probe
    }
}
