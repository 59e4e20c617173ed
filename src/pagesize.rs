//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where
//! width ≤ height. Use [PageLayout] to obtain the landscape variant.

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(13.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Page orientation, carried as plain data so it can be copied between
/// rendering contexts alongside the page dimensions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PageLayout {
    #[default]
    Portrait,
    Landscape,
}

impl PageLayout {
    /// Orient a page size to this layout: portrait keeps the short edge as
    /// the width, landscape the long edge.
    pub fn apply(self, size: PageSize) -> PageSize {
        let (a, b) = size;
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        match self {
            PageLayout::Portrait => (short, long),
            PageLayout::Landscape => (long, short),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orients_page_sizes() {
        assert_eq!(PageLayout::Portrait.apply(LETTER), LETTER);
        let (w, h) = PageLayout::Landscape.apply(LETTER);
        assert_eq!((w, h), (LETTER.1, LETTER.0));
        // already-landscape sizes stay put
        assert_eq!(PageLayout::Landscape.apply((w, h)), (w, h));
    }
}
