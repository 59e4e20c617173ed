use crate::colour::{colours, Colour};
use crate::units::Pt;

/// The active text-formatting state of a document: which font family text
/// flows in, at what size, with how much extra leading between lines, and in
/// what colour.
///
/// Cloning a [TextStyle] yields a fully independent copy; probe documents
/// rely on this to measure content without sharing formatting state with the
/// document they mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Name of the font family, as registered on the document
    pub family: String,
    /// Font size
    pub size: Pt,
    /// Extra leading inserted between lines, on top of the font's own line height
    pub leading: Pt,
    /// Fill colour for text
    pub colour: Colour,
}

impl Default for TextStyle {
    fn default() -> TextStyle {
        TextStyle {
            family: "Helvetica".into(),
            size: Pt(12.0),
            leading: Pt(0.0),
            colour: colours::BLACK,
        }
    }
}
