//! Host document behavior: cursor flow, page breaks, fonts, and output.

use pdf_group::{
    BuiltinFont, Document, DocumentOptions, Error, Font, Info, Margins, Pt, Rect,
};
use pretty_assertions::assert_eq;

fn small_courier_document() -> Document {
    let mut doc = Document::new(
        DocumentOptions::new()
            .margins(Margins::empty())
            .page_size((Pt(400.0), Pt(100.0))),
    );
    doc.set_font("Courier").expect("courier is built in");
    doc
}

fn lines(n: usize) -> String {
    (1..=n)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn text_flows_onto_fresh_pages() {
    let mut doc = small_courier_document();
    // a 100pt page holds exactly ten lines of 12pt courier
    doc.text(&lines(10)).unwrap();
    assert_eq!(doc.page_count(), 1);
    doc.text("one more").unwrap();
    assert_eq!(doc.page_count(), 2);
}

#[test]
fn text_wraps_at_the_box_width() {
    let mut doc = small_courier_document();
    // 400pt holds 55 characters of 12pt courier; 100 characters wrap to two lines
    doc.text(&"x".repeat(100)).unwrap();

    let line_height = doc.font().line_height(Pt(12.0));
    let expected = Pt(100.0) - line_height * 2.0;
    assert!((doc.cursor().0 - expected.0).abs() < 1e-3);
}

#[test]
fn move_past_bottom_starts_at_the_top_of_a_fresh_page() {
    let mut doc = small_courier_document();
    doc.text(&lines(4)).unwrap();
    doc.move_past_bottom();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.cursor(), Pt(100.0));
}

#[test]
fn move_down_shifts_the_cursor() {
    let mut doc = small_courier_document();
    doc.move_down(Pt(25.0));
    assert_eq!(doc.cursor(), Pt(75.0));
}

#[test]
fn default_leading_spreads_lines_out() {
    let mut doc = small_courier_document();
    doc.set_default_leading(Pt(3.0));
    // 12.432pt per line instead of 9.432: only eight lines fit now
    doc.text(&lines(9)).unwrap();
    assert_eq!(doc.page_count(), 2);
}

#[test]
fn unknown_font_families_are_rejected() {
    let mut doc = small_courier_document();
    let result = doc.set_font("Comic Sans");
    assert!(matches!(result, Err(Error::UnknownFontFamily { .. })));
    // the active font is unchanged
    assert_eq!(doc.font_family(), "Courier");
}

#[test]
fn fonts_can_be_registered_under_any_name() {
    let mut doc = small_courier_document();
    doc.add_font_family("Body", Font::builtin(BuiltinFont::TimesRoman));
    assert!(doc.font_families().any(|family| family == "Body"));
    doc.set_font("Body").unwrap();
    assert_eq!(doc.font_family(), "Body");
    doc.text("hello").unwrap();
}

#[test]
fn text_styles_copy_independently() {
    let mut doc = small_courier_document();
    let snapshot = doc.text_style().clone();
    doc.set_font_size(Pt(30.0));
    doc.set_default_leading(Pt(5.0));
    assert_eq!(snapshot.size, Pt(12.0));
    assert_eq!(snapshot.leading, Pt(0.0));

    // and a snapshot can be applied back wholesale
    doc.set_text_style(snapshot).unwrap();
    assert_eq!(doc.font_size(), Pt(12.0));
    assert_eq!(doc.default_leading(), Pt(0.0));
}

#[test]
fn bounding_boxes_are_scoped() {
    let mut doc = small_courier_document();
    let page_box = doc.bounds();

    let narrow = Rect::new(Pt(10.0), Pt(0.0), Pt(100.0), Pt(80.0));
    doc.bounding_box(narrow, |doc| {
        assert_eq!(doc.bounds(), narrow);
        assert_eq!(doc.cursor(), Pt(80.0));
        doc.text("inside the box")
    })
    .unwrap();

    assert_eq!(doc.bounds(), page_box);
}

#[test]
fn writes_a_parseable_pdf() {
    let mut doc = Document::new(DocumentOptions::default());
    doc.set_info(Info::new().title("Flow Test").author("Integration Tests"));
    doc.text(lipsum::lipsum(300).as_str()).unwrap();

    let mut bytes: Vec<u8> = Vec::new();
    doc.write(&mut bytes).unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    // the built-in font is referenced by name, not embedded
    let needle = b"Helvetica".as_slice();
    assert!(bytes.windows(needle.len()).any(|window| window == needle));
    assert!(bytes.ends_with(b"%%EOF\n") || bytes.ends_with(b"%%EOF"));
}

#[test]
fn long_copy_paginates() {
    let mut doc = Document::new(DocumentOptions::default());
    doc.text(lipsum::lipsum(3000).as_str()).unwrap();
    assert!(doc.page_count() >= 2);
}
