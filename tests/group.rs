//! End-to-end behavior of the group primitive: which outcome each kind of
//! content lands on, which callbacks fire, and what the document looks like
//! afterwards.
//!
//! All tests flow Courier (600/1000 em per character, 9.432pt line height at
//! 12pt) on a 100pt-tall page with no margins, which holds exactly ten lines.

use pdf_group::{Document, DocumentOptions, Error, GroupOptions, Margins, Pt, Rect};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};

fn test_document() -> Document {
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
fn renders_in_place_when_content_fits_the_current_box() {
    let mut doc = test_document();
    doc.set_cursor(Pt(50.0)); // room for five lines

    let current = Cell::new(0u32);
    let fresh = Cell::new(0u32);
    let tall = Cell::new(0u32);
    let fit = doc
        .group(
            GroupOptions::new()
                .fits_current_context(|| current.set(current.get() + 1))
                .fits_new_context(|| fresh.set(fresh.get() + 1))
                .too_tall(|| tall.set(tall.get() + 1)),
            |doc| doc.text(&lines(3)),
        )
        .unwrap();

    assert!(fit);
    assert_eq!((current.get(), fresh.get(), tall.get()), (1, 0, 0));
    assert_eq!(doc.page_count(), 1);

    // the group left the document exactly as a direct render would have
    let mut direct = test_document();
    direct.set_cursor(Pt(50.0));
    direct.text(&lines(3)).unwrap();
    assert_eq!(doc.cursor(), direct.cursor());
    assert_eq!(doc.page_count(), direct.page_count());
}

#[test]
fn advances_to_a_fresh_box_when_only_that_fits() {
    let mut doc = test_document();
    doc.set_cursor(Pt(50.0)); // room for five lines; the content needs ten

    let current = Cell::new(0u32);
    let fresh = Cell::new(0u32);
    let tall = Cell::new(0u32);
    let fit = doc
        .group(
            GroupOptions::new()
                .fits_current_context(|| current.set(current.get() + 1))
                .fits_new_context(|| fresh.set(fresh.get() + 1))
                .too_tall(|| tall.set(tall.get() + 1)),
            |doc| doc.text(&lines(10)),
        )
        .unwrap();

    assert!(!fit);
    assert_eq!((current.get(), fresh.get(), tall.get()), (0, 1, 0));
    // moved past the bottom: all ten lines landed on a fresh page
    assert_eq!(doc.page_count(), 2);
    // and consumed almost all of it
    assert!(doc.cursor() < Pt(10.0));
}

#[test]
fn renders_overflowing_when_no_box_is_tall_enough() {
    let mut doc = test_document();
    doc.set_cursor(Pt(50.0));

    let current = Cell::new(0u32);
    let fresh = Cell::new(0u32);
    let tall = Cell::new(0u32);
    let fit = doc
        .group(
            GroupOptions::new()
                .fits_current_context(|| current.set(current.get() + 1))
                .fits_new_context(|| fresh.set(fresh.get() + 1))
                .too_tall(|| tall.set(tall.get() + 1)),
            |doc| doc.text(&lines(25)),
        )
        .unwrap();

    assert!(!fit);
    assert_eq!((current.get(), fresh.get(), tall.get()), (0, 0, 1));
    // no box advance: five lines render in place, the other twenty flow
    // over onto two more pages
    assert_eq!(doc.page_count(), 3);
}

#[test]
fn probing_leaves_the_document_untouched() {
    let mut doc = test_document();
    doc.set_cursor(Pt(50.0));

    let observed = Cell::new((0usize, Pt(0.0)));
    doc.group(GroupOptions::new(), |target| {
        observed.set((target.page_count(), target.cursor()));
        target.text(&lines(2))
    })
    .unwrap();

    // the last invocation of the content is against the real document,
    // still exactly where it was before any probing happened
    assert_eq!(observed.get(), (1, Pt(50.0)));
}

#[test]
fn callbacks_are_optional() {
    // three, eight, and twenty-five lines exercise all three outcomes
    for content_lines in [3usize, 8, 25] {
        let mut doc = test_document();
        doc.set_cursor(Pt(50.0));
        doc.group(GroupOptions::new(), |doc| doc.text(&lines(content_lines)))
            .unwrap();
    }

    let mut doc = test_document();
    doc.group(GroupOptions::default(), |doc| doc.text("a short note"))
        .unwrap();
}

#[test]
fn outcome_callback_fires_before_the_final_render() {
    let mut doc = test_document();
    doc.set_cursor(Pt(50.0));

    let events = RefCell::new(Vec::new());
    doc.group(
        GroupOptions::new().fits_new_context(|| events.borrow_mut().push("callback")),
        |doc| {
            events.borrow_mut().push("render");
            doc.text(&lines(10))
        },
    )
    .unwrap();

    // probe at the cursor, probe with a fresh box, then the real render
    assert_eq!(
        *events.borrow(),
        vec!["render", "render", "callback", "render"]
    );
}

#[test]
fn probes_measure_at_the_width_of_the_current_box() {
    let mut doc = Document::new(
        DocumentOptions::new()
            .margins(Margins::empty())
            .page_size((Pt(500.0), Pt(100.0))),
    );
    doc.set_font("Courier").unwrap();

    // Courier at 12pt advances 7.2pt per character: 16 characters per 120pt
    // line, so 128 characters take 8 lines in the narrow box. At the full
    // 500pt page width the same text would take 2 lines and fit in place,
    // so reaching the fresh-box outcome proves the probe measured at the
    // narrow width.
    let narrow = Rect::new(Pt(0.0), Pt(0.0), Pt(120.0), Pt(100.0));
    let fresh = Cell::new(0u32);
    doc.bounding_box(narrow, |doc| {
        doc.set_cursor(Pt(50.0));
        let fit = doc.group(
            GroupOptions::new().fits_new_context(|| fresh.set(fresh.get() + 1)),
            |doc| doc.text(&"a".repeat(128)),
        )?;
        assert!(!fit);
        Ok(())
    })
    .unwrap();

    assert_eq!(fresh.get(), 1);
    assert_eq!(doc.page_count(), 2);
}

#[test]
fn content_errors_propagate() {
    let mut doc = test_document();
    let result = doc.group(GroupOptions::new(), |doc| doc.set_font("Wingdings"));
    assert!(matches!(result, Err(Error::UnknownFontFamily { .. })));
    // the failure happened while probing, before anything touched the page
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn groups_can_run_back_to_back() {
    let mut doc = test_document();

    // each block is four lines; the first two fit the first page together,
    // the third forces a fresh page rather than splitting
    let mut outcomes = Vec::new();
    for _ in 0..3 {
        let fit = doc
            .group(GroupOptions::new(), |doc| doc.text(&lines(4)))
            .unwrap();
        outcomes.push(fit);
    }

    assert_eq!(outcomes, vec![true, true, false]);
    assert_eq!(doc.page_count(), 2);
}
