//! Property tests for the text/cursor/scroll invariants.

use core_model::{EditorOptions, Movement, Scrollable, Size, TextEditor};
use core_text::FixedMetrics;
use proptest::prelude::*;

fn editor(text: &str, width: i32, height: i32, glyph: u32, line_height: u32) -> TextEditor {
    let mut e = TextEditor::new(
        Box::new(FixedMetrics::new(glyph, line_height)),
        EditorOptions {
            padding: 2,
            scrollbar_thickness: 3,
            ..EditorOptions::default()
        },
    );
    e.resize(Size::new(width, height));
    e.set_text(text);
    e
}

fn movement() -> impl Strategy<Value = Movement> {
    prop_oneof![
        Just(Movement::Up),
        Just(Movement::Down),
        Just(Movement::Left),
        Just(Movement::Right),
        Just(Movement::LineStart),
        Just(Movement::LineEnd),
        Just(Movement::DocumentStart),
        Just(Movement::DocumentEnd),
    ]
}

proptest! {
    // Splitting then joining reproduces the input exactly.
    #[test]
    fn text_round_trips(text in "[a-z \n]{0,80}") {
        let e = editor(&text, 50, 50, 2, 3);
        prop_assert_eq!(e.text(), text.clone());
        prop_assert_eq!(e.line_count(), text.matches('\n').count() + 1);
    }

    // Down keeps min(column, len(next line)).
    #[test]
    fn down_clamps_column(a in 0usize..30, b in 0usize..30, col in 0usize..30) {
        let text = format!("{}\n{}", "x".repeat(a), "y".repeat(b));
        let mut e = editor(&text, 50, 50, 1, 1);
        e.set_cursor(0, col);
        let before = e.cursor().column;
        e.move_cursor(Movement::Down);
        prop_assert_eq!(e.cursor().line, 1);
        prop_assert_eq!(e.cursor().column, before.min(b));
    }

    // After any movement sequence the cursor is in range, offsets are within
    // their ranges, and scrolling into view again is a no-op.
    #[test]
    fn movements_keep_invariants(
        lines in prop::collection::vec(0usize..40, 1..40),
        moves in prop::collection::vec(movement(), 0..60),
        width in 0i32..60,
        height in 0i32..60,
        glyph in 1u32..4,
        line_height in 1u32..6,
    ) {
        let text: Vec<String> = lines.iter().map(|n| "m".repeat(*n)).collect();
        let mut e = editor(&text.join("\n"), width, height, glyph, line_height);
        for m in moves {
            e.move_cursor(m);
            let c = e.cursor();
            prop_assert!(c.line < e.line_count());
            prop_assert!(c.column <= lines[c.line]);

            let v = e.vertical_scrollbar();
            let h = e.horizontal_scrollbar();
            prop_assert!(v.value() >= 0 && v.value() <= v.max());
            prop_assert!(h.value() >= 0 && h.value() <= h.max());

            let offsets = e.scroll_offsets();
            prop_assert!(!e.scroll_cursor_into_view());
            prop_assert_eq!(e.scroll_offsets(), offsets);
        }
    }

    // With a non-empty viewport at least as large as the cursor, the cursor
    // ends up fully visible.
    #[test]
    fn cursor_visible_after_move(
        lines in prop::collection::vec(0usize..40, 1..40),
        target_line in 0usize..40,
        target_col in 0usize..40,
    ) {
        let text: Vec<String> = lines.iter().map(|n| "m".repeat(*n)).collect();
        let mut e = editor(&text.join("\n"), 30, 20, 2, 4);
        e.set_cursor(target_line, target_col);
        e.scroll_cursor_into_view();
        prop_assert!(e.visible_content_rect().contains(&e.cursor_content_rect()));
    }
}
