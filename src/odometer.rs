//! Odometer-style counter: a vertical stack of numerals translated so that
//! one of them shows through a one-digit window.

use maud::{Markup, html};

/// Height of one `.digit` row; must match the stylesheet.
pub const DIGIT_HEIGHT_EM: f64 = 1.2;

/// Applied to the wrapper whenever the shown number changes.
pub const TRANSITION: &str = "transform 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

/// Highest numeral in the stack for `total` projects.
pub fn max_digit(total: usize) -> usize {
    total.max(9)
}

/// Vertical offset, in em, that brings `number` into the window.
pub fn offset_em(number: usize) -> f64 {
    match number {
        0 => 0.0,
        n => -(n as f64 * DIGIT_HEIGHT_EM),
    }
}

pub fn transform(number: usize) -> String {
    format!("translateY({:.1}em)", offset_em(number))
}

/// The scrolling "current" stack, initially showing `number`.
pub fn current_markup(total: usize, number: usize) -> Markup {
    html! {
        div.digit-wrapper style={ "transform: " (transform(number)) ";" } {
            @for digit in 0..=max_digit(total) {
                div.digit { (digit) }
            }
        }
    }
}

/// The static "total" display.
pub fn total_markup(total: usize) -> Markup {
    html! {
        div.digit-wrapper {
            div.digit { (total) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_covers_at_least_zero_to_nine() {
        let html = current_markup(3, 1).into_string();
        assert_eq!(html.matches(r#"class="digit""#).count(), 10);
    }

    #[test]
    fn stack_grows_with_project_count() {
        let html = current_markup(14, 1).into_string();
        assert_eq!(html.matches(r#"class="digit""#).count(), 15);
        assert!(html.contains(r#"<div class="digit">14</div>"#));
    }

    #[test]
    fn offset_moves_one_row_per_number() {
        assert_eq!(offset_em(0), 0.0);
        assert_eq!(transform(3), "translateY(-3.6em)");
        assert_eq!(transform(12), "translateY(-14.4em)");
    }

    #[test]
    fn initial_markup_shows_start_number() {
        let html = current_markup(5, 3).into_string();
        assert!(html.contains("transform: translateY(-3.6em);"));
    }

    #[test]
    fn total_shows_count() {
        assert_eq!(
            total_markup(5).into_string(),
            r#"<div class="digit-wrapper"><div class="digit">5</div></div>"#
        );
    }
}
