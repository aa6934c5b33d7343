//! Markdown-lite: the handful of inline markdown forms project descriptions
//! use, applied as literal regex substitutions.
//!
//! Supported, per blank-line separated paragraph:
//!
//! - `#`..`####` headings (the whole paragraph becomes the heading)
//! - `**bold**`, `__bold__`, `*italic*`, `_italic_`
//! - `` `code` ``
//! - `[text](url)`, opened in a new tab
//! - single newlines become `<br>`
//!
//! There is no nesting, no lists, and no escaping: descriptions are trusted
//! input and may carry raw HTML.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| compile(r"\n\n+"));
static BOLD_STARS: Lazy<Regex> = Lazy::new(|| compile(r"\*\*(.+?)\*\*"));
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| compile(r"__(.+?)__"));
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| compile(r"\*(.+?)\*"));
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| compile(r"_(.+?)_"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| compile(r"`(.+?)`"));
static LINK: Lazy<Regex> = Lazy::new(|| compile(r"\[(.+?)\]\((.+?)\)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static markdown pattern")
}

/// Longest prefix first, so `#### ` is never read as `# `.
const HEADINGS: [(&str, u8); 4] = [("#### ", 4), ("### ", 3), ("## ", 2), ("# ", 1)];

/// Render a description to an HTML fragment.
pub fn render(text: &str) -> String {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(render_block)
        .collect()
}

fn render_block(paragraph: &str) -> String {
    for (prefix, level) in HEADINGS {
        if let Some(rest) = paragraph.strip_prefix(prefix) {
            return format!(r#"<h{level} class="md-h{level}">{rest}</h{level}>"#);
        }
    }
    format!(r#"<p class="project-description">{}</p>"#, render_inline(paragraph))
}

/// Apply the inline transforms, in order, to one paragraph.
pub fn render_inline(text: &str) -> String {
    let out = BOLD_STARS.replace_all(text, "<strong>${1}</strong>");
    let out = BOLD_UNDERSCORES.replace_all(&out, "<strong>${1}</strong>");
    let out = ITALIC_STAR.replace_all(&out, "<em>${1}</em>");
    let out = ITALIC_UNDERSCORE.replace_all(&out, "<em>${1}</em>");
    let out = INLINE_CODE.replace_all(&out, r#"<code class="md-code">${1}</code>"#);
    let out = LINK.replace_all(&out, r#"<a href="${2}" target="_blank" class="md-link">${1}</a>"#);
    out.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn heading_and_inline_paragraph() {
        let html = render("# Title\n\nSome **bold** and _em_ text");
        assert_eq!(
            html,
            r#"<h1 class="md-h1">Title</h1><p class="project-description">Some <strong>bold</strong> and <em>em</em> text</p>"#
        );
    }

    #[test]
    fn heading_levels_checked_longest_first() {
        assert_eq!(render("#### Deep"), r#"<h4 class="md-h4">Deep</h4>"#);
        assert_eq!(render("### Three"), r#"<h3 class="md-h3">Three</h3>"#);
        assert_eq!(render("## Two"), r#"<h2 class="md-h2">Two</h2>"#);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(render("#hashtag"), r#"<p class="project-description">#hashtag</p>"#);
        assert_eq!(
            render("##### five"),
            r#"<p class="project-description">##### five</p>"#
        );
    }

    #[test]
    fn headings_skip_inline_transforms() {
        assert_eq!(render("## **Loud**"), r#"<h2 class="md-h2">**Loud**</h2>"#);
    }

    #[test]
    fn underscore_bold_and_star_italic() {
        assert_eq!(
            render_inline("__strong__ and *soft*"),
            "<strong>strong</strong> and <em>soft</em>"
        );
    }

    #[test]
    fn inline_code() {
        assert_eq!(
            render_inline("run `cargo` now"),
            r#"run <code class="md-code">cargo</code> now"#
        );
    }

    #[test]
    fn links_open_in_new_tab() {
        assert_eq!(
            render_inline("see [docs](https://example.com/docs)"),
            r#"see <a href="https://example.com/docs" target="_blank" class="md-link">docs</a>"#
        );
    }

    #[test]
    fn single_newlines_become_breaks() {
        assert_eq!(
            render("line one\nline two"),
            r#"<p class="project-description">line one<br>line two</p>"#
        );
    }

    #[test]
    fn blank_paragraphs_dropped() {
        let html = render("\n\nfirst\n\n   \n\n\nsecond\n\n");
        assert_eq!(
            html,
            r#"<p class="project-description">first</p><p class="project-description">second</p>"#
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(""), "");
        assert_eq!(render("   "), "");
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(render_inline("a *b\nc* d"), "a *b<br>c* d");
    }

    #[test]
    fn html_passes_through_unescaped() {
        assert_eq!(render_inline("<span>x</span>"), "<span>x</span>");
    }
}
