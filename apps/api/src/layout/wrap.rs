//! Greedy word wrap against the static font metrics.
//!
//! Same first-fit algorithm as a typesetter's simple mode: words are separated by single
//! spaces and a word moves to the next line when it would overflow. A word wider than the
//! whole line is broken between characters.

use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};

/// Wraps one logical line. Whitespace runs collapse to single spaces; a blank line
/// yields no output lines.
pub fn wrap_line(line: &str, font: FontFamily, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = get_metrics(font);
    let space_w = metrics.width_pt(" ", size_pt);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in line.split_whitespace() {
        let word_w = metrics.width_pt(word, size_pt);

        if !current.is_empty() {
            if current_width + space_w + word_w <= max_width_pt {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if word_w <= max_width_pt {
            current.push_str(word);
            current_width = word_w;
        } else {
            let mut pieces = break_word(word, metrics, size_pt, max_width_pt);
            let last = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = metrics.width_pt(&last, size_pt);
            current = last;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits `text` on line breaks and wraps each line in order.
pub fn wrap_text(text: &str, font: FontFamily, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_line(line, font, size_pt, max_width_pt))
        .collect()
}

fn break_word(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let char_w = metrics.char_width(c) as f32 / 1000.0 * size_pt;
        // At least one character per piece, even if it alone overflows.
        if !piece.is_empty() && width + char_w > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += char_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    const EPS: f32 = 1e-3;

    fn body_width() -> f32 {
        default_page_config().text_width_pt()
    }

    fn assert_within(lines: &[String], font: FontFamily, size: f32, max: f32) {
        let metrics = get_metrics(font);
        for line in lines {
            let w = metrics.width_pt(line, size);
            assert!(w <= max + EPS, "line '{line}' is {w}pt, max {max}pt");
        }
    }

    #[test]
    fn test_short_line_is_single_line() {
        let lines = wrap_line("1. Score: 85", FontFamily::Helvetica, 11.0, body_width());
        assert_eq!(lines, vec!["1. Score: 85"]);
    }

    #[test]
    fn test_blank_line_yields_nothing() {
        assert!(wrap_line("", FontFamily::Helvetica, 11.0, body_width()).is_empty());
        assert!(wrap_line("   \t ", FontFamily::Helvetica, 11.0, body_width()).is_empty());
    }

    #[test]
    fn test_long_paragraph_wraps_within_width() {
        let paragraph = "The candidate has eight years of backend experience with Rust and Go, \
                         has led migrations of monoliths to event-driven services on Kafka, \
                         and mentored junior engineers; however there is no evidence of \
                         hands-on Kubernetes operations, which the opening lists as required.";
        let max = body_width();
        let lines = wrap_line(paragraph, FontFamily::Helvetica, 11.0, max);

        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        assert_within(&lines, FontFamily::Helvetica, 11.0, max);
        assert_eq!(
            lines.join(" "),
            paragraph.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }

    #[test]
    fn test_greedy_fills_line_before_breaking() {
        // "aaa" = 3 × 556 = 1.668 em; at 10 pt that is 16.68 pt. Space = 2.78 pt.
        // Two words + space = 36.14 pt fits in 40 pt, the third does not.
        let lines = wrap_line("aaa aaa aaa", FontFamily::Helvetica, 10.0, 40.0);
        assert_eq!(lines, vec!["aaa aaa", "aaa"]);
    }

    #[test]
    fn test_overlong_word_is_broken_by_characters() {
        let word = "x".repeat(400);
        let max = body_width();
        let lines = wrap_line(&word, FontFamily::Helvetica, 11.0, max);

        assert!(lines.len() > 1);
        assert_within(&lines, FontFamily::Helvetica, 11.0, max);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_overlong_word_tail_shares_line_with_next_word() {
        // 10 pt "m" = 8.33 pt; max 20 pt fits two.
        let lines = wrap_line("mmmmm a", FontFamily::Helvetica, 10.0, 20.0);
        assert_eq!(lines, vec!["mm", "mm", "m a"]);
    }

    #[test]
    fn test_wrap_text_keeps_line_breaks() {
        let text = "1. Score: 72\n\n2. Solid SQL background,\r\nlimited cloud exposure.";
        let lines = wrap_text(text, FontFamily::Helvetica, 11.0, body_width());
        assert_eq!(
            lines,
            vec![
                "1. Score: 72",
                "2. Solid SQL background,",
                "limited cloud exposure."
            ]
        );
    }

    #[test]
    fn test_bold_header_wraps_within_width() {
        let header = format!("Candidate: {} (TF-IDF similarity: 0.42)", "long_name_".repeat(20));
        let max = body_width();
        let lines = wrap_line(&header, FontFamily::HelveticaBold, 12.0, max);
        assert!(lines.len() >= 2);
        assert_within(&lines, FontFamily::HelveticaBold, 12.0, max);
    }
}
