//! Report pagination — turns verdicts into positioned text runs, page by page.
//!
//! Pure geometry: nothing here knows about PDF objects. `render::pdf` draws the result.
//!
//! Flow (baselines move top to bottom):
//!   title (centred) → for each verdict: bold header → wrapped body lines → section gap.
//! Before any line is placed, a baseline below the bottom margin starts a new page whose
//! first baseline sits `continuation_offset_pt` below the top edge.

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, FontFamily, PageConfig};
use crate::layout::wrap::{wrap_line, wrap_text};
use crate::models::Verdict;

pub const REPORT_TITLE: &str = "Candidate Analysis Report";

/// One run of text at an absolute baseline position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedText {
    pub text: String,
    pub font: FontFamily,
    pub size_pt: f32,
    pub x_pt: f32,
    pub y_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageLayout {
    pub items: Vec<PlacedText>,
}

/// Header line for one candidate section.
pub fn section_header(verdict: &Verdict) -> String {
    format!(
        "Candidate: {} (TF-IDF similarity: {:.2})",
        verdict.name, verdict.similarity
    )
}

/// Lays out the whole report. Always returns at least one page (the title page).
pub fn paginate_report(verdicts: &[Verdict], config: &PageConfig) -> Vec<PageLayout> {
    let mut cursor = Cursor::new(config);
    let width = config.text_width_pt();

    for verdict in verdicts {
        for line in wrap_line(
            &section_header(verdict),
            FontFamily::HelveticaBold,
            config.header_size_pt,
            width,
        ) {
            cursor.place(
                line,
                FontFamily::HelveticaBold,
                config.header_size_pt,
                config.header_advance_pt,
            );
        }

        for line in wrap_text(
            &verdict.text,
            FontFamily::Helvetica,
            config.body_size_pt,
            width,
        ) {
            cursor.place(
                line,
                FontFamily::Helvetica,
                config.body_size_pt,
                config.line_advance_pt,
            );
        }

        cursor.y -= config.section_gap_pt;
    }

    cursor.pages
}

struct Cursor<'a> {
    config: &'a PageConfig,
    pages: Vec<PageLayout>,
    y: f32,
}

impl<'a> Cursor<'a> {
    /// Starts page 1 with the centred title.
    fn new(config: &'a PageConfig) -> Self {
        let title_w =
            get_metrics(FontFamily::HelveticaBold).width_pt(REPORT_TITLE, config.title_size_pt);
        let title = PlacedText {
            text: REPORT_TITLE.to_string(),
            font: FontFamily::HelveticaBold,
            size_pt: config.title_size_pt,
            x_pt: (config.page_width_pt - title_w) / 2.0,
            y_pt: config.page_height_pt - config.title_offset_pt,
        };

        Self {
            config,
            pages: vec![PageLayout { items: vec![title] }],
            y: config.page_height_pt - config.content_offset_pt,
        }
    }

    fn place(&mut self, text: String, font: FontFamily, size_pt: f32, advance_pt: f32) {
        if self.y < self.config.margin_bottom_pt {
            self.pages.push(PageLayout::default());
            self.y = self.config.page_height_pt - self.config.continuation_offset_pt;
        }

        let item = PlacedText {
            text,
            font,
            size_pt,
            x_pt: self.config.margin_side_pt,
            y_pt: self.y,
        };
        // `pages` is never empty: `new` pushes the title page.
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
        self.y -= advance_pt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn verdict(name: &str, similarity: f64, text: &str) -> Verdict {
        Verdict {
            name: name.to_string(),
            similarity,
            text: text.to_string(),
            failed: false,
        }
    }

    fn all_items(pages: &[PageLayout]) -> Vec<&PlacedText> {
        pages.iter().flat_map(|p| p.items.iter()).collect()
    }

    #[test]
    fn test_empty_report_is_single_title_page() {
        let config = default_page_config();
        let pages = paginate_report(&[], &config);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items.len(), 1);
        let title = &pages[0].items[0];
        assert_eq!(title.text, REPORT_TITLE);
        assert_eq!(title.font, FontFamily::HelveticaBold);
        assert_eq!(title.size_pt, 16.0);
        assert!((title.y_pt - (config.page_height_pt - config.title_offset_pt)).abs() < 1e-3);
    }

    #[test]
    fn test_title_is_centred() {
        let config = default_page_config();
        let pages = paginate_report(&[], &config);
        let title = &pages[0].items[0];
        let width = get_metrics(FontFamily::HelveticaBold).width_pt(REPORT_TITLE, 16.0);
        let right_gap = config.page_width_pt - (title.x_pt + width);
        assert!((title.x_pt - right_gap).abs() < 1e-3);
    }

    #[test]
    fn test_header_format_and_spacing() {
        let config = default_page_config();
        let pages = paginate_report(&[verdict("jane.pdf", 0.4167, "1. 80\n2. Good fit.")], &config);

        let items = &pages[0].items;
        assert_eq!(items[1].text, "Candidate: jane.pdf (TF-IDF similarity: 0.42)");
        assert_eq!(items[1].font, FontFamily::HelveticaBold);
        assert_eq!(items[1].size_pt, 12.0);
        assert!((items[1].y_pt - (config.page_height_pt - config.content_offset_pt)).abs() < 1e-3);

        assert_eq!(items[2].text, "1. 80");
        assert_eq!(items[2].font, FontFamily::Helvetica);
        assert!((items[1].y_pt - items[2].y_pt - config.header_advance_pt).abs() < 1e-3);
        assert!((items[2].y_pt - items[3].y_pt - config.line_advance_pt).abs() < 1e-3);
        assert_eq!(items[2].x_pt, config.margin_side_pt);
    }

    #[test]
    fn test_sections_follow_verdict_order_with_gap() {
        let config = default_page_config();
        let verdicts = vec![verdict("first.txt", 0.9, "one"), verdict("second.txt", 0.1, "two")];
        let pages = paginate_report(&verdicts, &config);

        let texts: Vec<&str> = all_items(&pages).iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                REPORT_TITLE,
                "Candidate: first.txt (TF-IDF similarity: 0.90)",
                "one",
                "Candidate: second.txt (TF-IDF similarity: 0.10)",
                "two"
            ]
        );
        let items = &pages[0].items;
        let expected_gap = config.line_advance_pt + config.section_gap_pt;
        assert!((items[2].y_pt - items[3].y_pt - expected_gap).abs() < 1e-3);
    }

    #[test]
    fn test_long_text_spills_onto_more_pages() {
        let config = default_page_config();
        let body: String = (0..200).map(|i| format!("Line {i}\n")).collect();
        let pages = paginate_report(&[verdict("long.txt", 0.5, &body)], &config);

        assert!(pages.len() >= 4, "got {} pages", pages.len());
        for page in &pages {
            for item in &page.items {
                assert!(item.y_pt >= config.margin_bottom_pt - 1e-3);
                assert!(item.y_pt <= config.page_height_pt);
            }
            for pair in page.items.windows(2) {
                assert!(pair[0].y_pt > pair[1].y_pt);
            }
        }
        let continuation_top = config.page_height_pt - config.continuation_offset_pt;
        assert!((pages[1].items[0].y_pt - continuation_top).abs() < 1e-3);

        let body_lines = all_items(&pages).iter().filter(|i| i.text.starts_with("Line ")).count();
        assert_eq!(body_lines, 200);
    }

    #[test]
    fn test_header_near_bottom_moves_to_next_page() {
        let config = default_page_config();
        // Fill page 1 so the second header's baseline falls below the margin.
        let body: String = (0..47).map(|i| format!("Line {i}\n")).collect();
        let verdicts = vec![verdict("a.txt", 0.9, &body), verdict("b.txt", 0.8, "short")];
        let pages = paginate_report(&verdicts, &config);

        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[1].items[0].text,
            "Candidate: b.txt (TF-IDF similarity: 0.80)"
        );
    }
}
