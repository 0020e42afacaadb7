//! PDF writer for the candidate analysis report, built directly on lopdf.
//!
//! Uses the standard Type1 fonts Helvetica / Helvetica-Bold with WinAnsiEncoding, so no
//! font files are embedded and text stays extractable. Characters outside WinAnsi are
//! written as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::{FontFamily, PageConfig};
use crate::layout::paginate::{paginate_report, PageLayout, REPORT_TITLE};
use crate::models::Verdict;

/// Deterministic download name for the report.
pub const REPORT_FILENAME: &str = "candidate_analysis_report.pdf";

const REGULAR_FONT_KEY: &str = "F1";
const BOLD_FONT_KEY: &str = "F2";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF serialization failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the verdicts, in order, into a complete PDF document.
pub fn render_report(verdicts: &[Verdict], config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let pages = paginate_report(verdicts, config);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFamily::Helvetica));
    let bold_id = doc.add_object(font_dictionary(FontFamily::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT_KEY => regular_id,
            BOLD_FONT_KEY => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(page)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                config.page_width_pt.into(),
                config.page_height_pt.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = info_dictionary(&mut doc);
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!(
        "Rendered report: {} candidates, {} pages, {} bytes",
        verdicts.len(),
        page_count,
        bytes.len()
    );
    Ok(bytes)
}

fn font_dictionary(font: FontFamily) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn info_dictionary(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Title" => Object::string_literal(REPORT_TITLE),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    })
}

fn page_content(page: &PageLayout) -> Result<Vec<u8>, RenderError> {
    let mut operations = Vec::with_capacity(page.items.len() * 5);
    for item in &page.items {
        let font_key = match item.font {
            FontFamily::Helvetica => REGULAR_FONT_KEY,
            FontFamily::HelveticaBold => BOLD_FONT_KEY,
        };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font_key.into(), item.size_pt.into()]));
        operations.push(Operation::new("Td", vec![item.x_pt.into(), item.y_pt.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&item.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Ok(Content { operations }.encode()?)
}

/// Encodes text as WinAnsi (CP1252) bytes; unencodable characters become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
