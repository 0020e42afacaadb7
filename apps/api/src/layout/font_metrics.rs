//! Static font-metric tables for the two standard PDF fonts used by the report.
//!
//! Widths are the Adobe AFM advance widths of Helvetica and Helvetica-Bold in 1/1000 em.
//! Because these are two of the 14 standard Type1 fonts, the viewer's glyphs match the
//! tables exactly and wrapping never overruns the margin.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// PostScript points per centimetre.
pub const CM: f32 = 72.0 / 2.54;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Body text.
    Helvetica,
    /// Title and candidate headers.
    HelveticaBold,
}

impl FontFamily {
    /// The PDF `BaseFont` name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::HelveticaBold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry and typography of the report. All lengths are in points, measured from the
/// bottom-left corner as PDF does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Left and right margin.
    pub margin_side_pt: f32,
    /// A line is never placed below this baseline.
    pub margin_bottom_pt: f32,
    /// Title baseline, distance from the top edge.
    pub title_offset_pt: f32,
    /// First header baseline on page 1, distance from the top edge.
    pub content_offset_pt: f32,
    /// First baseline on continuation pages, distance from the top edge.
    pub continuation_offset_pt: f32,
    pub title_size_pt: f32,
    pub header_size_pt: f32,
    pub body_size_pt: f32,
    pub header_advance_pt: f32,
    pub line_advance_pt: f32,
    /// Extra space after each candidate section.
    pub section_gap_pt: f32,
}

impl PageConfig {
    /// Printable width between the side margins.
    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt - 2.0 * self.margin_side_pt
    }
}

/// A4 portrait, 2 cm margins; title 16 pt, headers 12 pt, body 11 pt.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_pt: 21.0 * CM,
        page_height_pt: 29.7 * CM,
        margin_side_pt: 2.0 * CM,
        margin_bottom_pt: 2.0 * CM,
        title_offset_pt: 2.0 * CM,
        content_offset_pt: 3.0 * CM,
        continuation_offset_pt: 2.0 * CM,
        title_size_pt: 16.0,
        header_size_pt: 12.0,
        body_size_pt: 11.0,
        header_advance_pt: 0.6 * CM,
        line_advance_pt: 0.5 * CM,
        section_gap_pt: 1.0 * CM,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font.
///
/// `widths[i]` = AFM width of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [u16; 95],
    /// Width of characters with no ASCII base letter; equals `?`, which is what the
    /// renderer substitutes for characters outside WinAnsi.
    pub fallback_width: u16,
}

impl FontMetricTable {
    /// Width of one character in 1/1000 em. Latin-1 accented letters measure as their
    /// base letter, which matches the AFM widths closely.
    pub fn char_width(&self, c: char) -> u16 {
        if let Some(width) = win_ansi_punctuation_width(self.font, c) {
            return width;
        }
        let c = ascii_base(c).unwrap_or(c);
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.fallback_width
        }
    }

    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c) as f32).sum::<f32>() / 1000.0
    }

    /// Rendered width of a string in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }
}

/// Typographic punctuation that WinAnsi encodes outside ASCII; model output is full of it.
fn win_ansi_punctuation_width(font: FontFamily, c: char) -> Option<u16> {
    let (regular, bold) = match c {
        '‘' | '’' | '‚' => (222, 278),
        '“' | '”' | '„' => (333, 500),
        '•' => (350, 350),
        '–' | '€' => (556, 556),
        '—' | '…' | '™' => (1000, 1000),
        _ => return None,
    };
    Some(match font {
        FontFamily::Helvetica => regular,
        FontFamily::HelveticaBold => bold,
    })
}

fn ascii_base(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        // Accented i uses the dotless glyph, which is as wide as `t`.
        'ì'..='ï' => 't',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0   1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {   |    }    ~
        334, 260, 334, 584,
    ],
    fallback_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0   1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {   |    }    ~
        389, 280, 389, 584,
    ],
    fallback_width: 611,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
