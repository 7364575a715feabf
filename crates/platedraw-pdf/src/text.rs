//! Helvetica metrics and WinAnsi encoding.
//!
//! The two page fonts are the built-in Type1 Helvetica and Helvetica-Bold,
//! so no font program is embedded; the standard AFM advance widths are
//! reproduced here to size text gaps and center strings. Strings are shown
//! with WinAnsiEncoding, which covers the full repertoire the renderer
//! emits (digits, Latin-1 letters and the diameter sign).

/// The two fonts every page references by resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name in each page's font dictionary.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn advance(font: Font, ch: char) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA_WIDTHS,
        Font::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        'Ø' => 778,
        // Latin-1 lowercase accents share the base letter's advance.
        'à'..='å' | 'ç' | 'è'..='ë' | 'ì'..='ï' | 'ò'..='ö' | 'ù'..='ü' => match font {
            Font::Regular => 556,
            Font::Bold => 611,
        },
        _ => table['?' as usize - 0x20],
    }
}

/// Width of `text` at `size` points.
pub fn string_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| advance(font, ch) as u32).sum();
    units as f64 * size / 1000.0
}

/// Encode `text` as WinAnsi bytes for a `Str` show operator.
///
/// ASCII passes through, Latin-1 letters keep their code point (WinAnsi
/// agrees with Latin-1 above 0xA0), anything unrepresentable becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u8,
            _ => b'?',
        })
        .collect()
}
