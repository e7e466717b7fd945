#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod document;
mod error;
mod file;
mod parser;
mod section;
pub mod util;

use std::char;

pub use document::Document;
pub use error::{Error, ParseError, Result};
pub use file::IniFile;
pub use parser::Parser;
pub use section::Section;

/// A line starting with any of these (after trimming) is a comment.
pub const COMMENT_MARKERS: &[char] = &[';', '#'];
pub const SECTION_START: char = '[';
pub const SECTION_END: char = ']';
pub const KEY_SEPARATOR: char = '=';

/// Byte Order Mark (BOM) is used to signal the encoding of a text file.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];

/// Text encoding used to read and write files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
}

impl Encoding {
    /// Decode `data`, replacing invalid sequences with U+FFFD. A byte order mark overrides
    /// `self`.
    #[must_use]
    pub fn decode(self, data: &[u8]) -> String {
        if let Some(rest) = data.strip_prefix(BOM_UTF8) {
            return decode_utf8(rest);
        }

        if let Some(rest) = data.strip_prefix(BOM_UTF16_LE) {
            return decode_utf16_le(rest);
        }

        match self {
            Self::Utf8 => decode_utf8(data),
            Self::Utf16Le => decode_utf16_le(data),
        }
    }

    /// Encode `text`. UTF-16 output starts with a byte order mark; UTF-8 output does not.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut data = Vec::with_capacity(BOM_UTF16_LE.len() + text.len() * 2);
                data.extend_from_slice(BOM_UTF16_LE);
                data.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                data
            }
        }
    }
}

fn decode_utf8(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn decode_utf16_le(data: &[u8]) -> String {
    let utf16 = data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect::<Vec<u16>>();

    char::decode_utf16(utf16)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect::<String>()
}
