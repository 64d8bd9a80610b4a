//! Human-readable dumps of encoded buffers and decoded chunks.
//!
//! Only reads the bytes and the chunk sequence; nothing here feeds back into
//! the codec.

use std::fmt::{self, Write};

use crate::chunk::{Chunk, ChunkIter, ChunkKind};

const BYTES_PER_ROW: usize = 16;
/// Width of the hex column of a full row: `"hh "` per byte plus the middle gap.
const HEX_COLUMN: usize = BYTES_PER_ROW * 3 + 1;
const HEX: &[u8; 16] = b"0123456789abcdef";

const RESET: &str = "\u{1b}[0m";

/// Output styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    /// ANSI colors per chunk kind.
    Ansi,
}

impl Style {
    fn reset(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => RESET,
        }
    }

    fn color(self, kind: ChunkKind) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => match kind {
                ChunkKind::Raw => "\u{1b}[32m",
                ChunkKind::RepeatedByte => "\u{1b}[36m",
                ChunkKind::RepeatedArray => "\u{1b}[34m",
                ChunkKind::OldOffset => "\u{1b}[35m",
            },
        }
    }
}

#[inline]
fn printable(byte: u8) -> char {
    if byte == b' ' || byte.is_ascii_graphic() {
        byte as char
    } else {
        '.'
    }
}

/// Hex dump, 16 bytes per row with an ASCII column.
pub fn hex<W: Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    for row in bytes.chunks(BYTES_PER_ROW) {
        out.write_str("| ")?;
        let mut column = 0;
        for (i, &byte) in row.iter().enumerate() {
            out.write_char(HEX[(byte >> 4) as usize] as char)?;
            out.write_char(HEX[(byte & 0xF) as usize] as char)?;
            out.write_char(' ')?;
            column += 3;
            if i == 7 {
                out.write_char(' ')?;
                column += 1;
            }
        }
        for _ in column..=HEX_COLUMN {
            out.write_char(' ')?;
        }
        out.write_char('|')?;
        for &byte in row {
            out.write_char(printable(byte))?;
        }
        for _ in row.len()..BYTES_PER_ROW {
            out.write_char('.')?;
        }
        out.write_str("|\n")?;
    }
    Ok(())
}

/// One-line annotation of a chunk, followed by its payload for the kinds
/// that carry bytes.
pub fn chunk<W: Write>(out: &mut W, chunk: &Chunk<'_>, style: Style) -> fmt::Result {
    let kind = chunk.kind();
    write!(out, "{}{} [{:>9}]", style.color(kind), kind.label(), chunk.size())?;
    match *chunk {
        Chunk::Raw(_) => {}
        Chunk::RepeatedByte { byte, .. } => write!(out, " byte {byte:#04x}")?,
        Chunk::RepeatedArray { reps, .. } => write!(out, " reps {reps}")?,
        Chunk::OldOffset { offset, .. } => write!(out, " offs {offset:+}")?,
    }
    out.write_char('\n')?;
    if let Some(payload) = chunk.payload() {
        hex(out, payload)?;
    }
    Ok(())
}

/// Framed dump of a whole encoded sequence: hex first, then every chunk.
///
/// A tail that fails to decode is reported on a last `<truncated ...>` line.
pub fn sequence<W: Write>(out: &mut W, bytes: &[u8], style: Style) -> fmt::Result {
    let reset = style.reset();
    writeln!(out, "{reset}+-----------HEX-----------+")?;
    hex(out, bytes)?;
    writeln!(out, "{reset}+--------DIAGNOSTIC-------+")?;

    let mut iter = ChunkIter::new(bytes);
    for (i, c) in iter.by_ref().enumerate() {
        write!(out, "{reset}| {}) ", i + 1)?;
        chunk(out, &c, style)?;
    }
    if let Some(e) = iter.error() {
        writeln!(out, "{reset}<truncated: {e}>")?;
    }
    writeln!(out, "{reset}+-------------------------+")
}

/// Render [`sequence`] into a new string.
pub fn render(bytes: &[u8], style: Style) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = sequence(&mut s, bytes, style);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_full_row() {
        let bytes: Vec<u8> = (0x41..0x51).collect();
        let mut s = String::new();
        hex(&mut s, &bytes).unwrap();
        assert_eq!(
            s,
            "| 41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|\n"
        );
    }

    #[test]
    fn hex_partial_row_is_padded() {
        let mut s = String::new();
        hex(&mut s, &[0x55, 0x00, 0x7F]).unwrap();
        let full = "| 41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |";
        assert_eq!(s.find("|U").unwrap(), full.len() - 1);
        assert!(s.ends_with("|U...............|\n"));
        assert!(s.starts_with("| 55 00 7f "));
    }

    #[test]
    fn hex_empty_writes_nothing() {
        let mut s = String::new();
        hex(&mut s, &[]).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn chunk_lines() {
        let mut s = String::new();
        chunk(
            &mut s,
            &Chunk::RepeatedByte {
                byte: 0x42,
                count: 100,
            },
            Style::Plain,
        )
        .unwrap();
        chunk(
            &mut s,
            &Chunk::OldOffset {
                offset: -8191,
                len: 1024,
            },
            Style::Plain,
        )
        .unwrap();
        assert_eq!(
            s,
            "REP [      100] byte 0x42\nOLD [     1024] offs -8191\n"
        );
    }

    #[test]
    fn sequence_reports_truncation() {
        let text = render(&[0x01, 0x2A, 0x20, 0x55], Style::Plain);
        assert!(text.contains("| 1) REP [        1] byte 0x2a\n"));
        assert!(text.contains("<truncated: out of bounds at byte 3>"));
        assert!(text.ends_with("+-------------------------+\n"));
    }

    #[test]
    fn ansi_style_colors_kinds() {
        let mut s = String::new();
        chunk(&mut s, &Chunk::Raw(&[0x01]), Style::Ansi).unwrap();
        assert!(s.starts_with("\u{1b}[32mRAW"));
    }
}
