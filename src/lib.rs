//! Oxidfu: a compact chunked delta wire format.
//!
//! Data is described as a sequence of chunks: literal bytes, a repeated
//! byte, a repeated short pattern, or a back-reference to old data at a
//! signed offset. The crate encodes and decodes chunks a caller has already
//! chosen; it does no match finding.
//!
//! The crate provides:
//! - The chunk wire format: headers, decoder, sequence iterator (`chunk`)
//! - Fixed-capacity storage adapters that chunks are appended to (`buffer`)
//! - Hex and chunk diagnostic dumps (`dump`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxidfu::buffer::{ChunkBuffer, InlineBuffer};
//! use oxidfu::chunk::Chunk;
//!
//! let mut buf = InlineBuffer::<64>::new();
//! buf.encode_raw(&[0x55, 0x66, 0x77]).unwrap();
//! buf.encode_rep(0x42, 100).unwrap();
//! buf.encode_off(-8191, 1024).unwrap();
//!
//! let chunks: Vec<_> = buf.chunks().collect();
//! assert_eq!(chunks[0], Chunk::Raw(&[0x55, 0x66, 0x77]));
//! assert_eq!(chunks[2], Chunk::OldOffset { offset: -8191, len: 1024 });
//! ```

pub mod buffer;
pub mod chunk;
pub mod dump;

#[cfg(feature = "cli")]
pub mod cli;
