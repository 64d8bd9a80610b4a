// Chunk wire format.
//
// # Modules
//
// - `header`: kind tag + variable-width `count - 1` field shared by all chunks
// - `offset`: signed, sign-extended offset field of old-offset chunks
// - `types`: `ChunkKind` and the decoded `Chunk` value
// - `error`: codec error taxonomy
// - `decoder`: bounds-checked single-chunk decoder and the sequence iterator
// - `encoder`: `Frame`, one validated chunk ready to append

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod offset;
pub mod types;

pub use decoder::{ChunkIter, Seq, decode};
pub use encoder::{Frame, MAX_REPS};
pub use error::{Error, Result, SizeField, Status};
pub use header::MAX_COUNT;
pub use offset::{MAX_OFFSET, MIN_OFFSET};
pub use types::{Chunk, ChunkKind};
