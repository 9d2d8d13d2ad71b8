use thiserror::Error;

/// Failures surfaced by a single cache operation.
///
/// Encoding variants are fatal to the one read or write that hit them;
/// callers treat read failures as misses and store failures as best-effort
/// (the fresh network response is still returned to the user).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("status code {0} does not fit the single-byte record format")]
    StatusOutOfRange(u16),

    #[error("header block is {len} bytes, the format limit is {max}")]
    HeaderBlockTooLarge { len: usize, max: usize },

    #[error("header {name:?} contains a newline, which the record format reserves as a separator")]
    HeaderContainsNewline { name: String },

    #[error("record truncated: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("header block is not valid UTF-8 or holds a name with no value")]
    CorruptHeaderBlock,

    #[error("record file is {size} bytes, larger than the {max}-byte maximum")]
    FileTooLarge { size: u64, max: u64 },
}
