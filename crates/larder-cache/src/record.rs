use crate::error::CacheError;
use bytes::Bytes;
use std::collections::HashMap;

/// The header block length is stored in one byte.
pub const MAX_HEADER_BLOCK: usize = u8::MAX as usize;

/// The status code is stored in one byte.
pub const MAX_STATUS: u16 = u8::MAX as u16;

/// A fully-read HTTP response held by the cache.
///
/// Header names map to a single value each; callers pre-join repeated
/// names before building a record. Names and values must not contain `\n`,
/// which the disk format uses as the field separator.
///
/// Disk layout, one file per record:
///
/// ```text
/// byte 0        status code
/// byte 1        header block length N
/// bytes 2..2+N  header block, UTF-8, alternating name \n value \n name \n value
/// bytes 2+N..   raw response body
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl CacheRecord {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Serialize to the on-disk layout.
    ///
    /// Rejects anything the single-byte fields cannot carry rather than
    /// truncating: status above 255, a header block above 255 bytes, or a
    /// newline inside a header name or value.
    pub fn encode(&self) -> Result<Vec<u8>, CacheError> {
        if self.status > MAX_STATUS {
            return Err(CacheError::StatusOutOfRange(self.status));
        }

        let mut block = String::new();
        for (name, value) in &self.headers {
            if name.contains('\n') || value.contains('\n') {
                return Err(CacheError::HeaderContainsNewline { name: name.clone() });
            }
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str(name);
            block.push('\n');
            block.push_str(value);
        }
        let block = block.into_bytes();
        if block.len() > MAX_HEADER_BLOCK {
            return Err(CacheError::HeaderBlockTooLarge {
                len: block.len(),
                max: MAX_HEADER_BLOCK,
            });
        }

        let mut out = Vec::with_capacity(2 + block.len() + self.body.len());
        out.push(self.status as u8);
        out.push(block.len() as u8);
        out.extend_from_slice(&block);
        out.extend_from_slice(&self.body);
        Ok(out)
    }

    /// Deserialize from the on-disk layout.
    pub fn decode(bytes: &[u8]) -> Result<Self, CacheError> {
        if bytes.len() < 2 {
            return Err(CacheError::Truncated {
                needed: 2,
                got: bytes.len(),
            });
        }
        let status = u16::from(bytes[0]);
        let header_len = bytes[1] as usize;
        if bytes.len() < 2 + header_len {
            return Err(CacheError::Truncated {
                needed: 2 + header_len,
                got: bytes.len(),
            });
        }

        let block = std::str::from_utf8(&bytes[2..2 + header_len])
            .map_err(|_| CacheError::CorruptHeaderBlock)?;
        let mut headers = HashMap::new();
        if !block.is_empty() {
            let mut tokens = block.split('\n');
            while let Some(name) = tokens.next() {
                let value = tokens.next().ok_or(CacheError::CorruptHeaderBlock)?;
                headers.insert(name.to_string(), value.to_string());
            }
        }

        Ok(Self {
            status,
            headers,
            body: Bytes::copy_from_slice(&bytes[2 + header_len..]),
        })
    }
}
