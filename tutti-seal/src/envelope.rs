//! Sealed envelope wire format.
//!
//! ```text
//! LLLLLLLL|<payload>|id1:wrapped1;id2:wrapped2;...
//! ```
//!
//! `LLLLLLLL` is the payload length in bytes as 8 lowercase hex digits. The
//! payload is opaque and may contain any byte, including the delimiters; the
//! length prefix is what locates the second `|`. Principal ids never contain
//! `|`, `:` or `;` (see [`PrincipalId`]); wrapped keys must not contain `;`.

use crate::error::{SealError, SealResult};
use crate::principal::PrincipalId;
use std::fmt;

/// Width of the hex length header.
pub const LENGTH_HEADER_SIZE: usize = 8;

/// Separates header, payload and key table.
pub const SECTION_SEPARATOR: u8 = b'|';

/// Separates entries of the key table.
pub const ENTRY_SEPARATOR: u8 = b';';

/// Separates a principal id from its wrapped key.
pub const KEY_SEPARATOR: u8 = b':';

/// Largest payload the 8-digit header can describe.
pub const MAX_PAYLOAD_LEN: usize = 0xFFFF_FFFF;

/// Parsed form of a sealed envelope: payload ciphertext plus one wrapped
/// session key per principal, in envelope order.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    payload: Vec<u8>,
    keys: Vec<(PrincipalId, Vec<u8>)>,
}

impl SealedEnvelope {
    /// Builds an envelope from its parts.
    pub fn new(payload: Vec<u8>, keys: Vec<(PrincipalId, Vec<u8>)>) -> Self {
        Self { payload, keys }
    }

    /// The payload ciphertext.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The wrapped session key for `id`.
    pub fn wrapped_key(&self, id: &str) -> Option<&[u8]> {
        self.keys
            .iter()
            .find(|(principal, _)| principal == id)
            .map(|(_, wrapped)| wrapped.as_slice())
    }

    /// Whether a wrapped key exists for `id`.
    pub fn has_principal(&self, id: &str) -> bool {
        self.wrapped_key(id).is_some()
    }

    /// Principals the envelope was sealed for, in envelope order.
    pub fn principals(&self) -> impl Iterator<Item = &PrincipalId> {
        self.keys.iter().map(|(id, _)| id)
    }

    /// Number of wrapped keys.
    pub fn principal_count(&self) -> usize {
        self.keys.len()
    }

    /// Writes the wire format.
    pub fn encode(&self) -> SealResult<Vec<u8>> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(SealError::Unencodable(format!(
                "payload of {} bytes exceeds the length header",
                self.payload.len()
            )));
        }

        let table_len: usize = self
            .keys
            .iter()
            .map(|(id, wrapped)| id.as_str().len() + wrapped.len() + 2)
            .sum();
        let mut out =
            Vec::with_capacity(LENGTH_HEADER_SIZE + 2 + self.payload.len() + table_len);

        out.extend_from_slice(format!("{:08x}", self.payload.len()).as_bytes());
        out.push(SECTION_SEPARATOR);
        out.extend_from_slice(&self.payload);
        out.push(SECTION_SEPARATOR);

        for (i, (id, wrapped)) in self.keys.iter().enumerate() {
            if wrapped.contains(&ENTRY_SEPARATOR) {
                return Err(SealError::Unencodable(format!(
                    "wrapped key for principal {id} contains ';'"
                )));
            }
            if i > 0 {
                out.push(ENTRY_SEPARATOR);
            }
            out.extend_from_slice(id.as_str().as_bytes());
            out.push(KEY_SEPARATOR);
            out.extend_from_slice(wrapped);
        }

        Ok(out)
    }

    /// Reads the wire format.
    pub fn parse(data: &[u8]) -> SealResult<Self> {
        let len = payload_len(data).ok_or_else(|| {
            SealError::MalformedEnvelope("missing or invalid length header".to_string())
        })?;

        let payload_start = LENGTH_HEADER_SIZE + 1;
        let payload_end = payload_start
            .checked_add(len)
            .filter(|end| *end < data.len())
            .ok_or_else(|| SealError::MalformedEnvelope("payload is truncated".to_string()))?;

        if data[payload_end] != SECTION_SEPARATOR {
            return Err(SealError::MalformedEnvelope(
                "missing separator after payload".to_string(),
            ));
        }

        let payload = data[payload_start..payload_end].to_vec();
        let table = &data[payload_end + 1..];

        let mut keys: Vec<(PrincipalId, Vec<u8>)> = Vec::new();
        if !table.is_empty() {
            for entry in table.split(|b| *b == ENTRY_SEPARATOR) {
                let (id, wrapped) = parse_entry(entry)?;
                if keys.iter().any(|(existing, _)| *existing == id) {
                    return Err(SealError::MalformedEnvelope(format!(
                        "duplicate principal {id}"
                    )));
                }
                keys.push((id, wrapped.to_vec()));
            }
        }

        Ok(Self { payload, keys })
    }
}

impl fmt::Debug for SealedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedEnvelope")
            .field("payload_len", &self.payload.len())
            .field("principals", &self.keys.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// Structural check for the envelope layout.
///
/// True when the input starts with an 8-digit hex length, a `|`, and has a
/// second `|` exactly where that length says the payload ends. Says nothing
/// about whether the content decrypts.
pub fn is_sealed_data(data: &[u8]) -> bool {
    payload_len(data)
        .and_then(|len| (LENGTH_HEADER_SIZE + 1).checked_add(len))
        .and_then(|end| data.get(end))
        == Some(&SECTION_SEPARATOR)
}

/// Parses the length header, requiring the `|` that follows it.
fn payload_len(data: &[u8]) -> Option<usize> {
    if data.len() <= LENGTH_HEADER_SIZE || data[LENGTH_HEADER_SIZE] != SECTION_SEPARATOR {
        return None;
    }
    let header = &data[..LENGTH_HEADER_SIZE];
    if !header.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let header = std::str::from_utf8(header).ok()?;
    usize::from_str_radix(header, 16).ok()
}

fn parse_entry(entry: &[u8]) -> SealResult<(PrincipalId, &[u8])> {
    let split = entry
        .iter()
        .position(|b| *b == KEY_SEPARATOR)
        .ok_or_else(|| SealError::MalformedEnvelope("key entry without ':'".to_string()))?;

    let id = std::str::from_utf8(&entry[..split])
        .map_err(|_| SealError::MalformedEnvelope("principal id is not UTF-8".to_string()))?;
    let id = PrincipalId::new(id)
        .map_err(|e| SealError::MalformedEnvelope(format!("bad key entry: {e}")))?;

    Ok((id, &entry[split + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_must_be_followed_by_separator() {
        assert_eq!(payload_len(b"00000003|XYZ|"), Some(3));
        assert_eq!(payload_len(b"00000003XYZ||"), None);
        assert_eq!(payload_len(b"0000000"), None);
    }

    #[test]
    fn header_rejects_sign_and_whitespace() {
        assert_eq!(payload_len(b"+0000003|XYZ|"), None);
        assert_eq!(payload_len(b" 0000003|XYZ|"), None);
    }
}
