//! Ordered key-value-list-with-message codec
//!
//! Commits and tags share the same textual layout: a run of `key value`
//! header lines, a blank line, then a free-text message. Values may span
//! several lines; continuation lines start with a single space and stand
//! for a literal embedded newline. Repeated keys accumulate into a list.
//!
//! Key order is insertion order from parsing and round-trips exactly:
//! `serialize(parse(x)) == x` for any well-formed input.

use anyhow::anyhow;
use bytes::Bytes;

/// Parsed key-value-list-with-message document.
///
/// Headers are kept as `(key, values)` pairs in first-seen key order.
/// The message lives in a reserved slot and is never treated as a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    entries: Vec<(Bytes, Vec<Bytes>)>,
    message: Bytes,
}

fn find_from(raw: &[u8], byte: u8, from: usize) -> Option<usize> {
    raw.get(from..)?.iter().position(|&b| b == byte).map(|p| from + p)
}

fn unfold(folded: &[u8]) -> Bytes {
    let mut value = Vec::with_capacity(folded.len());
    let mut i = 0;
    while i < folded.len() {
        if folded[i] == b'\n' && folded.get(i + 1) == Some(&b' ') {
            value.push(b'\n');
            i += 2;
        } else {
            value.push(folded[i]);
            i += 1;
        }
    }
    Bytes::from(value)
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw header+message document.
    ///
    /// The scan is an explicit loop over a cursor rather than the natural
    /// one-key-per-call recursion, so pathological inputs with thousands
    /// of headers cannot exhaust the stack.
    pub fn parse(raw: &[u8]) -> anyhow::Result<Self> {
        let mut kvlm = Kvlm::new();
        let mut pos = 0;

        loop {
            let spc = find_from(raw, b' ', pos);
            let nl = find_from(raw, b'\n', pos);

            // A space before the next newline means the line starts a key.
            // Otherwise the only legal byte here is the blank line that
            // separates headers from the message.
            let key_ahead = match (spc, nl) {
                (Some(spc), Some(nl)) => spc < nl,
                (Some(_), None) => true,
                (None, _) => false,
            };

            if !key_ahead {
                if raw.get(pos) != Some(&b'\n') {
                    return Err(anyhow!("malformed kvlm: expected blank line at offset {pos}"));
                }
                kvlm.message = Bytes::copy_from_slice(&raw[pos + 1..]);
                return Ok(kvlm);
            }

            let spc = spc.expect("key line has a space");
            let key = Bytes::copy_from_slice(&raw[pos..spc]);

            // The value runs until a newline not followed by a continuation
            // space.
            let mut end = spc;
            loop {
                end = find_from(raw, b'\n', end + 1)
                    .ok_or_else(|| anyhow!("malformed kvlm: unterminated value"))?;
                if raw.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let value = unfold(&raw[spc + 1..end]);
            kvlm.append(key, value);

            pos = end + 1;
        }
    }

    /// Serialize back to the canonical byte form.
    ///
    /// Embedded newlines in values are re-escaped by prefixing the
    /// continuation line with a single space.
    pub fn serialize(&self) -> Bytes {
        let mut out = Vec::new();

        for (key, values) in &self.entries {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                for &b in value.iter() {
                    out.push(b);
                    if b == b'\n' {
                        out.push(b' ');
                    }
                }
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        Bytes::from(out)
    }

    /// Append a value under a key, preserving first-seen key order.
    pub fn append(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn values(&self, key: &[u8]) -> Option<&[Bytes]> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value under a key, if any.
    pub fn value(&self, key: &[u8]) -> Option<&Bytes> {
        self.values(key).and_then(|values| values.first())
    }

    pub fn message(&self) -> &Bytes {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<Bytes>) {
        self.message = message.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    const COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent 206941306e8a8af65b66eaaaea388a7ae24d49a0\n\
author Alice <alice@example.com> 1527025023 +0200\n\
committer Alice <alice@example.com> 1527025044 +0200\n\
\n\
Initial commit\n";

    #[rstest]
    fn parse_extracts_headers_and_message() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();

        assert_eq!(
            kvlm.value(b"tree").unwrap().as_ref(),
            b"29ff16c9c14e2652b22f8b78bb08a5a07930c147"
        );
        assert_eq!(
            kvlm.value(b"parent").unwrap().as_ref(),
            b"206941306e8a8af65b66eaaaea388a7ae24d49a0"
        );
        assert_eq!(kvlm.message().as_ref(), b"Initial commit\n");
    }

    #[rstest]
    fn round_trips_byte_for_byte() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();
        assert_eq!(kvlm.serialize().as_ref(), COMMIT);
    }

    #[rstest]
    fn repeated_keys_accumulate_in_order() {
        let raw = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
parent bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\n\
\n\
Merge\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        let parents = kvlm.values(b"parent").unwrap();
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].as_ref(), b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert_eq!(parents[1].as_ref(), b"bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert_eq!(kvlm.serialize().as_ref(), raw);
    }

    #[rstest]
    fn continuation_lines_hold_literal_newlines() {
        let raw = b"gpgsig -----BEGIN-----\n line two\n -----END-----\n\nsigned\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        assert_eq!(
            kvlm.value(b"gpgsig").unwrap().as_ref(),
            b"-----BEGIN-----\nline two\n-----END-----"
        );
        assert_eq!(kvlm.serialize().as_ref(), raw);
    }

    #[rstest]
    fn headerless_document_is_all_message() {
        let kvlm = Kvlm::parse(b"\njust a message\n").unwrap();
        assert_eq!(kvlm.message().as_ref(), b"just a message\n");
        assert_eq!(kvlm.serialize().as_ref(), b"\njust a message\n");
    }

    #[rstest]
    fn truncated_value_is_rejected() {
        assert!(Kvlm::parse(b"tree 29ff16").is_err());
    }

    proptest! {
        #[test]
        fn constructed_documents_round_trip(
            headers in proptest::collection::vec(
                ("[a-z]{1,10}", proptest::collection::vec(any::<u8>(), 0..40)),
                0..8,
            ),
            message in proptest::collection::vec(any::<u8>(), 0..100),
        ) {
            let mut kvlm = Kvlm::new();
            for (key, value) in &headers {
                let value: Vec<u8> = value
                    .iter()
                    .copied()
                    .filter(|&b| b != b'\0')
                    .collect();
                kvlm.append(key.as_bytes().to_vec(), value);
            }
            kvlm.set_message(message);

            let reparsed = Kvlm::parse(&kvlm.serialize()).unwrap();
            prop_assert_eq!(reparsed, kvlm);
        }
    }
}
