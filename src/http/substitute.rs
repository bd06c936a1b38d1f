//! In-band token replacement for streamed bodies.
//!
//! Bodies are scanned as bytes, so binary files pass through untouched
//! unless they contain a token verbatim. Bytes at the end of a chunk that
//! could still begin a token are held back until the next chunk arrives,
//! which means a token split across two reads is still replaced.

use bytes::{Buf, BytesMut};

/// Replaced with the response date.
pub const DATE_TOKEN: &[u8] = b"<cs371date>";
/// Replaced with the server identity.
pub const SERVER_TOKEN: &[u8] = b"<cs371server>";

#[derive(Debug, Clone)]
struct Substitution {
    token: Vec<u8>,
    replacement: Vec<u8>,
}

/// Streaming replacer: feed chunks in order, then call [`finish`].
///
/// [`finish`]: TokenSubstituter::finish
#[derive(Debug, Clone)]
pub struct TokenSubstituter {
    subs: Vec<Substitution>,
    pending: BytesMut,
}

impl TokenSubstituter {
    /// A substituter for the date and server tokens.
    pub fn new(date: &str, server: &str) -> Self {
        Self::with_tokens([
            (DATE_TOKEN, date.as_bytes()),
            (SERVER_TOKEN, server.as_bytes()),
        ])
    }

    /// Empty tokens are ignored.
    pub fn with_tokens<'a>(tokens: impl IntoIterator<Item = (&'a [u8], &'a [u8])>) -> Self {
        let subs = tokens
            .into_iter()
            .filter(|(token, _)| !token.is_empty())
            .map(|(token, replacement)| Substitution {
                token: token.to_vec(),
                replacement: replacement.to_vec(),
            })
            .collect();

        Self {
            subs,
            pending: BytesMut::new(),
        }
    }

    /// Accepts the next chunk and returns the bytes that are ready to send.
    pub fn feed(&mut self, chunk: &[u8]) -> BytesMut {
        self.pending.extend_from_slice(chunk);
        self.drain(false)
    }

    /// Flushes whatever was held back at the end of the stream.
    pub fn finish(&mut self) -> BytesMut {
        self.drain(true)
    }

    fn drain(&mut self, at_eof: bool) -> BytesMut {
        let buf = &self.pending[..];
        let mut out = BytesMut::with_capacity(buf.len());
        let mut i = 0;

        'scan: while i < buf.len() {
            // Copy the run of bytes that cannot start any token.
            let run = buf[i..]
                .iter()
                .position(|b| self.subs.iter().any(|s| s.token[0] == *b))
                .unwrap_or(buf.len() - i);
            out.extend_from_slice(&buf[i..i + run]);
            i += run;
            if i == buf.len() {
                break;
            }

            let rest = &buf[i..];
            for sub in &self.subs {
                if rest.starts_with(&sub.token) {
                    out.extend_from_slice(&sub.replacement);
                    i += sub.token.len();
                    continue 'scan;
                }
            }

            if !at_eof && self.subs.iter().any(|s| s.token.starts_with(rest)) {
                break;
            }

            out.extend_from_slice(&rest[..1]);
            i += 1;
        }

        self.pending.advance(i);
        out
    }
}
