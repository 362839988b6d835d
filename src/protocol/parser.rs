// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line assembler and tokenizer for the text command protocol.
//!
//! Bytes arrive one at a time from the serial link. [`LineAssembler`] collects them into a
//! fixed-capacity buffer until a newline, and [`CommandLine::tokenize`] splits the finished line
//! into a keyword and its argument tokens.

use core::str::FromStr;

use heapless::Vec;

/// Most argument tokens kept per line. Extra tokens are ignored.
pub const MAX_ARGS: usize = 8;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// What happened after feeding one byte.
#[derive(Debug, PartialEq)]
pub enum Event<'a> {
    /// Nothing to report (ignored byte, or truncated tail of an overlong line).
    Idle,
    /// Byte was buffered.
    Echo(u8),
    /// Last buffered byte was erased.
    Erase,
    /// A complete line. Borrowed from the buffer until the next `push`.
    Line(&'a str),
}

/// Byte-at-a-time line buffer with a hard capacity of `C` bytes.
///
/// A printable byte arriving while the buffer is full finalizes the buffered line; the rest of
/// that physical line, up to the next `\n`, is dropped without any error.
pub struct LineAssembler<const C: usize> {
    buf: Vec<u8, C>,
    complete: bool,
    discarding: bool,
}

impl<const C: usize> Default for LineAssembler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> LineAssembler<C> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            complete: false,
            discarding: false,
        }
    }

    /// Bytes currently buffered for the line in progress.
    pub fn pending(&self) -> &[u8] {
        if self.complete {
            &[]
        } else {
            &self.buf[..]
        }
    }

    /// Process a single incoming byte.
    pub fn push(&mut self, byte: u8) -> Event<'_> {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        match byte {
            b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    return Event::Idle;
                }
                self.finish()
            }
            BACKSPACE | DELETE => {
                if !self.discarding && self.buf.pop().is_some() {
                    Event::Erase
                } else {
                    Event::Idle
                }
            }
            b' ' | b'\t' | 0x21..=0x7E => {
                if self.discarding {
                    return Event::Idle;
                }
                if self.buf.push(byte).is_ok() {
                    return Event::Echo(byte);
                }
                // Full: hand out what fits and drop the rest of the line.
                self.discarding = true;
                self.finish()
            }
            // CR, other control bytes and non-ASCII
            _ => Event::Idle,
        }
    }

    fn finish(&mut self) -> Event<'_> {
        self.complete = true;
        // Only printable ASCII is ever buffered.
        Event::Line(core::str::from_utf8(&self.buf).unwrap_or_default())
    }
}

/// A tokenized command line: keyword plus argument tokens, borrowed from the line.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine<'a> {
    pub keyword: &'a str,
    pub args: Vec<&'a str, MAX_ARGS>,
}

impl<'a> CommandLine<'a> {
    /// Split a line on whitespace. Returns `None` for blank lines.
    pub fn tokenize(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_ascii_whitespace();
        let keyword = tokens.next()?;

        let mut args = Vec::new();
        for token in tokens {
            if args.push(token).is_err() {
                break;
            }
        }

        Some(Self { keyword, args })
    }

    /// Argument `n`, or `None` when missing.
    #[inline]
    pub fn arg(&self, n: usize) -> Option<&'a str> {
        self.args.get(n).copied()
    }

    /// Keyword and arguments as one token sequence.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        core::iter::once(self.keyword).chain(self.args.iter().copied())
    }
}

/// Parse a token, falling back to the type's default (zero) when it is missing or malformed.
///
/// Range validation downstream is what rejects the fallback value when it is not acceptable.
#[inline]
pub fn parse_or_default<T: FromStr + Default>(token: Option<&str>) -> T {
    token.and_then(|t| t.parse().ok()).unwrap_or_default()
}

/// Leading integer of a token: an optional sign, then digits up to the first non-digit.
///
/// `"1.5"` reads as 1 and `"2x"` as 2. A token without leading digits, or a missing one, reads as
/// zero. Saturates instead of wrapping.
pub fn leading_int(token: Option<&str>) -> i32 {
    let Some(token) = token else {
        return 0;
    };
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| {
            acc.saturating_mul(10).saturating_add(i32::from(d - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}
