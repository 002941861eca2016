//! Delimiter-aware scanning of raw parameter lists
//!
//! The scanner walks the text one character at a time and tags every character
//! with the region it belongs to (code, string literal or comment) and the
//! bracket depth it sits at. Bracket kinds are not matched against each other:
//! any opener increments and any closer decrements.

use crate::errors::SignatureError;

/// Lexical region a scanned character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    StringLiteral,
    Comment,
}

/// A single character together with its scanning state.
///
/// `depth` is the nesting level the character sits at: an opener reports the
/// depth outside of itself and a closer reports the depth after it closed, so a
/// matched pair always reports the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedChar {
    pub offset: usize,
    pub ch: char,
    pub region: Region,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Str {
        quote: char,
        triple: bool,
        start: usize,
    },
    Comment,
}

/// Three-mode character scanner with a single depth counter.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    chars: std::str::CharIndices<'a>,
    mode: Mode,
    /// Offsets of the currently open brackets; its length is the depth.
    openers: Vec<usize>,
    escaped: bool,
    /// Remaining characters of a triple-quote delimiter.
    skip: usize,
    unbalanced: Option<(char, usize)>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            mode: Mode::Code,
            openers: Vec::new(),
            escaped: false,
            skip: 0,
            unbalanced: None,
        }
    }

    /// Current bracket depth.
    pub fn depth(&self) -> usize {
        self.openers.len()
    }

    fn at_triple_quote(&self, offset: usize, quote: char) -> bool {
        let delimiter = if quote == '"' { "\"\"\"" } else { "'''" };
        self.text[offset..].starts_with(delimiter)
    }

    /// Drain the remaining input and report whether the text ended in a
    /// balanced, closed state. A comment running to the end is fine.
    pub fn finish(mut self) -> Result<(), SignatureError> {
        while self.next().is_some() {}

        if let Mode::Str {
            quote,
            triple,
            start,
        } = self.mode
        {
            let quote = if triple {
                quote.to_string().repeat(3)
            } else {
                quote.to_string()
            };
            return Err(SignatureError::UnterminatedStringLiteral {
                quote,
                offset: start,
            });
        }
        if let Some((ch, offset)) = self.unbalanced {
            return Err(SignatureError::UnbalancedCloser { ch, offset });
        }
        if let Some(&outermost) = self.openers.first() {
            return Err(SignatureError::UnterminatedNesting {
                depth: self.openers.len(),
                offset: outermost,
            });
        }
        Ok(())
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScannedChar;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, ch) = self.chars.next()?;

        if self.skip > 0 {
            self.skip -= 1;
            return Some(ScannedChar {
                offset,
                ch,
                region: Region::StringLiteral,
                depth: self.depth(),
            });
        }

        let region = match self.mode {
            Mode::Comment => {
                if ch == '\n' {
                    self.mode = Mode::Code;
                    Region::Code
                } else {
                    Region::Comment
                }
            }
            Mode::Str { quote, triple, .. } => {
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == quote && (!triple || self.at_triple_quote(offset, quote)) {
                    if triple {
                        self.skip = 2;
                    }
                    self.mode = Mode::Code;
                }
                Region::StringLiteral
            }
            Mode::Code => match ch {
                '#' => {
                    self.mode = Mode::Comment;
                    Region::Comment
                }
                '\'' | '"' => {
                    let triple = self.at_triple_quote(offset, ch);
                    if triple {
                        self.skip = 2;
                    }
                    self.mode = Mode::Str {
                        quote: ch,
                        triple,
                        start: offset,
                    };
                    Region::StringLiteral
                }
                '(' | '[' | '{' => {
                    let depth = self.depth();
                    self.openers.push(offset);
                    return Some(ScannedChar {
                        offset,
                        ch,
                        region: Region::Code,
                        depth,
                    });
                }
                ')' | ']' | '}' => {
                    if self.openers.pop().is_none() && self.unbalanced.is_none() {
                        self.unbalanced = Some((ch, offset));
                    }
                    Region::Code
                }
                _ => Region::Code,
            },
        };

        Some(ScannedChar {
            offset,
            ch,
            region,
            depth: self.depth(),
        })
    }
}

/// One top-level entry of a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    raw: &'a str,
    start: usize,
    end: usize,
    code: String,
}

impl<'a> Segment<'a> {
    /// The untouched slice of the parameter list, comments and whitespace included.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The segment with comment text removed and surrounding whitespace trimmed.
    pub fn code(&self) -> &str {
        self.code.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.code().is_empty()
    }
}

/// Split a raw parameter list on commas at depth zero outside strings and comments.
///
/// Always yields at least one segment; a trailing comma produces a final empty one.
pub fn split_segments(raw: &str) -> Result<Vec<Segment<'_>>, SignatureError> {
    let mut scanner = Scanner::new(raw);
    let mut segments = Vec::new();
    let mut start = 0;
    let mut code = String::new();

    for scanned in scanner.by_ref() {
        match scanned.region {
            Region::Code if scanned.ch == ',' && scanned.depth == 0 => {
                let segment = Segment {
                    raw: &raw[start..scanned.offset],
                    start,
                    end: scanned.offset,
                    code: std::mem::take(&mut code),
                };
                log::trace!("Segment {}..{}: {:?}", segment.start, segment.end, segment.code());
                segments.push(segment);
                start = scanned.offset + scanned.ch.len_utf8();
            }
            Region::Comment => {}
            _ => code.push(scanned.ch),
        }
    }
    scanner.finish()?;

    let segment = Segment {
        raw: &raw[start..],
        start,
        end: raw.len(),
        code,
    };
    log::trace!("Segment {}..{}: {:?}", segment.start, segment.end, segment.code());
    segments.push(segment);

    Ok(segments)
}

/// Find the byte offset of the delimiter closing the opener at `open`.
///
/// Strings and comments between the two are skipped with the same rules as
/// [`split_segments`]. Error offsets are relative to `text`.
pub fn find_closing_delimiter(text: &str, open: usize) -> Result<usize, SignatureError> {
    let tail = &text[open..];
    let mut scanner = Scanner::new(tail);
    let mut opened = false;

    for scanned in scanner.by_ref() {
        if scanned.region != Region::Code {
            continue;
        }
        match scanned.ch {
            '(' | '[' | '{' => opened = true,
            ')' | ']' | '}' if opened && scanned.depth == 0 => return Ok(open + scanned.offset),
            _ => {}
        }
    }

    Err(match scanner.finish() {
        Err(err) => shift(err, open),
        Ok(()) => SignatureError::UnterminatedNesting {
            depth: 1,
            offset: open,
        },
    })
}

/// Find the first code character at depth zero accepted by `predicate`.
pub(crate) fn find_top_level(
    code: &str,
    mut predicate: impl FnMut(&ScannedChar) -> bool,
) -> Option<usize> {
    Scanner::new(code)
        .find(|scanned| {
            scanned.region == Region::Code && scanned.depth == 0 && predicate(scanned)
        })
        .map(|scanned| scanned.offset)
}

fn shift(err: SignatureError, by: usize) -> SignatureError {
    match err {
        SignatureError::UnterminatedNesting { depth, offset } => {
            SignatureError::UnterminatedNesting {
                depth,
                offset: offset + by,
            }
        }
        SignatureError::UnterminatedStringLiteral { quote, offset } => {
            SignatureError::UnterminatedStringLiteral {
                quote,
                offset: offset + by,
            }
        }
        SignatureError::UnbalancedCloser { ch, offset } => SignatureError::UnbalancedCloser {
            ch,
            offset: offset + by,
        },
    }
}
