//! Incremental JSON array splitting
//!
//! [`JsonArrayScanner`] consumes an upload in arbitrary chunks and cuts the
//! top-level JSON array into its elements without parsing them. Only the
//! element currently being scanned is buffered, so memory stays bounded by
//! the largest element (itself capped) no matter how long the array is.
//!
//! The scanner tracks just enough structure to find element boundaries:
//! nesting depth and whether it is inside a string literal. Everything else
//! (syntax errors inside an element, field types) is left to the decoder of
//! each element, which fails that one element only.

use crate::error::StreamError;

/// Default cap on a single element, 1 MiB.
pub const DEFAULT_MAX_ELEMENT_BYTES: usize = 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One top-level array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayElement {
    /// Raw bytes of an object element, surrounding whitespace trimmed.
    Value(Vec<u8>),
    /// A slot that can never decode to a record.
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the opening `[`.
    Start,
    /// Right after `[`; `]` closes an empty array.
    Open,
    /// After a `,`; a value must follow.
    Expect,
    /// Inside an element.
    Element,
    /// After the closing `]`.
    Closed,
}

/// Byte-level splitter for a top-level JSON array.
#[derive(Debug)]
pub struct JsonArrayScanner {
    state: State,
    max_element_bytes: usize,
    bytes_seen: u64,
    /// Bytes consumed before `[`, and how many of them matched the BOM.
    lead_bytes: usize,
    bom_matched: usize,
    buf: Vec<u8>,
    depth: usize,
    in_string: bool,
    escaped: bool,
    overflow: bool,
    trailing_content: bool,
    truncated: bool,
}

impl Default for JsonArrayScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ELEMENT_BYTES)
    }
}

impl JsonArrayScanner {
    pub fn new(max_element_bytes: usize) -> Self {
        Self {
            state: State::Start,
            max_element_bytes: max_element_bytes.max(1),
            bytes_seen: 0,
            lead_bytes: 0,
            bom_matched: 0,
            buf: Vec::new(),
            depth: 0,
            in_string: false,
            escaped: false,
            overflow: false,
            trailing_content: false,
            truncated: false,
        }
    }

    /// Scan one chunk, appending every element completed by it to `out`.
    ///
    /// A UTF-8 byte order mark at the very start is skipped. Fails with
    /// [`StreamError::NotAnArray`] as soon as the first non-whitespace byte
    /// after it turns out not to be `[`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<ArrayElement>) -> Result<(), StreamError> {
        self.bytes_seen += chunk.len() as u64;
        for &byte in chunk {
            match self.state {
                State::Start => {
                    let in_bom = self.lead_bytes == self.bom_matched;
                    self.lead_bytes += 1;
                    if in_bom && self.bom_matched < UTF8_BOM.len() {
                        if byte == UTF8_BOM[self.bom_matched] {
                            self.bom_matched += 1;
                            continue;
                        }
                        if self.bom_matched > 0 {
                            return Err(StreamError::NotAnArray);
                        }
                    }
                    if byte == b'[' {
                        self.state = State::Open;
                    } else if !byte.is_ascii_whitespace() {
                        return Err(StreamError::NotAnArray);
                    }
                }
                State::Open | State::Expect => match byte {
                    b if b.is_ascii_whitespace() => {}
                    b']' => {
                        if self.state == State::Expect {
                            out.push(ArrayElement::Invalid("empty array slot".to_string()));
                        }
                        self.state = State::Closed;
                    }
                    b',' => {
                        out.push(ArrayElement::Invalid("empty array slot".to_string()));
                        self.state = State::Expect;
                    }
                    b => {
                        self.state = State::Element;
                        self.scan_element_byte(b, out);
                    }
                },
                State::Element => self.scan_element_byte(byte, out),
                State::Closed => {
                    if !byte.is_ascii_whitespace() {
                        self.trailing_content = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Signal end of input.
    ///
    /// An unclosed array is not an error: a partially scanned trailing
    /// element is emitted as [`ArrayElement::Invalid`] and
    /// [`Self::was_truncated`] reports it.
    pub fn finish(&mut self, out: &mut Vec<ArrayElement>) -> Result<(), StreamError> {
        match self.state {
            State::Start if self.bytes_seen == 0 => Err(StreamError::Empty),
            State::Start if self.only_bom_seen() => Err(StreamError::Empty),
            State::Start => Err(StreamError::NotAnArray),
            State::Element => {
                self.reset_element();
                out.push(ArrayElement::Invalid("truncated element".to_string()));
                self.truncated = true;
                self.state = State::Closed;
                Ok(())
            }
            State::Open | State::Expect => {
                self.truncated = true;
                self.state = State::Closed;
                Ok(())
            }
            State::Closed => Ok(()),
        }
    }

    /// Whether the input ended before the closing `]`.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether non-whitespace bytes followed the closing `]`.
    pub fn has_trailing_content(&self) -> bool {
        self.trailing_content
    }

    pub fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }

    fn only_bom_seen(&self) -> bool {
        self.lead_bytes == UTF8_BOM.len() && self.bom_matched == UTF8_BOM.len()
    }

    fn scan_element_byte(&mut self, byte: u8, out: &mut Vec<ArrayElement>) {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            self.push(byte);
            return;
        }

        match byte {
            b'"' => self.in_string = true,
            b'{' | b'[' => self.depth += 1,
            b'}' if self.depth > 0 => self.depth -= 1,
            b']' if self.depth > 0 => self.depth -= 1,
            b',' if self.depth == 0 => {
                out.push(self.take_element());
                self.state = State::Expect;
                return;
            }
            b']' => {
                out.push(self.take_element());
                self.state = State::Closed;
                return;
            }
            _ => {}
        }
        self.push(byte);
    }

    fn push(&mut self, byte: u8) {
        if self.overflow {
            return;
        }
        if self.buf.len() >= self.max_element_bytes {
            self.overflow = true;
            self.buf = Vec::new();
            return;
        }
        self.buf.push(byte);
    }

    fn take_element(&mut self) -> ArrayElement {
        let overflow = self.overflow;
        let mut bytes = std::mem::take(&mut self.buf);
        self.reset_element();

        if overflow {
            return ArrayElement::Invalid(format!(
                "element exceeds {} bytes",
                self.max_element_bytes
            ));
        }
        while bytes.last().is_some_and(u8::is_ascii_whitespace) {
            bytes.pop();
        }
        if bytes.first() != Some(&b'{') {
            return ArrayElement::Invalid("element is not an object".to_string());
        }
        ArrayElement::Value(bytes)
    }

    fn reset_element(&mut self) {
        self.buf.clear();
        self.depth = 0;
        self.in_string = false;
        self.escaped = false;
        self.overflow = false;
    }
}
