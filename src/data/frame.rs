//! Frame validation for the raw serial capture of a Gill 2D sonic.
//!
//! A good frame is one line of exactly [`FRAME_LENGTH`] bytes, for example
//!
//! ```text
//! 2017-08-30 01:17:51,UTC,2017-08-30T01:17:52.906838 ^BQ,+002.03,+000.64,M,00,^C
//! ```
//!
//! where `^B` and `^C` are the ASCII start of text (STX) and end of text (ETX) bytes. The
//! serial link is lossy, so anything that does not look exactly like this is thrown away
//! without complaint.

use std::io::BufRead;

pub const STX: u8 = 0x02;
pub const ETX: u8 = 0x03;

/// Length of a good frame, terminator included
pub const FRAME_LENGTH: usize = 77;

/// Unit marker, the "no error" status code and ETX, found just before the terminator
pub const STATUS_TAIL: &[u8] = b"M,00,\x03";

/// Marker inserted between the device timestamp and the first axis reading
pub const FRAMING_MARKER: &str = " \x02Q";

const ALLOWED_PUNCTUATION: &[u8] = b": \nUTCQM+,.-";

/// True when every byte of the line is one the logger can legitimately produce.
/// Corruption on the link shows up as stray high bit characters.
fn is_allowed_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || ALLOWED_PUNCTUATION.contains(&byte) || byte == STX || byte == ETX
}

/// Checks one physical line, terminator included.
///
/// The status tail is compared just before the final byte. The final byte itself is only
/// held to the allowed byte class, which admits `\n` but nothing else that can end a line.
pub fn is_valid_frame(line: &[u8]) -> bool {
    line.len() == FRAME_LENGTH
        && &line[FRAME_LENGTH - 1 - STATUS_TAIL.len()..FRAME_LENGTH - 1] == STATUS_TAIL
        && line.iter().all(|b| is_allowed_byte(*b))
}

/// Removes every framing marker from the line
pub fn clean_frame(line: &str) -> String {
    line.replace(FRAMING_MARKER, "")
}

/// Validates one line and returns its cleaned text, or `None` if the frame is rejected
pub fn accept_frame(line: &[u8]) -> Option<String> {
    if !is_valid_frame(line) {
        return None;
    }

    // Every allowed byte is ASCII, so the line decodes one byte per character
    std::str::from_utf8(line).ok().map(clean_frame)
}

/// In memory buffer of cleaned frames, ready for the record parser
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    text: String,
    accepted: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every line of `reader`, keeping the cleaned good frames
    pub fn from_reader<R: BufRead>(mut reader: R) -> std::io::Result<Self> {
        let mut buffer = FrameBuffer::new();
        let mut line = Vec::with_capacity(FRAME_LENGTH + 1);
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            buffer.push_line(&line);
        }
        Ok(buffer)
    }

    /// Validates a whole capture held in memory
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut buffer = FrameBuffer::new();
        for line in data.split_inclusive(|b| *b == b'\n') {
            buffer.push_line(line);
        }
        buffer
    }

    /// Appends the line if it is a good frame. Returns whether it was kept.
    pub fn push_line(&mut self, line: &[u8]) -> bool {
        match accept_frame(line) {
            Some(cleaned) => {
                self.text.push_str(&cleaned);
                self.accepted += 1;
                true
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of frames kept so far
    pub fn len(&self) -> usize {
        self.accepted
    }

    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }
}
