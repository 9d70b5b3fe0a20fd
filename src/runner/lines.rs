/// Frames a byte stream into newline-terminated lines.
///
/// Complete lines are emitted without their `\n`; a trailing fragment is kept
/// until more data arrives or the stream ends.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let (lines, rest) = frame(std::mem::take(&mut self.pending), chunk);
        self.pending = rest;
        lines
    }

    /// Remaining unterminated fragment, if any.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Pure framing step: `(buffer, chunk) -> (complete lines, new buffer)`.
///
/// Only `chunk` is scanned for newlines; the buffer is extended in place, so
/// a long unterminated line is not copied again on every read.
pub fn frame(mut buffer: Vec<u8>, chunk: &[u8]) -> (Vec<String>, Vec<u8>) {
    let mut lines = Vec::new();
    let mut rest = chunk;
    while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
        buffer.extend_from_slice(&rest[..pos]);
        lines.push(String::from_utf8_lossy(&buffer).into_owned());
        buffer.clear();
        rest = &rest[pos + 1..];
    }
    buffer.extend_from_slice(rest);
    (lines, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_line_is_retained() {
        let (lines, rest) = frame(Vec::new(), b"Local and Remote");
        assert!(lines.is_empty());
        assert_eq!(rest, b"Local and Remote");
    }

    #[test]
    fn lines_split_across_writes() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"A etc/ho").is_empty());
        assert_eq!(buf.push(b"sts\nM var/log"), vec!["A etc/hosts"]);
        assert_eq!(buf.push(b"/syslog\n\nD tmp/x\n"), vec!["M var/log/syslog", "", "D tmp/x"]);
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn finish_flushes_remainder() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"one\ntwo"), vec!["one"]);
        assert_eq!(buf.finish().as_deref(), Some("two"));
    }

    #[test]
    fn pending_buffer_is_extended_in_place() {
        let mut pending = Vec::with_capacity(64);
        pending.extend_from_slice(b"Reading ");
        let ptr = pending.as_ptr();
        let (lines, rest) = frame(pending, b"globbing");
        assert!(lines.is_empty());
        assert_eq!(rest, b"Reading globbing");
        assert_eq!(rest.as_ptr(), ptr);
    }

    #[test]
    fn long_unterminated_line_survives_many_chunks() {
        let mut buf = LineBuffer::new();
        for _ in 0..10_000 {
            assert!(buf.push(b"x").is_empty());
        }
        assert_eq!(buf.push(b"\n"), vec!["x".repeat(10_000)]);
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn carriage_returns_are_kept() {
        let (lines, rest) = frame(Vec::new(), b"dos\r\n");
        assert_eq!(lines, vec!["dos\r"]);
        assert!(rest.is_empty());
    }

    #[test]
    fn multibyte_sequence_split_across_chunks() {
        let bytes = "ü\n".as_bytes();
        let mut buf = LineBuffer::new();
        assert!(buf.push(&bytes[..1]).is_empty());
        assert_eq!(buf.push(&bytes[1..]), vec!["ü"]);
    }
}
