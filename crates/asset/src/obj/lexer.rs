//! Record splitting and classification over a raw OBJ buffer.

/// One classified OBJ record. Payloads borrow the input buffer and hold the
/// text after the tag with surrounding blanks removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Record<'a> {
    Object(&'a [u8]),
    Position(&'a [u8]),
    TexCoord(&'a [u8]),
    Normal(&'a [u8]),
    Face(&'a [u8]),
    UseMaterial(&'a [u8]),
    MaterialLibrary(&'a [u8]),
    Comment,
    Empty,
    Other,
}

/// Iterator over `(line_number, record_bytes)`; `\r` noise is stripped.
pub struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
    line_no: usize,
}

impl<'a> Lines<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line_no: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let rest = &self.buf[self.pos..];
        let (line, advance) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        self.line_no += 1;

        let line = match line.last() {
            Some(b'\r') => &line[..line.len() - 1],
            _ => line,
        };
        Some((self.line_no, line))
    }
}

/// Strip `tag` from the start of `line` when it is followed by a blank.
#[inline]
fn tagged<'a>(line: &'a [u8], tag: &[u8]) -> Option<&'a [u8]> {
    let rest = line.strip_prefix(tag)?;
    match rest.first() {
        Some(b' ' | b'\t') => Some(rest.trim_ascii()),
        _ => None,
    }
}

/// Classify a record by its leading tag.
pub fn classify(line: &[u8]) -> Record<'_> {
    let line = line.trim_ascii_start();
    let Some(&first) = line.first() else {
        return Record::Empty;
    };

    match first {
        b'#' => Record::Comment,
        b'o' | b'g' => tagged(line, &line[..1])
            .map(Record::Object)
            .unwrap_or(Record::Other),
        b'v' => {
            if let Some(rest) = tagged(line, b"v") {
                Record::Position(rest)
            } else if let Some(rest) = tagged(line, b"vt") {
                Record::TexCoord(rest)
            } else if let Some(rest) = tagged(line, b"vn") {
                Record::Normal(rest)
            } else {
                Record::Other
            }
        }
        b'f' => tagged(line, b"f").map(Record::Face).unwrap_or(Record::Other),
        b'u' => tagged(line, b"usemtl")
            .map(Record::UseMaterial)
            .unwrap_or(Record::Other),
        b'm' => tagged(line, b"mtllib")
            .map(Record::MaterialLibrary)
            .unwrap_or(Record::Other),
        _ => Record::Other,
    }
}
