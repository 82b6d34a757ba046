use verdant_syntax::{Length, Point, Range};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputEncoding {
    #[default]
    Utf8,
    /// Little-endian UTF-16. Offsets and columns still count bytes.
    Utf16,
}

/// One decoded character of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceChar {
    pub ch: char,
    /// Byte offset in the encoded input.
    pub byte: u32,
    /// Encoded length in bytes.
    pub len: u8,
    /// Index of the included range holding this character.
    pub range: u32,
}

impl SourceChar {
    pub fn end(&self) -> u32 {
        self.byte + u32::from(self.len)
    }
}

/// The document as an engine sees it: characters inside the included
/// ranges, plus byte to row/column conversion.
///
/// Invalid sequences decode to U+FFFD, one per offending unit.
pub struct SourceText<'a> {
    bytes: &'a [u8],
    encoding: InputEncoding,
    chars: Vec<SourceChar>,
    line_starts: Vec<u32>,
    included_ranges: Vec<Range>,
}

impl<'a> SourceText<'a> {
    pub fn new(bytes: &'a [u8], encoding: InputEncoding, included_ranges: &[Range]) -> Self {
        let decoded = match encoding {
            InputEncoding::Utf8 => decode_utf8(bytes),
            InputEncoding::Utf16 => decode_utf16(bytes),
        };

        let mut line_starts = vec![0];
        line_starts.extend(
            decoded
                .iter()
                .filter(|(ch, ..)| *ch == '\n')
                .map(|&(_, byte, len)| byte + u32::from(len)),
        );

        let included_ranges = if included_ranges.is_empty() {
            vec![Range::WHOLE_DOCUMENT]
        } else {
            included_ranges.to_vec()
        };

        let mut chars = Vec::with_capacity(decoded.len());
        let mut range_index = 0;
        for (ch, byte, len) in decoded {
            while range_index < included_ranges.len()
                && included_ranges[range_index].end_byte <= byte
            {
                range_index += 1;
            }
            let Some(range) = included_ranges.get(range_index) else {
                break;
            };
            if range.contains_byte(byte) {
                chars.push(SourceChar { ch, byte, len, range: range_index as u32 });
            }
        }

        Self { bytes, encoding, chars, line_starts, included_ranges }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn encoding(&self) -> InputEncoding {
        self.encoding
    }

    pub fn len(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn chars(&self) -> &[SourceChar] {
        &self.chars
    }

    pub fn included_ranges(&self) -> &[Range] {
        &self.included_ranges
    }

    /// Index of the first character at or after `byte`.
    pub fn char_index_at(&self, byte: u32) -> usize {
        self.chars.partition_point(|ch| ch.byte < byte)
    }

    /// Where the last included character ends.
    pub fn end_of_input(&self) -> u32 {
        self.chars.last().map_or(0, SourceChar::end)
    }

    pub fn point_at(&self, byte: u32) -> Point {
        let row = self.line_starts.partition_point(|&start| start <= byte).saturating_sub(1);
        Point::new(row as u32, byte - self.line_starts[row])
    }

    pub fn length_at(&self, byte: u32) -> Length {
        Length::new(byte, self.point_at(byte))
    }
}

fn decode_utf8(bytes: &[u8]) -> Vec<(char, u32, u8)> {
    let mut chars = Vec::with_capacity(bytes.len());
    let mut offset = 0u32;
    for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            let len = ch.len_utf8() as u8;
            chars.push((ch, offset, len));
            offset += u32::from(len);
        }
        for _ in chunk.invalid() {
            chars.push((char::REPLACEMENT_CHARACTER, offset, 1));
            offset += 1;
        }
    }
    chars
}

fn decode_utf16(bytes: &[u8]) -> Vec<(char, u32, u8)> {
    let units = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    let mut chars = Vec::with_capacity(bytes.len() / 2);
    let mut offset = 0u32;
    for decoded in char::decode_utf16(units) {
        let (ch, len) = match decoded {
            Ok(ch) => (ch, (ch.len_utf16() * 2) as u8),
            Err(_) => (char::REPLACEMENT_CHARACTER, 2),
        };
        chars.push((ch, offset, len));
        offset += u32::from(len);
    }
    chars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn utf8_points_count_bytes() {
        let source = SourceText::new("aé\nb".as_bytes(), InputEncoding::Utf8, &[]);
        let offsets: Vec<_> = source.chars().iter().map(|ch| (ch.ch, ch.byte)).collect();
        assert_eq!(offsets, [('a', 0), ('é', 1), ('\n', 3), ('b', 4)]);
        assert_eq!(source.point_at(3), Point::new(0, 3));
        assert_eq!(source.point_at(4), Point::new(1, 0));
        assert_eq!(source.end_of_input(), 5);
    }

    #[test]
    fn invalid_utf8_becomes_replacement_chars() {
        let source = SourceText::new(b"a\xffb", InputEncoding::Utf8, &[]);
        let chars: String = source.chars().iter().map(|ch| ch.ch).collect();
        assert_eq!(chars, "a\u{fffd}b");
        assert_eq!(source.chars()[2].byte, 2);
    }

    #[test]
    fn utf16_offsets_are_bytes() {
        let bytes = utf16("x\n😀y");
        let source = SourceText::new(&bytes, InputEncoding::Utf16, &[]);
        let offsets: Vec<_> = source.chars().iter().map(|ch| (ch.ch, ch.byte, ch.len)).collect();
        assert_eq!(offsets, [('x', 0, 2), ('\n', 2, 2), ('😀', 4, 4), ('y', 8, 2)]);
        assert_eq!(source.point_at(8), Point::new(1, 4));
    }

    #[test]
    fn excluded_text_is_skipped() {
        let text = "ab<%cd%>ef<%gh%>";
        let ranges = [Range::of_bytes(text, 4..6), Range::of_bytes(text, 12..14)];
        let source = SourceText::new(text.as_bytes(), InputEncoding::Utf8, &ranges);

        let chars: Vec<_> = source.chars().iter().map(|ch| (ch.ch, ch.range)).collect();
        assert_eq!(chars, [('c', 0), ('d', 0), ('g', 1), ('h', 1)]);
        assert_eq!(source.char_index_at(10), 2);
        assert_eq!(source.end_of_input(), 14);
    }
}
