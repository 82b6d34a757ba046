use std::fmt;
use std::ops::{Add, Sub};

use text_size::{TextRange, TextSize};

/// A zero-based row and column. Columns count bytes, not characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const ZERO: Self = Self { row: 0, column: 0 };
    pub const MAX: Self = Self { row: u32::MAX, column: u32::MAX };

    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Position of `byte` inside UTF-8 `text`.
    pub fn of_byte(text: &str, byte: usize) -> Self {
        let prefix = &text.as_bytes()[..byte.min(text.len())];
        let row = prefix.iter().filter(|&&b| b == b'\n').count();
        let column = prefix.iter().rev().take_while(|&&b| b != b'\n').count();
        Self::new(row as u32, column as u32)
    }
}

/// Extends `self` by an extent: a multi-row extent replaces the column.
impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if rhs.row > 0 {
            Self::new(self.row.saturating_add(rhs.row), rhs.column)
        } else {
            Self::new(self.row, self.column.saturating_add(rhs.column))
        }
    }
}

/// The extent that, added to `rhs`, yields `self`.
impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        if self.row > rhs.row {
            Self::new(self.row - rhs.row, self.column)
        } else {
            Self::new(0, self.column.saturating_sub(rhs.column))
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A byte count together with the rows and columns it spans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Length {
    pub bytes: u32,
    pub extent: Point,
}

impl Length {
    pub const ZERO: Self = Self { bytes: 0, extent: Point::ZERO };

    pub const fn new(bytes: u32, extent: Point) -> Self {
        Self { bytes, extent }
    }

    /// `self - rhs`, or zero when `rhs` is not shorter.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.bytes < self.bytes { self - rhs } else { Self::ZERO }
    }
}

impl Add for Length {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { bytes: self.bytes.saturating_add(rhs.bytes), extent: self.extent + rhs.extent }
    }
}

impl Sub for Length {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { bytes: self.bytes.saturating_sub(rhs.bytes), extent: self.extent - rhs.extent }
    }
}

/// A half-open span of the document in both coordinate systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start_byte: u32,
    pub end_byte: u32,
    pub start_point: Point,
    pub end_point: Point,
}

impl Range {
    /// Covers every byte of any document.
    pub const WHOLE_DOCUMENT: Self =
        Self { start_byte: 0, end_byte: u32::MAX, start_point: Point::ZERO, end_point: Point::MAX };

    pub const fn new(start_byte: u32, end_byte: u32, start_point: Point, end_point: Point) -> Self {
        Self { start_byte, end_byte, start_point, end_point }
    }

    /// Builds a range over UTF-8 `text`, computing both points.
    pub fn of_bytes(text: &str, bytes: std::ops::Range<usize>) -> Self {
        Self::new(
            bytes.start as u32,
            bytes.end as u32,
            Point::of_byte(text, bytes.start),
            Point::of_byte(text, bytes.end),
        )
    }

    pub fn byte_range(&self) -> TextRange {
        TextRange::new(
            TextSize::new(self.start_byte),
            TextSize::new(self.end_byte.max(self.start_byte)),
        )
    }

    pub fn contains_byte(&self, byte: u32) -> bool {
        self.start_byte <= byte && byte < self.end_byte
    }

    pub(crate) fn from_lengths(start: Length, end: Length) -> Self {
        Self::new(start.bytes, end.bytes, start.extent, end.extent)
    }
}

/// A single text replacement, described in old and new coordinates.
///
/// `start..old_end` in the old text was replaced by `start..new_end` in the new text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: u32,
    pub old_end_byte: u32,
    pub new_end_byte: u32,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Describes replacing `old_text[range]` by `replacement`.
    pub fn for_replacement(
        old_text: &str,
        range: std::ops::Range<usize>,
        replacement: &str,
    ) -> Self {
        let start_point = Point::of_byte(old_text, range.start);
        let old_end_point = Point::of_byte(old_text, range.end);
        let new_end_point = start_point + Point::of_byte(replacement, replacement.len());

        Self {
            start_byte: range.start as u32,
            old_end_byte: range.end as u32,
            new_end_byte: (range.start + replacement.len()) as u32,
            start_point,
            old_end_point,
            new_end_point,
        }
    }

    pub(crate) fn start(&self) -> Length {
        Length::new(self.start_byte, self.start_point)
    }

    pub(crate) fn old_end(&self) -> Length {
        Length::new(self.old_end_byte, self.old_end_point)
    }

    pub(crate) fn new_end(&self) -> Length {
        Length::new(self.new_end_byte, self.new_end_point)
    }
}

/// Moves an absolute position across `edit`.
///
/// Positions inside the replaced span collapse onto its new end or start.
pub(crate) fn shift_position(position: Length, edit: &InputEdit) -> Length {
    if position.bytes >= edit.old_end_byte {
        Length::new(
            edit.new_end_byte.saturating_add(position.bytes - edit.old_end_byte),
            edit.new_end_point + (position.extent - edit.old_end_point),
        )
    } else if position.bytes > edit.start_byte {
        edit.new_end()
    } else {
        position
    }
}
