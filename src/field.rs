// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time field: one iteration count per pixel, stored
//! column-major.  Turning it into an image (transposing, colouring)
//! is left to the caller.

use itertools::iproduct;

use crate::planes::Pixel;

/// A `width x height` grid of iteration counts.  Entry `(x, y)` lives
/// at offset `x * height + y`, so each column `x` is one contiguous
/// slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl Field {
    pub(crate) fn zeroed(width: usize, height: usize) -> Field {
        Field {
            width,
            height,
            counts: vec![0 as u32; width * height],
        }
    }

    pub(crate) fn from_counts(width: usize, height: usize, counts: Vec<u32>) -> Field {
        debug_assert_eq!(counts.len(), width * height);
        Field {
            width,
            height,
            counts,
        }
    }

    /// `(width, height)` of the field in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The iteration count at pixel `(x, y)`, or `None` when the pixel
    /// is outside the field.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.column(x).and_then(|column| column.get(y).cloned())
    }

    /// All counts for a single `x`, ordered by `y`.
    pub fn column(&self, x: usize) -> Option<&[u32]> {
        if x >= self.width {
            return None;
        }
        Some(&self.counts[x * self.height..(x + 1) * self.height])
    }

    pub(crate) fn columns_mut(&mut self) -> std::slice::ChunksMut<'_, u32> {
        self.counts.chunks_mut(self.height)
    }

    /// The raw column-major buffer.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    /// The largest count in the field.
    pub fn max_value(&self) -> u32 {
        self.counts.iter().cloned().max().unwrap_or(0)
    }

    /// Every pixel with its count, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Pixel, u32)> + '_ {
        iproduct!(0..self.width, 0..self.height)
            .zip(self.counts.iter())
            .map(|((x, y), &count)| (Pixel(x, y), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> Field {
        let mut field = Field::zeroed(width, height);
        for (i, count) in field.counts.iter_mut().enumerate() {
            *count = i as u32;
        }
        field
    }

    #[test]
    fn get_reads_column_major() {
        let field = numbered(3, 2);
        assert_eq!(field.get(0, 0), Some(0));
        assert_eq!(field.get(0, 1), Some(1));
        assert_eq!(field.get(1, 0), Some(2));
        assert_eq!(field.get(2, 1), Some(5));
        assert_eq!(field.get(3, 0), None);
        assert_eq!(field.get(0, 2), None);
    }

    #[test]
    fn columns_are_contiguous() {
        let field = numbered(3, 4);
        assert_eq!(field.column(1), Some(&[4, 5, 6, 7][..]));
        assert_eq!(field.column(3), None);
    }

    #[test]
    fn get_agrees_with_column_at_every_pixel() {
        let field = numbered(4, 3);
        for x in 0..4 {
            let column = field.column(x).unwrap();
            for y in 0..3 {
                assert_eq!(field.get(x, y), Some(column[y]));
                assert_eq!(field.get(x, y), Some((x * 3 + y) as u32));
            }
            assert_eq!(field.get(x, 3), None);
        }
        assert_eq!(field.get(4, 0), None);
    }

    #[test]
    fn iter_pairs_pixels_with_counts() {
        let field = numbered(2, 2);
        let seen: Vec<(Pixel, u32)> = field.iter().collect();
        assert_eq!(
            seen,
            vec![
                (Pixel(0, 0), 0),
                (Pixel(0, 1), 1),
                (Pixel(1, 0), 2),
                (Pixel(1, 1), 3)
            ]
        );
    }

    #[test]
    fn max_value_of_a_zeroed_field_is_zero() {
        assert_eq!(Field::zeroed(4, 4).max_value(), 0);
        assert_eq!(numbered(4, 4).max_value(), 15);
    }
}
