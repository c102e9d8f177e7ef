//! Record layout of flat waveform buffers
//!
//! A waveform buffer holds `records` records of `record_length` samples back
//! to back. `PaddedRecords` is the transient power-of-two copy the FFT-based
//! stages work on.

use std::ops::Range;

use ndarray::{aview1, s, Array2, ArrayView1};
use num_traits::Float;

use crate::error::{CoreError, CoreResult};

/// Shape of a flat waveform buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    record_length: usize,
    records: usize,
}

impl RecordLayout {
    /// Validate a buffer length against a record length
    ///
    /// # Errors
    /// * `InvalidLength` - `record_length` is zero
    /// * `InsufficientData` - the buffer is empty
    /// * `ShapeMismatch` - the buffer does not hold whole records
    pub fn of(len: usize, record_length: usize) -> CoreResult<Self> {
        if record_length == 0 {
            return Err(CoreError::InvalidLength {
                len: record_length,
                reason: "record length must be positive",
            });
        }
        if len == 0 {
            return Err(CoreError::InsufficientData { needed: record_length, got: 0 });
        }
        if len % record_length != 0 {
            return Err(CoreError::ShapeMismatch { len, record_length });
        }

        Ok(Self {
            record_length,
            records: len / record_length,
        })
    }

    /// Samples per record
    pub fn record_length(&self) -> usize {
        self.record_length
    }

    /// Number of records
    pub fn records(&self) -> usize {
        self.records
    }

    /// Total samples in the buffer
    pub fn len(&self) -> usize {
        self.records * self.record_length
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Record length rounded up to a power of two
    pub fn padded_length(&self) -> usize {
        self.record_length.next_power_of_two()
    }

    /// Index range of one record in the flat buffer
    pub fn range(&self, index: usize) -> Range<usize> {
        let start = index * self.record_length;
        start..start + self.record_length
    }

    /// Require at least `needed` samples per record
    pub fn require_record_length(&self, needed: usize) -> CoreResult<()> {
        if self.record_length < needed {
            return Err(CoreError::InsufficientData {
                needed,
                got: self.record_length,
            });
        }
        Ok(())
    }
}

/// Records copied into a `records × padded_length` matrix
///
/// The extension past `record_length` in every row holds the fill value.
#[derive(Debug, Clone)]
pub struct PaddedRecords<T> {
    data: Array2<T>,
    record_length: usize,
}

impl<T: Float> PaddedRecords<T> {
    /// Copy a buffer into a padded matrix
    ///
    /// # Arguments
    /// * `buffer` - Flat waveform buffer matching `layout`
    /// * `layout` - Validated shape of `buffer`
    /// * `fill` - Value written into the padding
    pub fn from_buffer(buffer: &[T], layout: RecordLayout, fill: T) -> CoreResult<Self> {
        if buffer.len() != layout.len() {
            return Err(CoreError::ShapeMismatch {
                len: buffer.len(),
                record_length: layout.record_length(),
            });
        }

        let rl = layout.record_length();
        let mut data = Array2::from_elem((layout.records(), layout.padded_length()), fill);
        for (mut row, record) in data.rows_mut().into_iter().zip(buffer.chunks_exact(rl)) {
            row.slice_mut(s![..rl]).assign(&aview1(record));
        }

        Ok(Self { data, record_length: rl })
    }

    pub fn records(&self) -> usize {
        self.data.nrows()
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn padded_length(&self) -> usize {
        self.data.ncols()
    }

    /// One padded row
    pub fn row(&self, index: usize) -> ArrayView1<'_, T> {
        self.data.row(index)
    }

    /// Run `f` over every padded row as a contiguous slice
    ///
    /// Stops at the first error.
    pub fn for_each_row<F>(&mut self, mut f: F) -> CoreResult<()>
    where
        F: FnMut(&mut [T]) -> CoreResult<()>,
    {
        let mut scratch = vec![T::zero(); self.padded_length()];
        for mut row in self.data.rows_mut() {
            scratch.iter_mut().zip(row.iter()).for_each(|(s, &v)| *s = v);
            f(&mut scratch)?;
            row.assign(&aview1(&scratch));
        }
        Ok(())
    }

    /// Copy the unpadded part of every row back into a flat buffer
    pub fn write_back(&self, buffer: &mut [T]) -> CoreResult<()> {
        let rl = self.record_length;
        if buffer.len() != self.records() * rl {
            return Err(CoreError::ShapeMismatch {
                len: buffer.len(),
                record_length: rl,
            });
        }

        for (row, record) in self.data.rows().into_iter().zip(buffer.chunks_exact_mut(rl)) {
            record
                .iter_mut()
                .zip(row.slice(s![..rl]).iter())
                .for_each(|(dst, &src)| *dst = src);
        }
        Ok(())
    }

    /// Drop the padding and return the flat buffer
    pub fn into_unpadded(self) -> Vec<T> {
        self.data.slice(s![.., ..self.record_length]).iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_validation() {
        let layout = RecordLayout::of(12, 4).unwrap();
        assert_eq!(layout.records(), 3);
        assert_eq!(layout.padded_length(), 4);
        assert_eq!(layout.range(2), 8..12);

        assert!(matches!(RecordLayout::of(12, 0), Err(CoreError::InvalidLength { .. })));
        assert!(matches!(
            RecordLayout::of(10, 4),
            Err(CoreError::ShapeMismatch {
                len: 10,
                record_length: 4
            })
        ));
        assert!(matches!(RecordLayout::of(0, 4), Err(CoreError::InsufficientData { .. })));
    }

    #[test]
    fn test_require_record_length() {
        let layout = RecordLayout::of(4, 2).unwrap();
        assert!(layout.require_record_length(2).is_ok());
        assert!(layout.require_record_length(3).is_err());
    }

    #[test]
    fn test_padding_uses_fill_value() {
        let buffer = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let layout = RecordLayout::of(buffer.len(), 3).unwrap();
        let padded = PaddedRecords::from_buffer(&buffer, layout, -1.0).unwrap();

        assert_eq!(padded.padded_length(), 4);
        assert_eq!(padded.row(0).to_vec(), vec![1.0, 2.0, 3.0, -1.0]);
        assert_eq!(padded.row(1).to_vec(), vec![4.0, 5.0, 6.0, -1.0]);
        assert_eq!(padded.into_unpadded(), buffer.to_vec());
    }

    #[test]
    fn test_row_processing_and_write_back() {
        let mut buffer = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let layout = RecordLayout::of(buffer.len(), 3).unwrap();
        let mut padded = PaddedRecords::from_buffer(&buffer, layout, 0.0).unwrap();

        padded
            .for_each_row(|row| {
                assert_eq!(row.len(), 4);
                // Move the padding sample to the front
                row.rotate_right(1);
                Ok(())
            })
            .unwrap();
        padded.write_back(&mut buffer).unwrap();
        assert_eq!(buffer, vec![0.0, 1.0, 2.0, 0.0, 4.0, 5.0]);
        assert!(padded.write_back(&mut [0.0; 5]).is_err());
    }
}
