//! Products of a gate track: outline, gated extraction, gated waveform

use ndarray::{aview1, Array2};
use num_traits::Float;

use crate::error::{CoreError, CoreResult};
use crate::filters::windows::WindowSpec;
use crate::records::RecordLayout;
use crate::spectrum::windowing::extract_segment;

/// Gate start per record: position plus a signed offset, clamped into the record
pub fn gate_starts(
    track: &[Option<usize>],
    offset: isize,
    record_length: usize,
) -> Vec<Option<usize>> {
    let last = record_length.saturating_sub(1) as isize;
    track
        .iter()
        .map(|g| g.map(|p| (p as isize).saturating_add(offset).clamp(0, last) as usize))
        .collect()
}

/// Closed outline of the gated region as `(sample, record)` vertices
///
/// Walks down the gate starts and back up the gate ends. Records without a
/// gate are skipped; ends are clamped to the record length.
pub fn gate_outline(
    starts: &[Option<usize>],
    gate_length: usize,
    record_length: usize,
) -> Vec<(usize, usize)> {
    let gated: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .filter_map(|(record, s)| s.map(|s| (s, record)))
        .collect();

    let ends = gated
        .iter()
        .rev()
        .map(|&(s, record)| (s.saturating_add(gate_length).min(record_length), record));

    gated.iter().copied().chain(ends).collect()
}

fn check_gate_length(gate_length: usize) -> CoreResult<()> {
    if gate_length == 0 {
        return Err(CoreError::InvalidLength {
            len: 0,
            reason: "gate length must be positive",
        });
    }
    Ok(())
}

fn check_track(starts: &[Option<usize>], layout: &RecordLayout) -> CoreResult<()> {
    if starts.len() != layout.records() {
        return Err(CoreError::InvalidParameter(format!(
            "gate track has {} entries for {} records",
            starts.len(),
            layout.records()
        )));
    }
    Ok(())
}

/// Cut a fixed-length gate out of every record
///
/// # Arguments
/// * `samples` - Flat waveform buffer
/// * `record_length` - Samples per record
/// * `starts` - Gate start per record (see [`gate_starts`])
/// * `gate_length` - Samples per gate; gates running past the record end are zero-filled
/// * `window` - Optional weighting applied over the gate
///
/// # Returns
/// `records × gate_length` matrix; records without a gate give a zero row
pub fn extract_gates<T: Float>(
    samples: &[T],
    record_length: usize,
    starts: &[Option<usize>],
    gate_length: usize,
    window: Option<&WindowSpec>,
) -> CoreResult<Array2<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    check_gate_length(gate_length)?;
    check_track(starts, &layout)?;

    let weights = window.map(|w| w.generate(gate_length, false));
    let mut gates = Array2::from_elem((layout.records(), gate_length), T::zero());

    for ((mut row, record), start) in gates
        .rows_mut()
        .into_iter()
        .zip(samples.chunks_exact(record_length))
        .zip(starts)
    {
        if let Some(start) = start {
            let segment = extract_segment(record, *start, gate_length, weights.as_deref());
            row.assign(&aview1(&segment));
        }
    }

    Ok(gates)
}

/// Full-length copy of the buffer with every sample outside its record's gate zeroed
pub fn gated_waveform<T: Float>(
    samples: &[T],
    record_length: usize,
    starts: &[Option<usize>],
    gate_length: usize,
) -> CoreResult<Vec<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    check_gate_length(gate_length)?;
    check_track(starts, &layout)?;

    let mut out = vec![T::zero(); samples.len()];
    for ((dst, src), start) in out
        .chunks_exact_mut(record_length)
        .zip(samples.chunks_exact(record_length))
        .zip(starts)
    {
        if let Some(start) = *start {
            let lo = start.min(record_length);
            let hi = start.saturating_add(gate_length).min(record_length);
            dst[lo..hi].copy_from_slice(&src[lo..hi]);
        }
    }

    Ok(out)
}
