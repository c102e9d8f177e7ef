//! Batch operations over every record of a waveform buffer
//!
//! Each routine validates the buffer against its record length once, then
//! works record by record. A record that is numerically degenerate yields NaN
//! (or an empty list) in its slot and never aborts its siblings.

use ndarray::{Array2, ArrayView2, Axis};
use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::buffer::{PaddedRecords, RecordLayout};
use crate::error::{CoreError, CoreResult};
use crate::filters::moving;
use crate::filters::windows::WindowSpec;
use crate::spectrum::fft::to_db;
use crate::spectrum::hilbert::{fast_hilbert_transform_power_of2, EnvelopeConfig};
use crate::spectrum::{SpectrumAnalyzer, SpectrumConfig};
use crate::spline::{spline_zero_crossings, SmoothingSpline};
use crate::stats::{
    add_scalar, cast, mean, mean_and_variance, min_index, multiply_scalar, skewness, to_f64,
};

fn degenerate<T: Float>(record: usize, error: &CoreError) -> T {
    tracing::debug!(record, %error, "degenerate record");
    T::nan()
}

fn check_sampling_interval(dt: f64) -> CoreResult<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(CoreError::InvalidParameter(format!(
            "sampling interval must be positive and finite, got {}",
            dt
        )));
    }
    Ok(())
}

/// Replace every record by its envelope
///
/// Records are zero-padded to a power of two for the transform and
/// truncated back.
pub fn envelope_in_place<T: Float>(
    samples: &mut [T],
    record_length: usize,
    config: &EnvelopeConfig,
) -> CoreResult<()> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    let mut padded = PaddedRecords::from_buffer(samples, layout, T::zero())?;
    let rl = record_length;

    padded.for_each_row(|row| {
        if config.subtract_mean {
            let offset = mean(&row[..rl]);
            row[..rl].iter_mut().for_each(|x| *x = *x - offset);
        }
        let centered = row[..rl].to_vec();

        fast_hilbert_transform_power_of2(row, true)?;

        for (h, &x) in row[..rl].iter_mut().zip(&centered) {
            let magnitude = x.hypot(*h);
            *h = if config.log_scale {
                to_db(magnitude, T::one())
            } else {
                magnitude
            };
        }
        Ok(())
    })?;

    padded.write_back(samples)
}

/// Envelope of every record; the input is untouched
pub fn envelope<T: Float>(
    samples: &[T],
    record_length: usize,
    config: &EnvelopeConfig,
) -> CoreResult<Vec<T>> {
    let mut out = samples.to_vec();
    envelope_in_place(&mut out, record_length, config)?;
    Ok(out)
}

/// Variance of every record
///
/// # Errors
/// `InsufficientData` when `unbiased` and records hold fewer than two samples
pub fn variance_per_record<T: Float>(
    samples: &[T],
    record_length: usize,
    unbiased: bool,
) -> CoreResult<Vec<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    if unbiased {
        layout.require_record_length(2)?;
    }

    Ok(samples
        .chunks_exact(record_length)
        .enumerate()
        .map(|(i, record)| match mean_and_variance(record, unbiased) {
            Ok(mv) => mv.variance,
            Err(e) => degenerate(i, &e),
        })
        .collect())
}

/// Skewness of every record; constant records give NaN
pub fn skewness_per_record<T: Float>(
    samples: &[T],
    record_length: usize,
    sample: bool,
) -> CoreResult<Vec<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    layout.require_record_length(3)?;

    Ok(samples
        .chunks_exact(record_length)
        .enumerate()
        .map(|(i, record)| match skewness(record, sample) {
            Ok(s) => s,
            Err(e) => degenerate(i, &e),
        })
        .collect())
}

/// Sign changes in every record
pub fn zero_crossing_count_per_record<T: Float>(
    samples: &[T],
    record_length: usize,
) -> CoreResult<Vec<usize>> {
    RecordLayout::of(samples.len(), record_length)?;
    Ok(samples
        .chunks_exact(record_length)
        .map(moving::count_zero_crossings)
        .collect())
}

/// Sub-sample zero crossings of every record, in units of `dt` from the record start
///
/// Located as roots of a natural spline through the samples.
pub fn zero_crossing_positions<T: Float>(
    samples: &[T],
    record_length: usize,
    dt: f64,
) -> CoreResult<Vec<Vec<f64>>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    layout.require_record_length(2)?;
    check_sampling_interval(dt)?;

    Ok(samples
        .chunks_exact(record_length)
        .enumerate()
        .map(|(i, record)| {
            let widened: Vec<f64> = record.iter().map(|&v| to_f64(v)).collect();
            spline_zero_crossings(&widened, dt).unwrap_or_else(|e| {
                tracing::debug!(record = i, error = %e, "zero crossing search failed");
                Vec::new()
            })
        })
        .collect())
}

/// Frequency of the largest non-DC amplitude bin of every record
///
/// Records are zero-padded to the next power of two; the bin spacing is
/// `1 / (N·dt)`. `None` when the padded length has no bin above DC.
pub fn spectral_max_frequency<T: Float>(
    samples: &[T],
    record_length: usize,
    dt: f64,
    config: SpectrumConfig,
) -> CoreResult<Vec<Option<f64>>> {
    RecordLayout::of(samples.len(), record_length)?;
    check_sampling_interval(dt)?;

    let mut analyzer = SpectrumAnalyzer::new(record_length, config)?;
    samples
        .chunks_exact(record_length)
        .map(|record| analyzer.peak_frequency(record, dt))
        .collect()
}

/// Amplitude spectrum of every record as a `records × bins` matrix
///
/// `db` reports `20·log10` of the magnitude (reference 1.0).
pub fn amplitude_spectrum_per_record<T: Float>(
    samples: &[T],
    record_length: usize,
    config: SpectrumConfig,
    db: bool,
) -> CoreResult<Array2<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    let mut analyzer = SpectrumAnalyzer::new(record_length, config)?;
    let mut spectra = Array2::from_elem((layout.records(), analyzer.num_bins()), T::zero());

    for (mut row, record) in spectra
        .rows_mut()
        .into_iter()
        .zip(samples.chunks_exact(record_length))
    {
        let spectrum = if db {
            analyzer.analyze_db(record, T::one())?
        } else {
            analyzer.analyze(record)?
        };
        row.iter_mut().zip(spectrum).for_each(|(dst, v)| *dst = v);
    }

    Ok(spectra)
}

/// Index of the smallest sample of every record
pub fn min_index_per_record<T: Float>(
    samples: &[T],
    record_length: usize,
) -> CoreResult<Vec<Option<usize>>> {
    RecordLayout::of(samples.len(), record_length)?;
    Ok(samples.chunks_exact(record_length).map(min_index).collect())
}

/// Window-weighted centered moving average, record by record
///
/// Windows never reach across record boundaries.
pub fn moving_average_in_place<T: Float>(
    samples: &mut [T],
    record_length: usize,
    window: &WindowSpec,
    radius: usize,
) -> CoreResult<()> {
    RecordLayout::of(samples.len(), record_length)?;
    for record in samples.chunks_exact_mut(record_length) {
        let smoothed = moving::moving_average(record, window, radius);
        record.copy_from_slice(&smoothed);
    }
    Ok(())
}

/// Zero crossings inside a centered window at every sample; same shape as the input
pub fn moving_zero_crossing_count<T: Float>(
    samples: &[T],
    record_length: usize,
    radius: usize,
) -> CoreResult<Vec<usize>> {
    RecordLayout::of(samples.len(), record_length)?;
    Ok(samples
        .chunks_exact(record_length)
        .flat_map(|record| moving::moving_zero_crossing_count(record, radius))
        .collect())
}

/// Sample-wise mean over all records
pub fn mean_record<T: Float>(samples: &[T], record_length: usize) -> CoreResult<Vec<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    let view = ArrayView2::from_shape((layout.records(), record_length), samples).map_err(|_| {
        CoreError::ShapeMismatch {
            len: samples.len(),
            record_length,
        }
    })?;

    let count = cast::<T>(layout.records() as f64);
    Ok(view.sum_axis(Axis(0)).iter().map(|&s| s / count).collect())
}

/// Record subtracted from every record of a buffer
#[derive(Debug, Clone, Copy)]
pub enum Reference<'a, T> {
    /// Sample-wise mean over all records
    Mean,
    /// One record of the buffer itself
    Record(usize),
    /// Caller-supplied record
    Samples(&'a [T]),
}

/// Subtract a reference record from every record
pub fn subtract_from_waveform_in_place<T: Float>(
    samples: &mut [T],
    record_length: usize,
    reference: Reference<'_, T>,
) -> CoreResult<()> {
    let layout = RecordLayout::of(samples.len(), record_length)?;

    let reference = match reference {
        Reference::Mean => mean_record(samples, record_length)?,
        Reference::Record(index) => {
            if index >= layout.records() {
                return Err(CoreError::InvalidParameter(format!(
                    "reference record {} out of range for {} records",
                    index,
                    layout.records()
                )));
            }
            samples[layout.range(index)].to_vec()
        }
        Reference::Samples(values) => {
            if values.len() != record_length {
                return Err(CoreError::ShapeMismatch {
                    len: values.len(),
                    record_length,
                });
            }
            values.to_vec()
        }
    };

    for record in samples.chunks_exact_mut(record_length) {
        record.iter_mut().zip(&reference).for_each(|(x, &r)| *x = *x - r);
    }
    Ok(())
}

/// Sample-wise arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathOp {
    #[inline]
    pub fn apply<T: Float>(self, a: T, b: T) -> T {
        match self {
            MathOp::Add => a + b,
            MathOp::Subtract => a - b,
            MathOp::Multiply => a * b,
            MathOp::Divide => a / b,
        }
    }
}

/// Right-hand side of a waveform math operation
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, T> {
    /// Same value for every sample
    Scalar(T),
    /// Applied sample-wise to every record
    Record(&'a [T]),
}

/// `sample = sample ∘ operand` over the whole buffer
///
/// Division follows IEEE semantics: dividing by zero gives an infinity or NaN.
pub fn waveform_math_in_place<T: Float>(
    samples: &mut [T],
    record_length: usize,
    op: MathOp,
    operand: Operand<'_, T>,
) -> CoreResult<()> {
    RecordLayout::of(samples.len(), record_length)?;

    match operand {
        Operand::Scalar(v) => match op {
            MathOp::Add => add_scalar(samples, v),
            MathOp::Subtract => add_scalar(samples, -v),
            MathOp::Multiply => multiply_scalar(samples, v),
            MathOp::Divide => samples.iter_mut().for_each(|x| *x = *x / v),
        },
        Operand::Record(values) => {
            if values.len() != record_length {
                return Err(CoreError::ShapeMismatch {
                    len: values.len(),
                    record_length,
                });
            }
            for record in samples.chunks_exact_mut(record_length) {
                record.iter_mut().zip(values).for_each(|(x, &v)| *x = op.apply(*x, v));
            }
        }
    }
    Ok(())
}

/// Smoothing spline of every record evaluated at its own samples
///
/// Knots sit at the sample indices. `sigma` is the noise standard deviation
/// and `lambda` the smoothing factor (`0` reproduces the input). A record
/// whose fit degenerates comes back as NaN.
pub fn smooth_records<T: Float>(
    samples: &[T],
    record_length: usize,
    sigma: f64,
    lambda: f64,
) -> CoreResult<Vec<T>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    layout.require_record_length(2)?;

    let x: Vec<f64> = (0..record_length).map(|i| i as f64).collect();
    let mut out = Vec::with_capacity(samples.len());

    for (i, record) in samples.chunks_exact(record_length).enumerate() {
        let y: Vec<f64> = record.iter().map(|&v| to_f64(v)).collect();
        match SmoothingSpline::fit(&x, &y, sigma, lambda) {
            Ok(spline) => out.extend(x.iter().map(|&t| cast::<T>(spline.evaluate(t)))),
            Err(e @ CoreError::NumericDegenerate(_)) => {
                let nan: T = degenerate(i, &e);
                out.extend(std::iter::repeat(nan).take(record_length));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(out)
}
