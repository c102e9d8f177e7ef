//! Gate track smoothing and gap filling
//!
//! A gate track holds one optional position per record. Median filtering
//! removes isolated outliers; the fill stages give every record a position
//! when at least one record has a detection.

use ndarray::Array2;

use crate::error::{CoreError, CoreResult};
use crate::spline::SmoothingSpline;
use crate::stats::median_filter_ignoring;

const MISSING: f64 = -1.0;

/// Median-filter a gate track over `2 * radius + 1` records
///
/// Missing entries take no part in the median; a window without any
/// detection stays missing. Even-count medians are rounded to the nearest
/// index.
pub fn median_filter_gates(gates: &[Option<usize>], radius: usize) -> Vec<Option<usize>> {
    if radius == 0 {
        return gates.to_vec();
    }

    let values: Vec<f64> = gates
        .iter()
        .map(|g| g.map_or(MISSING, |p| p as f64))
        .collect();

    median_filter_ignoring(&values, radius, MISSING)
        .into_iter()
        .map(|v| if v < 0.0 { None } else { Some(v.round() as usize) })
        .collect()
}

/// Median-filter every `records_per_frame` slice of a track on its own
///
/// Windows never reach from the end of one frame into the start of the next.
pub fn median_filter_gates_by_frame(
    gates: &[Option<usize>],
    records_per_frame: usize,
    radius: usize,
) -> CoreResult<Vec<Option<usize>>> {
    check_frames(gates, records_per_frame)?;
    Ok(gates
        .chunks_exact(records_per_frame)
        .flat_map(|frame| median_filter_gates(frame, radius))
        .collect())
}

fn check_frames(gates: &[Option<usize>], records_per_frame: usize) -> CoreResult<()> {
    if records_per_frame == 0 {
        return Err(CoreError::InvalidLength {
            len: 0,
            reason: "records per frame must be positive",
        });
    }
    if gates.len() % records_per_frame != 0 {
        return Err(CoreError::ShapeMismatch {
            len: gates.len(),
            record_length: records_per_frame,
        });
    }
    Ok(())
}

/// Fill missing gates from a natural spline through the detected ones
///
/// The spline runs over `(record index, position)` pairs and extrapolates
/// past the first and last detection. Filled positions are rounded and
/// clamped to `[0, record_length - 1]`. One detection fills every record
/// with its position; none leaves the track unchanged.
pub fn spline_fill(
    gates: &[Option<usize>],
    record_length: usize,
) -> CoreResult<Vec<Option<usize>>> {
    if record_length == 0 {
        return Err(CoreError::InvalidLength {
            len: 0,
            reason: "record length must be positive",
        });
    }

    let (x, y): (Vec<f64>, Vec<f64>) = gates
        .iter()
        .enumerate()
        .filter_map(|(i, g)| g.map(|p| (i as f64, p as f64)))
        .unzip();

    match x.len() {
        0 => {
            tracing::warn!(
                records = gates.len(),
                "no gate detected in any record; gaps stay unfilled"
            );
            Ok(gates.to_vec())
        }
        1 => Ok(vec![Some(y[0] as usize); gates.len()]),
        _ => {
            let spline = SmoothingSpline::natural(&x, &y)?;
            let last = (record_length - 1) as f64;
            Ok(gates
                .iter()
                .enumerate()
                .map(|(i, g)| match g {
                    Some(p) => Some(*p),
                    None => Some(spline.evaluate(i as f64).round().clamp(0.0, last) as usize),
                })
                .collect())
        }
    }
}

/// Lattice offsets of a midpoint (Bresenham) circle, without duplicates
pub fn midpoint_circle(radius: usize) -> Vec<(isize, isize)> {
    if radius == 0 {
        return vec![(0, 0)];
    }

    let r = radius as isize;
    let (mut x, mut y, mut err) = (r, 0isize, 1 - r);
    let mut points = Vec::with_capacity(8 * radius + 8);

    while x >= y {
        points.extend_from_slice(&[
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ]);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }

    // Octant seams repeat points
    points.sort_unstable();
    points.dedup();
    points
}

/// Fill missing gates from the nearest detections on a `frames × records_per_frame` grid
///
/// For every missing cell, circles of growing radius are searched over the
/// original detections and the first circle with at least one hit supplies
/// the rounded average. The search stops at the grid diagonal; lattice
/// points that no midpoint circle visits are covered by a final
/// nearest-by-distance pass. Circles are built on first use and shared
/// between cells.
pub fn nearest_neighbor_fill_2d(
    gates: &[Option<usize>],
    records_per_frame: usize,
) -> CoreResult<Vec<Option<usize>>> {
    check_frames(gates, records_per_frame)?;
    if gates.iter().all(Option::is_none) {
        tracing::warn!(records = gates.len(), "no gate detected in any record; gaps stay unfilled");
        return Ok(gates.to_vec());
    }

    let frames = gates.len() / records_per_frame;
    let grid = Array2::from_shape_vec((frames, records_per_frame), gates.to_vec()).map_err(|_| {
        CoreError::ShapeMismatch {
            len: gates.len(),
            record_length: records_per_frame,
        }
    })?;

    let diagonal = (((frames - 1).pow(2) + (records_per_frame - 1).pow(2)) as f64).sqrt();
    let max_radius = (diagonal.ceil() as usize).max(1);
    let mut rings: Vec<Vec<(isize, isize)>> = Vec::new();

    let lookup = |row: isize, col: isize| -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        grid.get((row as usize, col as usize)).copied().flatten()
    };

    let mut filled = grid.clone();
    for ((row, col), cell) in filled.indexed_iter_mut() {
        if cell.is_some() {
            continue;
        }
        let (r, c) = (row as isize, col as isize);

        let mut found = None;
        for radius in 1..=max_radius {
            if rings.len() < radius {
                rings.push(midpoint_circle(radius));
            }
            let hits: Vec<usize> = rings[radius - 1]
                .iter()
                .filter_map(|&(dx, dy)| lookup(r + dy, c + dx))
                .collect();
            found = average(&hits);
            if found.is_some() {
                break;
            }
        }

        *cell = found.or_else(|| nearest_by_distance(&grid, row, col));
    }

    Ok(filled.iter().copied().collect())
}

fn average(hits: &[usize]) -> Option<usize> {
    if hits.is_empty() {
        return None;
    }
    let sum: f64 = hits.iter().map(|&h| h as f64).sum();
    Some((sum / hits.len() as f64).round() as usize)
}

fn nearest_by_distance(grid: &Array2<Option<usize>>, row: usize, col: usize) -> Option<usize> {
    let mut best = usize::MAX;
    let mut hits = Vec::new();
    for ((r, c), value) in grid.indexed_iter() {
        let Some(v) = *value else { continue };
        let d = r.abs_diff(row).pow(2) + c.abs_diff(col).pow(2);
        if d < best {
            best = d;
            hits.clear();
        }
        if d == best {
            hits.push(v);
        }
    }
    average(&hits)
}
