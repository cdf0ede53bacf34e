// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set escape-time renderer
//!
//! For a fixed complex constant `c`, every pixel of the raster is
//! mapped to a starting point `z` on the complex plane, and `z` is
//! repeatedly replaced by `z * z + c`.  The number of times that
//! happens before `|z|` reaches the escape radius (or before the
//! iteration cap is hit) is the pixel's value in the field.
//!
//! Pixels never look at each other, so the same field comes out of
//! the single-threaded and the threaded renderers, whatever order the
//! threads pick columns up in.

use log::{debug, trace};
use num::Complex;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use crate::errors::JuliaError;
use crate::field::Field;
use crate::planes::{Pixel, PlaneMapper};
use crate::progress::{column_percent, NoProgress, Progress};

/// An orbit has escaped once `|z|` is no longer below this.
pub const ESCAPE_RADIUS: f64 = 4.0;

// |z| < 4 compared without the square root.
const ESCAPE_NORM_SQR: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

type ColumnQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, u32>>>>;

/// Iterates `z` forward until it escapes or `iteration` reaches `cap`,
/// whichever comes first.  Picking up a stopped orbit and running it
/// to a higher cap gives the same result as running it from the start.
#[inline]
pub(crate) fn run_orbit(z: &mut Complex<f64>, iteration: &mut u32, c: Complex<f64>, cap: u32) {
    while *iteration < cap && z.norm_sqr() < ESCAPE_NORM_SQR {
        *z = *z * *z + c;
        *iteration += 1;
    }
}

/// The escape time of a single starting point: how many iterations of
/// `z * z + c` it takes for `|z|` to reach the escape radius, or `cap`
/// if it never does within `cap` iterations.  An overflowing orbit
/// turns into NaN, which fails the radius test and counts as escaped.
pub fn escape_time(start: Complex<f64>, c: Complex<f64>, cap: u32) -> u32 {
    let mut z = start;
    let mut iteration = 0;
    run_orbit(&mut z, &mut iteration, c, cap);
    iteration
}

/// A Julia set for one constant `c` over one raster.  Once set, the
/// parameters do not change; every render recomputes the whole field
/// from iteration 0.
#[derive(Clone, Debug)]
pub struct JuliaRenderer {
    plane: PlaneMapper,
    c: Complex<f64>,
}

impl JuliaRenderer {
    /// Requires the width and height of the raster, the left-lower and
    /// right-upper corners of the complex plane it covers, and the
    /// Julia constant.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        c: Complex<f64>,
    ) -> Result<Self, JuliaError> {
        let plane = PlaneMapper::new(width, height, leftlower, rightupper)?;
        Ok(JuliaRenderer { plane, c })
    }

    /// Builds a renderer over an already validated plane.
    pub fn with_plane(plane: PlaneMapper, c: Complex<f64>) -> Self {
        JuliaRenderer { plane, c }
    }

    /// The raster and complex plane this renderer covers.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The Julia constant.
    pub fn constant(&self) -> Complex<f64> {
        self.c
    }

    fn render_column(&self, x: usize, column: &mut [u32], limit: u32) {
        for (y, count) in column.iter_mut().enumerate() {
            let start = self.plane.pixel_to_point(&Pixel(x, y));
            *count = escape_time(start, self.c, limit);
        }
    }

    /// Single-threaded render of the whole field, capped at `limit`
    /// iterations.
    pub fn render(&self, limit: u32) -> Field {
        self.render_with_progress(limit, &mut NoProgress)
    }

    /// Single-threaded render that reports after every column.  Reports
    /// arrive in increasing order; see the `progress` module for the
    /// values.
    pub fn render_with_progress<P>(&self, limit: u32, progress: &mut P) -> Field
    where
        P: Progress + ?Sized,
    {
        let width = self.plane.width();
        debug!(
            "rendering {}x{} julia field for c = {} at cap {}",
            width,
            self.plane.height(),
            self.c,
            limit
        );
        let mut field = Field::zeroed(width, self.plane.height());
        for (x, column) in field.columns_mut().enumerate() {
            self.render_column(x, column, limit);
            progress.report(column_percent(x, width));
        }
        field
    }

    /// Multi-threaded render.  Produces exactly the same field as
    /// `render`.
    pub fn render_threaded(&self, limit: u32, threads: usize) -> Result<Field, JuliaError> {
        self.render_threaded_with_progress(limit, threads, &mut NoProgress)
    }

    /// Multi-threaded render that reports after every column.  Calls to
    /// the reporter are serialized, but columns finish in whatever
    /// order the threads get to them, so the reported values are not
    /// necessarily increasing.
    pub fn render_threaded_with_progress<P>(
        &self,
        limit: u32,
        threads: usize,
        progress: &mut P,
    ) -> Result<Field, JuliaError>
    where
        P: Progress + Send + ?Sized,
    {
        if threads == 0 {
            return Err(JuliaError::NoThreads);
        }

        let width = self.plane.width();
        debug!(
            "rendering {}x{} julia field for c = {} at cap {} on {} threads",
            width,
            self.plane.height(),
            self.c,
            limit,
            threads
        );

        let mut field = Field::zeroed(width, self.plane.height());
        {
            let columns: ColumnQueue = Arc::new(Mutex::new(field.columns_mut().enumerate()));
            let progress = Arc::new(Mutex::new(progress));
            crossbeam::scope(|spawner| {
                for worker in 0..threads {
                    let columns = columns.clone();
                    let progress = progress.clone();
                    spawner.spawn(move |_| loop {
                        // A poisoned queue means another worker died; the
                        // scope reports that, so this one just stops.
                        let column = match columns.lock() {
                            Ok(mut columns) => columns.next(),
                            Err(_) => None,
                        };
                        match column {
                            Some((x, column)) => {
                                self.render_column(x, column, limit);
                                if let Ok(mut progress) = progress.lock() {
                                    progress.report(column_percent(x, width));
                                }
                            }
                            None => {
                                trace!("render worker {} out of columns", worker);
                                break;
                            }
                        }
                    });
                }
            })
            .map_err(|_| JuliaError::WorkerPanicked)?;
        }
        Ok(field)
    }
}

/// Computes the escape-time field of the Julia set for `c` over the
/// given raster and plane bounds, capped at `max_iter` iterations.
///
/// Fails when the raster is narrower or shorter than two pixels, or
/// when a bound pair is the wrong way around.
#[allow(clippy::too_many_arguments)]
pub fn compute(
    width: usize,
    height: usize,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    c: Complex<f64>,
    max_iter: u32,
) -> Result<Field, JuliaError> {
    compute_with_progress(
        width,
        height,
        x_min,
        x_max,
        y_min,
        y_max,
        c,
        max_iter,
        &mut NoProgress,
    )
}

/// `compute`, reporting to `progress` after every column `x` with the
/// percentage `x / width * 100`.
#[allow(clippy::too_many_arguments)]
pub fn compute_with_progress<P>(
    width: usize,
    height: usize,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    c: Complex<f64>,
    max_iter: u32,
    progress: &mut P,
) -> Result<Field, JuliaError>
where
    P: Progress + ?Sized,
{
    let plane = PlaneMapper::from_bounds(width, height, x_min, x_max, y_min, y_max)?;
    Ok(JuliaRenderer::with_plane(plane, c).render_with_progress(max_iter, progress))
}

/// The field as it looks with the cap at `current_iter`: one frame of
/// the animation that shows the set filling in as the cap grows.  Each
/// call starts every pixel over from iteration 0; see
/// `IncrementalRenderer` for a version that carries orbits between
/// frames.
#[allow(clippy::too_many_arguments)]
pub fn compute_partial(
    width: usize,
    height: usize,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    c: Complex<f64>,
    current_iter: u32,
) -> Result<Field, JuliaError> {
    let plane = PlaneMapper::from_bounds(width, height, x_min, x_max, y_min, y_max)?;
    Ok(JuliaRenderer::with_plane(plane, c).render(current_iter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_trace(start: Complex<f64>, c: Complex<f64>, cap: u32) -> u32 {
        let mut z = start;
        for i in 0..cap {
            if z.norm() >= ESCAPE_RADIUS {
                return i;
            }
            z = z * z + c;
        }
        cap
    }

    #[test]
    fn origin_never_escapes_without_a_constant() {
        let zero = Complex::new(0.0, 0.0);
        for &cap in &[0, 1, 10, 1000] {
            assert_eq!(escape_time(zero, zero, cap), cap);
        }
    }

    #[test]
    fn large_constant_escapes_after_one_step() {
        assert_eq!(
            escape_time(Complex::new(0.0, 0.0), Complex::new(5.0, 0.0), 100),
            1
        );
    }

    #[test]
    fn starting_outside_the_radius_is_zero() {
        assert_eq!(
            escape_time(Complex::new(4.0, 0.0), Complex::new(0.0, 0.0), 100),
            0
        );
    }

    #[test]
    fn zero_cap_is_always_zero() {
        assert_eq!(
            escape_time(Complex::new(0.1, 0.1), Complex::new(-0.7, 0.27015), 0),
            0
        );
    }

    #[test]
    fn corners_match_a_hand_trace() {
        // (1 + i)^2 = 2i, (2i)^2 = -4, so |z| crosses 4 on the second step.
        let corner = Complex::new(1.0, 1.0);
        assert_eq!(escape_time(corner, Complex::new(0.0, 0.0), 10), 2);
        assert_eq!(
            escape_time(corner, Complex::new(0.0, 0.0), 10),
            reference_trace(corner, Complex::new(0.0, 0.0), 10)
        );
    }

    #[test]
    fn overflow_counts_as_escaped() {
        let huge = Complex::new(1e300, 1e300);
        assert_eq!(escape_time(huge, Complex::new(0.0, 0.0), 10), 0);
        assert_eq!(
            escape_time(Complex::new(0.0, 0.0), Complex::new(std::f64::NAN, 0.0), 10),
            1
        );
    }

    #[test]
    fn kernel_agrees_with_reference_trace() {
        let c = Complex::new(-0.7, 0.27015);
        let renderer = JuliaRenderer::new(
            17,
            13,
            Complex::new(-1.5, -1.5),
            Complex::new(1.5, 1.5),
            c,
        )
        .unwrap();
        let field = renderer.render(64);
        for (pixel, count) in field.iter() {
            let start = renderer.plane().pixel_to_point(&pixel);
            assert_eq!(count, reference_trace(start, c, 64));
        }
    }

    #[test]
    fn threaded_render_matches_sequential() {
        let renderer = JuliaRenderer::new(
            31,
            23,
            Complex::new(-1.5, -1.2),
            Complex::new(1.5, 1.2),
            Complex::new(0.285, 0.01),
        )
        .unwrap();
        let single = renderer.render(100);
        for threads in 1..5 {
            assert_eq!(renderer.render_threaded(100, threads).unwrap(), single);
        }
    }

    #[test]
    fn threaded_render_needs_a_thread() {
        let renderer = JuliaRenderer::new(
            4,
            4,
            Complex::new(-1.0, -1.0),
            Complex::new(1.0, 1.0),
            Complex::new(0.0, 0.0),
        )
        .unwrap();
        assert_eq!(renderer.render_threaded(10, 0), Err(JuliaError::NoThreads));
    }

    #[test]
    fn threaded_progress_covers_every_column_once() {
        let renderer = JuliaRenderer::new(
            8,
            4,
            Complex::new(-1.0, -1.0),
            Complex::new(1.0, 1.0),
            Complex::new(-0.4, 0.6),
        )
        .unwrap();
        let mut seen = vec![];
        renderer
            .render_threaded_with_progress(20, 3, &mut |p: f64| seen.push(p))
            .unwrap();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..8).map(|x| column_percent(x, 8)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn compute_rejects_thin_rasters() {
        let zero = Complex::new(0.0, 0.0);
        assert_eq!(
            compute(1, 5, -1.0, 1.0, -1.0, 1.0, zero, 10),
            Err(JuliaError::DegenerateRaster {
                width: 1,
                height: 5
            })
        );
        assert!(compute_partial(5, 1, -1.0, 1.0, -1.0, 1.0, zero, 10).is_err());
    }
}
