// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a raster of pixels with an origin at 0,0, and a rectangle
//! on the complex plane given by its left-lower and right-upper
//! corners.  Both corners are inclusive: pixel 0 lands on the left
//! (or lower) edge and pixel `width - 1` (or `height - 1`) lands on
//! the right (or upper) edge.
use num::Complex;

use crate::errors::JuliaError;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

impl ComplexPlane {
    /// Stretches the real axis by the raster's aspect ratio
    /// (`width / height`) so that non-square rasters are not
    /// distorted.  Both real bounds are multiplied by the ratio; the
    /// imaginary bounds are left alone.
    pub fn fit_aspect(&self, width: usize, height: usize) -> ComplexPlane {
        let ratio = (width as f64) / (height as f64);
        ComplexPlane(
            Complex::new(self.0.re * ratio, self.0.im),
            Complex::new(self.1.re * ratio, self.1.im),
        )
    }
}

/// Describes the x, y of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of an integral plane onto points of a complex plane.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The size of the raster.
    pub integral_plane: IntegralPlane,
    /// The two corners of the complex plane, left-lower and
    /// right-upper.
    pub complex_plane: ComplexPlane,
}

impl PlaneMapper {
    /// Constructor.  Rejects rasters narrower or shorter than two
    /// pixels, and corner pairs that are the wrong way around.  A
    /// zero-width or zero-height region of the complex plane is fine;
    /// every pixel along that axis maps to the same value.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper, JuliaError> {
        if width < 2 || height < 2 {
            return Err(JuliaError::DegenerateRaster { width, height });
        }

        if rightupper.re < leftlower.re || rightupper.im < leftlower.im {
            return Err(JuliaError::InvertedPlane);
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
        })
    }

    /// Same as `new`, but with the bounds spelled out one axis at a
    /// time.
    pub fn from_bounds(
        width: usize,
        height: usize,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<PlaneMapper, JuliaError> {
        PlaneMapper::new(
            width,
            height,
            Complex::new(x_min, y_min),
            Complex::new(x_max, y_max),
        )
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of pixels in the raster.  Used to calculate
    /// memory needs.
    pub fn pixel_count(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Given a pixel on the raster, return the point on the complex
    /// plane it stands for.  The arithmetic is kept in this exact
    /// order; callers compare fields bit for bit.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let (leftlower, rightupper) = (self.complex_plane.0, self.complex_plane.1);
        Complex::new(
            (pixel.0 as f64) * (rightupper.re - leftlower.re) / ((self.integral_plane.0 - 1) as f64)
                + leftlower.re,
            (pixel.1 as f64) * (rightupper.im - leftlower.im) / ((self.integral_plane.1 - 1) as f64)
                + leftlower.im,
        )
    }
}
