// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every fallible operation in the crate.

use failure::Fail;

/// Everything that can go wrong while setting up or running a render.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum JuliaError {
    /// The pixel-to-point mapping divides by `dimension - 1`, so both
    /// dimensions of the raster must be at least two pixels.
    #[fail(
        display = "The raster must be at least 2x2 pixels, got {}x{}.",
        width, height
    )]
    DegenerateRaster {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The left lower corner of the complex plane lies to the right of,
    /// or above, the right upper corner.
    #[fail(display = "The left lower corner is not below and to the left of the right upper corner.")]
    InvertedPlane,

    /// A threaded render was asked to run on zero threads.
    #[fail(display = "At least one render thread is required.")]
    NoThreads,

    /// One of the render threads panicked before finishing its work.
    #[fail(display = "A render thread panicked.")]
    WorkerPanicked,
}
