#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set escape-time fields
//!
//! A Julia set is drawn by fixing a complex constant `c`, then taking
//! every point `z` of a region of the complex plane and repeatedly
//! replacing it with `z * z + c`.  Some points stay small forever;
//! those make up the set.  The rest fly off toward infinity, and how
//! many iterations that takes, the point's "escape time", is what
//! gives the picture its bands.
//!
//! This crate computes the escape-time field for a raster: one
//! iteration count per pixel, stored column-major.  Colouring and
//! saving the field are up to the caller; the bundled `julia` binary
//! does the simplest possible grayscale version.
//!
//! ```
//! use juliaset::compute;
//! use num::Complex;
//!
//! let field = compute(3, 3, -1.0, 1.0, -1.0, 1.0, Complex::new(0.0, 0.0), 10).unwrap();
//! assert_eq!(field.get(1, 1), Some(10));
//! ```

extern crate crossbeam;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;

pub mod errors;
pub mod field;
pub mod incremental;
pub mod julia;
pub mod planes;
pub mod progress;

pub use errors::JuliaError;
pub use field::Field;
pub use incremental::IncrementalRenderer;
pub use julia::{compute, compute_partial, compute_with_progress, escape_time, JuliaRenderer};
pub use planes::{ComplexPlane, Pixel, PlaneMapper};
pub use progress::Progress;
