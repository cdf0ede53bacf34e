// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progressive rendering.
//!
//! An animation of the set "filling in" is a sequence of fields with
//! the cap at 0, 1, 2, and so on.  Rendering each frame from scratch
//! repeats all the work of the frames before it.  The
//! IncrementalRenderer keeps every pixel's orbit (its current `z` and
//! how many iterations it has had) between frames and only pushes the
//! orbits that have not escaped yet.  The fields it hands back are
//! identical to `compute_partial` at the same cap.

use log::debug;
use num::Complex;

use crate::field::Field;
use crate::julia::{run_orbit, JuliaRenderer};
use crate::planes::{Pixel, PlaneMapper};

#[derive(Copy, Clone, Debug)]
struct Orbit {
    z: Complex<f64>,
    iteration: u32,
}

fn starting_orbits(plane: &PlaneMapper) -> Vec<Orbit> {
    let mut orbits = Vec::with_capacity(plane.pixel_count());
    for x in 0..plane.width() {
        for y in 0..plane.height() {
            orbits.push(Orbit {
                z: plane.pixel_to_point(&Pixel(x, y)),
                iteration: 0,
            });
        }
    }
    orbits
}

/// Carries every pixel's orbit from one cap to the next.
#[derive(Debug)]
pub struct IncrementalRenderer {
    renderer: JuliaRenderer,
    orbits: Vec<Orbit>,
    cap: u32,
}

impl IncrementalRenderer {
    /// Starts every orbit at its pixel's point with a cap of 0.
    pub fn new(renderer: JuliaRenderer) -> Self {
        let orbits = starting_orbits(renderer.plane());
        IncrementalRenderer {
            renderer,
            orbits,
            cap: 0,
        }
    }

    /// The cap of the most recent frame.
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Throws away all progress; the next frame starts from iteration 0.
    pub fn reset(&mut self) {
        self.orbits = starting_orbits(self.renderer.plane());
        self.cap = 0;
    }

    /// Runs every orbit that has not escaped up to `cap` and returns the
    /// field at that cap.  Asking for a lower cap than the last one
    /// starts over.
    pub fn advance_to(&mut self, cap: u32) -> Field {
        if cap < self.cap {
            debug!("cap lowered from {} to {}, restarting orbits", self.cap, cap);
            self.reset();
        }

        let c = self.renderer.constant();
        for orbit in self.orbits.iter_mut() {
            run_orbit(&mut orbit.z, &mut orbit.iteration, c, cap);
        }
        self.cap = cap;

        let plane = self.renderer.plane();
        Field::from_counts(
            plane.width(),
            plane.height(),
            self.orbits.iter().map(|orbit| orbit.iteration).collect(),
        )
    }

    /// The animation frames for caps `0..count`, in order.
    pub fn frames(mut self, count: u32) -> Frames {
        self.reset();
        Frames {
            renderer: self,
            next: 0,
            count,
        }
    }
}

/// Iterator over animation frames.  See `IncrementalRenderer::frames`.
#[derive(Debug)]
pub struct Frames {
    renderer: IncrementalRenderer,
    next: u32,
    count: u32,
}

impl Iterator for Frames {
    type Item = Field;

    fn next(&mut self) -> Option<Field> {
        if self.next >= self.count {
            return None;
        }
        let frame = self.renderer.advance_to(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames {}
