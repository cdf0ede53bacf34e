// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progress reporting for long renders.
//!
//! A render reports once per finished column `x`, with the value
//! `x / width * 100`.  That is the share of columns finished *before*
//! this one, so a ten-column render reports 0, 10, ... 90 and never
//! reports 100.  Callers that want a closing 100 should send it
//! themselves once the render returns.

use std::sync::mpsc::{self, Receiver, Sender};

/// Receives percentages from a render.  Reporting is fire-and-forget:
/// nothing a reporter does can affect the field being rendered.
pub trait Progress {
    /// Called after a column is finished.
    fn report(&mut self, percent: f64);
}

impl<F> Progress for F
where
    F: FnMut(f64),
{
    fn report(&mut self, percent: f64) {
        self(percent)
    }
}

/// Discards every report.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _percent: f64) {}
}

/// Pushes every report onto a channel, so that some other thread (a
/// UI loop, say) can drain them at its own pace.
#[derive(Clone, Debug)]
pub struct ChannelProgress {
    sender: Sender<f64>,
}

impl Progress for ChannelProgress {
    fn report(&mut self, percent: f64) {
        // A hung-up receiver just means nobody is watching anymore.
        let _ = self.sender.send(percent);
    }
}

/// Creates a channel reporter and the receiving end it feeds.
pub fn channel() -> (ChannelProgress, Receiver<f64>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelProgress { sender }, receiver)
}

/// The percentage reported once column `x` of `width` is finished.
#[inline]
pub(crate) fn column_percent(x: usize, width: usize) -> f64 {
    (x as f64) / (width as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_reporters() {
        let mut seen = vec![];
        {
            let mut reporter = |p: f64| seen.push(p);
            reporter.report(12.5);
            reporter.report(25.0);
        }
        assert_eq!(seen, vec![12.5, 25.0]);
    }

    #[test]
    fn channel_reports_arrive_in_order() {
        let (mut reporter, receiver) = channel();
        reporter.report(0.0);
        reporter.report(50.0);
        drop(reporter);
        assert_eq!(receiver.iter().collect::<Vec<f64>>(), vec![0.0, 50.0]);
    }

    #[test]
    fn channel_reporter_survives_a_dropped_receiver() {
        let (mut reporter, receiver) = channel();
        drop(receiver);
        reporter.report(10.0);
    }

    #[test]
    fn column_percent_lags_by_one_column() {
        assert_eq!(column_percent(0, 4), 0.0);
        assert_eq!(column_percent(3, 4), 75.0);
    }
}
