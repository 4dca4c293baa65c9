use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use crate::engine::{Line, Status};

const BLINK_STEP: Duration = Duration::from_millis(200);
const BLINK_TOGGLES: u32 = 6;
const SHAKE_STEP: Duration = Duration::from_millis(50);
const SHAKE_OFFSETS: [f64; 4] = [-6.0, 6.0, -3.0, 0.0];
const WIN_ANNOUNCE: Duration = Duration::from_millis(1000);
const DRAW_ANNOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Highlight { cells: [usize; 3], lit: bool },
    Shake { cell: usize, offset: f64 },
    Announce(Status),
    Reset,
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    effect: Effect,
}

#[derive(Debug, Default)]
pub struct EffectQueue {
    clock: Duration,
    pending: VecDeque<Scheduled>,
}
impl EffectQueue {
    pub fn schedule(&mut self, delay: Duration, effect: Effect) {
        let due = self.clock + delay;
        // after every entry with the same due time, so equal times stay FIFO
        let at = self.pending.partition_point(|x| x.due <= due);
        self.pending.insert(at, Scheduled { due, effect });
    }
    pub fn extend(&mut self, timeline: impl IntoIterator<Item = (Duration, Effect)>) {
        for (delay, effect) in timeline {
            self.schedule(delay, effect);
        }
    }
    pub fn advance(&mut self, dt: Duration) -> Vec<Effect> {
        self.clock += dt;
        let mut due = Vec::new();
        while self.pending.front().map_or(false, |x| x.due <= self.clock) {
            if let Some(x) = self.pending.pop_front() {
                due.push(x.effect);
            }
        }
        if self.pending.is_empty() {
            self.clock = Duration::ZERO;
        }
        due
    }
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            debug!(dropped = self.pending.len(), "pending effects cleared");
        }
        self.pending.clear();
        self.clock = Duration::ZERO;
    }
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Three blinks of the winning cells, ending unlit.
pub fn blink(line: Line) -> impl Iterator<Item = (Duration, Effect)> {
    let cells = line.cells();
    (0..BLINK_TOGGLES).map(move |i| (BLINK_STEP * i, Effect::Highlight { cells, lit: i % 2 == 0 }))
}

pub fn shake(cell: usize) -> impl Iterator<Item = (Duration, Effect)> {
    SHAKE_OFFSETS.into_iter()
        .zip(0u32..)
        .map(move |(offset, i)| (SHAKE_STEP * i, Effect::Shake { cell, offset }))
}

pub fn game_over(status: Status, pause: Duration) -> Vec<(Duration, Effect)> {
    let announce = match status {
        Status::InProgress => return Vec::new(),
        Status::Won { .. } => WIN_ANNOUNCE,
        Status::Draw => DRAW_ANNOUNCE,
    };
    let mut timeline = Vec::with_capacity(4 + BLINK_TOGGLES as usize);
    if let Status::Won { line, .. } = status {
        timeline.extend(blink(line));
    }
    timeline.push((announce, Effect::Announce(status)));
    timeline.push((announce + pause, Effect::Reset));
    timeline
}
