use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::foundation::error::{EaserError, EaserResult};

/// Identifier of one playback started by a [`Runtime`](crate::Runtime).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaybackId(pub u64);

/// Child indices from a tree root down to one leaf.
pub type NodePath = SmallVec<[u16; 8]>;

/// One scheduled unit of work: advance the leaf at `path` in `playback` by one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Owning playback.
    pub playback: PlaybackId,
    /// Leaf position inside the playback's tree.
    pub path: NodePath,
}

/// Token returned by [`TickSource::schedule`], used to cancel a pending tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(pub u64);

/// Periodic clock primitive driving playback.
///
/// Ticks due at the same instant are delivered in the order they were scheduled.
pub trait TickSource {
    /// Current time in milliseconds since the clock started.
    fn now_ms(&self) -> f64;
    /// Schedule `tick` to fire `delay_ms` from now.
    fn schedule(&mut self, tick: Tick, delay_ms: f64) -> EaserResult<CancelToken>;
    /// Drop a pending tick. Unknown or already fired tokens are ignored.
    fn cancel(&mut self, token: CancelToken);
    /// Due time of the next pending tick.
    fn next_due_ms(&self) -> Option<f64>;
    /// Move time forward to the next pending tick and hand it out.
    fn pop_due(&mut self) -> Option<Tick>;
    /// Move time forward to `now_ms` without delivering anything.
    fn advance_to(&mut self, now_ms: f64);
    /// Number of pending ticks.
    fn pending(&self) -> usize;
}

/// Scheduling handle passed down a tree while one playback is started or ticked.
pub(crate) struct Scheduling<'a> {
    pub(crate) clock: &'a mut dyn TickSource,
    pub(crate) playback: PlaybackId,
}

impl Scheduling<'_> {
    pub(crate) fn schedule(&mut self, path: &[u16], delay_ms: f64) -> EaserResult<CancelToken> {
        let tick = Tick {
            playback: self.playback,
            path: NodePath::from_slice(path),
        };
        self.clock.schedule(tick, delay_ms)
    }

    pub(crate) fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }
}

fn ms_to_us(ms: f64) -> u64 {
    (ms * 1000.0).round().max(0.0) as u64
}

fn us_to_ms(us: u64) -> f64 {
    us as f64 / 1000.0
}

/// Pending ticks ordered by `(due, schedule sequence)`.
#[derive(Debug, Default)]
struct TimerQueue {
    entries: BTreeMap<(u64, u64), Tick>,
    due_by_seq: HashMap<u64, u64>,
    next_seq: u64,
}

impl TimerQueue {
    fn push(&mut self, due_us: u64, tick: Tick) -> CancelToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due_us, seq), tick);
        self.due_by_seq.insert(seq, due_us);
        CancelToken(seq)
    }

    fn cancel(&mut self, token: CancelToken) {
        if let Some(due) = self.due_by_seq.remove(&token.0) {
            self.entries.remove(&(due, token.0));
        }
    }

    fn next_due_us(&self) -> Option<u64> {
        self.entries.keys().next().map(|&(due, _)| due)
    }

    fn pop(&mut self) -> Option<(u64, Tick)> {
        let ((due, seq), tick) = self.entries.pop_first()?;
        self.due_by_seq.remove(&seq);
        Some((due, tick))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn validate_delay(delay_ms: f64) -> EaserResult<()> {
    if delay_ms.is_finite() && delay_ms >= 0.0 {
        Ok(())
    } else {
        Err(EaserError::clock(format!(
            "tick delay must be finite and >= 0, got {delay_ms}"
        )))
    }
}

/// Virtual-time clock: time only moves when ticks are popped or [`advance_to`] is called.
///
/// [`advance_to`]: TickSource::advance_to
#[derive(Debug, Default)]
pub struct ManualClock {
    queue: TimerQueue,
    now_us: u64,
}

impl ManualClock {
    /// Clock starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for ManualClock {
    fn now_ms(&self) -> f64 {
        us_to_ms(self.now_us)
    }

    fn schedule(&mut self, tick: Tick, delay_ms: f64) -> EaserResult<CancelToken> {
        validate_delay(delay_ms)?;
        let due = self.now_us.saturating_add(ms_to_us(delay_ms));
        Ok(self.queue.push(due, tick))
    }

    fn cancel(&mut self, token: CancelToken) {
        self.queue.cancel(token);
    }

    fn next_due_ms(&self) -> Option<f64> {
        self.queue.next_due_us().map(us_to_ms)
    }

    fn pop_due(&mut self) -> Option<Tick> {
        let (due, tick) = self.queue.pop()?;
        self.now_us = self.now_us.max(due);
        Some(tick)
    }

    fn advance_to(&mut self, now_ms: f64) {
        self.now_us = self.now_us.max(ms_to_us(now_ms));
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Wall-clock tick source: [`pop_due`](TickSource::pop_due) sleeps the calling thread until the
/// next tick is due.
#[derive(Debug)]
pub struct SystemClock {
    queue: TimerQueue,
    origin: Instant,
}

impl SystemClock {
    /// Clock whose zero is the moment of construction.
    pub fn new() -> Self {
        Self {
            queue: TimerQueue::default(),
            origin: Instant::now(),
        }
    }

    fn now_us(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    fn sleep_until_us(&self, due_us: u64) {
        let now = self.now_us();
        if due_us > now {
            std::thread::sleep(Duration::from_micros(due_us - now));
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn now_ms(&self) -> f64 {
        us_to_ms(self.now_us())
    }

    fn schedule(&mut self, tick: Tick, delay_ms: f64) -> EaserResult<CancelToken> {
        validate_delay(delay_ms)?;
        let due = self.now_us().saturating_add(ms_to_us(delay_ms));
        Ok(self.queue.push(due, tick))
    }

    fn cancel(&mut self, token: CancelToken) {
        self.queue.cancel(token);
    }

    fn next_due_ms(&self) -> Option<f64> {
        self.queue.next_due_us().map(us_to_ms)
    }

    fn pop_due(&mut self) -> Option<Tick> {
        let (due, tick) = self.queue.pop()?;
        self.sleep_until_us(due);
        Some(tick)
    }

    fn advance_to(&mut self, now_ms: f64) {
        self.sleep_until_us(ms_to_us(now_ms));
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
