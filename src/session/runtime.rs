use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::animation::runnable::Progress;
use crate::composition::dsl::Composer;
use crate::composition::node::Node;
use crate::encode::sink::Sink;
use crate::foundation::core::Fps;
use crate::foundation::error::{EaserError, EaserResult};
use crate::session::clock::{ManualClock, PlaybackId, Scheduling, TickSource};
use crate::value::context::LengthContext;

/// Runtime configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOpts {
    /// Frame rate used by [`Runtime::composer`] to sample transitions.
    pub fps: Fps,
    /// Name attached to the runtime's log events.
    pub label: Option<String>,
}

impl Default for RuntimeOpts {
    fn default() -> Self {
        Self {
            fps: Fps::SIXTY,
            label: None,
        }
    }
}

impl RuntimeOpts {
    /// Parse and validate options from JSON.
    pub fn from_json_str(s: &str) -> EaserResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        Fps::new(opts.fps.num, opts.fps.den)?;
        Ok(opts)
    }
}

/// Outcome of one playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Ticks are still scheduled.
    Running,
    /// Every leaf applied its end value.
    Complete,
    /// Stopped by [`Runtime::cancel`].
    Cancelled,
    /// A tick failed; the error was returned from the call that delivered it.
    Failed,
}

/// Handle to a playback started with [`Runtime::run`].
///
/// Cloning shares the same state cell, so any clone observes completion.
#[derive(Clone, Debug)]
pub struct Handle {
    id: PlaybackId,
    state: Rc<Cell<PlaybackState>>,
}

impl Handle {
    /// Playback identifier.
    pub fn id(&self) -> PlaybackId {
        self.id
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state.get()
    }

    /// `true` once every leaf has completed.
    pub fn is_complete(&self) -> bool {
        self.state() == PlaybackState::Complete
    }

    /// `true` once no further ticks will be delivered.
    pub fn is_finished(&self) -> bool {
        self.state() != PlaybackState::Running
    }
}

#[derive(Debug)]
struct Playback {
    tree: Node,
    state: Rc<Cell<PlaybackState>>,
}

/// Drives animation trees against one attached [`Sink`].
///
/// Single-threaded and cooperative: nothing happens between calls to [`step`](Self::step),
/// [`advance_by`](Self::advance_by) or [`run_until_idle`](Self::run_until_idle), and each step
/// applies exactly one frame of one leaf.
#[derive(Debug)]
pub struct Runtime<S: Sink, C: TickSource = ManualClock> {
    opts: RuntimeOpts,
    clock: C,
    sink: Option<S>,
    playbacks: BTreeMap<PlaybackId, Playback>,
    next_id: u64,
}

impl<S: Sink> Runtime<S, ManualClock> {
    /// Runtime on a virtual clock starting at zero.
    pub fn manual() -> Self {
        Self::new(ManualClock::new())
    }
}

impl<S: Sink, C: TickSource> Runtime<S, C> {
    /// Runtime driven by `clock` with default options.
    pub fn new(clock: C) -> Self {
        Self::with_opts(clock, RuntimeOpts::default())
    }

    /// Runtime driven by `clock`.
    pub fn with_opts(clock: C, opts: RuntimeOpts) -> Self {
        Self {
            opts,
            clock,
            sink: None,
            playbacks: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Options this runtime was built with.
    pub fn opts(&self) -> &RuntimeOpts {
        &self.opts
    }

    /// Composer sampling at this runtime's frame rate.
    pub fn composer<'a>(&self, context: Option<&'a dyn LengthContext>) -> Composer<'a> {
        let composer = Composer::new(self.opts.fps);
        match context {
            Some(ctx) => composer.with_context(ctx),
            None => composer,
        }
    }

    /// Attach the target, returning the previously attached one.
    pub fn attach(&mut self, sink: S) -> Option<S> {
        self.sink.replace(sink)
    }

    /// Detach and return the target.
    pub fn detach(&mut self) -> Option<S> {
        self.sink.take()
    }

    /// Attached target.
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Attached target, mutably.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    /// Tick source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current clock time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Number of playbacks still running.
    pub fn active(&self) -> usize {
        self.playbacks
            .values()
            .filter(|p| p.state.get() == PlaybackState::Running)
            .count()
    }

    /// Start playing `tree` against the attached sink.
    ///
    /// The tree is owned by the runtime until [`take_tree`](Self::take_tree) hands it back, so
    /// the same instance can never be played twice at once.
    #[tracing::instrument(level = "debug", skip(self, tree), fields(label = ?self.opts.label))]
    pub fn run(&mut self, tree: impl Into<Node>) -> EaserResult<Handle> {
        let mut tree = tree.into();
        if self.sink.is_none() {
            return Err(EaserError::config("no sink attached"));
        }
        if !tree.state().is_startable() {
            return Err(EaserError::config(format!(
                "tree is {:?}; reset it before playing again",
                tree.state()
            )));
        }

        let id = PlaybackId(self.next_id);
        self.next_id += 1;

        let mut sched = Scheduling {
            clock: &mut self.clock,
            playback: id,
        };
        let mut path = SmallVec::new();
        let state = match tree.start(&mut sched, &mut path) {
            Ok(Progress::Continue) => PlaybackState::Running,
            Ok(Progress::Complete) => PlaybackState::Complete,
            Err(err) => {
                tree.cancel(&mut self.clock);
                return Err(err);
            }
        };
        tracing::debug!(
            playback = id.0,
            leaves = tree.leaf_count(),
            duration_ms = tree.duration_ms(),
            "playback started"
        );

        let state = Rc::new(Cell::new(state));
        self.playbacks.insert(
            id,
            Playback {
                tree,
                state: Rc::clone(&state),
            },
        );
        Ok(Handle { id, state })
    }

    /// Stop scheduling ticks for `handle`'s tree. A no-op unless the playback is running.
    #[tracing::instrument(level = "debug", skip(self, handle), fields(playback = handle.id.0))]
    pub fn cancel(&mut self, handle: &Handle) {
        let Some(playback) = self.playbacks.get_mut(&handle.id) else {
            return;
        };
        if playback.state.get() != PlaybackState::Running {
            return;
        }
        playback.tree.cancel(&mut self.clock);
        playback.state.set(PlaybackState::Cancelled);
        tracing::debug!("playback cancelled");
    }

    /// Hand back a finished playback's tree. Returns `None` while it is still running.
    pub fn take_tree(&mut self, handle: &Handle) -> Option<Node> {
        if self.playbacks.get(&handle.id)?.state.get() == PlaybackState::Running {
            return None;
        }
        self.playbacks.remove(&handle.id).map(|p| p.tree)
    }

    /// Deliver the next due tick. Returns `false` when nothing is scheduled.
    ///
    /// A failing tick marks its playback [`PlaybackState::Failed`], stops that playback's
    /// remaining ticks and returns the error; other playbacks are untouched.
    pub fn step(&mut self) -> EaserResult<bool> {
        let Self {
            clock,
            sink,
            playbacks,
            ..
        } = self;
        let Some(sink) = sink.as_mut() else {
            return Err(EaserError::config("no sink attached"));
        };
        let Some(tick) = clock.pop_due() else {
            return Ok(false);
        };
        let Some(playback) = playbacks.get_mut(&tick.playback) else {
            tracing::warn!(playback = tick.playback.0, "tick for unknown playback dropped");
            return Ok(true);
        };
        if playback.state.get() != PlaybackState::Running {
            return Ok(true);
        }

        let now_ms = clock.now_ms();
        tracing::trace!(playback = tick.playback.0, path = ?tick.path, now_ms, "tick");
        sink.on_tick(now_ms);
        let mut sched = Scheduling {
            clock: &mut *clock,
            playback: tick.playback,
        };
        match playback.tree.tick(&mut sched, &tick.path, 0, sink) {
            Ok(Progress::Continue) => {}
            Ok(Progress::Complete) => {
                playback.state.set(PlaybackState::Complete);
                tracing::debug!(playback = tick.playback.0, now_ms, "playback complete");
            }
            Err(err) => {
                playback.tree.cancel(&mut *clock);
                playback.state.set(PlaybackState::Failed);
                tracing::warn!(playback = tick.playback.0, error = %err, "tick failed");
                return Err(err);
            }
        }
        Ok(true)
    }

    /// Deliver every tick due within the next `ms` milliseconds, then move the clock there.
    pub fn advance_by(&mut self, ms: f64) -> EaserResult<()> {
        let until = self.clock.now_ms() + ms.max(0.0);
        while self.clock.next_due_ms().is_some_and(|due| due <= until) {
            self.step()?;
        }
        self.clock.advance_to(until);
        Ok(())
    }

    /// Deliver ticks until none are scheduled.
    pub fn run_until_idle(&mut self) -> EaserResult<()> {
        while self.step()? {}
        Ok(())
    }

    /// Run `tree` to completion and return its handle.
    pub fn play(&mut self, tree: impl Into<Node>) -> EaserResult<Handle> {
        let handle = self.run(tree)?;
        while !handle.is_finished() && self.step()? {}
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/runtime.rs"]
mod tests;
