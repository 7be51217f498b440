use crate::animation::ease::Ease;
use crate::animation::frame::Frame;
use crate::animation::transition::Transition;
use crate::encode::sink::Sink;
use crate::foundation::core::{Fps, Millis};
use crate::foundation::error::{EaserError, EaserResult};
use crate::session::clock::{CancelToken, Scheduling, TickSource};
use crate::value::context::LengthContext;
use crate::value::parse::{Endpoints, Mode, RawValue, Value, ValueConverter};
use crate::value::unit::Unit;

/// Lifecycle of a playable node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    /// Never started, or reset.
    #[default]
    Idle,
    /// Ticks are scheduled or children are running.
    Running,
    /// Played to the end; the node is rewound and may be started again.
    Complete,
    /// Stopped by cancellation; needs [`reset`](crate::Node::reset) before reuse.
    Cancelled,
    /// A tick failed; needs [`reset`](crate::Node::reset) before reuse.
    Failed,
}

impl NodeState {
    /// `true` when the node may be started without a reset.
    pub fn is_startable(self) -> bool {
        matches!(self, Self::Idle | Self::Complete)
    }
}

/// Result of advancing a node by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// More ticks follow.
    Continue,
    /// The node reached its end.
    Complete,
}

/// Executable form of one [`Transition`]: resolved endpoints and a precomputed frame array.
#[derive(Debug)]
pub struct Runnable {
    property: String,
    from: Value,
    to: Value,
    endpoints: Endpoints,
    mode: Mode,
    unit: Unit,
    ease: Ease,
    duration_ms: Millis,
    delay_ms: Millis,
    frames: Vec<Frame>,
    end: Frame,
    cursor: usize,
    state: NodeState,
    origin_ms: f64,
    pending: Option<CancelToken>,
}

impl Runnable {
    /// Most frames one runnable may precompute: a little under 5 hours at 60 fps.
    pub const MAX_FRAMES: usize = 1 << 20;

    /// Resolve `transition` and sample its frames at `fps`.
    ///
    /// Fails when the property or end value is missing, a value does not parse, a relative unit
    /// cannot be resolved, or the endpoints are of different kinds. Delays and durations whose
    /// sum overflows, or that need more than [`MAX_FRAMES`](Self::MAX_FRAMES) frames, are
    /// rejected as config errors.
    #[tracing::instrument(level = "debug", skip(transition, context), fields(property = ?transition.property_name()))]
    pub fn new(
        transition: &Transition,
        context: Option<&dyn LengthContext>,
        fps: Fps,
    ) -> EaserResult<Self> {
        let property = transition
            .property_name()
            .ok_or_else(|| EaserError::config("transition has no property"))?;
        let to_raw = transition
            .to_value()
            .ok_or_else(|| EaserError::config(format!("transition of \"{property}\" has no end value")))?;
        let zero = RawValue::Number(0.0);
        let from_raw = transition.from_value().unwrap_or(&zero);

        let mode = transition.mode();
        let mut conv = ValueConverter::new(mode).with_property(&property);
        if let Some(ctx) = context {
            conv = conv.with_context(ctx);
        }
        if let Some(target) = transition.target_ref() {
            conv = conv.with_target(target);
        }

        let from = conv.parse(from_raw)?;
        let to = conv.parse(to_raw)?;
        let endpoints = conv.reconcile(&from, &to)?;

        let ease = transition.easing();
        let duration_ms = transition.duration_ms();
        let delay_ms = transition.delay_ms();
        if delay_ms.checked_add(duration_ms).is_none() {
            return Err(EaserError::config(format!(
                "delay {delay_ms}ms plus duration {duration_ms}ms of \"{property}\" overflows"
            )));
        }
        let frame_count = fps.frame_count(duration_ms);
        if frame_count > Self::MAX_FRAMES {
            return Err(EaserError::config(format!(
                "\"{property}\" needs {frame_count} frames, more than the {} allowed",
                Self::MAX_FRAMES
            )));
        }
        let duration = duration_ms as f64;
        let frames = (0..frame_count)
            .map(|i| {
                let t = i as f64 * duration / frame_count as f64;
                sample(&endpoints, mode, ease, t, duration)
            })
            .collect();

        let (end, unit) = match endpoints {
            Endpoints::Numeric { to, unit, .. } => (numeric_frame(mode, to), unit),
            Endpoints::Color { to, .. } => (Frame::Color(to.channels()), Unit::Px),
        };

        tracing::debug!(frame_count, duration_ms, ?unit, "built runnable");
        Ok(Self {
            property,
            from,
            to,
            endpoints,
            mode,
            unit,
            ease,
            duration_ms,
            delay_ms,
            frames,
            end,
            cursor: 0,
            state: NodeState::Idle,
            origin_ms: 0.0,
            pending: None,
        })
    }

    /// Property the frames are applied to.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Parsed start value.
    pub fn from(&self) -> &Value {
        &self.from
    }

    /// Parsed end value.
    pub fn to(&self) -> &Value {
        &self.to
    }

    /// Reconciled interpolation endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Application mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Unit lengths are rendered in.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Easing curve the frames were sampled with.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Timeline footprint: delay plus animation length.
    pub fn duration_ms(&self) -> Millis {
        self.delay_ms + self.duration_ms
    }

    /// Delay before the first frame.
    pub fn delay_ms(&self) -> Millis {
        self.delay_ms
    }

    /// Precomputed frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of precomputed frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame applied after the last sampled one: the exact end value.
    pub fn end_frame(&self) -> Frame {
        self.end
    }

    /// Index of the next frame to apply.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Spacing between ticks so the frames span the declared duration.
    pub fn tick_interval_ms(&self) -> f64 {
        if self.frames.is_empty() {
            0.0
        } else {
            self.duration_ms as f64 / self.frames.len() as f64
        }
    }

    /// Apply the frame under the cursor and advance.
    ///
    /// Once every frame has been applied, the next call applies the exact end value, rewinds
    /// the cursor and reports [`Progress::Complete`].
    pub fn play(&mut self, sink: &mut dyn Sink) -> EaserResult<Progress> {
        if self.state.is_startable() {
            self.state = NodeState::Running;
        }

        let (value, progress) = match self.frames.get(self.cursor) {
            Some(frame) => (frame.render(self.unit), Progress::Continue),
            None => (self.end.render_exact(self.unit), Progress::Complete),
        };
        tracing::trace!(property = %self.property, cursor = self.cursor, %value, "apply");
        if let Err(err) = sink.apply(&self.property, &value) {
            self.state = NodeState::Failed;
            return Err(err);
        }

        match progress {
            Progress::Continue => self.cursor += 1,
            Progress::Complete => {
                self.cursor = 0;
                self.state = NodeState::Complete;
            }
        }
        Ok(progress)
    }

    /// Rewind to the first frame and return to [`NodeState::Idle`].
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = NodeState::Idle;
        self.pending = None;
    }

    pub(crate) fn start(&mut self, sched: &mut Scheduling<'_>, path: &[u16]) -> EaserResult<()> {
        self.cursor = 0;
        self.state = NodeState::Running;
        self.origin_ms = sched.now_ms();
        self.pending = Some(sched.schedule(path, self.delay_ms as f64)?);
        Ok(())
    }

    pub(crate) fn on_tick(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &[u16],
        sink: &mut dyn Sink,
    ) -> EaserResult<Progress> {
        self.pending = None;
        if self.state != NodeState::Running {
            tracing::warn!(property = %self.property, state = ?self.state, "tick for idle runnable ignored");
            return Ok(Progress::Continue);
        }
        let progress = self.play(sink)?;
        if progress == Progress::Continue {
            // Due times are offsets from the start so rounding never accumulates.
            let due = self.origin_ms
                + self.delay_ms as f64
                + self.cursor as f64 * self.tick_interval_ms();
            let delay = (due - sched.now_ms()).max(0.0);
            self.pending = Some(sched.schedule(path, delay)?);
        }
        Ok(progress)
    }

    pub(crate) fn cancel(&mut self, clock: &mut dyn TickSource) {
        if let Some(token) = self.pending.take() {
            clock.cancel(token);
        }
        if self.state == NodeState::Running {
            self.state = NodeState::Cancelled;
        }
    }
}

fn numeric_frame(mode: Mode, v: f64) -> Frame {
    match mode {
        Mode::Style => Frame::Style(v),
        Mode::Value => Frame::Value(v),
    }
}

fn sample(endpoints: &Endpoints, mode: Mode, ease: Ease, t: f64, duration: f64) -> Frame {
    match *endpoints {
        Endpoints::Numeric { from, to, .. } => {
            numeric_frame(mode, ease.sample(t, from, to - from, duration))
        }
        Endpoints::Color { from, to } => {
            let a = from.channels();
            let b = to.channels();
            Frame::Color(std::array::from_fn(|i| {
                ease.sample(t, a[i], b[i] - a[i], duration)
            }))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/runnable.rs"]
mod tests;
