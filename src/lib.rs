//! Easer is a declarative animation composition engine.
//!
//! Describe property transitions, group them into sequences and parallels, and play the
//! resulting tree against a [`Sink`]:
//!
//! - Declare a [`Transition`] (builder or JSON)
//! - Compose trees with [`sequence`] / [`parallel`] or a [`Composer`]
//! - Play them on a [`Runtime`] driven by a [`ManualClock`] or [`SystemClock`]
//!
//! ```
//! use easer::{RecordingSink, Runtime, Transition, sequence};
//!
//! let mut rt = Runtime::manual();
//! rt.attach(RecordingSink::new());
//!
//! let tree = sequence([
//!     Transition::new().from("#000").to("#fff").property("color").duration(500),
//!     Transition::new().from(0).to(100).property("width").duration(1000),
//! ])
//! .unwrap();
//! let handle = rt.play(tree).unwrap();
//!
//! assert!(handle.is_complete());
//! let sink = rt.sink().unwrap();
//! assert_eq!(sink.last_for("width").unwrap().to_string(), "100px");
//! assert_eq!(sink.last_for("color").unwrap().to_string(), "rgba(255,255,255,1)");
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Transitions, easing and runnables.
pub mod animation;
/// Sequence/parallel trees.
pub mod composition;
/// Value sinks.
pub mod encode;
/// Clocks and the playback runtime.
pub mod session;
/// Value parsing, units and colors.
pub mod value;

pub use crate::foundation::core::{Fps, Millis};
pub use crate::foundation::error::{EaserError, EaserResult};

pub use crate::animation::ease::{Ease, ease};
pub use crate::animation::frame::Frame;
pub use crate::animation::runnable::{NodeState, Progress, Runnable};
pub use crate::animation::transition::Transition;
pub use crate::composition::dsl::{Composer, Step, parallel, sequence};
pub use crate::composition::node::{CompositeKind, CompositeNode, Node};
pub use crate::encode::sink::{Applied, RecordingSink, RenderedValue, Sink};
pub use crate::session::clock::{
    CancelToken, ManualClock, NodePath, PlaybackId, SystemClock, Tick, TickSource,
};
pub use crate::session::runtime::{Handle, PlaybackState, Runtime, RuntimeOpts};
pub use crate::value::color::Color;
pub use crate::value::context::{LengthContext, ParentMetrics, StaticLengthContext, TargetRef};
pub use crate::value::parse::{Endpoints, Mode, RawValue, Value, ValueConverter, parse};
pub use crate::value::unit::Unit;
