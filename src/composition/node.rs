use smallvec::SmallVec;

use crate::animation::runnable::{NodeState, Progress, Runnable};
use crate::encode::sink::Sink;
use crate::foundation::core::Millis;
use crate::foundation::error::{EaserError, EaserResult};
use crate::session::clock::{Scheduling, TickSource};

/// How a [`CompositeNode`] runs its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeKind {
    /// One child after another; each starts when the previous one signals completion.
    Sequence,
    /// All children at once; complete when every child has completed.
    Parallel,
}

/// A node of an animation tree.
#[derive(Debug)]
pub enum Node {
    /// Leaf playing one transition.
    Runnable(Runnable),
    /// Sequence or parallel group.
    Composite(CompositeNode),
}

impl From<Runnable> for Node {
    fn from(r: Runnable) -> Self {
        Self::Runnable(r)
    }
}

impl From<CompositeNode> for Node {
    fn from(c: CompositeNode) -> Self {
        Self::Composite(c)
    }
}

impl Node {
    /// Derived duration: a leaf's delay plus length, a sequence's sum, a parallel's max.
    pub fn duration_ms(&self) -> Millis {
        match self {
            Self::Runnable(r) => r.duration_ms(),
            Self::Composite(c) => c.duration_ms(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NodeState {
        match self {
            Self::Runnable(r) => r.state(),
            Self::Composite(c) => c.state(),
        }
    }

    /// Return this subtree to [`NodeState::Idle`].
    ///
    /// Needed after cancellation or a failed tick; natural completion rewinds automatically.
    pub fn reset(&mut self) {
        match self {
            Self::Runnable(r) => r.reset(),
            Self::Composite(c) => c.reset(),
        }
    }

    /// Number of runnable leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Runnable(_) => 1,
            Self::Composite(c) => c.children.iter().map(Node::leaf_count).sum(),
        }
    }

    pub(crate) fn start(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &mut SmallVec<[u16; 8]>,
    ) -> EaserResult<Progress> {
        match self {
            Self::Runnable(r) => r.start(sched, path).map(|()| Progress::Continue),
            Self::Composite(c) => c.start(sched, path),
        }
    }

    /// Deliver a tick addressed to the leaf at `path[depth..]`.
    pub(crate) fn tick(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &[u16],
        depth: usize,
        sink: &mut dyn Sink,
    ) -> EaserResult<Progress> {
        match self {
            Self::Runnable(r) => r.on_tick(sched, path, sink),
            Self::Composite(c) => c.tick(sched, path, depth, sink),
        }
    }

    /// Stop every started descendant. Safe to call repeatedly.
    pub(crate) fn cancel(&mut self, clock: &mut dyn TickSource) {
        match self {
            Self::Runnable(r) => r.cancel(clock),
            Self::Composite(c) => c.cancel(clock),
        }
    }
}

/// Sequence or parallel group of nodes.
///
/// Built bottom-up; the duration is derived from the children at construction.
#[derive(Debug)]
pub struct CompositeNode {
    kind: CompositeKind,
    children: Vec<Node>,
    duration_ms: Millis,
    state: NodeState,
    // Sequence: index of the running child. Parallel: children still running.
    cursor: usize,
}

impl CompositeNode {
    /// Group `children` under `kind`.
    pub fn new(kind: CompositeKind, children: Vec<Node>) -> EaserResult<Self> {
        if children.len() > usize::from(u16::MAX) {
            return Err(EaserError::config(format!(
                "a composite holds at most {} children",
                u16::MAX
            )));
        }
        let mut durations = children.iter().map(Node::duration_ms);
        let duration_ms = match kind {
            CompositeKind::Sequence => durations
                .try_fold(0, Millis::checked_add)
                .ok_or_else(|| EaserError::config("sequence duration overflows"))?,
            CompositeKind::Parallel => durations.max().unwrap_or(0),
        };
        Ok(Self {
            kind,
            children,
            duration_ms,
            state: NodeState::Idle,
            cursor: 0,
        })
    }

    /// Sequence of `children`.
    pub fn sequence(children: Vec<Node>) -> EaserResult<Self> {
        Self::new(CompositeKind::Sequence, children)
    }

    /// Parallel group of `children`.
    pub fn parallel(children: Vec<Node>) -> EaserResult<Self> {
        Self::new(CompositeKind::Parallel, children)
    }

    /// Group kind.
    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Derived duration.
    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Return this subtree to [`NodeState::Idle`].
    pub fn reset(&mut self) {
        self.children.iter_mut().for_each(Node::reset);
        self.state = NodeState::Idle;
        self.cursor = 0;
    }

    fn start(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &mut SmallVec<[u16; 8]>,
    ) -> EaserResult<Progress> {
        self.state = NodeState::Running;
        let progress = match self.kind {
            CompositeKind::Sequence => self.start_from(0, sched, path),
            CompositeKind::Parallel => self.start_all(sched, path),
        };
        self.settle(progress)
    }

    fn tick(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &[u16],
        depth: usize,
        sink: &mut dyn Sink,
    ) -> EaserResult<Progress> {
        let Some(&idx) = path.get(depth) else {
            return Err(EaserError::config("tick path ends at a composite"));
        };
        let idx = usize::from(idx);
        if self.state != NodeState::Running {
            tracing::warn!(kind = ?self.kind, state = ?self.state, "tick for idle composite ignored");
            return Ok(Progress::Continue);
        }
        let Some(child) = self.children.get_mut(idx) else {
            return Err(EaserError::config(format!("tick path names missing child {idx}")));
        };

        let progress = match child.tick(sched, path, depth + 1, sink) {
            Ok(Progress::Complete) => match self.kind {
                CompositeKind::Sequence => {
                    // The finished child's last apply happened in this tick; the next child is
                    // only scheduled now.
                    let mut next: SmallVec<[u16; 8]> = SmallVec::from_slice(&path[..depth]);
                    self.start_from(idx + 1, sched, &mut next)
                }
                CompositeKind::Parallel => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Ok(if self.cursor == 0 {
                        Progress::Complete
                    } else {
                        Progress::Continue
                    })
                }
            },
            other => other,
        };
        self.settle(progress)
    }

    fn cancel(&mut self, clock: &mut dyn TickSource) {
        for child in &mut self.children {
            child.cancel(clock);
        }
        if self.state == NodeState::Running {
            self.state = NodeState::Cancelled;
        }
    }

    fn settle(&mut self, progress: EaserResult<Progress>) -> EaserResult<Progress> {
        match progress {
            Ok(Progress::Complete) => {
                self.state = NodeState::Complete;
                self.cursor = 0;
            }
            Ok(Progress::Continue) => {}
            Err(_) => self.state = NodeState::Failed,
        }
        progress
    }

    fn start_from(
        &mut self,
        first: usize,
        sched: &mut Scheduling<'_>,
        path: &mut SmallVec<[u16; 8]>,
    ) -> EaserResult<Progress> {
        for idx in first..self.children.len() {
            self.cursor = idx;
            path.push(idx as u16);
            let progress = self.children[idx].start(sched, path);
            path.pop();
            if progress? == Progress::Continue {
                return Ok(Progress::Continue);
            }
        }
        Ok(Progress::Complete)
    }

    fn start_all(
        &mut self,
        sched: &mut Scheduling<'_>,
        path: &mut SmallVec<[u16; 8]>,
    ) -> EaserResult<Progress> {
        self.cursor = 0;
        for (idx, child) in self.children.iter_mut().enumerate() {
            path.push(idx as u16);
            let progress = child.start(sched, path);
            path.pop();
            if progress? == Progress::Continue {
                self.cursor += 1;
            }
        }
        Ok(if self.cursor == 0 {
            Progress::Complete
        } else {
            Progress::Continue
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/node.rs"]
mod tests;
