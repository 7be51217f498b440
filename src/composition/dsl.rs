use crate::animation::runnable::Runnable;
use crate::animation::transition::Transition;
use crate::composition::node::{CompositeKind, CompositeNode, Node};
use crate::foundation::core::Fps;
use crate::foundation::error::EaserResult;
use crate::value::context::LengthContext;

/// One entry of a [`sequence`] or [`parallel`] declaration.
#[derive(Debug)]
pub enum Step {
    /// Declaration built into a [`Runnable`] by the composer.
    Transition(Transition),
    /// Already built node.
    Node(Node),
    /// Nested group of the opposite kind to its parent: a group inside a sequence runs in
    /// parallel, a group inside a parallel runs in sequence.
    Group(Vec<Step>),
}

impl From<Transition> for Step {
    fn from(t: Transition) -> Self {
        Self::Transition(t)
    }
}

impl From<Node> for Step {
    fn from(n: Node) -> Self {
        Self::Node(n)
    }
}

impl From<Runnable> for Step {
    fn from(r: Runnable) -> Self {
        Self::Node(r.into())
    }
}

impl From<CompositeNode> for Step {
    fn from(c: CompositeNode) -> Self {
        Self::Node(c.into())
    }
}

impl<S: Into<Step>> From<Vec<S>> for Step {
    fn from(steps: Vec<S>) -> Self {
        Self::Group(steps.into_iter().map(Into::into).collect())
    }
}

/// Builds trees from declarations, resolving relative units against one context.
#[derive(Clone, Copy, Default)]
pub struct Composer<'a> {
    fps: Fps,
    context: Option<&'a dyn LengthContext>,
}

impl std::fmt::Debug for Composer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("fps", &self.fps)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

impl<'a> Composer<'a> {
    /// Composer sampling frames at `fps`, without a length context.
    pub fn new(fps: Fps) -> Self {
        Self { fps, context: None }
    }

    /// Resolve relative units against `context`.
    pub fn with_context(mut self, context: &'a dyn LengthContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Frame rate used to sample transitions.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Build one declaration.
    pub fn runnable(&self, transition: &Transition) -> EaserResult<Runnable> {
        Runnable::new(transition, self.context, self.fps)
    }

    /// Build a sequence from `steps`.
    pub fn sequence<I>(&self, steps: I) -> EaserResult<CompositeNode>
    where
        I: IntoIterator,
        I::Item: Into<Step>,
    {
        self.composite(CompositeKind::Sequence, steps.into_iter().map(Into::into))
    }

    /// Build a parallel group from `steps`.
    pub fn parallel<I>(&self, steps: I) -> EaserResult<CompositeNode>
    where
        I: IntoIterator,
        I::Item: Into<Step>,
    {
        self.composite(CompositeKind::Parallel, steps.into_iter().map(Into::into))
    }

    fn composite(
        &self,
        kind: CompositeKind,
        steps: impl Iterator<Item = Step>,
    ) -> EaserResult<CompositeNode> {
        let children = steps
            .map(|step| self.node(kind, step))
            .collect::<EaserResult<Vec<_>>>()?;
        CompositeNode::new(kind, children)
    }

    fn node(&self, parent: CompositeKind, step: Step) -> EaserResult<Node> {
        Ok(match step {
            Step::Transition(t) => self.runnable(&t)?.into(),
            Step::Node(n) => n,
            Step::Group(steps) => {
                let kind = match parent {
                    CompositeKind::Sequence => CompositeKind::Parallel,
                    CompositeKind::Parallel => CompositeKind::Sequence,
                };
                self.composite(kind, steps.into_iter())?.into()
            }
        })
    }
}

/// Build a sequence at 60 fps without a length context.
///
/// ```
/// use easer::{Step, Transition, sequence};
///
/// let fade = Transition::new().from("#000").to("#fff").property("color").duration(500);
/// let grow = Transition::new().from(0).to(100).property("width").duration(1000);
/// let tree = sequence([Step::from(fade), Step::from(grow)]).unwrap();
/// assert_eq!(tree.duration_ms(), 1500);
/// ```
pub fn sequence<I>(steps: I) -> EaserResult<CompositeNode>
where
    I: IntoIterator,
    I::Item: Into<Step>,
{
    Composer::default().sequence(steps)
}

/// Build a parallel group at 60 fps without a length context.
pub fn parallel<I>(steps: I) -> EaserResult<CompositeNode>
where
    I: IntoIterator,
    I::Item: Into<Step>,
{
    Composer::default().parallel(steps)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
