//! Ordered rewrite stages and the pipeline that runs them.
//!
//! ## Evaluation order
//!
//! ```text
//! tree ─> envelope trim ─> stage 1 ─> stage 2 ─> ... ─> roles dedup ─> canonical tree
//! ```
//!
//! Each stage walks the whole tree once, bottom-up: array elements and object
//! values are rewritten before their parent is offered to the stage. For every
//! node the stage tries its mappings in declared order and the first one that
//! matches replaces the node. A replaced node is not offered to the stage
//! again; later stages see it.

use tracing::{debug, trace};

use crate::{
    dedup::roles_dedup,
    envelope::ResponseMetadata,
    error::{EnvelopeError, MappingError},
    mapping::Mapping,
    node::Node,
    op::Direction,
};

/// A named, ordered list of mappings applied once across a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    name: String,
    mappings: Vec<Mapping>,
}

impl Stage {
    pub fn new(name: impl Into<String>, mappings: Vec<Mapping>) -> Self {
        Stage {
            name: name.into(),
            mappings,
        }
    }

    /// Builds a stage from mapping constructor results, failing on the first
    /// rejected mapping.
    pub fn try_new<I>(name: impl Into<String>, mappings: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = Result<Mapping, MappingError>>,
    {
        let mappings = mappings.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Stage::new(name, mappings))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Offers a single node to the stage without visiting its children.
    pub fn rewrite(&self, node: Node, dir: Direction) -> Node {
        self.rewrite_counted(node, dir, &mut 0)
    }

    /// Rewrites the whole tree bottom-up.
    pub fn apply(&self, tree: Node, dir: Direction) -> Node {
        let mut rewritten = 0;
        let out = self.walk(tree, dir, &mut rewritten);
        debug!(stage = %self.name, %dir, rewritten, "stage applied");
        out
    }

    fn walk(&self, node: Node, dir: Direction, rewritten: &mut usize) -> Node {
        let node = match node {
            Node::Array(items) => Node::Array(
                items
                    .into_iter()
                    .map(|item| self.walk(item, dir, rewritten))
                    .collect(),
            ),
            Node::Object(fields) => Node::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, self.walk(value, dir, rewritten)))
                    .collect(),
            ),
            scalar => scalar,
        };
        self.rewrite_counted(node, dir, rewritten)
    }

    fn rewrite_counted(&self, node: Node, dir: Direction, rewritten: &mut usize) -> Node {
        let mut node = node;
        for (index, mapping) in self.mappings.iter().enumerate() {
            match mapping.rewrite(node, dir) {
                Ok(out) => {
                    trace!(stage = %self.name, mapping = index, "mapping matched");
                    *rewritten += 1;
                    return out;
                }
                Err(unmatched) => node = unmatched,
            }
        }
        node
    }
}

/// Envelope handling, ordered stages and the final roles dedup pass.
///
/// A pipeline is immutable once built and can be shared between threads; each
/// call works on the tree it is given and nothing else.
///
/// # Examples
///
/// ```
/// use uast_normalize::{annotate_type, Node, Pipeline, Role};
///
/// let pipeline = Pipeline::builder()
///     .stage("annotations", [annotate_type("internal-type", None, [Role::INCOMPLETE])])
///     .build()
///     .unwrap();
///
/// let tree = Node::object([("@type", Node::from("internal-type"))]);
/// let out = pipeline.normalize(tree).unwrap();
/// assert_eq!(out.roles(), vec![Role::INCOMPLETE]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    envelope: ResponseMetadata,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn envelope(&self) -> &ResponseMetadata {
        &self.envelope
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Native to canonical: trim the envelope, run every stage in order, then
    /// deduplicate roles.
    pub fn normalize(&self, tree: Node) -> Result<Node, EnvelopeError> {
        debug!(stages = self.stages.len(), "normalizing tree");
        let mut tree = self.envelope.trim(tree)?;
        for stage in &self.stages {
            tree = stage.apply(tree, Direction::Forward);
        }
        Ok(roles_dedup(tree))
    }

    /// Canonical to native: run every stage backwards in reverse order, then
    /// restore the envelope.
    pub fn denormalize(&self, tree: Node) -> Node {
        debug!(stages = self.stages.len(), "denormalizing tree");
        let mut tree = tree;
        for stage in self.stages.iter().rev() {
            tree = stage.apply(tree, Direction::Reverse);
        }
        self.envelope.restore(tree)
    }
}

/// Runs `pipeline` over `tree` in the normalize direction.
pub fn run(tree: Node, pipeline: &Pipeline) -> Result<Node, EnvelopeError> {
    pipeline.normalize(tree)
}

/// Assembles a [`Pipeline`]. Rule construction errors are held until
/// [`build`](Self::build), which reports the first one.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    envelope: ResponseMetadata,
    stages: Vec<Stage>,
    error: Option<MappingError>,
}

impl PipelineBuilder {
    /// Whether the tree's top level already is the root node (no envelope).
    pub fn top_level_is_root_node(mut self, yes: bool) -> Self {
        self.envelope.top_level_is_root_node = yes;
        self
    }

    /// Key used to restore the envelope on denormalize.
    pub fn root_key(mut self, key: impl Into<String>) -> Self {
        self.envelope.root_key = key.into();
        self
    }

    pub fn envelope(mut self, envelope: ResponseMetadata) -> Self {
        self.envelope = envelope;
        self
    }

    /// Appends a stage built from mapping constructor results.
    pub fn stage<I>(mut self, name: impl Into<String>, mappings: I) -> Self
    where
        I: IntoIterator<Item = Result<Mapping, MappingError>>,
    {
        if self.error.is_none() {
            match Stage::try_new(name, mappings) {
                Ok(stage) => self.stages.push(stage),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    /// Appends an already validated stage.
    pub fn push_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Result<Pipeline, MappingError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Pipeline {
                envelope: self.envelope,
                stages: self.stages,
            }),
        }
    }
}
