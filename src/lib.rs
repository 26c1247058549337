//! # uast-normalize
//!
//! Normalizes native, parser-specific syntax trees into one canonical tree by
//! running declarative match/rewrite rules, then attaches semantic roles.
//!
//! ```text
//! native tree ─> envelope trim ─> stages (mappings) ─> roles dedup ─> canonical tree
//! ```
//!
//! - **[node]** - the tree value type and its reserved `@type` / `@role` keys
//! - **[op]** / **[matcher]** - the pattern algebra and its matcher/builder
//! - **[mapping]** - validated bidirectional rules
//! - **[annotate]** - role annotation rules keyed on `@type`
//! - **[pipeline]** - ordered stages, first match wins per node
//! - **[dedup]** / **[envelope]** - the fixed passes around the stages
//! - **[arena]** - index-addressed view for read-only consumers
pub mod annotate;
pub mod arena;
pub mod convert;
pub mod dedup;
pub mod envelope;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod node;
pub mod normalizer;
pub mod op;
pub mod pipeline;
pub mod role;

pub use annotate::{annotate_if_no_roles, annotate_type};
pub use arena::{Cursor, NodeId, Tree};
pub use convert::{from_json, to_json};
pub use dedup::roles_dedup;
pub use envelope::ResponseMetadata;
pub use error::{EnvelopeError, Error, MappingError};
pub use mapping::{Mapping, map_obj};
pub use matcher::Bindings;
pub use node::{KEY_ROLES, KEY_TYPE, Node};
pub use op::{Direction, MapObj, ObjMode, Op};
pub use pipeline::{Pipeline, PipelineBuilder, Stage, run};
pub use role::Role;
