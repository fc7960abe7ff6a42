//! Routegraph core
//!
//! Weighted directed graphs with shortest-path and minimum-spanning-tree
//! queries, plus the parser and loader that build airport route networks
//! from DOT-style descriptions.

pub mod airport;
pub mod graph;
pub mod loader;
pub mod parser;

pub use airport::Airport;
pub use graph::{GraphError, SpanningTree, TreeEdge, WeightedGraph};
pub use loader::{LoadError, Loader};
pub use parser::{DescriptionParser, LineKind, ParseError, RouteGraph, RouteNetwork, Weight, Weighting};
