//! Line parser for route descriptions.
//!
//! A description is a small subset of the DOT language:
//!
//! ```text
//! digraph {
//!   A [label="Denver International Airport"]
//!   B [label="Dallas Fort/Worth"]
//!   A->B [weight=2.5]
//! }
//! ```
//!
//! Label lines bind a short code to an airport and add it as a vertex; edge
//! lines connect two previously declared codes. Every other line is ignored.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::airport::Airport;
use crate::graph::{GraphError, WeightedGraph};

/// Edge weight used by route graphs: integer or decimal, totally ordered.
pub type Weight = OrderedFloat<f64>;

/// Graph of airports weighted by either travel time or ticket cost.
pub type RouteGraph = WeightedGraph<Airport, Weight>;

static LABEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z0-9_]+)\s*\[\s*label\s*=\s*"([^"]*)"\s*\]\s*;?\s*$"#).unwrap()
});
static LABEL_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*label\s*=").unwrap());
static EDGE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)\s*->\s*([A-Za-z0-9_]+)\s*\[\s*weight\s*=\s*([^\]\s]*)\s*\]\s*;?\s*$")
        .unwrap()
});
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(\.\d*)?|\.\d+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed label declaration: `{line}`")]
    MalformedLabel { line: String },
    #[error("invalid weight '{weight}' in `{line}`")]
    InvalidWeight { weight: String, line: String },
    #[error("vertex '{code}' is referenced before its label declaration")]
    UndeclaredVertex { code: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Which of the two parallel graphs a line applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Edges weighted by travel time.
    #[default]
    Time,
    /// Edges weighted by ticket cost.
    Cost,
}

impl Weighting {
    pub fn as_str(self) -> &'static str {
        match self {
            Weighting::Time => "time",
            Weighting::Cost => "cost",
        }
    }
}

/// What a single line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Ignored,
    Label { code: String, airport: Airport },
    Edge { from: String, to: String, weight: Weight },
}

// ---------------------------------------------------------------------------
// RouteNetwork
// ---------------------------------------------------------------------------

/// Label table plus the time- and cost-weighted graphs built from it.
#[derive(Debug, Clone, Default)]
pub struct RouteNetwork {
    labels: HashMap<String, Airport>,
    time_graph: RouteGraph,
    cost_graph: RouteGraph,
}

impl RouteNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one description line into this network.
    pub fn parse_line(&mut self, line: &str, weighting: Weighting) -> Result<LineKind, ParseError> {
        DescriptionParser::new(self).parse_line(line, weighting)
    }

    /// The airport declared under `code`, if any.
    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.labels.get(code)
    }

    /// Code → airport table.
    pub fn labels(&self) -> &HashMap<String, Airport> {
        &self.labels
    }

    pub fn time_graph(&self) -> &RouteGraph {
        &self.time_graph
    }

    pub fn cost_graph(&self) -> &RouteGraph {
        &self.cost_graph
    }

    pub fn graph(&self, weighting: Weighting) -> &RouteGraph {
        match weighting {
            Weighting::Time => &self.time_graph,
            Weighting::Cost => &self.cost_graph,
        }
    }

    /// True when no label has been declared and both graphs are empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.time_graph.is_empty() && self.cost_graph.is_empty()
    }

    fn graph_mut(&mut self, weighting: Weighting) -> &mut RouteGraph {
        match weighting {
            Weighting::Time => &mut self.time_graph,
            Weighting::Cost => &mut self.cost_graph,
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptionParser
// ---------------------------------------------------------------------------

/// Applies description lines to a borrowed [`RouteNetwork`].
pub struct DescriptionParser<'a> {
    network: &'a mut RouteNetwork,
}

impl<'a> DescriptionParser<'a> {
    pub fn new(network: &'a mut RouteNetwork) -> Self {
        Self { network }
    }

    /// Classify `line` and apply it to the graph selected by `weighting`.
    ///
    /// Only that one graph is touched; the label table is shared by both.
    pub fn parse_line(&mut self, line: &str, weighting: Weighting) -> Result<LineKind, ParseError> {
        if let Some(caps) = LABEL_LINE.captures(line) {
            return Ok(self.declare_label(&caps[1], &caps[2], weighting));
        }
        if let Some(caps) = EDGE_LINE.captures(line) {
            return self.declare_edge(line, &caps[1], &caps[2], &caps[3], weighting);
        }
        if !line.contains("->") && LABEL_ATTR.is_match(line) {
            return Err(ParseError::MalformedLabel {
                line: line.trim().to_string(),
            });
        }
        trace!(line, "ignoring line");
        Ok(LineKind::Ignored)
    }

    fn declare_label(&mut self, code: &str, name: &str, weighting: Weighting) -> LineKind {
        let airport = Airport::new(name);
        let added = self
            .network
            .graph_mut(weighting)
            .insert_vertex(airport.clone());
        if let Some(previous) = self.network.labels.insert(code.to_string(), airport.clone()) {
            if previous != airport {
                warn!(code, %previous, %airport, "label redeclared, previous vertex kept");
            }
        }
        debug!(code, %airport, graph = weighting.as_str(), added, "declared airport");
        LineKind::Label {
            code: code.to_string(),
            airport,
        }
    }

    fn declare_edge(
        &mut self,
        line: &str,
        from: &str,
        to: &str,
        raw_weight: &str,
        weighting: Weighting,
    ) -> Result<LineKind, ParseError> {
        let weight = parse_weight(raw_weight).ok_or_else(|| ParseError::InvalidWeight {
            weight: raw_weight.to_string(),
            line: line.trim().to_string(),
        })?;

        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        self.network
            .graph_mut(weighting)
            .insert_edge(&source, &target, weight)?;
        debug!(from, to, weight = weight.0, graph = weighting.as_str(), "declared edge");

        Ok(LineKind::Edge {
            from: from.to_string(),
            to: to.to_string(),
            weight,
        })
    }

    fn resolve(&self, code: &str) -> Result<Airport, ParseError> {
        self.network
            .labels
            .get(code)
            .cloned()
            .ok_or_else(|| ParseError::UndeclaredVertex {
                code: code.to_string(),
            })
    }
}

/// Non-negative, finite integer or decimal literal.
fn parse_weight(raw: &str) -> Option<Weight> {
    if !NUMBER.is_match(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|w| w.is_finite()).map(OrderedFloat)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
