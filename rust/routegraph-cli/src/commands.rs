//! Query commands run against a loaded route network.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use routegraph_core::{Airport, GraphError, LoadError, RouteNetwork, TreeEdge, Weighting};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("unknown airport code '{0}'")]
    UnknownCode(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

fn lookup<'a>(network: &'a RouteNetwork, code: &str) -> Result<&'a Airport, CliError> {
    network
        .airport(code)
        .ok_or_else(|| CliError::UnknownCode(code.to_string()))
}

// ---------------------------------------------------------------------------
// route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub by: &'static str,
    pub from: Airport,
    pub to: Airport,
    pub cost: f64,
    pub path: Vec<Airport>,
}

/// Cheapest route between two airport codes.
pub fn route(network: &RouteNetwork, from: &str, to: &str, by: Weighting) -> Result<RouteReport, CliError> {
    let source = lookup(network, from)?;
    let target = lookup(network, to)?;
    let (cost, path) = network.graph(by).cheapest_path(source, target)?;
    debug!(from, to, by = by.as_str(), hops = path.len().saturating_sub(1), "route found");
    Ok(RouteReport {
        by: by.as_str(),
        from: source.clone(),
        to: target.clone(),
        cost: cost.into_inner(),
        path,
    })
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.path.iter().map(Airport::name).collect();
        writeln!(f, "{}", names.join(" -> "))?;
        write!(f, "total {}: {}", self.by, self.cost)
    }
}

// ---------------------------------------------------------------------------
// mst
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub by: &'static str,
    pub root: Airport,
    pub cost: f64,
    pub edges: Vec<TreeEdge<Airport, f64>>,
}

/// Minimum spanning tree grown from an airport code.
pub fn spanning_tree(network: &RouteNetwork, root: &str, by: Weighting) -> Result<TreeReport, CliError> {
    let root = lookup(network, root)?;
    let tree = network.graph(by).min_spanning_tree(root)?;
    let cost = tree.cost().into_inner();
    let edges = tree
        .edges
        .into_iter()
        .map(|e| TreeEdge {
            from: e.from,
            to: e.to,
            weight: e.weight.into_inner(),
        })
        .collect();
    Ok(TreeReport {
        by: by.as_str(),
        root: tree.root,
        cost,
        edges,
    })
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in &self.edges {
            writeln!(f, "{} -> {} ({})", edge.from, edge.to, edge.weight)?;
        }
        write!(
            f,
            "spans {} airport(s) from {}, total {}: {}",
            self.edges.len() + 1,
            self.root,
            self.by,
            self.cost
        )
    }
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AirportEntry {
    pub code: String,
    pub name: Airport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub airports: Vec<AirportEntry>,
    pub time_vertices: usize,
    pub time_edges: usize,
    pub cost_vertices: usize,
    pub cost_edges: usize,
}

/// Label table and graph sizes, airports ordered by code.
pub fn summary(network: &RouteNetwork) -> Summary {
    let mut airports: Vec<AirportEntry> = network
        .labels()
        .iter()
        .map(|(code, airport)| AirportEntry {
            code: code.clone(),
            name: airport.clone(),
        })
        .collect();
    airports.sort_by(|a, b| a.code.cmp(&b.code));
    Summary {
        airports,
        time_vertices: network.time_graph().vertex_count(),
        time_edges: network.time_graph().edge_count(),
        cost_vertices: network.cost_graph().vertex_count(),
        cost_edges: network.cost_graph().edge_count(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.airports {
            writeln!(f, "{:>6}  {}", entry.code, entry.name)?;
        }
        writeln!(f, "time graph: {} airports, {} routes", self.time_vertices, self.time_edges)?;
        write!(f, "cost graph: {} airports, {} routes", self.cost_vertices, self.cost_edges)
    }
}

/// Render any report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
