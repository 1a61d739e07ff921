//! Weighted undirected graphs for Prim's algorithm
//!
//! [`Graph`] is an adjacency-list graph that stores every undirected edge in
//! both endpoints' lists. It can be built edge by edge, parsed from the plain
//! text edge-list format, or generated at random for benchmarking.
//!
//! # Text format
//!
//! ```text
//! <num_vertices> <num_edges>
//! <v1> <v2> <cost>      (num_edges times)
//! ```
//!
//! Tokens are whitespace separated and may span lines; vertices are numbered
//! from `0`.

use crate::traits::Adjacency;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Vertex identifier, an index in `0..num_vertices`
pub type VertexId = usize;

/// Edge weight; positive and strictly below `Cost::MAX`
pub type Cost = u64;

/// Costs of randomly generated edges are drawn from `1..=MAX_RANDOM_COST`.
pub const MAX_RANDOM_COST: Cost = 1000;

/// Graphs [`Graph::random_connected`] generates before giving up
pub const MAX_CONNECT_ATTEMPTS: usize = 100;

/// A directed half of an undirected edge, as listed under `source`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: VertexId,
    pub dest: VertexId,
    pub cost: Cost,
}

/// Errors raised while building, parsing or generating a graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read graph: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("vertex {vertex} is out of range for a graph with {num_vertices} vertices")]
    InvalidVertex {
        vertex: VertexId,
        num_vertices: usize,
    },
    #[error("edge cost {0} is out of range (must be positive and below {max})", max = Cost::MAX)]
    InvalidCost(Cost),
    #[error("density {0} is out of range (must be in (0, 100])")]
    InvalidDensity(f64),
    #[error("density too low: {edges} edges cannot connect {num_vertices} vertices")]
    DensityTooLow { edges: usize, num_vertices: usize },
    #[error("no connected graph with {edges} edges on {num_vertices} vertices after {attempts} attempts")]
    NotConnected {
        edges: usize,
        num_vertices: usize,
        attempts: usize,
    },
}

/// Adjacency-list graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    num_edges: usize,
}

impl Graph {
    /// Creates a graph with `num_vertices` vertices and no edges.
    pub fn new(num_vertices: usize) -> Self {
        Graph {
            adjacency: vec![Vec::new(); num_vertices],
            num_edges: 0,
        }
    }

    /// Builds a graph from `(u, v, cost)` triples.
    pub fn from_edges<I>(num_vertices: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (VertexId, VertexId, Cost)>,
    {
        let mut graph = Graph::new(num_vertices);
        for (u, v, cost) in edges {
            graph.add_edge(u, v, cost)?;
        }
        Ok(graph)
    }

    /// Adds the undirected edge `{u, v}`.
    ///
    /// Parallel edges are kept; Prim's algorithm simply never picks the more
    /// expensive copy.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, cost: Cost) -> Result<(), GraphError> {
        let num_vertices = self.num_vertices();
        for vertex in [u, v] {
            if vertex >= num_vertices {
                return Err(GraphError::InvalidVertex {
                    vertex,
                    num_vertices,
                });
            }
        }
        if cost == 0 || cost == Cost::MAX {
            return Err(GraphError::InvalidCost(cost));
        }

        self.adjacency[u].push(Edge {
            source: u,
            dest: v,
            cost,
        });
        self.adjacency[v].push(Edge {
            source: v,
            dest: u,
            cost,
        });
        self.num_edges += 1;
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn neighbors(&self, vertex: VertexId) -> &[Edge] {
        &self.adjacency[vertex]
    }

    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.adjacency
            .get(u)
            .is_some_and(|edges| edges.iter().any(|e| e.dest == v))
    }

    /// Returns true if every vertex is reachable from vertex 0.
    ///
    /// The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        let n = self.num_vertices();
        if n == 0 {
            return true;
        }
        if self.num_edges + 1 < n {
            return false;
        }

        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut reached = 1;

        while let Some(vertex) = queue.pop_front() {
            for edge in &self.adjacency[vertex] {
                if !seen[edge.dest] {
                    seen[edge.dest] = true;
                    reached += 1;
                    queue.push_back(edge.dest);
                }
            }
        }

        reached == n
    }

    /// Parses the text edge-list format.
    pub fn parse(input: &str) -> Result<Self, GraphError> {
        Self::from_reader(input.as_bytes())
    }

    /// Reads the text edge-list format from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads the text edge-list format.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GraphError> {
        let mut tokens = Tokens::new(reader);

        let num_vertices: usize = tokens.next_value("vertex count")?;
        let num_edges: usize = tokens.next_value("edge count")?;
        let mut graph = Graph::new(num_vertices);

        for _ in 0..num_edges {
            let u: VertexId = tokens.next_value("source vertex")?;
            let v: VertexId = tokens.next_value("destination vertex")?;
            let cost: Cost = tokens.next_value("edge cost")?;
            let line = tokens.line;
            graph.add_edge(u, v, cost).map_err(|err| GraphError::Parse {
                line,
                reason: err.to_string(),
            })?;
        }

        debug!(num_vertices, num_edges, "parsed graph");
        Ok(graph)
    }

    /// Generates a random graph with `density_percent` of all possible edges.
    ///
    /// The edge count is `ceil(density * n * (n - 1) / 200)`; edges are
    /// distinct, loop-free, and cost `1..=MAX_RANDOM_COST`. The result is not
    /// necessarily connected; see [`Graph::random_connected`].
    pub fn random<R: Rng>(
        num_vertices: usize,
        density_percent: f64,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        if !(density_percent > 0.0 && density_percent <= 100.0) {
            return Err(GraphError::InvalidDensity(density_percent));
        }

        let n = num_vertices;
        let max_edges = n * n.saturating_sub(1) / 2;
        let target = ((density_percent * n as f64 * n.saturating_sub(1) as f64) / 200.0).ceil() as usize;
        let target = target.min(max_edges);
        if target + 1 < n {
            return Err(GraphError::DensityTooLow {
                edges: target,
                num_vertices: n,
            });
        }

        let mut graph = Graph::new(n);
        let mut present: FxHashSet<(VertexId, VertexId)> = FxHashSet::default();
        present.reserve(target);

        while graph.num_edges < target {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u == v || !present.insert((u.min(v), u.max(v))) {
                continue;
            }
            let cost = rng.gen_range(1..=MAX_RANDOM_COST);
            graph.add_edge(u, v, cost)?;
        }

        Ok(graph)
    }

    /// Generates random graphs until one is connected.
    ///
    /// # Errors
    /// [`GraphError::NotConnected`] if none of [`MAX_CONNECT_ATTEMPTS`]
    /// graphs is connected, which is the usual outcome when the edge count
    /// is close to `n - 1`.
    pub fn random_connected<R: Rng>(
        num_vertices: usize,
        density_percent: f64,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        let mut edges = 0;
        for attempts in 1..=MAX_CONNECT_ATTEMPTS {
            let graph = Self::random(num_vertices, density_percent, rng)?;
            if graph.is_connected() {
                debug!(num_vertices, edges = graph.num_edges, attempts, "generated connected graph");
                return Ok(graph);
            }
            info!(attempts, "random graph is disconnected, regenerating");
            edges = graph.num_edges;
        }

        warn!(
            num_vertices,
            edges,
            attempts = MAX_CONNECT_ATTEMPTS,
            "giving up on a connected random graph"
        );
        Err(GraphError::NotConnected {
            edges,
            num_vertices,
            attempts: MAX_CONNECT_ATTEMPTS,
        })
    }
}

impl Adjacency for Graph {
    fn num_vertices(&self) -> usize {
        Graph::num_vertices(self)
    }

    fn neighbors(&self, vertex: VertexId) -> &[Edge] {
        Graph::neighbors(self, vertex)
    }
}

/// Whitespace tokenizer that remembers the line of the last token
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
    line: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Tokens {
            reader,
            pending: VecDeque::new(),
            line: 0,
        }
    }

    fn next_token(&mut self) -> Result<Option<String>, GraphError> {
        while self.pending.is_empty() {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            self.pending
                .extend(buf.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    fn next_value<V: std::str::FromStr>(&mut self, what: &str) -> Result<V, GraphError> {
        match self.next_token()? {
            Some(token) => token.parse().map_err(|_| GraphError::Parse {
                line: self.line,
                reason: format!("invalid {what} {token:?}"),
            }),
            None => Err(GraphError::Parse {
                line: self.line,
                reason: format!("unexpected end of input, expected {what}"),
            }),
        }
    }
}
