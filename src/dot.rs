use std::fmt::Display;

use itertools::Itertools;
use tracing::trace;

use crate::{math::Map, Dfa, StateIndex};

/// Tells a [`GraphSink`] what role a node plays in the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    /// The start state, which is not accepting.
    Start,
    /// The start state, which is also accepting.
    StartFinal,
    /// An accepting state that is not the start state.
    Final,
    /// Any other state.
    Plain,
}

/// Receiver for the graph structure of an automaton, for example a renderer. An automaton
/// describes itself through [`Dfa::plot`], which first adds all nodes, then all edges and
/// finally calls [`GraphSink::render`].
pub trait GraphSink {
    /// What rendering produces.
    type Output;

    /// Adds the node `id` with the given role.
    fn add_node(&mut self, id: StateIndex, label: NodeLabel);

    /// Adds an edge from `from` to `to` labelled with `label`.
    fn add_edge(&mut self, from: StateIndex, to: StateIndex, label: &str);

    /// Produces the output from everything that has been added so far.
    fn render(&mut self) -> Result<Self::Output, std::io::Error>;
}

impl Dfa {
    /// Describes `self` to the given `sink`. Nodes are added in increasing order, followed
    /// by one edge per transition, labelled with its symbol. The result of
    /// [`GraphSink::render`] is returned.
    pub fn plot<S: GraphSink>(&self, sink: &mut S) -> Result<S::Output, std::io::Error> {
        self.describe(sink);
        sink.render()
    }

    fn describe<S: GraphSink>(&self, sink: &mut S) {
        for q in self.state_indices() {
            let label = match (q == self.start(), self.is_accepting(q)) {
                (true, false) => NodeLabel::Start,
                (true, true) => NodeLabel::StartFinal,
                (false, true) => NodeLabel::Final,
                (false, false) => NodeLabel::Plain,
            };
            sink.add_node(q, label);
        }
        for (from, symbol, to) in self.edges() {
            sink.add_edge(from, to, &symbol.to_string());
        }
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    pub fn dot_representation(&self) -> String {
        let mut graph = DotGraph::new("DFA");
        self.describe(&mut graph);
        graph.dot_representation()
    }
}

/// A [`GraphSink`] that produces a description of the graph in the DOT language. Parallel
/// edges are merged into one edge whose label lists all their labels. With the `graphviz`
/// feature, the description can be rendered to PNG through the `dot` executable.
#[derive(Debug, Clone, Default)]
pub struct DotGraph {
    name: String,
    nodes: Vec<(StateIndex, NodeLabel)>,
    edges: Vec<((StateIndex, StateIndex), Vec<String>)>,
    edge_positions: Map<(StateIndex, StateIndex), usize>,
}

impl DotGraph {
    /// Creates an empty graph with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn state_attributes(id: StateIndex, label: NodeLabel) -> Vec<DotStateAttribute> {
        let shape = match label {
            NodeLabel::Final | NodeLabel::StartFinal => "doublecircle",
            NodeLabel::Start | NodeLabel::Plain => "circle",
        };
        vec![
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(format!("q{id}")),
        ]
    }

    /// Returns the DOT description of everything added so far.
    pub fn dot_representation(&self) -> String {
        let header = [
            format!("digraph {} {{", sanitize_dot_ident(&self.name)),
            "rankdir=LR".to_string(),
            "init [label=\"\", shape=none]".to_string(),
        ];

        let states = self.nodes.iter().map(|(id, label)| {
            format!(
                "q{id} [{}]",
                Self::state_attributes(*id, *label)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        });

        let initial = self
            .nodes
            .iter()
            .filter(|(_, label)| matches!(label, NodeLabel::Start | NodeLabel::StartFinal))
            .map(|(id, _)| format!("init -> q{id}"));

        let transitions = self.edges.iter().map(|((from, to), labels)| {
            format!(
                "q{from} -> q{to} [{}]",
                DotTransitionAttribute::Label(labels.join(", "))
            )
        });

        header
            .into_iter()
            .chain(states)
            .chain(initial)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Renders the graph visually (as PNG) and returns a vec of bytes/u8s encoding
    /// the rendered image. This method is only available on the `graphviz` crate feature
    /// and requires the `dot` executable.
    #[cfg(feature = "graphviz")]
    pub fn render_png(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Read, Write};

        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(std::io::Error::other(format!(
                "dot process exited with status: {}",
                status
            )));
        }

        Ok(output)
    }

    /// Attempts to render the graph to a PNG file with the given filename. This method
    /// is only available on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;

        trace!("Outputting dot and rendering to png");
        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;

        tempfile.write_all(dot.as_bytes())?;
        let tempfile_name = tempfile.path();

        let output = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile_name)
            .output()?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::error!("Could not render, dot reported\n{}", &stderr);
            Err(std::io::Error::other(stderr))
        }
    }
}

impl GraphSink for DotGraph {
    type Output = String;

    fn add_node(&mut self, id: StateIndex, label: NodeLabel) {
        self.nodes.push((id, label));
    }

    fn add_edge(&mut self, from: StateIndex, to: StateIndex, label: &str) {
        match self.edge_positions.get(&(from, to)) {
            Some(&pos) => self.edges[pos].1.push(label.to_string()),
            None => {
                self.edge_positions.insert((from, to), self.edges.len());
                self.edges.push(((from, to), vec![label.to_string()]));
            }
        }
    }

    fn render(&mut self) -> Result<String, std::io::Error> {
        let dot = self.dot_representation();
        trace!("produced DOT representation\n{}", dot);
        Ok(dot)
    }
}

fn sanitize_dot_ident(name: &str) -> String {
    name.chars()
        .filter_map(|chr| match chr {
            c if c.is_alphanumeric() => Some(c),
            '|' | ':' | ',' | '-' => Some('_'),
            _ => None,
        })
        .join("")
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Enum that abstracts attributes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape_label(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{}\"", s),
        }
    }
}

/// Attributes of an edge in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{}\"", escape_label(lbl)),
        }
    }
}
