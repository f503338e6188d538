use super::Netlist;
use petgraph::dot::{Config, Dot};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

impl Netlist {
    /// Returns the netlist in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format.
    ///
    /// Every terminal is a node labeled "ID:ROLE:STATE" and every connection an edge from its
    /// `a` end to its `b` end.
    pub fn to_dot(&self) -> String {
        let mut graph = petgraph::Graph::<_, ()>::new();
        let mut index = HashMap::new();
        for (id, terminal) in self.terminals() {
            let label = format!("{}:{}:{}", id, terminal.role(), self.state(id) as u8);
            index.insert(id, graph.add_node(label));
        }
        graph.extend_with_edges(
            self.connections()
                .filter_map(|(_, c)| Some((*index.get(&c.a())?, *index.get(&c.b())?))),
        );
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Dumps the netlist in dot format to `path`, see [Netlist::to_dot].
    pub fn dump_dot<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut f = std::fs::File::create(path)?;
        write!(f, "{}", self.to_dot())
    }
}
