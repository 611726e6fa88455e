//! Token connectivity graph and bounded-hop path enumeration.
//!
//! Adapted from `ArbGraph` (`utils/graph.rs`): that structure
//! builds an undirected `petgraph` graph over token addresses and
//! recursively walks it (`construct_cycles`) to enumerate arbitrage
//! cycles back to a fixed start node, bounded by `max_hops`. Here the
//! graph is built from a persisted pair-to-pool-ids map instead of live
//! pool objects, and the walk enumerates acyclic simple paths between two
//! distinct tokens instead of cycles back to one token — no Dijkstra, no
//! pruning by estimated output: every simple path within the hop bound is
//! a candidate, and the simulator/router decide which is best.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::types::CandidatePath;

pub struct TokenGraph {
    graph: UnGraph<String, Vec<String>>,
    node_by_token: HashMap<String, NodeIndex>,
}

impl TokenGraph {
    /// Builds the graph from a persisted `"TOKEN_A->TOKEN_B" -> [pool_id, ...]`
    /// style map (see `store::schema`), collapsing both directions of a pair
    /// into one undirected edge holding the union of pool ids, in the order
    /// first observed, deduplicated.
    pub fn from_pairs(pairs: &HashMap<String, Vec<String>>) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut node_by_token: HashMap<String, NodeIndex> = HashMap::new();
        let mut edge_pools: HashMap<(NodeIndex, NodeIndex), Vec<String>> = HashMap::new();

        for (pair_key, pool_ids) in pairs {
            let Some((a, b)) = pair_key.split_once("->") else {
                continue;
            };

            let node_a = *node_by_token
                .entry(a.to_string())
                .or_insert_with(|| graph.add_node(a.to_string()));
            let node_b = *node_by_token
                .entry(b.to_string())
                .or_insert_with(|| graph.add_node(b.to_string()));

            let key = if node_a.index() <= node_b.index() {
                (node_a, node_b)
            } else {
                (node_b, node_a)
            };

            let entry = edge_pools.entry(key).or_default();
            for pool_id in pool_ids {
                if !entry.contains(pool_id) {
                    entry.push(pool_id.clone());
                }
            }
        }

        for ((a, b), pool_ids) in edge_pools {
            graph.add_edge(a, b, pool_ids);
        }

        Self {
            graph,
            node_by_token,
        }
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.node_by_token.contains_key(token)
    }

    /// The pool ids connecting two directly-adjacent tokens, or an empty
    /// slice if they aren't adjacent.
    pub fn pools_for_pair(&self, a: &str, b: &str) -> &[String] {
        let (Some(&na), Some(&nb)) = (self.node_by_token.get(a), self.node_by_token.get(b))
        else {
            return &[];
        };
        self.graph
            .find_edge(na, nb)
            .map(|e| self.graph.edge_weight(e).unwrap().as_slice())
            .unwrap_or(&[])
    }

    /// Enumerates every simple path from `input` to `output` using at most
    /// `max_hops` edges. Exhaustive depth-first search, no shortest-path
    /// pruning: bounding by hop count is the only optimization, matching
    /// the mandate that path enumeration stay dumb and I/O batching absorb
    /// the resulting fan-out.
    pub fn enumerate_paths(
        &self,
        input: &str,
        output: &str,
        max_hops: usize,
    ) -> Vec<CandidatePath> {
        let (Some(&start), Some(&goal)) =
            (self.node_by_token.get(input), self.node_by_token.get(output))
        else {
            return Vec::new();
        };

        if start == goal {
            return Vec::new();
        }

        let mut results = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut current = vec![start];

        self.walk(start, goal, max_hops, &mut current, &mut visited, &mut results);

        results
    }

    fn walk(
        &self,
        current_node: NodeIndex,
        goal: NodeIndex,
        max_hops: usize,
        current_path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
        results: &mut Vec<CandidatePath>,
    ) {
        if current_path.len() as isize - 1 >= max_hops as isize {
            return;
        }

        for edge in self.graph.edges(current_node) {
            let next = edge.target();
            if next == goal {
                let mut tokens: Vec<String> = current_path
                    .iter()
                    .map(|n| self.graph[*n].clone())
                    .collect();
                tokens.push(self.graph[next].clone());
                results.push(CandidatePath { tokens });
                continue;
            }

            if visited.insert(next) {
                current_path.push(next);
                self.walk(next, goal, max_hops, current_path, visited, results);
                current_path.pop();
                visited.remove(&next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> TokenGraph {
        let pairs = HashMap::from([
            ("BTC->USDC".to_string(), vec!["BTC-USDC-25".to_string(), "BTC-USDC-50".to_string()]),
            ("SOL->USDC".to_string(), vec!["SOL-USDC-25".to_string()]),
            ("BTC->SOL".to_string(), vec!["BTC-SOL-30".to_string()]),
        ]);
        TokenGraph::from_pairs(&pairs)
    }

    #[test]
    fn direct_pair_enumerates_single_hop_path() {
        let graph = sample_graph();
        let paths = graph.enumerate_paths("BTC", "USDC", 3);
        assert!(paths.iter().any(|p| p.tokens == vec!["BTC", "USDC"]));
    }

    #[test]
    fn two_hop_path_found_through_intermediate_token() {
        let graph = sample_graph();
        let paths = graph.enumerate_paths("SOL", "BTC", 3);
        assert!(paths
            .iter()
            .any(|p| p.tokens == vec!["SOL", "USDC", "BTC"] || p.tokens == vec!["SOL", "BTC"]));
    }

    #[test]
    fn hop_bound_excludes_longer_paths() {
        let graph = sample_graph();
        let paths = graph.enumerate_paths("SOL", "BTC", 1);
        assert!(paths.iter().all(|p| p.hops() <= 1));
        assert!(!paths.iter().any(|p| p.tokens.len() == 3));
    }

    #[test]
    fn unknown_token_yields_no_paths() {
        let graph = sample_graph();
        assert!(graph.enumerate_paths("ETH", "BTC", 3).is_empty());
    }

    #[test]
    fn pools_for_pair_merges_edge_pool_ids() {
        let graph = sample_graph();
        let pools = graph.pools_for_pair("BTC", "USDC");
        assert_eq!(pools.len(), 2);
    }
}
