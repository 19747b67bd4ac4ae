/*!
 * Exact-sum subset search.
 *
 * Enumerates every index subset of a delta list whose sum equals a target.
 * Subsets are produced once each, with indices in increasing order, in
 * depth-first discovery order.
 *
 * Pruning on partial sums is only sound when partial sums move
 * monotonically away from zero, which holds when every delta has the sign
 * of the target. Mixed-sign inputs are searched exhaustively, so the search
 * is bounded by `SearchLimits` instead.
 */

use log::{debug, warn};

/// Bounds on the exhaustive search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Only the first `max_candidates` deltas take part in the search
    pub max_candidates: usize,
    /// Maximum number of search nodes visited
    pub node_budget: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_candidates: 24,
            node_budget: 2_000_000,
        }
    }
}

impl SearchLimits {
    /// No bounds at all
    pub fn unbounded() -> Self {
        Self {
            max_candidates: usize::MAX,
            node_budget: usize::MAX,
        }
    }
}

/// Subsets found by a bounded search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Index subsets summing exactly to the target
    pub subsets: Vec<Vec<usize>>,
    /// Whether a limit cut the search short, so subsets may be missing
    pub truncated: bool,
}

impl SearchOutcome {
    /// The subset with the fewest members, first found on ties
    pub fn smallest(&self) -> Option<&[usize]> {
        self.subsets.iter().min_by_key(|s| s.len()).map(Vec::as_slice)
    }
}

/// Every non-empty index subset of `deltas` summing exactly to `target`
pub fn find_subsets(deltas: &[i64], target: i64) -> Vec<Vec<usize>> {
    Search::new(deltas, None, target, SearchLimits::unbounded()).run().subsets
}

/// Bounded search where members sharing a group id are mutually exclusive
pub fn find_subsets_grouped(deltas: &[i64], groups: &[usize], target: i64, limits: SearchLimits) -> SearchOutcome {
    Search::new(deltas, Some(groups), target, limits).run()
}

struct Search<'a> {
    deltas: &'a [i64],
    groups: Option<&'a [usize]>,
    target: i64,
    prune: bool,
    budget: usize,
    visited: usize,
    truncated: bool,
    chosen: Vec<usize>,
    found: Vec<Vec<usize>>,
}

impl<'a> Search<'a> {
    fn new(deltas: &'a [i64], groups: Option<&'a [usize]>, target: i64, limits: SearchLimits) -> Self {
        let considered = deltas.len().min(limits.max_candidates);
        let truncated = considered < deltas.len();
        if truncated {
            warn!(
                "Combination search limited to {} of {} candidates",
                considered,
                deltas.len()
            );
        }

        let deltas = &deltas[..considered];
        let prune = target != 0 && deltas.iter().all(|d| d.signum() * target.signum() >= 0);

        Self {
            deltas,
            groups: groups.map(|g| &g[..considered.min(g.len())]),
            target,
            prune,
            budget: limits.node_budget,
            visited: 0,
            truncated,
            chosen: Vec::new(),
            found: Vec::new(),
        }
    }

    fn run(mut self) -> SearchOutcome {
        self.explore(0, 0);
        debug!(
            "Combination search visited {} nodes, found {} subsets (pruning: {})",
            self.visited,
            self.found.len(),
            self.prune
        );
        SearchOutcome {
            subsets: self.found,
            truncated: self.truncated,
        }
    }

    fn group_taken(&self, index: usize) -> bool {
        match self.groups {
            Some(groups) => match groups.get(index) {
                Some(group) => self.chosen.iter().any(|&c| groups.get(c) == Some(group)),
                None => false,
            },
            None => false,
        }
    }

    fn explore(&mut self, start: usize, sum: i64) {
        for index in start..self.deltas.len() {
            if self.visited >= self.budget {
                if !self.truncated {
                    warn!("Combination search stopped after {} nodes", self.visited);
                }
                self.truncated = true;
                return;
            }
            self.visited += 1;

            if self.group_taken(index) {
                continue;
            }

            let next = sum + self.deltas[index];
            if self.prune && next.abs() > self.target.abs() {
                continue;
            }

            self.chosen.push(index);
            if next == self.target {
                self.found.push(self.chosen.clone());
            }
            self.explore(index + 1, next);
            self.chosen.pop();
        }
    }
}
