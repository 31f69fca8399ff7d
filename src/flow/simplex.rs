use log::debug;

use crate::flow::pricing::Candidate;
use crate::flow::progress::Budget;
use crate::types::*;

const NONE: usize = usize::MAX;

const UP: i8 = 1;
const DOWN: i8 = -1;

const MIN_BLOCK_SIZE: usize = 20;

/// Pivots between two budget checks.
const CHECK_INTERVAL: u64 = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ArcState {
    Tree,
    Lower,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimplexStatus {
    Optimal,
    BudgetExhausted,
    Unbounded,
}

/// Primal network simplex for uncapacitated min-cost flow on real-valued supplies.
///
/// Slots `0..n` hold one artificial arc per node, linking it to an extra root
/// node; real arcs follow. The spanning tree is stored with parent, thread
/// and successor arrays and pivots use block search over the real arcs.
/// Arcs can be admitted between runs, and a run resumes from the current basis.
pub struct NetworkSimplex {
    node_num: usize,
    root: usize,

    source: Vec<NodeId>,
    target: Vec<NodeId>,
    cost: Vec<Cost>,
    flow: Vec<Mass>,
    state: Vec<ArcState>,

    supply: Vec<Mass>,
    pi: Vec<Cost>,

    parent: Vec<NodeId>,
    pred: Vec<ArcId>,
    thread: Vec<NodeId>,
    rev_thread: Vec<NodeId>,
    succ_num: Vec<isize>,
    last_succ: Vec<NodeId>,
    pred_dir: Vec<i8>,
    dirty_revs: Vec<NodeId>,

    art_cost: Cost,
    tolerance: Cost,
    block_size: usize,
    next_arc: ArcId,

    in_arc: ArcId,
    join: NodeId,
    u_in: NodeId,
    v_in: NodeId,
    u_out: NodeId,
    v_out: NodeId,
    delta: Mass,

    pivots: u64,
    initialized: bool,
    log_progress: bool,
}

impl NetworkSimplex {
    /// `max_cost` must bound the cost of every arc that will ever be added.
    /// Arcs with reduced cost below `-tolerance` are eligible to enter the basis.
    pub fn new(supply: Vec<Mass>, max_cost: Cost, tolerance: Cost) -> Self {
        let node_num = supply.len();
        let all_nodes = node_num + 1;

        let mut simplex = NetworkSimplex {
            node_num,
            root: node_num,
            source: Vec::with_capacity(node_num),
            target: Vec::with_capacity(node_num),
            cost: Vec::with_capacity(node_num),
            flow: Vec::with_capacity(node_num),
            state: Vec::with_capacity(node_num),
            supply,
            pi: vec![0.0; all_nodes],
            parent: vec![NONE; all_nodes],
            pred: vec![NONE; all_nodes],
            thread: vec![0; all_nodes],
            rev_thread: vec![0; all_nodes],
            succ_num: vec![0; all_nodes],
            last_succ: vec![0; all_nodes],
            pred_dir: vec![UP; all_nodes],
            dirty_revs: Vec::new(),
            art_cost: (max_cost.max(0.0) + 1.0) * node_num.max(1) as f64,
            tolerance,
            block_size: MIN_BLOCK_SIZE,
            next_arc: node_num,
            in_arc: NONE,
            join: NONE,
            u_in: NONE,
            v_in: NONE,
            u_out: NONE,
            v_out: NONE,
            delta: 0.0,
            pivots: 0,
            initialized: false,
            log_progress: false,
        };

        // Artificial arcs are wired up in `init`.
        for _ in 0..node_num {
            simplex.push_arc(0, 0, 0.0);
        }
        simplex.state.fill(ArcState::Tree);
        simplex
    }

    pub fn with_progress_log(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }

    fn push_arc(&mut self, source: NodeId, target: NodeId, cost: Cost) -> ArcId {
        self.source.push(source);
        self.target.push(target);
        self.cost.push(cost);
        self.flow.push(0.0);
        self.state.push(ArcState::Lower);
        self.source.len() - 1
    }

    /// Adds a real arc. Only valid before the first run; use `admit` afterwards.
    pub fn add_arc(&mut self, source: NodeId, target: NodeId, cost: Cost) -> ArcId {
        debug_assert!(!self.initialized);
        self.push_arc(source, target, cost)
    }

    #[inline(always)]
    fn reduced_cost(&self, e: ArcId) -> Cost {
        self.cost[e] + self.pi[self.source[e]] - self.pi[self.target[e]]
    }

    /// Adds arcs between runs, overwriting non-basic arcs that price above the
    /// tolerance before growing the arena. Returns the number of reused slots.
    pub fn admit(&mut self, candidates: &[Candidate]) -> usize {
        let mut incoming = candidates.iter();
        let mut first_new = None;
        let mut reused = 0;

        for e in self.node_num..self.source.len() {
            if self.state[e] != ArcState::Lower || self.reduced_cost(e) <= self.tolerance {
                continue;
            }
            let Some(c) = incoming.next() else { break };
            self.source[e] = c.source as usize;
            self.target[e] = c.target as usize;
            self.cost[e] = c.cost;
            self.flow[e] = 0.0;
            first_new.get_or_insert(e);
            reused += 1;
        }

        for c in incoming {
            let e = self.push_arc(c.source as usize, c.target as usize, c.cost);
            first_new.get_or_insert(e);
        }

        if let Some(e) = first_new {
            self.next_arc = e;
        }
        self.update_block_size();
        reused
    }

    fn update_block_size(&mut self) {
        let real = self.arc_count() as f64;
        self.block_size = (real.sqrt() as usize).max(MIN_BLOCK_SIZE);
    }

    /// Solves from the artificial starting basis.
    pub fn run(&mut self, budget: &Budget) -> SimplexStatus {
        self.init();
        self.start(budget)
    }

    /// Continues pivoting from the current basis, e.g. after `admit`.
    pub fn resume(&mut self, budget: &Budget) -> SimplexStatus {
        if !self.initialized {
            return self.run(budget);
        }
        self.start(budget)
    }

    fn init(&mut self) {
        let n = self.node_num;
        let root = self.root;

        for u in 0..n {
            let e = u;
            self.parent[u] = root;
            self.pred[u] = e;
            self.thread[u] = u + 1;
            self.rev_thread[u + 1] = u;
            self.succ_num[u] = 1;
            self.last_succ[u] = u;
            self.state[e] = ArcState::Tree;
            if self.supply[u] >= 0.0 {
                self.pred_dir[u] = UP;
                self.pi[u] = 0.0;
                self.source[e] = u;
                self.target[e] = root;
                self.flow[e] = self.supply[u];
                self.cost[e] = 0.0;
            } else {
                self.pred_dir[u] = DOWN;
                self.pi[u] = self.art_cost;
                self.source[e] = root;
                self.target[e] = u;
                self.flow[e] = -self.supply[u];
                self.cost[e] = self.art_cost;
            }
        }

        self.parent[root] = NONE;
        self.pred[root] = NONE;
        self.thread[root] = 0;
        self.rev_thread[0] = root;
        self.succ_num[root] = n as isize + 1;
        self.last_succ[root] = root.saturating_sub(1);
        self.pi[root] = 0.0;

        for e in n..self.source.len() {
            self.flow[e] = 0.0;
            self.state[e] = ArcState::Lower;
        }

        self.next_arc = n;
        self.update_block_size();
        self.initialized = true;
    }

    fn start(&mut self, budget: &Budget) -> SimplexStatus {
        if self.node_num == 0 {
            return SimplexStatus::Optimal;
        }

        loop {
            if !self.find_entering_arc() {
                return SimplexStatus::Optimal;
            }
            self.find_join_node();
            if !self.find_leaving_arc() {
                return SimplexStatus::Unbounded;
            }
            self.change_flow();
            self.update_tree_structure();
            self.update_potential();

            self.pivots += 1;
            if self.pivots % CHECK_INTERVAL == 0 {
                if self.log_progress {
                    debug!(
                        "simplex pivot {}: cost {:.6}, artificial flow {:.3e}",
                        self.pivots,
                        self.total_cost(),
                        self.artificial_flow()
                    );
                }
                if budget.exhausted() {
                    return SimplexStatus::BudgetExhausted;
                }
            }
        }
    }

    /// Block search: scan real arcs from `next_arc`, wrapping around, and stop
    /// at the end of the first block that holds an eligible arc.
    fn find_entering_arc(&mut self) -> bool {
        let first = self.node_num;
        let end = self.source.len();
        if first == end {
            return false;
        }

        let mut best = -self.tolerance;
        let mut found = NONE;
        let mut count = self.block_size;

        for e in (self.next_arc..end).chain(first..self.next_arc) {
            if self.state[e] == ArcState::Lower {
                let c = self.reduced_cost(e);
                if c < best {
                    best = c;
                    found = e;
                }
            }
            count -= 1;
            if count == 0 {
                if found != NONE {
                    break;
                }
                count = self.block_size;
            }
        }

        if found == NONE {
            return false;
        }
        self.in_arc = found;
        self.next_arc = found;
        true
    }

    fn find_join_node(&mut self) {
        let mut u = self.source[self.in_arc];
        let mut v = self.target[self.in_arc];
        while u != v {
            if self.succ_num[u] < self.succ_num[v] {
                u = self.parent[u];
            } else {
                v = self.parent[v];
            }
        }
        self.join = u;
    }

    /// Picks the leaving arc on the cycle closed by `in_arc`, keeping the tree strongly feasible.
    fn find_leaving_arc(&mut self) -> bool {
        let first = self.source[self.in_arc];
        let second = self.target[self.in_arc];
        let mut delta = f64::INFINITY;
        let mut result = 0;

        let mut u = first;
        while u != self.join {
            let d = if self.pred_dir[u] == UP {
                self.flow[self.pred[u]]
            } else {
                f64::INFINITY
            };
            if d < delta {
                delta = d;
                self.u_out = u;
                result = 1;
            }
            u = self.parent[u];
        }

        let mut u = second;
        while u != self.join {
            let d = if self.pred_dir[u] == DOWN {
                self.flow[self.pred[u]]
            } else {
                f64::INFINITY
            };
            if d <= delta {
                delta = d;
                self.u_out = u;
                result = 2;
            }
            u = self.parent[u];
        }

        if delta.is_infinite() {
            return false;
        }
        if result == 1 {
            self.u_in = first;
            self.v_in = second;
        } else {
            self.u_in = second;
            self.v_in = first;
        }
        self.delta = delta;
        true
    }

    fn change_flow(&mut self) {
        let delta = self.delta;
        if delta > 0.0 {
            self.flow[self.in_arc] += delta;
            let mut u = self.source[self.in_arc];
            while u != self.join {
                self.flow[self.pred[u]] -= f64::from(self.pred_dir[u]) * delta;
                u = self.parent[u];
            }
            let mut u = self.target[self.in_arc];
            while u != self.join {
                self.flow[self.pred[u]] += f64::from(self.pred_dir[u]) * delta;
                u = self.parent[u];
            }
        }
        self.state[self.in_arc] = ArcState::Tree;
        self.state[self.pred[self.u_out]] = ArcState::Lower;
    }

    fn update_tree_structure(&mut self) {
        let (u_in, v_in, u_out, in_arc) = (self.u_in, self.v_in, self.u_out, self.in_arc);
        let old_rev_thread = self.rev_thread[u_out];
        let old_succ_num = self.succ_num[u_out];
        let old_last_succ = self.last_succ[u_out];
        self.v_out = self.parent[u_out];
        let in_dir = if u_in == self.source[in_arc] { UP } else { DOWN };

        if u_in == u_out {
            // The entering arc replaces the leaving one without reversing any stem.
            self.parent[u_in] = v_in;
            self.pred[u_in] = in_arc;
            self.pred_dir[u_in] = in_dir;

            if self.thread[v_in] != u_out {
                let mut after = self.thread[old_last_succ];
                self.thread[old_rev_thread] = after;
                self.rev_thread[after] = old_rev_thread;
                after = self.thread[v_in];
                self.thread[v_in] = u_out;
                self.rev_thread[u_out] = v_in;
                self.thread[old_last_succ] = after;
                self.rev_thread[after] = old_last_succ;
            }
        } else {
            let thread_continue = if old_rev_thread == v_in {
                self.thread[old_last_succ]
            } else {
                self.thread[v_in]
            };

            // Walk the stem from u_in to u_out, reversing parents and splicing threads.
            let mut stem = u_in;
            let mut par_stem = v_in;
            let mut last = self.last_succ[u_in];
            let mut after = self.thread[last];
            self.thread[v_in] = u_in;
            self.dirty_revs.clear();
            self.dirty_revs.push(v_in);

            while stem != u_out {
                let next_stem = self.parent[stem];
                self.thread[last] = next_stem;
                self.dirty_revs.push(last);

                let before = self.rev_thread[stem];
                self.thread[before] = after;
                self.rev_thread[after] = before;

                self.parent[stem] = par_stem;
                par_stem = stem;
                stem = next_stem;

                last = if self.last_succ[stem] == self.last_succ[par_stem] {
                    self.rev_thread[par_stem]
                } else {
                    self.last_succ[stem]
                };
                after = self.thread[last];
            }

            self.parent[u_out] = par_stem;
            self.thread[last] = thread_continue;
            self.rev_thread[thread_continue] = last;
            self.last_succ[u_out] = last;

            if old_rev_thread != v_in {
                self.thread[old_rev_thread] = after;
                self.rev_thread[after] = old_rev_thread;
            }

            for i in 0..self.dirty_revs.len() {
                let u = self.dirty_revs[i];
                self.rev_thread[self.thread[u]] = u;
            }

            // Reverse pred, pred_dir and subtree sizes along the stem.
            let mut tmp_sc: isize = 0;
            let tmp_ls = self.last_succ[u_out];
            let mut u = u_out;
            let mut p = self.parent[u];
            while u != u_in {
                self.pred[u] = self.pred[p];
                self.pred_dir[u] = -self.pred_dir[p];
                tmp_sc += self.succ_num[u] - self.succ_num[p];
                self.succ_num[u] = tmp_sc;
                self.last_succ[p] = tmp_ls;
                u = p;
                p = self.parent[u];
            }
            self.pred[u_in] = in_arc;
            self.pred_dir[u_in] = in_dir;
            self.succ_num[u_in] = old_succ_num;
        }

        // Fix last_succ from v_in towards the root.
        let up_limit_out = if self.last_succ[self.join] == v_in {
            self.join
        } else {
            NONE
        };
        let last_succ_out = self.last_succ[u_out];
        let mut u = v_in;
        while u != NONE && self.last_succ[u] == v_in {
            self.last_succ[u] = last_succ_out;
            u = self.parent[u];
        }

        // Fix last_succ from v_out towards the root.
        if self.join != old_rev_thread && v_in != old_rev_thread {
            let mut u = self.v_out;
            while u != NONE && u != up_limit_out && self.last_succ[u] == old_last_succ {
                self.last_succ[u] = old_rev_thread;
                u = self.parent[u];
            }
        } else if last_succ_out != old_last_succ {
            let mut u = self.v_out;
            while u != NONE && u != up_limit_out && self.last_succ[u] == old_last_succ {
                self.last_succ[u] = last_succ_out;
                u = self.parent[u];
            }
        }

        // Subtree sizes between the old and new attachment points and the join node.
        let mut u = v_in;
        while u != self.join {
            self.succ_num[u] += old_succ_num;
            u = self.parent[u];
        }
        let mut u = self.v_out;
        while u != self.join {
            self.succ_num[u] -= old_succ_num;
            u = self.parent[u];
        }
    }

    fn update_potential(&mut self) {
        let u_in = self.u_in;
        let sigma = self.pi[self.v_in]
            - self.pi[u_in]
            - f64::from(self.pred_dir[u_in]) * self.cost[self.in_arc];
        let end = self.thread[self.last_succ[u_in]];
        let mut u = u_in;
        while u != end {
            self.pi[u] += sigma;
            u = self.thread[u];
        }
    }

    /// Cost of the flow on real arcs.
    pub fn total_cost(&self) -> Cost {
        (self.node_num..self.source.len())
            .map(|e| self.flow[e] * self.cost[e])
            .sum()
    }

    /// Mass still routed through the artificial root.
    pub fn artificial_flow(&self) -> Mass {
        self.flow[..self.node_num]
            .iter()
            .zip(&self.source[..self.node_num])
            .filter(|&(_, &s)| s == self.root)
            .map(|(f, _)| f)
            .sum()
    }

    /// Node potentials of the current basis.
    pub fn potentials(&self) -> &[Cost] {
        &self.pi[..self.node_num]
    }

    /// Number of real arc slots.
    pub fn arc_count(&self) -> usize {
        self.source.len() - self.node_num
    }

    pub fn pivots(&self) -> u64 {
        self.pivots
    }

    /// Real arcs carrying positive flow, as `(source, target, flow)`.
    pub fn flows(&self) -> impl Iterator<Item = (NodeId, NodeId, Mass)> + '_ {
        (self.node_num..self.source.len())
            .filter(|&e| self.flow[e] > 0.0)
            .map(|e| (self.source[e], self.target[e], self.flow[e]))
    }
}
