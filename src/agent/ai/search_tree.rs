// Pruned position tree
//
// One tree is grown per candidate root move. Nodes below the minimum depth
// always expand; nodes between the minimum and maximum depth expand only while
// the line stays forcing (captures and checks). Positions live on the
// recursion stack only; the arena keeps the move, depth and evaluation of
// every node that was retained.
//
// Pruning: every node is handed the best evaluation its parent has found so
// far. Once the node's own best is something the parent would never prefer
// over that bound, the node stops refining and reports itself as cut.

use std::cmp::Ordering;

use super::context::SearchContext;
use super::evaluation::evaluate;
use super::score::{self, compare, Evaluation};
use crate::game_repr::{Move, Position, Square, Type};

/// Index of a node in its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct Node {
    /// Move that produced this node
    pub mv: Move,
    /// Plies below the position the search was asked about (root move = 1)
    pub depth: u32,
    /// Whether the move reaching this node was forcing
    pub fertile: bool,
    pub evaluation: Evaluation,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Result of expanding one node: where it lives and whether it was cut.
struct Expanded {
    id: NodeId,
    cut: bool,
}

pub struct SearchTree<'a> {
    ctx: &'a SearchContext,
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl<'a> SearchTree<'a> {
    pub fn new(ctx: &'a SearchContext) -> Self {
        Self { ctx, nodes: Vec::new(), root: None }
    }

    /// Grows the tree below `mv` played from `position`.
    ///
    /// Returns `None` if the search was cancelled before the tree was complete.
    pub fn grow(&mut self, position: &Position, mv: Move) -> Option<&Evaluation> {
        let child = position.child(mv, Type::Queen);
        let fertile = is_forcing(position, &child, &mv);
        let mut path = vec![mv];
        let expanded = self.expand(&child, mv, 1, &mut path, fertile, None)?;
        self.root = Some(expanded.id);
        Some(&self.nodes[expanded.id].evaluation)
    }

    /// Evaluation of the tree's root, once grown.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.root.map(|id| &self.nodes[id].evaluation)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.map(|id| &self.nodes[id])
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of retained nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn should_expand(&self, pos: &Position, depth: u32, fertile: bool) -> bool {
        let limits = &self.ctx.limits;
        !pos.status().is_terminal() && depth < limits.max_depth && (depth < limits.min_depth || fertile)
    }

    fn leaf(&mut self, pos: &Position, mv: Move, depth: u32, path: &[Move], fertile: bool) -> NodeId {
        self.ctx.stats.leaf();
        let value = evaluate(pos, &self.ctx.cache);
        self.push(Node {
            mv,
            depth,
            fertile,
            evaluation: Evaluation::new(value, depth, path.to_vec()),
            children: Vec::new(),
        })
    }

    fn expand(
        &mut self,
        pos: &Position,
        mv: Move,
        depth: u32,
        path: &mut Vec<Move>,
        fertile: bool,
        parent_bound: Option<&Evaluation>,
    ) -> Option<Expanded> {
        if self.ctx.is_cancelled() {
            return None;
        }
        self.ctx.stats.node();

        if !self.should_expand(pos, depth, fertile) {
            let id = self.leaf(pos, mv, depth, path, fertile);
            return Some(Expanded { id, cut: false });
        }

        let side = pos.to_move();
        let mut children: Vec<NodeId> = Vec::new();
        let mut best: Option<Evaluation> = None;
        let mut cut = false;

        'pieces: for from in origins(pos) {
            let mut retained_any = false;
            let mut fallback: Option<NodeId> = None;

            for &child_mv in pos.legal_moves_from(from) {
                let child = pos.child(child_mv, Type::Queen);
                let child_fertile = is_forcing(pos, &child, &child_mv);

                path.push(child_mv);
                let expanded = self.expand(&child, child_mv, depth + 1, path, child_fertile, best.as_ref());
                path.pop();
                let expanded = expanded?;

                if expanded.cut {
                    self.ctx.stats.prune();
                    fallback.get_or_insert(expanded.id);
                    continue;
                }

                retained_any = true;
                children.push(expanded.id);
                let evaluation = &self.nodes[expanded.id].evaluation;
                if best.as_ref().map_or(true, |b| compare(evaluation, b, side) == Ordering::Greater) {
                    best = Some(evaluation.clone());
                }

                if let (Some(b), Some(bound)) = (best.as_ref(), parent_bound) {
                    if compare(b, bound, side.opponent()) != Ordering::Greater {
                        cut = true;
                        break 'pieces;
                    }
                }
            }

            if !retained_any {
                children.extend(fallback);
            }
        }

        let evaluation = score::max(children.iter().map(|&id| &self.nodes[id].evaluation), side)
            .cloned()
            .unwrap_or_else(|| panic!("expanded node at depth {depth} retained no children"));

        let id = self.push(Node { mv, depth, fertile, evaluation, children });
        Some(Expanded { id, cut })
    }
}

/// Distinct origin squares of the legal moves, in generation order.
fn origins(pos: &Position) -> Vec<Square> {
    let mut seen: Vec<Square> = Vec::with_capacity(16);
    for mv in pos.legal_moves() {
        if !seen.contains(&mv.from) {
            seen.push(mv.from);
        }
    }
    seen
}

/// Captures, en passant and anything involving check keep a line fertile.
fn is_forcing(parent: &Position, child: &Position, mv: &Move) -> bool {
    mv.move_type.is_capture() || parent.in_check() || child.in_check()
}

/// Grows a fresh tree for `mv` and returns its evaluation.
pub fn evaluate_move(ctx: &SearchContext, position: &Position, mv: Move) -> Option<Evaluation> {
    let mut tree = SearchTree::new(ctx);
    tree.grow(position, mv).cloned()
}
