//! Backtracking evaluator for lowered grammar expressions.
//!
//! When a parser is built, the public n-ary [Expr](crate::grammar::Expr) tree
//! is lowered into an immutable arena of strictly unary/binary nodes, indexed
//! by [NodeId]. Sequences and alternations fold to the right, so
//! `and(vec![a, b, c])` becomes `And(a, And(b, c))`.
//!
//! Evaluation is push driven. Each node emits candidate results into a sink
//! callback and inspects the returned [Flow]: `Done` propagates outward and
//! stops all further exploration. The driver returns `Done` from its sink as
//! soon as a candidate covers the whole token vector, which gives the early
//! cut on total-coverage successes without the nodes having to know about it.
//!
//! Failure localization
//!
//! Each arena node has one slot in the per-parse furthest-progress table.
//! Before a node yields a failure at position `p` it consults its slot: a
//! failure strictly below the best position already yielded is a stale
//! diagnostic and is suppressed; otherwise the slot is updated to `p` and the
//! failure is yielded. Successes are never filtered. The table lives in
//! [ParseCx], not on the nodes, so a built parser stays immutable and can be
//! shared across threads.

use crate::ast::AstNode;
use crate::grammar::{Expr, GrammarError};
use crate::parsing::{ParseFailure, ParseResult};
use crate::token::IdentifiedToken;

pub(crate) type NodeId = usize;

/// Lowered grammar node. Exactly the eight evaluator operators; n-ary public
/// terms have already been folded away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Token(String),
    And(NodeId, NodeId),
    Or(NodeId, NodeId),
    Epsilon,
    Mute(NodeId),
    Optional(NodeId),
    Star(NodeId),
    Named(String, NodeId),
}

/// Whether the sink wants more candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    More,
    Done,
}

/// Per-parse evaluation state: the token vector, the caller's line number (for
/// the end-of-input sentinel when the vector is empty), and the
/// furthest-progress table indexed by [NodeId].
pub(crate) struct ParseCx<'t> {
    tokens: &'t [IdentifiedToken],
    line: usize,
    best: Vec<isize>,
}

impl<'t> ParseCx<'t> {
    pub(crate) fn new(tokens: &'t [IdentifiedToken], line: usize, node_count: usize) -> Self {
        ParseCx {
            tokens,
            line,
            best: vec![-1; node_count],
        }
    }
}

/// The lowered, immutable grammar: node arena plus root.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Engine {
    pub(crate) fn lower(root: &Expr) -> Result<Self, GrammarError> {
        let mut nodes = Vec::new();
        let root = lower_expr(root, &mut nodes)?;
        Ok(Engine { nodes, root })
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Evaluate the root at offset 0, pushing every candidate into `emit`.
    pub(crate) fn evaluate<'t>(
        &self,
        cx: &mut ParseCx<'t>,
        emit: &mut dyn FnMut(&mut ParseCx<'t>, ParseResult) -> Flow,
    ) -> Flow {
        self.eval(self.root, 0, cx, emit)
    }

    fn eval<'t>(
        &self,
        id: NodeId,
        pos: usize,
        cx: &mut ParseCx<'t>,
        emit: &mut dyn FnMut(&mut ParseCx<'t>, ParseResult) -> Flow,
    ) -> Flow {
        match &self.nodes[id] {
            Node::Epsilon => emit(cx, ParseResult::success(pos, Vec::new())),
            Node::Token(want) => match cx.tokens.get(pos) {
                Some(found) if found.id == *want => {
                    let leaf = AstNode::leaf(found.clone());
                    emit(cx, ParseResult::success(pos + 1, vec![leaf]))
                }
                Some(found) => {
                    let failure =
                        ParseResult::failure(pos, ParseFailure::new(want.clone(), found.clone()));
                    self.emit_failure(id, failure, cx, emit)
                }
                None => {
                    let actual = IdentifiedToken::end_of_input(cx.tokens.last(), cx.line);
                    let failure =
                        ParseResult::failure(pos, ParseFailure::new(want.clone(), actual));
                    self.emit_failure(id, failure, cx, emit)
                }
            },
            Node::And(a, b) => {
                let (a, b) = (*a, *b);
                self.eval(a, pos, cx, &mut |cx, left| {
                    if left.error.is_some() {
                        // Left failed: pass the failure through, skip the right
                        // branch for this candidate.
                        return self.emit_failure(id, left, cx, emit);
                    }
                    let left_ast = left.ast;
                    self.eval(b, left.new_pos, cx, &mut |cx, right| {
                        if right.error.is_some() {
                            return self.emit_failure(id, right, cx, emit);
                        }
                        let mut ast = left_ast.clone();
                        ast.extend(right.ast);
                        emit(cx, ParseResult::success(right.new_pos, ast))
                    })
                })
            }
            Node::Or(a, b) => {
                let (a, b) = (*a, *b);
                let flow = self.eval(a, pos, cx, &mut |cx, result| {
                    self.forward(id, result, cx, emit)
                });
                if flow == Flow::Done {
                    return Flow::Done;
                }
                self.eval(b, pos, cx, &mut |cx, result| {
                    self.forward(id, result, cx, emit)
                })
            }
            Node::Mute(x) => {
                let x = *x;
                self.eval(x, pos, cx, &mut |cx, result| {
                    if result.error.is_some() {
                        self.emit_failure(id, result, cx, emit)
                    } else {
                        emit(cx, ParseResult::success(result.new_pos, Vec::new()))
                    }
                })
            }
            Node::Optional(x) => {
                let x = *x;
                if emit(cx, ParseResult::success(pos, Vec::new())) == Flow::Done {
                    return Flow::Done;
                }
                self.eval(x, pos, cx, &mut |cx, result| {
                    self.forward(id, result, cx, emit)
                })
            }
            Node::Star(x) => {
                let x = *x;
                if emit(cx, ParseResult::success(pos, Vec::new())) == Flow::Done {
                    return Flow::Done;
                }
                self.star_step(id, x, pos, &[], cx, emit)
            }
            Node::Named(name, x) => {
                let x = *x;
                self.eval(x, pos, cx, &mut |cx, result| {
                    if result.error.is_some() {
                        return self.emit_failure(id, result, cx, emit);
                    }
                    let node = AstNode::structure(name.clone(), result.ast);
                    emit(cx, ParseResult::success(result.new_pos, vec![node]))
                })
            }
        }
    }

    /// One round of repetition: parse the child at `pos`, emit each cumulative
    /// candidate, and recurse from its end position.
    fn star_step<'t>(
        &self,
        id: NodeId,
        child: NodeId,
        pos: usize,
        acc: &[AstNode],
        cx: &mut ParseCx<'t>,
        emit: &mut dyn FnMut(&mut ParseCx<'t>, ParseResult) -> Flow,
    ) -> Flow {
        self.eval(child, pos, cx, &mut |cx, result| {
            if result.error.is_some() {
                // The chain ends here for this path; candidates already yielded
                // for shorter repetitions stand.
                return self.emit_failure(id, result, cx, emit);
            }
            let mut ast = acc.to_vec();
            ast.extend(result.ast);
            let next = result.new_pos;
            if emit(cx, ParseResult::success(next, ast.clone())) == Flow::Done {
                return Flow::Done;
            }
            if next == pos {
                // The child consumed nothing; iterating again could not reach
                // any new position.
                return Flow::More;
            }
            self.star_step(id, child, next, &ast, cx, emit)
        })
    }

    /// Forward a candidate unchanged, routing failures through this node's
    /// furthest-progress slot.
    fn forward<'t>(
        &self,
        id: NodeId,
        result: ParseResult,
        cx: &mut ParseCx<'t>,
        emit: &mut dyn FnMut(&mut ParseCx<'t>, ParseResult) -> Flow,
    ) -> Flow {
        if result.error.is_some() {
            self.emit_failure(id, result, cx, emit)
        } else {
            emit(cx, result)
        }
    }

    fn emit_failure<'t>(
        &self,
        id: NodeId,
        result: ParseResult,
        cx: &mut ParseCx<'t>,
        emit: &mut dyn FnMut(&mut ParseCx<'t>, ParseResult) -> Flow,
    ) -> Flow {
        let p = result.new_pos as isize;
        if p < cx.best[id] {
            return Flow::More;
        }
        cx.best[id] = p;
        emit(cx, result)
    }
}

fn push(nodes: &mut Vec<Node>, node: Node) -> NodeId {
    nodes.push(node);
    nodes.len() - 1
}

fn lower_expr(expr: &Expr, nodes: &mut Vec<Node>) -> Result<NodeId, GrammarError> {
    let node = match expr {
        Expr::Token(id) => Node::Token(id.clone()),
        Expr::Epsilon => Node::Epsilon,
        Expr::And(items) => return lower_chain(items, "and", false, nodes),
        Expr::Or(items) => return lower_chain(items, "or", true, nodes),
        Expr::Mute(inner) => Node::Mute(lower_expr(inner, nodes)?),
        Expr::Optional(inner) => Node::Optional(lower_expr(inner, nodes)?),
        Expr::Star(inner) => Node::Star(lower_expr(inner, nodes)?),
        Expr::Named(name, items) => {
            let child = lower_chain(items, "named", false, nodes)?;
            Node::Named(name.clone(), child)
        }
    };
    Ok(push(nodes, node))
}

/// Right fold of an n-ary term into binary nodes. A single item is the item
/// itself; an empty list is rejected.
fn lower_chain(
    items: &[Expr],
    op: &'static str,
    alternation: bool,
    nodes: &mut Vec<Node>,
) -> Result<NodeId, GrammarError> {
    match items {
        [] => Err(GrammarError::EmptySequence(op)),
        [only] => lower_expr(only, nodes),
        [head, rest @ ..] => {
            let left = lower_expr(head, nodes)?;
            let right = lower_chain(rest, op, alternation, nodes)?;
            let node = if alternation {
                Node::Or(left, right)
            } else {
                Node::And(left, right)
            };
            Ok(push(nodes, node))
        }
    }
}
