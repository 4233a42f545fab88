//! Expression evaluation against tokens, syntax groups and documents.

use kwic_core::{Corpus, Document, GroupKind, Segment};

use super::{Domain, Expr};

/// Upper bound on distinct variables in one query.
pub const MAX_VARIABLES: usize = 16;

/// Number of alternatives of each variable; zero for unused slots.
pub type VariableRanges = [usize; MAX_VARIABLES];

/// Current alternative of every variable.
///
/// Enumerated as a mixed-radix counter counting down from `range - 1` in
/// every slot, least significant slot first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bindings([usize; MAX_VARIABLES]);

impl Bindings {
    /// The first combination: every slot at its highest alternative.
    pub fn first(ranges: &VariableRanges) -> Self {
        let mut slots = [0; MAX_VARIABLES];
        for (slot, range) in slots.iter_mut().zip(ranges) {
            *slot = range.saturating_sub(1);
        }
        Self(slots)
    }

    #[inline]
    pub fn get(&self, id: usize) -> usize {
        self.0[id]
    }

    /// Step to the next combination. Returns `false` when the counter wraps
    /// around to [`Bindings::first`].
    pub fn advance(&mut self, ranges: &VariableRanges) -> bool {
        for i in 0..MAX_VARIABLES {
            if self.0[i] > 0 {
                self.0[i] -= 1;
                return true;
            }
            self.0[i] = ranges[i].saturating_sub(1);
        }
        false
    }
}

impl Expr {
    /// Evaluate a token predicate at `segment`.
    ///
    /// Phrase nodes are true here; they are dispatched to
    /// [`Expr::eval_group`] by the search engine.
    pub fn eval(&self, segment: &Segment<'_>, bindings: &Bindings) -> bool {
        match self {
            Expr::Constant(c) => *c,
            Expr::And {
                negate,
                left,
                right,
            } => negate ^ (left.eval(segment, bindings) & right.eval(segment, bindings)),
            Expr::Or {
                negate,
                left,
                right,
            } => negate ^ (left.eval(segment, bindings) | right.eval(segment, bindings)),
            Expr::Value { negate, value } => {
                let hit = match value.domain {
                    Domain::Token(attr) => segment.get(attr).is_some_and(|s| value.accepts(s)),
                    Domain::GroupType | Domain::Meta(_) => false,
                };
                negate ^ hit
            }
            Expr::Phrase { .. } => true,
            Expr::Variable { id, alternatives } => alternatives
                .get(bindings.get(*id))
                .is_some_and(|alt| alt.eval(segment, bindings)),
        }
    }

    /// Evaluate a phrase predicate against syntax group `index`.
    pub fn eval_group<C: Corpus + ?Sized>(&self, corpus: &C, index: usize) -> bool {
        let groups = corpus.syntax_groups();
        let group = &groups[index];
        match self {
            Expr::Constant(c) => *c,
            Expr::Value { negate, value } => {
                negate ^ (value.domain == Domain::GroupType && value.accepts(group.group_type))
            }
            Expr::And {
                negate,
                left,
                right,
            } => negate ^ (left.eval_group(corpus, index) && right.eval_group(corpus, index)),
            Expr::Or {
                negate,
                left,
                right,
            } => negate ^ (left.eval_group(corpus, index) || right.eval_group(corpus, index)),
            Expr::Phrase { negate, all, .. } => {
                let hit = match group.kind {
                    GroupKind::Coordination { members } => {
                        let mut members = groups[index + 1..]
                            .iter()
                            .take(members)
                            .enumerate()
                            .filter(|(_, g)| matches!(g.kind, GroupKind::Simple { .. }))
                            .map(|(offset, _)| index + 1 + offset);
                        if *all {
                            members.all(|m| self.eval_heads(corpus, m))
                        } else {
                            members.any(|m| self.eval_heads(corpus, m))
                        }
                    }
                    _ => self.eval_heads(corpus, index),
                };
                negate ^ hit
            }
            Expr::Variable { alternatives, .. } => alternatives[0].eval_group(corpus, index),
        }
    }

    /// Head constraints of a phrase node against one non-coordinated group.
    fn eval_heads<C: Corpus + ?Sized>(&self, corpus: &C, index: usize) -> bool {
        let Expr::Phrase {
            same, synh, semh, ..
        } = self
        else {
            return false;
        };
        let GroupKind::Simple {
            synh: syn_head,
            semh: sem_head,
        } = corpus.syntax_groups()[index].kind
        else {
            return false;
        };

        let bindings = Bindings::default();
        let head_holds = |expr: &Expr, head: Option<usize>| {
            head.and_then(|h| corpus.segment(h))
                .is_some_and(|seg| expr.eval(&seg, &bindings))
        };

        if let Some(expr) = synh
            && !head_holds(expr, syn_head)
        {
            return false;
        }
        if *same {
            return syn_head == sem_head;
        }
        match semh {
            Some(expr) => head_holds(expr, sem_head),
            None => true,
        }
    }

    /// Evaluate a metadata filter against a document.
    pub fn eval_document(&self, document: &Document) -> bool {
        match self {
            Expr::Constant(c) => *c,
            Expr::Value { negate, value } => {
                let hit = match value.domain {
                    Domain::Meta(key) => document.meta(key).is_some_and(|v| value.accepts(v)),
                    Domain::Token(_) | Domain::GroupType => false,
                };
                negate ^ hit
            }
            Expr::And {
                negate,
                left,
                right,
            } => negate ^ (left.eval_document(document) && right.eval_document(document)),
            Expr::Or {
                negate,
                left,
                right,
            } => negate ^ (left.eval_document(document) || right.eval_document(document)),
            Expr::Phrase { .. } => true,
            Expr::Variable { alternatives, .. } => alternatives[0].eval_document(document),
        }
    }

    /// Record the alternative count of every variable in the expression.
    pub fn variable_ranges(&self, ranges: &mut VariableRanges) {
        match self {
            Expr::Variable { id, alternatives } => ranges[*id] = alternatives.len(),
            Expr::And { left, right, .. } | Expr::Or { left, right, .. } => {
                left.variable_ranges(ranges);
                right.variable_ranges(ranges);
            }
            _ => {}
        }
    }
}
