//! Nondeterministic automaton arena and fragment combinators.
//!
//! Nodes live in a vector and links refer to them by [`NodeId`]; cycles
//! introduced by quantifiers are plain index loops. Every combinator works on
//! [`Fragment`]s (a start/end node pair) and returns a new fragment:
//!
//! ```text
//! concat(A, B):   A.start ─A─► A.end ─ε─► B.start ─B─► B.end
//!
//! union(A, B):          ┌─ε─► A ─ε─┐
//!                start ─┤          ├─► end
//!                       └─ε─► B ─ε─┘
//! ```

use std::ops::{BitOr, BitOrAssign};

use kwic_core::BitSet;

use super::dfa::MAX_STATES;
use crate::expr::SymbolId;

pub type NodeId = u32;

/// What a link consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Consumes nothing.
    Epsilon,
    /// Consumes any one position.
    Wildcard,
    /// Consumes one position (or one syntax group) satisfying a pooled expression.
    Symbol(SymbolId),
}

/// Markers carried by links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinkFlags(u8);

impl LinkFlags {
    pub const NONE: LinkFlags = LinkFlags(0);
    /// Taking this link records the current position as the focus candidate.
    pub const FOCUS: LinkFlags = LinkFlags(1);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_focus(self) -> bool {
        self.0 & Self::FOCUS.0 != 0
    }
}

impl BitOr for LinkFlags {
    type Output = LinkFlags;

    fn bitor(self, rhs: LinkFlags) -> LinkFlags {
        LinkFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LinkFlags {
    fn bitor_assign(&mut self, rhs: LinkFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub target: NodeId,
    pub label: Label,
    pub flags: LinkFlags,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub links: Vec<Link>,
}

/// A sub-automaton with a single entry and a single exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub start: NodeId,
    pub end: NodeId,
}

/// Upper bound on NFA nodes; larger patterns are rejected before subset
/// construction, whose closures grow with the square of the node count.
pub const MAX_NODES: usize = 1 << 14;

/// Reasons an automaton cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid repetition range {{{min},{max}}}")]
    InvalidRange { min: usize, max: usize },

    #[error("the NFA would exceed {} nodes", MAX_NODES)]
    TooManyNodes,

    #[error("the DFA would exceed {} states", MAX_STATES)]
    TooManyStates,

    #[error("out of memory")]
    OutOfMemory,
}

/// Epsilon closure of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Closure {
    pub nodes: BitSet,
    /// Members reached through an epsilon link carrying [`LinkFlags::FOCUS`].
    pub focused: BitSet,
}

impl Closure {
    pub fn empty(width: usize) -> Self {
        Self {
            nodes: BitSet::new(width),
            focused: BitSet::new(width),
        }
    }

    pub fn union_with(&mut self, other: &Closure) {
        self.nodes.union_with(&other.nodes);
        self.focused.union_with(&other.focused);
    }

    /// Flags picked up on the epsilon paths leading to `node`.
    pub fn flags(&self, node: NodeId) -> LinkFlags {
        if self.focused.contains(node as usize) {
            LinkFlags::FOCUS
        } else {
            LinkFlags::NONE
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Nfa {
    nodes: Vec<Node>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i as NodeId, n))
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::default());
        id
    }

    /// Add a link. Linking the same target with the same label again only
    /// merges the flags.
    pub fn link(&mut self, from: NodeId, to: NodeId, label: Label, flags: LinkFlags) {
        let links = &mut self.nodes[from as usize].links;
        if let Some(existing) = links
            .iter_mut()
            .find(|l| l.target == to && l.label == label)
        {
            existing.flags |= flags;
            return;
        }
        links.push(Link {
            target: to,
            label,
            flags,
        });
    }

    fn epsilon(&mut self, from: NodeId, to: NodeId) {
        self.link(from, to, Label::Epsilon, LinkFlags::NONE);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Combinators
    // ─────────────────────────────────────────────────────────────────────

    /// Two nodes joined by one `label` link.
    pub fn atomic(&mut self, label: Label) -> Fragment {
        let start = self.add_node();
        let end = self.add_node();
        self.link(start, end, label, LinkFlags::NONE);
        Fragment { start, end }
    }

    /// `a` then `b`; the joining epsilon carries `flags`.
    pub fn concat(&mut self, a: Fragment, b: Fragment, flags: LinkFlags) -> Fragment {
        self.link(a.end, b.start, Label::Epsilon, flags);
        Fragment {
            start: a.start,
            end: b.end,
        }
    }

    /// `a` or `b`.
    pub fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.add_node();
        let end = self.add_node();
        self.epsilon(start, a.start);
        self.epsilon(start, b.start);
        self.epsilon(a.end, end);
        self.epsilon(b.end, end);
        Fragment { start, end }
    }

    /// Prefix `g` with an entry whose epsilon carries the focus marker.
    pub fn focus(&mut self, g: Fragment) -> Fragment {
        let start = self.add_node();
        self.link(start, g.start, Label::Epsilon, LinkFlags::FOCUS);
        Fragment { start, end: g.end }
    }

    /// Deep copy of every node reachable from `g.start`, loops included.
    pub fn copy(&mut self, g: Fragment) -> Fragment {
        let mut clones: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let start = self.add_node();
        clones[g.start as usize] = Some(start);

        let mut stack = vec![g.start];
        while let Some(original) = stack.pop() {
            let from = clones[original as usize].unwrap_or(start);
            let links = self.nodes[original as usize].links.clone();
            for link in links {
                let to = match clones[link.target as usize] {
                    Some(to) => to,
                    None => {
                        let to = self.add_node();
                        clones[link.target as usize] = Some(to);
                        stack.push(link.target);
                        to
                    }
                };
                self.link(from, to, link.label, link.flags);
            }
        }

        let end = match clones[g.end as usize] {
            Some(end) => end,
            None => self.add_node(),
        };
        Fragment { start, end }
    }

    /// Repeat `g` between `min` and `max` times (`None` is unbounded).
    pub fn quantify(
        &mut self,
        g: Fragment,
        min: usize,
        max: Option<usize>,
    ) -> Result<Fragment, BuildError> {
        match (min, max) {
            (0, None) => {
                self.epsilon(g.start, g.end);
                self.epsilon(g.end, g.start);
                Ok(g)
            }
            (0, Some(0)) => Err(BuildError::InvalidRange { min: 0, max: 0 }),
            (0, Some(1)) => {
                self.epsilon(g.start, g.end);
                Ok(g)
            }
            (1, None) => {
                self.epsilon(g.end, g.start);
                Ok(g)
            }
            (n, None) => {
                // n + 1 copies; the last one loops and is entered but never
                // required, so the fragment ends at its start.
                self.reserve_copies(g, n, 0)?;
                let mut copies = vec![g];
                for _ in 1..=n {
                    copies.push(self.copy(g));
                }
                for i in 0..n {
                    self.epsilon(copies[i].end, copies[i + 1].start);
                }
                self.epsilon(copies[n].end, copies[n].start);
                Ok(Fragment {
                    start: copies[0].start,
                    end: copies[n].start,
                })
            }
            (n, Some(m)) if n <= m => {
                self.reserve_copies(g, m - 1, 2)?;
                let mut copies = vec![g];
                for _ in 1..m {
                    copies.push(self.copy(g));
                }
                let start = self.add_node();
                let end = self.add_node();
                self.epsilon(start, copies[0].start);
                self.epsilon(copies[m - 1].end, end);
                for i in 0..m {
                    if i > 0 {
                        self.epsilon(copies[i - 1].end, copies[i].start);
                    }
                    if i >= n {
                        self.epsilon(copies[i].start, end);
                    }
                }
                Ok(Fragment { start, end })
            }
            (n, Some(m)) => Err(BuildError::InvalidRange { min: n, max: m }),
        }
    }

    /// Make room for `copies` copies of `g` and `extra` further nodes.
    fn reserve_copies(
        &mut self,
        g: Fragment,
        copies: usize,
        extra: usize,
    ) -> Result<(), BuildError> {
        // A copy holds every node reachable from the start, plus the end when
        // it is not among them.
        let size = self.reachable_from(g.start) + 1;
        let needed = size
            .checked_mul(copies)
            .and_then(|n| n.checked_add(extra))
            .ok_or(BuildError::TooManyNodes)?;
        if self.nodes.len().saturating_add(needed) > MAX_NODES {
            return Err(BuildError::TooManyNodes);
        }
        self.nodes
            .try_reserve(needed)
            .map_err(|_| BuildError::OutOfMemory)
    }

    fn reachable_from(&self, id: NodeId) -> usize {
        let mut seen = BitSet::new(self.nodes.len());
        let mut stack = vec![id];
        seen.insert(id as usize);
        while let Some(node) = stack.pop() {
            for link in &self.nodes[node as usize].links {
                if seen.insert(link.target as usize) {
                    stack.push(link.target);
                }
            }
        }
        seen.count()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Closures
    // ─────────────────────────────────────────────────────────────────────

    /// Nodes reachable from `id` through epsilon links, `id` included.
    ///
    /// A node is marked focused when some epsilon path to it passes a focus
    /// link, so only the links leaving such nodes inherit the marker.
    pub fn epsilon_closure(&self, id: NodeId) -> Closure {
        let mut closure = Closure::empty(self.nodes.len());
        let mut stack = vec![(id, false)];
        closure.nodes.insert(id as usize);
        while let Some((node, focused)) = stack.pop() {
            for link in &self.nodes[node as usize].links {
                if link.label != Label::Epsilon {
                    continue;
                }
                let target = link.target as usize;
                let focused = focused || link.flags.is_focus();
                let fresh = closure.nodes.insert(target);
                let newly_focused = focused && closure.focused.insert(target);
                if fresh || newly_focused {
                    stack.push((link.target, focused));
                }
            }
        }
        closure
    }
}
