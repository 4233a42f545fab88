//! Subset construction.
//!
//! Each DFA state stands for the epsilon closure of a set of NFA nodes and is
//! identified by that closure. Epsilon links never appear in the result: a
//! focus marker on an epsilon path is carried to the links leaving the nodes
//! that path reaches.

use std::collections::HashMap;

use indexmap::IndexMap;
use kwic_core::BitSet;

use super::nfa::{BuildError, Closure, Fragment, Label, LinkFlags, MAX_NODES, Nfa, NodeId};
use crate::expr::SymbolId;

pub type StateId = u32;

/// Upper bound on DFA states.
pub const MAX_STATES: usize = 1 << 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfaLink {
    /// Never [`Label::Epsilon`].
    pub label: Label,
    pub target: StateId,
    pub flags: LinkFlags,
}

#[derive(Clone, Debug)]
pub struct DfaState {
    pub closure: BitSet,
    /// Members reached through a focus link; their outgoing links carry it.
    pub focused: BitSet,
    /// Symbol links in first-encounter order, then at most one wildcard link.
    pub links: Vec<DfaLink>,
    pub is_final: bool,
    /// Offset from the match start when every path to this state agrees on
    /// it; `None` once the state is reachable by two paths or a cycle.
    pub distance: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    /// Determinize the fragment `root` of `nfa`. State 0 is the start state.
    pub fn build(nfa: &Nfa, root: Fragment) -> Result<Self, BuildError> {
        if nfa.len() > MAX_NODES {
            return Err(BuildError::TooManyNodes);
        }
        let mut closures = Vec::new();
        closures
            .try_reserve_exact(nfa.len())
            .map_err(|_| BuildError::OutOfMemory)?;
        closures.resize(nfa.len(), None);

        let mut builder = Builder {
            nfa,
            root,
            closures,
            ids: HashMap::new(),
            states: Vec::new(),
        };

        let start = builder.closure(root.start).clone();
        let (start_id, _) = builder.fetch_or_create(start)?;

        let mut worklist = vec![start_id];
        while let Some(id) = worklist.pop() {
            let created = builder.expand(id)?;
            worklist.extend(created.into_iter().rev());
        }

        let mut dfa = Dfa {
            states: builder.states,
        };
        dfa.assign_distances();
        Ok(dfa)
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id as usize]
    }

    pub fn start(&self) -> StateId {
        0
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &DfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (i as StateId, s))
    }

    /// Depth-first walk from the start state. A state reached a second time is
    /// poisoned together with everything reachable from it.
    fn assign_distances(&mut self) {
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<(StateId, Option<usize>)> = vec![(0, Some(0))];

        while let Some((id, distance)) = stack.pop() {
            let idx = id as usize;
            let next = if visited[idx] {
                if self.states[idx].distance.is_none() {
                    continue;
                }
                self.states[idx].distance = None;
                None
            } else {
                visited[idx] = true;
                self.states[idx].distance = distance;
                distance.map(|d| d + 1)
            };

            for link in self.states[idx].links.iter().rev() {
                stack.push((link.target, next));
            }
        }
    }
}

struct Builder<'a> {
    nfa: &'a Nfa,
    root: Fragment,
    closures: Vec<Option<Closure>>,
    ids: HashMap<Closure, StateId>,
    states: Vec<DfaState>,
}

impl Builder<'_> {
    fn closure(&mut self, id: NodeId) -> &Closure {
        let nfa = self.nfa;
        self.closures[id as usize].get_or_insert_with(|| nfa.epsilon_closure(id))
    }

    fn fetch_or_create(&mut self, closure: Closure) -> Result<(StateId, bool), BuildError> {
        if let Some(&id) = self.ids.get(&closure) {
            return Ok((id, false));
        }
        if self.states.len() >= MAX_STATES {
            return Err(BuildError::TooManyStates);
        }
        self.states
            .try_reserve(1)
            .map_err(|_| BuildError::OutOfMemory)?;
        self.ids
            .try_reserve(1)
            .map_err(|_| BuildError::OutOfMemory)?;

        let id = self.states.len() as StateId;
        self.states.push(DfaState {
            is_final: closure.nodes.contains(self.root.end as usize),
            closure: closure.nodes.clone(),
            focused: closure.focused.clone(),
            links: Vec::new(),
            distance: None,
        });
        self.ids.insert(closure, id);
        Ok((id, true))
    }

    /// Compute the links of state `id`; returns the states this created.
    fn expand(&mut self, id: StateId) -> Result<Vec<StateId>, BuildError> {
        let width = self.nfa.len();
        let state = &self.states[id as usize];
        let members = state.closure.clone();
        let focused = state.focused.clone();

        let mut symbols: IndexMap<SymbolId, (Closure, LinkFlags)> = IndexMap::new();
        let mut wildcard: Option<(Closure, LinkFlags)> = None;

        for member in members.iter() {
            let nfa = self.nfa;
            let inherited = if focused.contains(member) {
                LinkFlags::FOCUS
            } else {
                LinkFlags::NONE
            };
            for link in &nfa.node(member as NodeId).links {
                let slot = match link.label {
                    Label::Epsilon => continue,
                    Label::Wildcard => {
                        wildcard.get_or_insert_with(|| (Closure::empty(width), LinkFlags::NONE))
                    }
                    Label::Symbol(sym) => symbols
                        .entry(sym)
                        .or_insert_with(|| (Closure::empty(width), LinkFlags::NONE)),
                };
                slot.0.union_with(self.closure(link.target));
                slot.1 |= link.flags | inherited;
            }
        }

        let pending = symbols
            .into_iter()
            .map(|(sym, slot)| (Label::Symbol(sym), slot))
            .chain(wildcard.map(|slot| (Label::Wildcard, slot)));

        let mut links = Vec::new();
        let mut created = Vec::new();
        for (label, (target_set, flags)) in pending {
            let (target, is_new) = self.fetch_or_create(target_set)?;
            if is_new {
                created.push(target);
            }
            links.push(DfaLink {
                label,
                target,
                flags,
            });
        }

        self.states[id as usize].links = links;
        Ok(created)
    }
}
