/*
 * lltab: LL(1) grammar analysis toolkit
 * Copyright (C) 2021  Xie Ruifeng
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! IR for grammars: sets of production rules.
//!
//! A grammar is built once through [`GrammarBuilder`] and frozen into a
//! [`Grammar`] via [`GrammarBuilder::finish`]; it is never mutated afterwards.
//! The first non-terminal added is the start symbol.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

/// Terminal and non-terminal symbols.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub enum Symbol<A> {
    /// Terminals are closed terms.
    Terminal(A),
    /// Non-terminals are subscripts into [`Grammar`]s.
    ///
    /// To get a [`NonTerminalIdx`], use [`GrammarBuilder::add_non_terminal`].
    NonTerminal(NonTerminalIdx),
}

impl<A: Display> Display for Symbol<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(a) => write!(f, "{}", a),
            Symbol::NonTerminal(n) => write!(f, "{}", *n),
        }
    }
}

/// Expressions are sequences of [`Symbol::Terminal`]s and [`Symbol::NonTerminal`]s.
pub type Expr<A> = Box<[Symbol<A>]>;

/// Expression for empty strings (ε).
pub fn epsilon<A>() -> Expr<A> { Box::new([]) as _ }

/// Wrapped non-terminal, subscript into [`Grammar`]s.
///
/// Non-terminals are numbered in the order they are added to the builder;
/// the non-terminal with index 0 is the start symbol.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[must_use = "non-terminals should be used in production rules"]
pub struct NonTerminalIdx(usize);

impl Display for NonTerminalIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(NT#{})", self.0)
    }
}

impl NonTerminalIdx {
    pub(crate) const fn new(idx: usize) -> Self { NonTerminalIdx(idx) }
    pub(crate) fn get(self) -> usize { self.0 }
}

/// Builder for [`Grammar`]s.
#[derive(Debug, Eq, PartialEq)]
pub struct GrammarBuilder<A> {
    pub(crate) rules: Vec<Vec<Expr<A>>>,
}

impl<A> Default for GrammarBuilder<A> {
    fn default() -> Self {
        GrammarBuilder { rules: Vec::new() }
    }
}

impl<A> GrammarBuilder<A> {
    /// Create a new grammar builder, same as `GrammarBuilder::default`.
    pub fn new() -> Self { Default::default() }

    /// Add a new non-terminal. The first non-terminal added becomes the start
    /// symbol of the finished grammar; this is never reconsidered.
    pub fn add_non_terminal(&mut self) -> NonTerminalIdx {
        let nt = NonTerminalIdx::new(self.rules.len());
        self.rules.push(Vec::new());
        nt
    }

    /// Add many new non-terminals all at once.
    pub fn add_non_terminals<const N: usize>(&mut self) -> [NonTerminalIdx; N] {
        let mut res = [NonTerminalIdx::new(0); N];
        for nt in &mut res {
            *nt = self.add_non_terminal();
        }
        res
    }

    /// Add a new production rule to a non-terminal.
    pub fn add_rule(&mut self, nt: NonTerminalIdx, rule: Expr<A>) {
        self.rules[nt.get()].push(rule)
    }

    /// Finish building, and get the final [`Grammar`].
    #[must_use]
    pub fn finish(self) -> Grammar<A> {
        let mut all_rules = Vec::new();
        let mut indices = Vec::new();
        for mut rules in self.rules {
            indices.push(all_rules.len());
            all_rules.append(&mut rules);
        }
        indices.push(all_rules.len());
        Grammar {
            all_rules: all_rules.into_boxed_slice(),
            indices: indices.into_boxed_slice(),
        }
    }
}

/// Grammars, i.e. sets of production rules, with the first-added non-terminal
/// as the start symbol.
///
/// ```
/// use lltab::r#box;
/// use lltab::ir::grammar::{Grammar, epsilon, Symbol::*};
///
/// let g = Grammar::<char>::build(|g| {
///     let [s] = g.add_non_terminals();
///     // S —→ a S | ε
///     g.add_rule(s, r#box![Terminal('a'), NonTerminal(s)]);
///     g.add_rule(s, epsilon());
/// });
/// assert_eq!(g.non_terminals_count(), 1);
/// assert_eq!(g.rules_count(), 2);
/// assert_eq!(g.terminals().into_iter().copied().collect::<Vec<_>>(), vec!['a']);
/// ```
#[derive(Debug, Eq, PartialEq)]
pub struct Grammar<A> {
    all_rules: Box<[Expr<A>]>,
    indices: Box<[usize]>,
}

impl<A> Grammar<A> {
    /// Convenient method for building a grammar.
    pub fn build(proc: impl for<'a> FnOnce(&'a mut GrammarBuilder<A>)) -> Self {
        let mut builder = GrammarBuilder::new();
        proc(&mut builder);
        builder.finish()
    }

    /// Number of non-terminals in this grammar.
    pub fn non_terminals_count(&self) -> usize { self.indices.len() - 1 }

    /// Number of rules in this grammar.
    pub fn rules_count(&self) -> usize { self.all_rules.len() }

    /// The start symbol, i.e. the first non-terminal added to the builder.
    /// `None` for a grammar without any non-terminal.
    pub fn start_symbol(&self) -> Option<NonTerminalIdx> {
        (self.non_terminals_count() > 0).then(|| NonTerminalIdx::new(0))
    }

    /// Iterate over all the production rules in the grammar.
    pub fn rules(&self) -> impl Iterator<Item = (NonTerminalIdx, &Expr<A>)> + '_ {
        self.non_terminals().enumerate()
            .flat_map(|(n, rs)| rs.iter().map(move |e| (NonTerminalIdx::new(n), e)))
    }

    /// All the production rules of a specific non-terminal.
    pub fn rules_of(&self, nt: NonTerminalIdx) -> &[Expr<A>] {
        let l = self.indices[nt.get()];
        let r = self.indices[nt.get() + 1];
        &self.all_rules[l..r]
    }

    /// Iterate over all the production rules grouped by non-terminals.
    pub fn non_terminals(&self) -> impl Iterator<Item = &[Expr<A>]> + '_ {
        self.indices.iter().copied()
            .zip(self.indices.iter().copied().dropping(1))
            .map(move |(l, r)| &self.all_rules[l..r])
    }

    /// The set of all terminals appearing in any production rule.
    pub fn terminals(&self) -> BTreeSet<&A> where A: Ord {
        self.all_rules.iter()
            .flat_map(|expr| expr.iter())
            .filter_map(|x| match x {
                Symbol::Terminal(t) => Some(t),
                Symbol::NonTerminal(_) => None,
            })
            .collect()
    }
}
