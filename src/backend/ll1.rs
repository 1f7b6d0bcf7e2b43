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

//! `LL(1)` backend: `FIRST`/`FOLLOW` sets and predictive parse tables.
//!
//! For each non-terminal `N`:
//! - `DEDUCE_TO_EMPTY(N)` indicates whether `N —→* ε`.
//! - `FIRST(N)` collects all terminal `a` such that `N —→* a β` (`β ∈ V*`).
//! - `FOLLOW(N)` collects all lookahead tokens `t` such that `S —→* α N t β`,
//!   with `t` possibly the end of the input.
//!
//! Below is an illustration, one can:
//! - use the [`Grammar`] API to create new grammars.
//! - use [`calc_deduce_to_empty`] to calculate `DEDUCE_TO_EMPTY`.
//! - use [`calc_first`] to calculate `FIRST`.
//! - use [`calc_follow`] to calculate `FOLLOW`.
//! - use [`analyze`] to run the whole pipeline, parse table included, and get
//!   an immutable [`Analysis`] result.
//!
//! ```
//! #![allow(non_snake_case)]
//! use lltab::r#box;
//! use lltab::ir::grammar::{Grammar, epsilon, Symbol::*};
//! use lltab::backend::ll1::{analyze, calc_deduce_to_empty, Cell, Lookahead};
//!
//! let mut symbols = None;
//! let g = Grammar::<&'static str>::build(|g| {
//!     let [E, E_, T, T_, F] = g.add_non_terminals();
//!     symbols = Some([E, E_, T, T_, F]);
//!     // E  —→ T E'
//!     g.add_rule(E, r#box![NonTerminal(T), NonTerminal(E_)]);
//!     // E' —→ + T E' | ε
//!     g.add_rule(E_, r#box![Terminal("+"), NonTerminal(T), NonTerminal(E_)]);
//!     g.add_rule(E_, epsilon());
//!     // T  —→ F T'
//!     g.add_rule(T, r#box![NonTerminal(F), NonTerminal(T_)]);
//!     // T' —→ * F T' | ε
//!     g.add_rule(T_, r#box![Terminal("*"), NonTerminal(F), NonTerminal(T_)]);
//!     g.add_rule(T_, epsilon());
//!     // F  —→ ( E ) | id
//!     g.add_rule(F, r#box![Terminal("("), NonTerminal(E), Terminal(")")]);
//!     g.add_rule(F, r#box![Terminal("id")]);
//! });
//! let [E, E_, _, _, F] = symbols.unwrap();
//!
//! let deduce_to_empty = calc_deduce_to_empty(&g);
//! assert_eq!(deduce_to_empty, r#box![false, true, false, true, false]);
//!
//! let analysis = analyze(&g).unwrap();
//! assert_eq!(analysis.first(E).to_vec(), vec!["(", "id"]);
//! assert_eq!(analysis.first(E_).to_vec(), vec!["+"]);
//! assert_eq!(analysis.follow(E).iter().cloned().collect::<Vec<_>>(),
//!            vec![Lookahead::END_OF_INPUT, Lookahead::new(")")]);
//!
//! let table = analysis.table();
//! assert!(table.is_ll1());
//! let cell = table.get(F, Lookahead::new("id")).unwrap();
//! assert!(matches!(cell, Cell::Unique(p) if *p.rhs == r#box![Terminal("id")]));
//! let cell = table.get(E_, Lookahead::END_OF_INPUT).unwrap();
//! assert!(matches!(cell, Cell::Unique(p) if p.rhs.is_empty()));
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use derivative::Derivative;
use itertools::Itertools;
use thiserror::Error;

use crate::ir::grammar::{Expr, Grammar, NonTerminalIdx, Symbol};
use crate::utils::by_address;

/// A lookahead token.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct Lookahead<A>(Option<A>);

impl<A> Lookahead<A> {
    /// This token indicated the end of the input.
    pub const END_OF_INPUT: Self = Lookahead(None);
    /// A normal token where the input stream continues.
    pub fn new(a: A) -> Self { Lookahead(Some(a)) }
    /// Converts from `&Lookahead<A>` to `Lookahead<&A>`.
    pub fn as_ref(&self) -> Lookahead<&A> { Lookahead(self.0.as_ref()) }
}

impl<A> Lookahead<&'_ A> {
    /// Converts from `Lookahead<&A>` back to an owned `Lookahead<A>`.
    pub fn cloned(self) -> Lookahead<A> where A: Clone { Lookahead(self.0.cloned()) }
}

impl<A> From<A> for Lookahead<A> {
    fn from(a: A) -> Self { Lookahead::new(a) }
}

impl<A: Display> Display for Lookahead<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            None => write!(f, "$"),
            Some(a) => write!(f, "{}", a),
        }
    }
}

/// Errors that stop the analysis pipeline.
///
/// LL(1) conflicts are deliberately not listed here: a conflicted grammar
/// still produces a full [`ParseTable`], with the conflicts recorded in it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A right-hand side references a non-terminal that has no production
    /// rules at all, so its sets cannot be defined.
    #[error("non-terminal {0} is referenced but has no production rules")]
    Undeclared(NonTerminalIdx),
    /// Computing `FIRST` for this non-terminal re-enters itself through a
    /// leftmost derivation, i.e. the grammar is left-recursive.
    #[error("left recursion detected through non-terminal {0}")]
    LeftRecursion(NonTerminalIdx),
}

/// Calculate the `DEDUCE_TO_EMPTY` set for each non-terminal.
///
/// For examples, refer to [module-level documentation](self).
pub fn calc_deduce_to_empty<A>(g: &Grammar<A>) -> Box<[bool]> {
    let mut res = vec![false; g.non_terminals_count()];
    let mut updated = true;
    while updated {
        updated = false;
        for (nt, rules) in g.non_terminals().enumerate() {
            let new_val = rules.iter().any(|expr| expr.iter()
                .all(|x| matches!(x, Symbol::NonTerminal(nt) if res[nt.get()])));
            updated |= res[nt] != new_val;
            res[nt] = new_val;
        }
    }
    res.into_boxed_slice()
}

/// Calculate `FIRST(β)` for any string `β ∈ V*`, according to the provided `FIRST` and
/// `DEDUCE_TO_EMPTY` sets. The `bool` indicates whether or not this string may deduce to empty.
pub fn first_of<'a, A>(expr: impl IntoIterator<Item = &'a Symbol<A>>,
                       first: &'a [Box<[A]>], deduce_to_empty: &[bool]) -> (BTreeSet<A>, bool)
    where A: Clone + Ord + 'a {
    let mut result = BTreeSet::new();
    let nullable = append_first_of::<_, _, _, _, [A]>(
        expr, first, deduce_to_empty, &mut result, &mut false);
    (result, nullable)
}

/// Append `FIRST(β)` to a given [`BTreeSet`] for any string `β ∈ V*`, according to the provided
/// `FIRST` and `DEDUCE_TO_EMPTY` sets. The returned `bool` indicates whether or not this input
/// string may deduce to empty.
pub fn append_first_of<'a, A, R, E, C, I>(expr: E, first: &'a [C], deduce_to_empty: &[bool],
                                          result: &mut BTreeSet<R>, updated: &mut bool) -> bool
    where A: Clone + Into<R> + 'a, R: Ord, I: 'a + ?Sized,
          E: IntoIterator<Item = &'a Symbol<A>>,
          C: Borrow<I>, &'a I: IntoIterator<Item = &'a A> {
    for x in expr {
        match x {
            Symbol::Terminal(t) => {
                *updated |= result.insert(t.clone().into());
                return false;
            }
            Symbol::NonTerminal(nt) => {
                let nt = nt.get();
                for a in first[nt].borrow() {
                    *updated |= result.insert(a.clone().into());
                }
                if !deduce_to_empty[nt] { return false; }
            }
        }
    }
    true
}

/// Calculate the `FIRST` set for each non-terminal.
///
/// For examples, refer to [module-level documentation](self).
pub fn calc_first<A: Ord + Clone>(g: &Grammar<A>, deduce_to_empty: &[bool]) -> Box<[Box<[A]>]> {
    let mut res = vec![BTreeSet::new(); g.non_terminals_count()];
    let mut updated = true;
    while updated {
        updated = false;
        for (nt, expr) in g.rules() {
            let mut cur = std::mem::take(&mut res[nt.get()]);
            append_first_of(&expr[..], &res, deduce_to_empty, &mut cur, &mut updated);
            res[nt.get()] = cur;
        }
    }
    res.into_iter().map(|s| s.into_iter().collect()).collect()
}

/// Calculate the `FOLLOW` set for each non-terminal, iterating to a global
/// fixpoint: a pass inspects every occurrence of a non-terminal `A` in any
/// rule `B —→ α A β`, appends `FIRST(β) \ {ε}`, and appends `FOLLOW(B)`
/// whenever `β` deduces to empty; passes repeat until no set changes. The
/// start symbol is seeded with [`Lookahead::END_OF_INPUT`].
///
/// One-shot memoized recursion is not enough here: `FOLLOW` sets may depend
/// on each other mutually, so only a fixpoint is correct for every grammar.
pub fn calc_follow<A: Ord + Clone>(g: &Grammar<A>, first: &[Box<[A]>], deduce_to_empty: &[bool])
                                   -> Box<[BTreeSet<Lookahead<A>>]> {
    let mut res = vec![BTreeSet::new(); g.non_terminals_count()];
    if let Some(start) = g.start_symbol() {
        res[start.get()].insert(Lookahead::END_OF_INPUT);
    }
    let mut updated = true;
    while updated {
        updated = false;
        for (lhs, expr) in g.rules() {
            for (k, x) in expr.iter().enumerate() {
                let Symbol::NonTerminal(nt) = x else { continue };
                let mut cur = std::mem::take(&mut res[nt.get()]);
                let nullable_tail = append_first_of::<_, _, _, _, [A]>(
                    &expr[k + 1..], first, deduce_to_empty, &mut cur, &mut updated);
                if nullable_tail && lhs != *nt {
                    for token in &res[lhs.get()] {
                        updated |= cur.insert(token.clone());
                    }
                }
                res[nt.get()] = cur;
            }
        }
    }
    res.into_boxed_slice()
}

/// Check that every non-terminal referenced in a right-hand side has at least
/// one production rule. Non-terminals without rules have no defined `FIRST`
/// or `FOLLOW`, so the parse table cannot be constructed.
pub fn check_undeclared<A>(g: &Grammar<A>) -> Result<(), Error> {
    for (_, expr) in g.rules() {
        for x in expr.iter() {
            if let Symbol::NonTerminal(nt) = x {
                if g.rules_of(*nt).is_empty() {
                    return Err(Error::Undeclared(*nt));
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark { Unvisited, InProgress, Finished }

/// Check the grammar for left recursion, direct or indirect, including
/// recursion only reachable through a nullable prefix (`A —→ N A x` with
/// `N —→* ε`). The walk visits, for each rule, the symbols deriving the
/// leftmost token; re-entering a non-terminal still in progress means `FIRST`
/// of that symbol depends on itself, which is reported instead of recursed
/// into.
pub fn check_left_recursion<A>(g: &Grammar<A>, deduce_to_empty: &[bool]) -> Result<(), Error> {
    fn visit<A>(g: &Grammar<A>, deduce_to_empty: &[bool],
                marks: &mut [Mark], nt: NonTerminalIdx) -> Result<(), Error> {
        marks[nt.get()] = Mark::InProgress;
        for expr in g.rules_of(nt) {
            for x in expr.iter() {
                let Symbol::NonTerminal(m) = x else { break };
                match marks[m.get()] {
                    Mark::InProgress => return Err(Error::LeftRecursion(*m)),
                    Mark::Unvisited => visit(g, deduce_to_empty, marks, *m)?,
                    Mark::Finished => {}
                }
                if !deduce_to_empty[m.get()] { break; }
            }
        }
        marks[nt.get()] = Mark::Finished;
        Ok(())
    }
    let mut marks = vec![Mark::Unvisited; g.non_terminals_count()];
    for nt in (0..g.non_terminals_count()).map(NonTerminalIdx::new) {
        if marks[nt.get()] == Mark::Unvisited {
            visit(g, deduce_to_empty, &mut marks, nt)?;
        }
    }
    Ok(())
}

/// A production rule `A —→ α`, borrowed from a [`Grammar`]. Two productions
/// are the same exactly when they borrow the same right-hand side.
#[derive(Debug)]
#[derive(Derivative)]
#[derivative(PartialEq(bound = ""), Eq(bound = ""))]
#[derivative(Clone(bound = ""), Copy(bound = ""))]
pub struct Production<'a, A> {
    /// The non-terminal on the left-hand side.
    pub symbol: NonTerminalIdx,
    /// The right-hand side; empty for an ε-production.
    #[derivative(PartialEq(compare_with = "by_address::eq"))]
    pub rhs: &'a Expr<A>,
}

impl<'a, A: Display> Display for Production<'a, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ", self.symbol)?;
        if self.rhs.is_empty() {
            write!(f, "ε")
        } else {
            write!(f, "{}", self.rhs.iter().format(" "))
        }
    }
}

/// A parse table cell that received at least one production.
#[derive(Debug)]
#[derive(Derivative)]
#[derivative(PartialEq(bound = ""), Eq(bound = ""))]
#[derivative(Clone(bound = ""))]
pub enum Cell<'a, A> {
    /// Exactly one production predicts this (non-terminal, lookahead) pair.
    Unique(Production<'a, A>),
    /// Multiple productions compete for this pair: the grammar is not LL(1).
    /// Productions are listed in rule order, without duplicates.
    Conflict(Vec<Production<'a, A>>),
}

/// The `LL(1)` parse table: a mapping from (non-terminal, lookahead) to the
/// production to apply. Pairs absent from the table are syntax errors for a
/// predictive parser.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseTable<'a, A> {
    entries: BTreeMap<(NonTerminalIdx, Lookahead<A>), Cell<'a, A>>,
}

impl<'a, A: Ord> ParseTable<'a, A> {
    /// Look up the cell for a (non-terminal, lookahead) pair.
    pub fn get(&self, nt: NonTerminalIdx, token: Lookahead<A>) -> Option<&Cell<'a, A>> {
        self.entries.get(&(nt, token))
    }

    /// Whether the grammar turned out to be LL(1), i.e. no cell received two
    /// different productions.
    pub fn is_ll1(&self) -> bool {
        self.entries.values().all(|cell| matches!(cell, Cell::Unique(_)))
    }

    /// All conflicted cells, with every production competing for them.
    pub fn conflicts(&self) -> impl Iterator<Item = (NonTerminalIdx, &Lookahead<A>, &[Production<'a, A>])> + '_ {
        self.entries.iter().filter_map(|((nt, token), cell)| match cell {
            Cell::Conflict(all) => Some((*nt, token, all.as_slice())),
            Cell::Unique(_) => None,
        })
    }

    /// Iterate over all populated cells, in (non-terminal, lookahead) order.
    pub fn iter(&self) -> impl Iterator<Item = (&(NonTerminalIdx, Lookahead<A>), &Cell<'a, A>)> + '_ {
        self.entries.iter()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether no cell is populated at all.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn write_cell<'a, A: Ord>(entries: &mut BTreeMap<(NonTerminalIdx, Lookahead<A>), Cell<'a, A>>,
                          key: (NonTerminalIdx, Lookahead<A>), prod: Production<'a, A>) {
    use std::collections::btree_map::Entry::*;
    match entries.entry(key) {
        Vacant(cell) => { cell.insert(Cell::Unique(prod)); }
        Occupied(mut cell) => {
            let replacement = match cell.get_mut() {
                Cell::Unique(existing) if *existing == prod => None,
                Cell::Unique(existing) => Some(Cell::Conflict(vec![*existing, prod])),
                Cell::Conflict(all) => {
                    if !all.contains(&prod) { all.push(prod); }
                    None
                }
            };
            if let Some(conflict) = replacement {
                *cell.get_mut() = conflict;
            }
        }
    }
}

/// Build the `LL(1)` parse table from finished `FIRST`/`FOLLOW` results.
///
/// For every rule `A —→ γ`, the cell `(A, t)` receives the rule for every
/// `t ∈ FIRST(γ)`, and additionally the cell `(A, f)` for every
/// `f ∈ FOLLOW(A)` when `γ` deduces to empty. A cell receiving two different
/// productions becomes a [`Cell::Conflict`], never a silent overwrite; the
/// table is still returned in full so the conflicts can be inspected.
pub fn build_parse_table<'a, A: Ord + Clone>(
    g: &'a Grammar<A>, first: &[Box<[A]>], deduce_to_empty: &[bool],
    follow: &[BTreeSet<Lookahead<A>>],
) -> Result<ParseTable<'a, A>, Error> {
    check_undeclared(g)?;
    let mut entries = BTreeMap::new();
    for (symbol, rhs) in g.rules() {
        let prod = Production { symbol, rhs };
        let (first_of_rhs, nullable) = first_of(&rhs[..], first, deduce_to_empty);
        for t in first_of_rhs {
            write_cell(&mut entries, (symbol, Lookahead::new(t)), prod);
        }
        if nullable {
            for token in &follow[symbol.get()] {
                write_cell(&mut entries, (symbol, token.clone()), prod);
            }
        }
    }
    Ok(ParseTable { entries })
}

/// The immutable result of the whole `LL(1)` analysis pipeline.
///
/// Every accessor is a plain lookup into tables computed exactly once by
/// [`analyze`]; nothing is ever recomputed or mutated afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct Analysis<'a, A> {
    grammar: &'a Grammar<A>,
    deduce_to_empty: Box<[bool]>,
    first: Box<[Box<[A]>]>,
    follow: Box<[BTreeSet<Lookahead<A>>]>,
    table: ParseTable<'a, A>,
}

impl<'a, A> Analysis<'a, A> {
    /// The grammar this analysis was computed for.
    pub fn grammar(&self) -> &'a Grammar<A> { self.grammar }

    /// Whether a non-terminal deduces to the empty string, i.e. whether ε is
    /// in its `FIRST` set.
    pub fn nullable(&self, nt: NonTerminalIdx) -> bool {
        self.deduce_to_empty[nt.get()]
    }

    /// The `FIRST` set of a non-terminal, sorted, without ε (see
    /// [`Analysis::nullable`] for the ε part).
    pub fn first(&self, nt: NonTerminalIdx) -> &[A] {
        &self.first[nt.get()]
    }

    /// The `FOLLOW` set of a non-terminal.
    pub fn follow(&self, nt: NonTerminalIdx) -> &BTreeSet<Lookahead<A>> {
        &self.follow[nt.get()]
    }

    /// The parse table.
    pub fn table(&self) -> &ParseTable<'a, A> { &self.table }

    /// List every non-terminal's `FIRST` set together with its nullability,
    /// in non-terminal order.
    pub fn first_sets(&self) -> impl Iterator<Item = (NonTerminalIdx, &[A], bool)> + '_ {
        self.first.iter().zip(self.deduce_to_empty.iter()).enumerate()
            .map(|(n, (first, &nullable))| (NonTerminalIdx::new(n), &first[..], nullable))
    }

    /// List every non-terminal's `FOLLOW` set, in non-terminal order.
    pub fn follow_sets(&self) -> impl Iterator<Item = (NonTerminalIdx, &BTreeSet<Lookahead<A>>)> + '_ {
        self.follow.iter().enumerate()
            .map(|(n, follow)| (NonTerminalIdx::new(n), follow))
    }
}

/// Run the whole analysis pipeline on a grammar: validate it (undeclared
/// non-terminals, left recursion), then compute `DEDUCE_TO_EMPTY`, `FIRST`,
/// `FOLLOW`, and the parse table, in that order.
///
/// The pipeline is deterministic, and running it twice on the same grammar
/// yields equal [`Analysis`] values. LL(1) conflicts are not errors: they are
/// recorded in the resulting table (see [`ParseTable::conflicts`]).
///
/// For examples, refer to [module-level documentation](self).
pub fn analyze<A: Ord + Clone>(g: &Grammar<A>) -> Result<Analysis<'_, A>, Error> {
    check_undeclared(g)?;
    let deduce_to_empty = calc_deduce_to_empty(g);
    check_left_recursion(g, &deduce_to_empty)?;
    let first = calc_first(g, &deduce_to_empty);
    let follow = calc_follow(g, &first, &deduce_to_empty);
    let table = build_parse_table(g, &first, &deduce_to_empty, &follow)?;
    Ok(Analysis { grammar: g, deduce_to_empty, first, follow, table })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#box;
    use crate::ir::grammar::{epsilon, Symbol::*};

    #[test]
    fn single_production() {
        let g = Grammar::<char>::build(|g| {
            let [s] = g.add_non_terminals();
            g.add_rule(s, r#box![Terminal('a')]);
        });
        let analysis = analyze(&g).unwrap();
        let s = g.start_symbol().unwrap();
        assert!(!analysis.nullable(s));
        assert_eq!(analysis.first(s), &['a']);
        assert_eq!(analysis.follow(s).iter().copied().collect::<Vec<_>>(),
                   vec![Lookahead::END_OF_INPUT]);
        assert_eq!(analysis.table().len(), 1);
        assert!(analysis.table().get(s, Lookahead::new('a')).is_some());
        assert!(analysis.table().get(s, Lookahead::END_OF_INPUT).is_none());
        assert!(analysis.table().is_ll1());
    }

    #[test]
    fn direct_left_recursion() {
        let g = Grammar::<char>::build(|g| {
            let [a] = g.add_non_terminals();
            // A —→ A a | b
            g.add_rule(a, r#box![NonTerminal(a), Terminal('a')]);
            g.add_rule(a, r#box![Terminal('b')]);
        });
        let a = g.start_symbol().unwrap();
        assert_eq!(analyze(&g), Err(Error::LeftRecursion(a)));
    }

    #[test]
    fn indirect_left_recursion() {
        let g = Grammar::<char>::build(|g| {
            let [a, b] = g.add_non_terminals();
            // A —→ B x, B —→ A y
            g.add_rule(a, r#box![NonTerminal(b), Terminal('x')]);
            g.add_rule(b, r#box![NonTerminal(a), Terminal('y')]);
        });
        assert!(matches!(analyze(&g), Err(Error::LeftRecursion(_))));
    }

    #[test]
    fn left_recursion_through_nullable_prefix() {
        let g = Grammar::<char>::build(|g| {
            let [a, n] = g.add_non_terminals();
            // A —→ N A x, N —→ ε: N deduces to empty, so A still derives Aα.
            g.add_rule(a, r#box![NonTerminal(n), NonTerminal(a), Terminal('x')]);
            g.add_rule(n, epsilon());
        });
        let a = g.start_symbol().unwrap();
        assert_eq!(analyze(&g), Err(Error::LeftRecursion(a)));
    }

    #[test]
    fn undeclared_non_terminal() {
        let g = Grammar::<char>::build(|g| {
            let [s, x] = g.add_non_terminals();
            // X is referenced but never given a rule.
            g.add_rule(s, r#box![Terminal('a'), NonTerminal(x)]);
        });
        let x = NonTerminalIdx::new(1);
        assert_eq!(analyze(&g), Err(Error::Undeclared(x)));
    }

    #[test]
    fn first_first_conflict() {
        let g = Grammar::<char>::build(|g| {
            let [a, b] = g.add_non_terminals();
            // A —→ a B | a
            g.add_rule(a, r#box![Terminal('a'), NonTerminal(b)]);
            g.add_rule(a, r#box![Terminal('a')]);
            g.add_rule(b, r#box![Terminal('b')]);
        });
        let analysis = analyze(&g).unwrap();
        let a = g.start_symbol().unwrap();
        assert!(!analysis.table().is_ll1());
        assert_eq!(analysis.table().conflicts().count(), 1);
        let (nt, token, prods) = analysis.table().conflicts().next().unwrap();
        assert_eq!((nt, token), (a, &Lookahead::new('a')));
        assert_eq!(prods.len(), 2);
        assert!(matches!(analysis.table().get(a, Lookahead::new('a')),
                         Some(Cell::Conflict(all)) if all.len() == 2));
    }

    #[test]
    fn follow_through_nullable_chain() {
        let mut symbols = None;
        let g = Grammar::<char>::build(|g| {
            let [s, a, b, c] = g.add_non_terminals();
            // S —→ a A, A —→ B C, B —→ ε, C —→ ε
            g.add_rule(s, r#box![Terminal('a'), NonTerminal(a)]);
            g.add_rule(a, r#box![NonTerminal(b), NonTerminal(c)]);
            g.add_rule(b, epsilon());
            g.add_rule(c, epsilon());
            symbols = Some([s, a, b, c]);
        });
        let [_, a, b, c] = symbols.unwrap();
        let analysis = analyze(&g).unwrap();
        assert_eq!(analysis.deduce_to_empty, r#box![false, true, true, true]);
        let end = BTreeSet::from([Lookahead::END_OF_INPUT]);
        for nt in [a, b, c] {
            assert_eq!(analysis.follow(nt), &end);
        }
    }

    #[test]
    fn follow_requires_iteration() {
        let mut symbols = None;
        let g = Grammar::<char>::build(|g| {
            let [s, a, b] = g.add_non_terminals();
            // S —→ a A B, A —→ b S | ε, B —→ c
            // FOLLOW(S) picks up `c` only through FOLLOW(A), which in turn
            // depends on FIRST(B); a single pass in rule order misses it.
            g.add_rule(s, r#box![Terminal('a'), NonTerminal(a), NonTerminal(b)]);
            g.add_rule(a, r#box![Terminal('b'), NonTerminal(s)]);
            g.add_rule(a, epsilon());
            g.add_rule(b, r#box![Terminal('c')]);
            symbols = Some([s, a, b]);
        });
        let [s, a, b] = symbols.unwrap();
        let analysis = analyze(&g).unwrap();
        let end_c = BTreeSet::from([Lookahead::END_OF_INPUT, Lookahead::new('c')]);
        assert_eq!(analysis.follow(s), &end_c);
        assert_eq!(analysis.follow(a),
                   &BTreeSet::from([Lookahead::new('c')]));
        assert_eq!(analysis.follow(b), &end_c);
    }

    #[test]
    fn analysis_is_deterministic() {
        let g = Grammar::<char>::build(|g| {
            let [e, x, t, y, f] = g.add_non_terminals();
            g.add_rule(e, r#box![NonTerminal(t), NonTerminal(x)]);
            g.add_rule(x, r#box![Terminal('+'), NonTerminal(t), NonTerminal(x)]);
            g.add_rule(x, epsilon());
            g.add_rule(t, r#box![NonTerminal(f), NonTerminal(y)]);
            g.add_rule(y, r#box![Terminal('*'), NonTerminal(f), NonTerminal(y)]);
            g.add_rule(y, epsilon());
            g.add_rule(f, r#box![Terminal('('), NonTerminal(e), Terminal(')')]);
            g.add_rule(f, r#box![Terminal('i')]);
        });
        assert_eq!(analyze(&g), analyze(&g));
    }
}
