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

//! Renders analysis results for inspection.
//!
//! A [`Reporter`] borrows an [`Analysis`] and a slice of display names for
//! the non-terminals (indexed by their [`NonTerminalIdx`]); grammars parsed
//! by [`TextGrammar`](crate::ir::text::TextGrammar) provide the names via
//! [`names`](crate::ir::text::TextGrammar::names). Everything is rendered
//! from scratch on each call; the reporter holds no state of its own.
//!
//! ```
//! use lltab::ir::text::TextGrammar;
//! use lltab::backend::ll1::analyze;
//! use lltab::report::Reporter;
//!
//! let g = TextGrammar::parse("S -> a").unwrap();
//! let analysis = analyze(g.grammar()).unwrap();
//! let reporter = Reporter::new(&analysis, g.names());
//! assert_eq!(reporter.first_sets(), "FIRST(S) = { a }\n");
//! assert_eq!(reporter.follow_sets(), "FOLLOW(S) = { $ }\n");
//! ```

use std::fmt::Display;

use itertools::Itertools;

use crate::backend::ll1::{Analysis, Cell, Lookahead, Production};
use crate::ir::grammar::{NonTerminalIdx, Symbol};

/// Renders `FIRST` sets, `FOLLOW` sets, and the parse table as plain text.
pub struct Reporter<'a, A, N> {
    analysis: &'a Analysis<'a, A>,
    names: &'a [N],
}

impl<'a, A: Display + Ord + Clone, N: Display> Reporter<'a, A, N> {
    /// Wrap an analysis result with non-terminal display names.
    pub fn new(analysis: &'a Analysis<'a, A>, names: &'a [N]) -> Self {
        debug_assert_eq!(names.len(), analysis.grammar().non_terminals_count());
        Reporter { analysis, names }
    }

    /// Render all `FIRST` sets, one line per non-terminal, ε included for
    /// nullable non-terminals.
    pub fn first_sets(&self) -> String {
        let mut out = String::new();
        for (nt, first, nullable) in self.analysis.first_sets() {
            let members = first.iter().map(ToString::to_string)
                .chain(nullable.then(|| "ε".to_string()))
                .format(", ");
            out += &format!("FIRST({}) = {{ {} }}\n", self.names[nt.get()], members);
        }
        out
    }

    /// Render all `FOLLOW` sets, one line per non-terminal, the end of the
    /// input written as `$`.
    pub fn follow_sets(&self) -> String {
        let mut out = String::new();
        for (nt, follow) in self.analysis.follow_sets() {
            out += &format!("FOLLOW({}) = {{ {} }}\n",
                            self.names[nt.get()], follow.iter().format(", "));
        }
        out
    }

    /// Render the parse table as a grid: one row per non-terminal, one column
    /// per terminal (sorted) plus a final `$` column. Cells are `-` when
    /// empty, a production like `X->+TX` or `X->ε`, or all the competing
    /// productions of a conflict separated by ` / `.
    pub fn parse_table(&self) -> String {
        let g = self.analysis.grammar();
        let lookaheads: Vec<Lookahead<A>> = g.terminals().into_iter().cloned()
            .map(Lookahead::new)
            .chain(std::iter::once(Lookahead::END_OF_INPUT))
            .collect();
        let mut grid = Vec::with_capacity(g.non_terminals_count() + 1);
        grid.push(std::iter::once(String::new())
            .chain(lookaheads.iter().map(ToString::to_string))
            .collect_vec());
        for nt in (0..g.non_terminals_count()).map(NonTerminalIdx::new) {
            let mut row = vec![self.names[nt.get()].to_string()];
            for token in &lookaheads {
                row.push(match self.analysis.table().get(nt, token.clone()) {
                    None => "-".to_string(),
                    Some(Cell::Unique(p)) => self.production(p),
                    Some(Cell::Conflict(all)) =>
                        all.iter().map(|p| self.production(p)).format(" / ").to_string(),
                });
            }
            grid.push(row);
        }
        let widths = (0..grid[0].len())
            .map(|c| grid.iter().map(|row| row[c].chars().count()).max().unwrap_or(0))
            .collect_vec();
        let mut out = String::new();
        for row in &grid {
            let line = row.iter().zip(&widths)
                .map(|(cell, &width)| format!("{:<1$}", cell, width))
                .format(" | ")
                .to_string();
            out += line.trim_end();
            out.push('\n');
        }
        out
    }

    /// A production in the compact notation of the input form, e.g. `X->+TX`.
    fn production(&self, p: &Production<'a, A>) -> String {
        let mut s = format!("{}->", self.names[p.symbol.get()]);
        if p.rhs.is_empty() {
            s.push('ε');
        } else {
            for x in p.rhs.iter() {
                match x {
                    Symbol::Terminal(t) => s += &t.to_string(),
                    Symbol::NonTerminal(nt) => s += &self.names[nt.get()].to_string(),
                }
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::Reporter;
    use crate::backend::ll1::analyze;
    use crate::ir::text::TextGrammar;

    const EXPR_GRAMMAR: &str = indoc! {"
        E -> TX
        X -> +TX | ε
        T -> FY
        Y -> *FY | ε
        F -> (E) | i
    "};

    #[test]
    fn first_sets_rendering() {
        let g = TextGrammar::parse(EXPR_GRAMMAR).unwrap();
        let analysis = analyze(g.grammar()).unwrap();
        let reporter = Reporter::new(&analysis, g.names());
        assert_eq!(reporter.first_sets(), indoc! {"
            FIRST(E) = { (, i }
            FIRST(T) = { (, i }
            FIRST(X) = { +, ε }
            FIRST(F) = { (, i }
            FIRST(Y) = { *, ε }
        "});
    }

    #[test]
    fn follow_sets_rendering() {
        let g = TextGrammar::parse(EXPR_GRAMMAR).unwrap();
        let analysis = analyze(g.grammar()).unwrap();
        let reporter = Reporter::new(&analysis, g.names());
        assert_eq!(reporter.follow_sets(), indoc! {"
            FOLLOW(E) = { $, ) }
            FOLLOW(T) = { $, ), + }
            FOLLOW(X) = { $, ) }
            FOLLOW(F) = { $, ), *, + }
            FOLLOW(Y) = { $, ), + }
        "});
    }

    #[test]
    fn parse_table_rendering() {
        let g = TextGrammar::parse("S -> a").unwrap();
        let analysis = analyze(g.grammar()).unwrap();
        let reporter = Reporter::new(&analysis, g.names());
        assert_eq!(reporter.parse_table(), indoc! {"
            \x20 | a    | $
            S | S->a | -
        "});
    }

    #[test]
    fn conflicts_render_every_production() {
        let g = TextGrammar::parse("A -> aB | a\nB -> b").unwrap();
        let analysis = analyze(g.grammar()).unwrap();
        let reporter = Reporter::new(&analysis, g.names());
        assert!(!analysis.table().is_ll1());
        assert!(reporter.parse_table().contains("A->aB / A->a"));
    }

    #[test]
    fn epsilon_rules_render_as_epsilon() {
        let g = TextGrammar::parse("S -> aX\nX -> b | ε").unwrap();
        let analysis = analyze(g.grammar()).unwrap();
        let reporter = Reporter::new(&analysis, g.names());
        assert!(reporter.parse_table().contains("X->ε"));
        assert!(reporter.first_sets().contains("FIRST(X) = { b, ε }"));
    }
}
