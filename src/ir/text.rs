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

//! Textual grammar notation.
//!
//! Grammars are written one non-terminal per line, `A -> α | β | …`, where
//! every symbol is a single character: uppercase ASCII letters are
//! non-terminals, [`EPSILON`] is the empty string, and every other non-space
//! character is a terminal. Alternatives are split on `|` before they reach
//! the [`GrammarBuilder`], so each alternative becomes one production rule.
//!
//! Non-terminals are interned in order of first appearance, the left-hand
//! side of a line before its right-hand side; the first line therefore fixes
//! the start symbol. A non-terminal that only ever appears on right-hand
//! sides parses fine but is rejected later, at table-construction time.
//!
//! ```
//! use lltab::ir::text::TextGrammar;
//!
//! let g = TextGrammar::parse("S -> aS | b").unwrap();
//! assert_eq!(g.names(), &['S']);
//! assert_eq!(g.grammar().rules_count(), 2);
//! assert_eq!(g.name_of(g.grammar().start_symbol().unwrap()), 'S');
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::ir::grammar::{Grammar, GrammarBuilder, NonTerminalIdx, Symbol};

/// The reserved symbol for the empty string.
pub const EPSILON: char = 'ε';

/// Errors of the textual grammar notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A non-blank line does not contain the `->` arrow.
    #[error("missing `->` in rule line {0:?}")]
    MissingArrow(String),
    /// The left-hand side of a rule is not a single uppercase letter.
    #[error("left-hand side must be a single uppercase letter, got {0:?}")]
    InvalidLhs(String),
    /// An alternative on the right-hand side contains no symbols at all.
    /// The empty string is spelled [`EPSILON`], never left blank.
    #[error("empty alternative in the rules for `{0}`")]
    EmptyAlternative(char),
}

/// A [`Grammar`] parsed from the textual notation, together with the names
/// of its non-terminals (indexed by [`NonTerminalIdx`]).
#[derive(Debug, Eq, PartialEq)]
pub struct TextGrammar {
    grammar: Grammar<char>,
    names: Box<[char]>,
}

fn intern(builder: &mut GrammarBuilder<char>, names: &mut Vec<char>,
          index: &mut BTreeMap<char, NonTerminalIdx>, name: char) -> NonTerminalIdx {
    *index.entry(name).or_insert_with(|| {
        names.push(name);
        builder.add_non_terminal()
    })
}

impl TextGrammar {
    /// Parse a whole grammar, one non-terminal per line. Blank lines are
    /// skipped; repeated lines for the same non-terminal append alternatives.
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let mut builder = GrammarBuilder::new();
        let mut names = Vec::new();
        let mut index = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() { continue; }
            let (lhs, rhs) = line.split_once("->")
                .ok_or_else(|| SyntaxError::MissingArrow(line.to_string()))?;
            let lhs = lhs.trim();
            let mut lhs_chars = lhs.chars();
            let name = match (lhs_chars.next(), lhs_chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => c,
                _ => return Err(SyntaxError::InvalidLhs(lhs.to_string())),
            };
            let nt = intern(&mut builder, &mut names, &mut index, name);
            for alt in rhs.split('|') {
                let mut expr = Vec::new();
                let mut blank = true;
                for c in alt.chars() {
                    if c.is_whitespace() { continue; }
                    blank = false;
                    if c == EPSILON { continue; }
                    expr.push(if c.is_ascii_uppercase() {
                        Symbol::NonTerminal(intern(&mut builder, &mut names, &mut index, c))
                    } else {
                        Symbol::Terminal(c)
                    });
                }
                if blank { return Err(SyntaxError::EmptyAlternative(name)); }
                builder.add_rule(nt, expr.into_boxed_slice());
            }
        }
        Ok(TextGrammar { grammar: builder.finish(), names: names.into_boxed_slice() })
    }

    /// The parsed grammar.
    pub fn grammar(&self) -> &Grammar<char> { &self.grammar }

    /// Names of all non-terminals, in insertion order.
    pub fn names(&self) -> &[char] { &self.names }

    /// The name a non-terminal was written as.
    pub fn name_of(&self, nt: NonTerminalIdx) -> char { self.names[nt.get()] }

    /// Look up a non-terminal by its name.
    pub fn index_of(&self, name: char) -> Option<NonTerminalIdx> {
        self.names.iter().position(|&c| c == name).map(NonTerminalIdx::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#box;
    use crate::ir::grammar::Symbol::*;

    #[test]
    fn non_terminals_intern_in_order_of_first_appearance() {
        let g = TextGrammar::parse("
            E -> TX
            X -> +TX | ε
            T -> FY
            Y -> *FY | ε
            F -> (E) | i
        ").unwrap();
        assert_eq!(g.names(), &['E', 'T', 'X', 'F', 'Y']);
        assert_eq!(g.name_of(g.grammar().start_symbol().unwrap()), 'E');
        assert_eq!(g.grammar().rules_count(), 8);
        let terminals: Vec<char> = g.grammar().terminals().into_iter().copied().collect();
        assert_eq!(terminals, vec!['(', ')', '*', '+', 'i']);
    }

    #[test]
    fn epsilon_alternative_becomes_the_empty_rule() {
        let g = TextGrammar::parse("S -> aS | ε").unwrap();
        let s = g.index_of('S').unwrap();
        let rules = g.grammar().rules_of(s);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], r#box![Terminal('a'), NonTerminal(s)]);
        assert!(rules[1].is_empty());
    }

    #[test]
    fn alternatives_split_before_reaching_the_builder() {
        let g = TextGrammar::parse("A -> aB | a\nB -> b").unwrap();
        let a = g.index_of('A').unwrap();
        assert_eq!(g.grammar().rules_of(a).len(), 2);
    }

    #[test]
    fn whitespace_between_symbols_is_ignored() {
        let spaced = TextGrammar::parse("S -> a S | ε").unwrap();
        let dense = TextGrammar::parse("S -> aS|ε").unwrap();
        assert_eq!(spaced, dense);
    }

    #[test]
    fn missing_arrow_is_rejected() {
        let err = TextGrammar::parse("S = a").unwrap_err();
        assert_eq!(err, SyntaxError::MissingArrow("S = a".to_string()));
    }

    #[test]
    fn invalid_lhs_is_rejected() {
        let err = TextGrammar::parse("s -> a").unwrap_err();
        assert_eq!(err, SyntaxError::InvalidLhs("s".to_string()));
        let err = TextGrammar::parse("AB -> a").unwrap_err();
        assert_eq!(err, SyntaxError::InvalidLhs("AB".to_string()));
    }

    #[test]
    fn blank_alternative_is_rejected() {
        let err = TextGrammar::parse("S -> a |").unwrap_err();
        assert_eq!(err, SyntaxError::EmptyAlternative('S'));
    }
}
