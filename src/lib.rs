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

//! `lltab` derives the static artifacts a predictive `LL(1)` parser needs from a
//! context-free grammar: `FIRST` sets, `FOLLOW` sets, and the parse table keyed by
//! (non-terminal, lookahead token). Grammars can be built programmatically through
//! [`ir::grammar`], or parsed from the compact single-character notation in
//! [`ir::text`]; [`report`] renders the results for inspection.
//!
//! ```
//! use lltab::ir::text::TextGrammar;
//! use lltab::backend::ll1::analyze;
//! use lltab::report::Reporter;
//!
//! let g = TextGrammar::parse("
//!     E -> TX
//!     X -> +TX | ε
//!     T -> FY
//!     Y -> *FY | ε
//!     F -> (E) | i
//! ").unwrap();
//! let analysis = analyze(g.grammar()).unwrap();
//! assert!(analysis.table().is_ll1());
//!
//! let reporter = Reporter::new(&analysis, g.names());
//! assert!(reporter.first_sets().contains("FIRST(E) = { (, i }"));
//! assert!(reporter.follow_sets().contains("FOLLOW(E) = { $, ) }"));
//! ```

#![warn(missing_docs)]

pub mod utils;
pub mod ir;
pub mod backend;
pub mod report;
