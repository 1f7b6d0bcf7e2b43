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

//! Common utilities.

/// Literals for boxed slices. Equivalent to `vec![...].into_boxed_slice()`.
///
/// ```
/// # use lltab::r#box;
/// assert_eq!(r#box![1, 2, 3], vec![1, 2, 3].into_boxed_slice());
/// assert_eq!(r#box![1, 2, 3, ], vec![1, 2, 3, ].into_boxed_slice());
/// assert_eq!(r#box![42; 3], vec![42; 3].into_boxed_slice());
/// ```
#[macro_export]
macro_rules! r#box {
    ($($es: expr),* $(,)?) => {
        ::std::vec![$($es),+].into_boxed_slice()
    };
    ($e: expr; $n: expr) => {
        ::std::vec![$e; $n].into_boxed_slice()
    }
}

/// Compare references as if they were raw pointers.
pub mod by_address {
    use std::cmp::Ordering;

    /// Fast-forward to [`PartialEq`] for pointers. To be used by `Derivative`.
    #[inline(always)]
    pub fn eq<T: ?Sized>(x: &&T, y: &&T) -> bool {
        std::ptr::eq(*x, *y)
    }

    /// Fast-forward to [`PartialOrd`] for pointers. To be used by `Derivative`.
    #[inline(always)]
    pub fn partial_cmp<T: ?Sized>(x: &&T, y: &&T) -> Option<Ordering> {
        let x: *const T = *x;
        let y: *const T = *y;
        x.partial_cmp(&y)
    }

    /// Fast-forward to [`Ord`] for pointers. To be used by `Derivative`.
    #[inline(always)]
    pub fn cmp<T: ?Sized>(x: &&T, y: &&T) -> Ordering {
        let x: *const T = *x;
        let y: *const T = *y;
        x.cmp(&y)
    }
}
