//! Literals and variables.
use std::{fmt, ops};

/// The backing type used to represent literals and variables.
pub type LitIdx = u32;

/// A Boolean decision variable.
///
/// Variables are numbered starting from 0; this number is called the
/// variable's index. For the solver backend (and `Debug` output) variables
/// use the DIMACS convention instead, numbered in the same order but starting
/// from 1 so that a negated variable can be represented by a negative
/// integer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    index: LitIdx,
}

impl Var {
    /// The largest supported index of a variable.
    ///
    /// This is less than the backing integer type supports, leaving space for
    /// the polarity bit used by `Lit`.
    pub const MAX_INDEX: usize = (LitIdx::MAX >> 2) as usize;

    /// Variable of a given index.
    ///
    /// Panics when the index is larger than `Var::MAX_INDEX`.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        assert!(index <= Var::MAX_INDEX);
        Var {
            index: index as LitIdx,
        }
    }

    /// Index of this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Representation used in the DIMACS CNF format.
    #[inline]
    pub fn dimacs(self) -> i32 {
        (self.index + 1) as i32
    }
}

/// As in the DIMACS CNF format.
impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.dimacs(), f)
    }
}

/// As in the DIMACS CNF format.
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A Boolean literal.
///
/// A literal is a variable or the negation of a variable, encoded as two
/// times the variable's index, plus one for a positive literal.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Lit {
    code: LitIdx,
}

impl Lit {
    /// A literal for a given variable.
    ///
    /// A positive literal if the second parameter is `true`, a negative
    /// literal otherwise.
    #[inline]
    pub fn from_var(var: Var, positive: bool) -> Lit {
        Lit {
            code: (var.index << 1) | (positive as LitIdx),
        }
    }

    /// A literal for the variable of a given index.
    #[inline]
    pub fn from_index(index: usize, positive: bool) -> Lit {
        Lit::from_var(Var::from_index(index), positive)
    }

    /// The variable of this literal.
    #[inline]
    pub const fn var(self) -> Var {
        Var {
            index: self.code >> 1,
        }
    }

    /// Index of this literal's variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.var().index()
    }

    /// Whether this is a positive literal.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.code & 1 != 0
    }

    /// Whether this is a negative literal.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.code & 1 == 0
    }

    /// Representation used in the DIMACS CNF format.
    #[inline]
    pub fn dimacs(self) -> i32 {
        self.var().dimacs() * if self.is_positive() { 1 } else { -1 }
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit {
            code: self.code ^ 1,
        }
    }
}

/// As in the DIMACS CNF format.
impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.dimacs(), f)
    }
}

/// As in the DIMACS CNF format.
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_dimacs_numbering() {
        assert_eq!(Var::from_index(0).dimacs(), 1);
        assert_eq!(Var::from_index(41).dimacs(), 42);
    }

    #[test]
    fn literal_polarity_and_negation() {
        let lit = Lit::from_index(3, true);
        assert!(lit.is_positive());
        assert_eq!(lit.dimacs(), 4);

        let negated = !lit;
        assert!(negated.is_negative());
        assert_eq!(negated.dimacs(), -4);
        assert_eq!(negated.var(), lit.var());
        assert_eq!(!negated, lit);
    }
}
