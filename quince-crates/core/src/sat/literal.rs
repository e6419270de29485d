use std::ops::Not;

use crate::containers::StorageKey;

/// A variable of the Boolean core.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BooleanVariable {
    index: u32,
}

impl BooleanVariable {
    pub const fn new(index: u32) -> BooleanVariable {
        BooleanVariable { index }
    }

    pub fn unpack(self) -> u32 {
        self.index
    }

    pub fn literal(self, is_positive: bool) -> Literal {
        Literal::new(self, is_positive)
    }

    pub fn positive(self) -> Literal {
        Literal::new(self, true)
    }

    pub fn negative(self) -> Literal {
        Literal::new(self, false)
    }
}

impl StorageKey for BooleanVariable {
    fn index(&self) -> usize {
        self.index as usize
    }

    fn create_from_index(index: usize) -> Self {
        BooleanVariable::new(index as u32)
    }
}

impl std::fmt::Display for BooleanVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.index)
    }
}

/// A signed reference to a [`BooleanVariable`], encoded as `2 * variable + (1 if negative)`.
///
/// The two literals of a variable are adjacent in the order on literals, so sorting a clause
/// puts complementary literals next to each other.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(variable: BooleanVariable, is_positive: bool) -> Literal {
        Literal {
            code: variable.index * 2 + (!is_positive) as u32,
        }
    }

    pub fn from_code(code: u32) -> Literal {
        Literal { code }
    }

    pub fn code(self) -> u32 {
        self.code
    }

    pub fn is_positive(self) -> bool {
        self.code & 1 == 0
    }

    pub fn is_negative(self) -> bool {
        self.code & 1 == 1
    }

    pub fn variable(self) -> BooleanVariable {
        BooleanVariable::new(self.code >> 1)
    }

    /// The literal in DIMACS notation: the 1-based variable index, negated for negative literals.
    pub fn to_dimacs(self) -> i64 {
        let variable = i64::from(self.variable().unpack()) + 1;
        if self.is_positive() {
            variable
        } else {
            -variable
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.code as usize
    }

    fn create_from_index(index: usize) -> Self {
        Literal::from_code(index as u32)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "~{}", self.variable())
        } else {
            write!(f, "{}", self.variable())
        }
    }
}
