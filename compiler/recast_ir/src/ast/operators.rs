//! Operators and precedence.
//!
//! Precedence levels are ordered so that a higher number binds tighter.
//! The node factory uses them to decide where parentheses are required
//! when it builds or re-fuses expressions.

/// Operator precedence levels, loosest first.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Precedence {
    Lambda,
    Assignment,
    Conditional,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Primary,
}

/// Binary operators. Chains of the same operator are stored as one
/// polyadic expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical (short-circuit)
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Mul | Self::Div | Self::Mod => Precedence::Multiplicative,
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Shl | Self::Shr => Precedence::Shift,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => Precedence::Relational,
            Self::Eq | Self::NotEq => Precedence::Equality,
            Self::BitAnd => Precedence::BitAnd,
            Self::BitXor => Precedence::BitXor,
            Self::BitOr => Precedence::BitOr,
            Self::And => Precedence::And,
            Self::Or => Precedence::Or,
        }
    }

    /// `&&` and `||`: later operands are evaluated conditionally.
    #[inline]
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// The operator whose result is the logical negation of this one, for
    /// the comparisons where that holds regardless of operand type.
    pub const fn negated(self) -> Option<BinaryOp> {
        match self {
            Self::Eq => Some(Self::NotEq),
            Self::NotEq => Some(Self::Eq),
            _ => None,
        }
    }

    /// The operator that gives the same result with swapped operands.
    pub const fn flipped(self) -> Option<BinaryOp> {
        match self {
            Self::Eq | Self::NotEq => Some(self),
            Self::Lt => Some(Self::Gt),
            Self::Gt => Some(Self::Lt),
            Self::LtEq => Some(Self::GtEq),
            Self::GtEq => Some(Self::LtEq),
            _ => None,
        }
    }
}

/// Prefix and postfix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::PreInc | Self::PostInc => "++",
            Self::PreDec | Self::PostDec => "--",
        }
    }

    #[inline]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }

    /// Increments and decrements write their operand.
    #[inline]
    pub const fn is_update(self) -> bool {
        matches!(
            self,
            Self::PreInc | Self::PreDec | Self::PostInc | Self::PostDec
        )
    }
}

/// Simple and compound assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_symbol(self) -> String {
        match self {
            Self::Assign => "=".to_owned(),
            Self::Compound(op) => format!("{}=", op.as_symbol()),
        }
    }
}
