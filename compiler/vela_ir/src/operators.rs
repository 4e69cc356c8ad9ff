//! Binary and unary operators of the expression language.

/// How an operator types its operands and whether it can short-circuit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OpCategory {
    /// `+ - * / %`: numeric promotion, numeric result (`+` may concatenate).
    Arithmetic,
    /// `< <= > >=`: numeric promotion, boolean result.
    Comparison,
    /// `== !=`: promotion when both sides are numeric, object equality otherwise.
    Equality,
    /// `&& ||`: boolean operands, right side evaluated on demand.
    ShortCircuit,
}

/// Binary operators.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Comparison
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Equality
    Eq,
    NotEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Source-level symbol, used in diagnostics and display names.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    pub const fn category(self) -> OpCategory {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem => OpCategory::Arithmetic,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => OpCategory::Comparison,
            Self::Eq | Self::NotEq => OpCategory::Equality,
            Self::And | Self::Or => OpCategory::ShortCircuit,
        }
    }

    /// Binding power for the Pratt parser.
    ///
    /// Higher binds tighter:
    /// - 5: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 3: `<` `<=` `>` `>=`
    /// - 2: `==` `!=`
    /// - 1: `&&`
    /// - 0: `||`
    pub const fn binding_power(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Rem => 5,
            Self::Add | Self::Sub => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::Eq | Self::NotEq => 2,
            Self::And => 1,
            Self::Or => 0,
        }
    }

    /// The value `&&`/`||` produces without looking at its right operand.
    ///
    /// `&&` short-circuits on `false`, `||` on `true`. `None` for the
    /// other operators.
    pub const fn short_circuit_value(self) -> Option<bool> {
        match self {
            Self::And => Some(false),
            Self::Or => Some(true),
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical not (`!x`).
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}
