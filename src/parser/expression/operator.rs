use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Minus,
    Bang,
    Tilde,
}

impl PrefixOperator {
    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 1. Prefix operators
            Self::Minus | Self::Bang | Self::Tilde => 19,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
            Self::Tilde => write!(f, "~"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LogicalAnd,
    LogicalOr,
    EqualEqual,
    BangEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    BitAnd,
    BitOr,
}

impl InfixOperator {
    pub fn get_binding_power(&self) -> (u8, u8) {
        match self {
            // 2. Multiplicative operators
            Self::Multiply | Self::Divide | Self::Modulo => (17, 18),
            // 3. Additive operators
            Self::Add | Self::Subtract => (15, 16),
            // 4. Comparison operators
            Self::LessThan | Self::LessThanEqual | Self::GreaterThan | Self::GreaterThanEqual => {
                (13, 14)
            }
            // 5. Equality operators
            Self::EqualEqual | Self::BangEqual => (11, 12),
            // 6. Bitwise AND
            Self::BitAnd => (9, 10),
            // 7. Bitwise OR
            Self::BitOr => (7, 8),
            // 8. Logical AND
            Self::LogicalAnd => (5, 6),
            // 9. Logical OR
            Self::LogicalOr => (3, 4),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
        }
    }

    /// The prefix operator sharing this operator's symbol, if any.
    pub fn as_prefix(&self) -> Option<PrefixOperator> {
        match self {
            Self::Subtract => Some(PrefixOperator::Minus),
            _ => None,
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

impl AssignmentOperator {
    pub fn get_binding_power(&self) -> (u8, u8) {
        // 10. Assignment operators
        (2, 1)
    }

    /// The arithmetic applied to the old value before storing, `None` for plain `=`.
    pub fn as_infix(&self) -> Option<InfixOperator> {
        match self {
            Self::Assign => None,
            Self::AddAssign => Some(InfixOperator::Add),
            Self::SubtractAssign => Some(InfixOperator::Subtract),
            Self::MultiplyAssign => Some(InfixOperator::Multiply),
            Self::DivideAssign => Some(InfixOperator::Divide),
            Self::ModuloAssign => Some(InfixOperator::Modulo),
        }
    }
}

impl Display for AssignmentOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_infix() {
            Some(operator) => write!(f, "{operator}="),
            None => write!(f, "="),
        }
    }
}
