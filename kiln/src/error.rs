use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// An empty JSX expression container sat in a styling slot.
    EmptyExpression { context: String },
    /// A styled/css construct the pass cannot process at all. Constructs
    /// it merely cannot inline degrade to CSS variables instead.
    UnsupportedStyled { detail: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::EmptyExpression { context } => {
                write!(f, "empty JSX expression in {}", context)
            }
            CompileError::UnsupportedStyled { detail } => {
                write!(f, "unsupported styled usage: {}", detail)
            }
        }
    }
}

impl std::error::Error for CompileError {}

pub type CompileResult<T> = Result<T, CompileError>;
