use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScopeError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    #[error("cannot pop the root scope")]
    ScopeUnderflow,
    #[error("key not found in any scope")]
    KeyNotFound,
    #[error("key not found in the current scope")]
    NotInCurrentScope,
    #[error("scope {index} is out of range for a chain of depth {depth}")]
    ScopeOutOfRange {
        index: usize,
        depth: usize,
    },
}

impl ScopeError {
    #[inline]
    pub fn out_of_range(index: usize, depth: usize) -> Self {
        Self::ScopeOutOfRange {
            index,
            depth,
        }
    }
}
