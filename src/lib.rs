//! Scope chains: stacks of hash-table frames for modelling nested lexical scopes.
//!
//! Lookups walk from the innermost frame outwards and stop at the first frame
//! holding the key. New bindings always land in the innermost frame.
//!
//! ```
//! use scopechain::{ScopeError, ScopeMap};
//!
//! let mut env = ScopeMap::new();
//! env.declare("x", 0);
//! env.push_scope();
//! env.declare("x", 1);
//! assert_eq!(env.get("x"), Ok(&1));
//! env.pop_scope()?;
//! assert_eq!(env.get("x"), Ok(&0));
//! assert_eq!(env.pop_scope(), Err(ScopeError::ScopeUnderflow));
//! # Ok::<(), ScopeError>(())
//! ```

mod error;
mod iter;
pub mod map;
pub mod set;
pub mod stack;

pub use error::{Result, ScopeError};
pub use map::ScopeMap;
pub use set::ScopeSet;
pub use stack::ScopeStack;
