use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, Hash};
use ahash::RandomState;
use hashbrown::HashSet;
use crate::error::{Result, ScopeError};
use crate::iter::Visible;
use crate::stack::ScopeStack;

/// A chain of key sets. Same scoping rules as [`ScopeMap`](crate::ScopeMap), with
/// presence as the only state.
#[derive(Clone)]
pub struct ScopeSet<T, S = RandomState> {
    stack: ScopeStack<HashSet<T, S>>,
    hash_builder: S,
}

impl<T> ScopeSet<T> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T, S: Default + Clone> Default for ScopeSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> ScopeSet<T, S> {
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeStack<HashSet<T, S>> {
        &self.stack
    }

    /// Drops the current frame and returns it. The root frame cannot be popped.
    pub fn pop_scope(&mut self) -> Result<HashSet<T, S>> {
        self.stack.pop()
    }

    pub fn push_scope_with(&mut self, frame: HashSet<T, S>) {
        self.stack.push(frame);
    }
}

impl<T, S: Clone> ScopeSet<T, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let root = HashSet::with_capacity_and_hasher(capacity, hash_builder.clone());
        Self {
            stack: ScopeStack::new(root),
            hash_builder,
        }
    }

    pub fn from_root(root: HashSet<T, S>) -> Self {
        let hash_builder = root.hasher().clone();
        Self {
            stack: ScopeStack::new(root),
            hash_builder,
        }
    }

    pub fn push_scope(&mut self) {
        let frame = HashSet::with_hasher(self.hash_builder.clone());
        self.stack.push(frame);
    }

    pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push_scope();
        let out = f(self);
        while self.depth() > depth {
            if self.stack.pop().is_err() {
                break;
            }
        }
        out
    }
}

impl<T, S> ScopeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds `value` to the current frame. Returns `false` if this frame already had it.
    pub fn add(&mut self, value: T) -> bool {
        self.stack.top_mut().insert(value)
    }

    pub fn add_at(&mut self, index: usize, value: T) -> Result<bool> {
        let depth = self.depth();
        let frame = self.stack.frame_mut(index)
            .ok_or_else(|| ScopeError::out_of_range(index, depth))?;
        Ok(frame.insert(value))
    }

    /// Returns the stored element from the innermost frame holding `value`.
    pub fn get<Q>(&self, value: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_from_top()
            .find_map(|frame| frame.get(value))
            .ok_or(ScopeError::KeyNotFound)
    }

    pub fn has<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_from_top().any(|frame| frame.contains(value))
    }

    pub fn has_local<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.top().contains(value)
    }

    /// Membership in frame `index` alone. `false` for an index past the depth.
    pub fn has_at<Q>(&self, index: usize, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frame(index)
            .is_some_and(|frame| frame.contains(value))
    }

    /// Index of the innermost frame holding `value`, `0` being the root.
    pub fn resolve<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.position(|frame| frame.contains(value))
    }

    /// Removes `value` from the innermost frame that has it.
    pub fn delete<Q>(&mut self, value: &Q) -> Result<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_from_top_mut()
            .find_map(|frame| frame.take(value))
            .ok_or(ScopeError::KeyNotFound)
    }

    pub fn delete_local<Q>(&mut self, value: &Q) -> Result<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.top_mut()
            .take(value)
            .ok_or(ScopeError::NotInCurrentScope)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let entries = self.stack.frames_from_top()
            .flat_map(|frame| frame.iter().map(|value| (value, ())));
        Visible::new(entries).map(|(value, _)| value)
    }
}

impl<T, S> PartialEq for ScopeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for ScopeSet<T, S> {}

impl<T: Debug, S> Debug for ScopeSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeSet")
            .field("scopes", &self.stack)
            .finish()
    }
}
