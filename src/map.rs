use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, Hash};
use std::ops::Index;
use ahash::RandomState;
use hashbrown::HashMap;
use crate::error::{Result, ScopeError};
use crate::iter::Visible;
use crate::stack::ScopeStack;

/// A chain of `key -> value` frames modelling nested lexical scopes.
///
/// Bindings are created in the current (innermost) frame with [`declare`](Self::declare),
/// which shadows any outer binding of the same key. [`set`](Self::set) assigns through
/// the chain to whichever frame currently owns the visible binding.
#[derive(Clone)]
pub struct ScopeMap<K, V, S = RandomState> {
    stack: ScopeStack<HashMap<K, V, S>>,
    hash_builder: S,
}

impl<K, V> ScopeMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S: Default + Clone> Default for ScopeMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ScopeMap<K, V, S> {
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeStack<HashMap<K, V, S>> {
        &self.stack
    }

    /// Drops the current frame and returns it. The root frame cannot be popped.
    pub fn pop_scope(&mut self) -> Result<HashMap<K, V, S>> {
        self.stack.pop()
    }

    pub fn push_scope_with(&mut self, frame: HashMap<K, V, S>) {
        self.stack.push(frame);
    }
}

impl<K, V, S: Clone> ScopeMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let root = HashMap::with_capacity_and_hasher(capacity, hash_builder.clone());
        Self {
            stack: ScopeStack::new(root),
            hash_builder,
        }
    }

    /// Starts a chain whose root frame is `root`. Later frames reuse its hasher.
    pub fn from_root(root: HashMap<K, V, S>) -> Self {
        let hash_builder = root.hasher().clone();
        Self {
            stack: ScopeStack::new(root),
            hash_builder,
        }
    }

    pub fn push_scope(&mut self) {
        let frame = HashMap::with_hasher(self.hash_builder.clone());
        self.stack.push(frame);
    }

    /// Runs `f` inside a fresh scope which is popped again afterwards.
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

impl<K, V, S> ScopeMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Binds `key` in the current frame, shadowing any outer binding.
    ///
    /// Returns the value it replaced if `key` was already declared in this same frame.
    pub fn declare(&mut self, key: K, value: V) -> Option<V> {
        self.stack.top_mut().insert(key, value)
    }

    pub fn declare_at(&mut self, index: usize, key: K, value: V) -> Result<Option<V>> {
        let depth = self.depth();
        let frame = self.stack.frame_mut(index)
            .ok_or_else(|| ScopeError::out_of_range(index, depth))?;
        Ok(frame.insert(key, value))
    }

    /// Returns the value of the innermost binding of `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_below(self.depth(), key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let depth = self.depth();
        self.get_below_mut(depth, key)
    }

    /// Like [`get`](Self::get), but only looks at the frames below `index`.
    pub fn get_below<Q>(&self, index: usize, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_below(index)
            .find_map(|frame| frame.get(key))
            .ok_or(ScopeError::KeyNotFound)
    }

    pub fn get_below_mut<Q>(&mut self, index: usize, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        for frame in self.stack.frames_below_mut(index) {
            if let Some(value) = frame.get_mut(key) {
                return Ok(value);
            }
        }
        Err(ScopeError::KeyNotFound)
    }

    /// Assigns to the visible binding of `key`, in whichever frame holds it.
    ///
    /// Never creates a binding: assigning to an undeclared key fails with
    /// [`ScopeError::KeyNotFound`]. Returns the previous value.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.get_mut(key)?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_from_top().any(|frame| frame.contains_key(key))
    }

    pub fn has_local<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.top().contains_key(key)
    }

    pub fn has_at<Q>(&self, index: usize, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frame(index)
            .is_some_and(|frame| frame.contains_key(key))
    }

    /// Index of the frame holding the visible binding of `key`, `0` being the root.
    pub fn resolve<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.position(|frame| frame.contains_key(key))
    }

    /// Removes the innermost binding of `key`, uncovering any outer binding it shadowed.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.frames_from_top_mut()
            .find_map(|frame| frame.remove(key))
            .ok_or(ScopeError::KeyNotFound)
    }

    /// Removes `key` from the current frame only.
    pub fn delete_local<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stack.top_mut()
            .remove(key)
            .ok_or(ScopeError::NotInCurrentScope)
    }

    /// Visible bindings, innermost first. Shadowed bindings are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        Visible::new(self.stack.frames_from_top().flat_map(|frame| frame.iter()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

impl<K, Q, V, S> Index<&Q> for ScopeMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if no frame binds `key`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(value) => value,
            Err(_) => panic!("no binding found for key"),
        }
    }
}

impl<K, V, S> PartialEq for ScopeMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
    }
}

impl<K, V, S> Eq for ScopeMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: Debug, V: Debug, S> Debug for ScopeMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeMap")
            .field("scopes", &self.stack)
            .finish()
    }
}
