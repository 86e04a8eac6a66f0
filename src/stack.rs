use std::fmt::{Debug, Formatter};
use std::iter;
use log::{debug, trace};
use crate::error::{Result, ScopeError};

/// An ordered stack of frames, the substrate shared by [`ScopeMap`](crate::ScopeMap)
/// and [`ScopeSet`](crate::ScopeSet).
///
/// Frame `0` is the root (outermost) scope and frame `depth() - 1` is the current
/// one. The root is held apart from the pushed frames, so the stack is never empty
/// and the root can never be popped.
#[derive(Clone, PartialEq, Eq)]
pub struct ScopeStack<F> {
    root: F,
    scopes: Vec<F>,
}

impl<F: Default> Default for ScopeStack<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F> ScopeStack<F> {
    pub fn new(root: F) -> Self {
        Self {
            root,
            scopes: Vec::new(),
        }
    }

    /// Number of frames, the root included. Always at least 1.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len() + 1
    }

    pub fn push(&mut self, frame: F) {
        self.scopes.push(frame);
        trace!("pushed scope, depth is now {}", self.depth());
    }

    /// Removes the current frame and hands it back.
    ///
    /// Fails with [`ScopeError::ScopeUnderflow`] when only the root is left; the
    /// stack is untouched in that case.
    pub fn pop(&mut self) -> Result<F> {
        let Some(frame) = self.scopes.pop() else {
            debug!("refusing to pop the root scope");
            return Err(ScopeError::ScopeUnderflow);
        };
        trace!("popped scope, depth is now {}", self.depth());
        Ok(frame)
    }

    #[inline]
    pub fn root(&self) -> &F {
        &self.root
    }

    #[inline]
    pub fn top(&self) -> &F {
        self.scopes.last().unwrap_or(&self.root)
    }

    #[inline]
    pub fn top_mut(&mut self) -> &mut F {
        self.scopes.last_mut().unwrap_or(&mut self.root)
    }

    pub fn frame(&self, index: usize) -> Option<&F> {
        match index {
            0 => Some(&self.root),
            _ => self.scopes.get(index - 1),
        }
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut F> {
        match index {
            0 => Some(&mut self.root),
            _ => self.scopes.get_mut(index - 1),
        }
    }

    /// Walks the frames innermost to outermost. Every call starts a fresh walk.
    pub fn frames_from_top(&self) -> impl Iterator<Item = &F> + '_ {
        self.frames_below(self.depth())
    }

    pub fn frames_from_top_mut(&mut self) -> impl Iterator<Item = &mut F> + '_ {
        let depth = self.depth();
        self.frames_below_mut(depth)
    }

    /// Walks the frames strictly below `index`, innermost first. An index at or
    /// past the depth walks the whole stack, `0` walks nothing.
    pub fn frames_below(&self, index: usize) -> impl Iterator<Item = &F> + '_ {
        let end = index.min(self.depth());
        let pushed = &self.scopes[..end.saturating_sub(1)];
        pushed.iter().rev().chain((end > 0).then_some(&self.root))
    }

    pub fn frames_below_mut(&mut self, index: usize) -> impl Iterator<Item = &mut F> + '_ {
        let end = index.min(self.depth());
        let pushed = &mut self.scopes[..end.saturating_sub(1)];
        pushed.iter_mut().rev().chain((end > 0).then_some(&mut self.root))
    }

    /// Index of the innermost frame matching `predicate`.
    pub fn position(&self, mut predicate: impl FnMut(&F) -> bool) -> Option<usize> {
        let top = self.depth() - 1;
        self.frames_from_top()
            .position(|frame| predicate(frame))
            .map(|offset| top - offset)
    }

    fn frames_from_bottom(&self) -> impl Iterator<Item = &F> + '_ {
        iter::once(&self.root).chain(self.scopes.iter())
    }
}

impl<F: Debug> Debug for ScopeStack<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.frames_from_bottom())
            .finish()
    }
}
