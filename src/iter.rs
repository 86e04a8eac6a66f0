use std::hash::Hash;
use hashbrown::HashSet;

/// Yields entries of an innermost-first walk, skipping keys already seen in an inner frame.
pub struct Visible<'a, K, I> {
    inner: I,
    seen: HashSet<&'a K>,
}

impl<'a, K, I> Visible<'a, K, I> {
    pub(crate) fn new(inner: I) -> Self {
        Self {
            inner,
            seen: HashSet::new(),
        }
    }
}

impl<'a, K, T, I> Iterator for Visible<'a, K, I>
where
    K: Hash + Eq,
    I: Iterator<Item = (&'a K, T)>,
{
    type Item = (&'a K, T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = self.inner.next()?;
            if self.seen.insert(key) {
                return Some((key, value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
