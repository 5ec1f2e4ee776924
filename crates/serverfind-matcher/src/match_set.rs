/// The ordered result of one search plus a navigation cursor.
///
/// `cursor` is `Some(i)` with `i < items.len()` whenever `items` is
/// non-empty, and `None` otherwise. A set is built once per search and only
/// its cursor moves afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet<H> {
    items: Vec<H>,
    cursor: Option<usize>,
}

impl<H> MatchSet<H> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }

    /// Build a set positioned on its first item.
    pub fn from_items(items: Vec<H>) -> Self {
        let cursor = if items.is_empty() { None } else { Some(0) };
        Self { items, cursor }
    }

    /// Move to the next item, wrapping at the end. Returns the new current
    /// item, or `None` on an empty set.
    pub fn advance(&mut self) -> Option<&H> {
        let len = self.items.len();
        let next = (self.cursor? + 1) % len;
        self.cursor = Some(next);
        self.items.get(next)
    }

    pub fn current(&self) -> Option<&H> {
        self.items.get(self.cursor?)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn items(&self) -> &[H] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<H> Default for MatchSet<H> {
    fn default() -> Self {
        Self::empty()
    }
}
