//! Position handles into a [`HashMap`]'s element store.
//!
//! A cursor is a map reference plus a position. It is not tied to a
//! particular element: it names whatever currently sits at that position.
//! Insertion may rebuild the index and removal moves the last element into
//! the vacated position, so a position obtained before a structural
//! mutation (insert of a new key, removal, `get_or_insert_default` on a
//! missing key, `clear`) must be looked up again afterwards. The borrow
//! checker enforces this for cursors themselves; raw positions from
//! [`HashMap::get_index_of`] or [`Cursor::index`] carry no such protection.

use core::fmt::Debug;

use crate::hash_map::HashMap;

/// A read-only cursor over the entries of a [`HashMap`], in element store
/// order.
///
/// Obtained from [`HashMap::begin`], [`HashMap::end`] and [`HashMap::find`].
/// Two cursors are equal when they point at the same position of the same
/// map.
///
/// # Examples
///
/// ```rust
/// # use dense_hash::HashMap;
/// #
/// let map: HashMap<i32, &str> = HashMap::from([(1, "a"), (2, "b"), (3, "c")]);
///
/// let mut cursor = map.begin();
/// let mut seen = Vec::new();
/// while cursor != map.end() {
///     seen.push(*cursor.key().unwrap());
///     cursor.move_next();
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// ```
pub struct Cursor<'a, K, V, S> {
    map: &'a HashMap<K, V, S>,
    index: usize,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub(crate) fn new(map: &'a HashMap<K, V, S>, index: usize) -> Self {
        Self {
            map,
            index: index.min(map.len()),
        }
    }

    /// Returns the position this cursor points at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the cursor is past the last entry.
    pub fn is_end(&self) -> bool {
        self.index >= self.map.len()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.map.get_index(self.index)
    }

    /// Returns the key under the cursor.
    pub fn key(&self) -> Option<&'a K> {
        self.get().map(|(k, _)| k)
    }

    /// Returns the value under the cursor.
    pub fn value(&self) -> Option<&'a V> {
        self.get().map(|(_, v)| v)
    }

    /// Moves to the next position and returns the moved cursor.
    ///
    /// A cursor at the end stays at the end.
    pub fn move_next(&mut self) -> &mut Self {
        if !self.is_end() {
            self.index += 1;
        }
        self
    }

    /// Moves to the next position, returning a copy of the cursor from
    /// before the move.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::HashMap;
    /// #
    /// let map: HashMap<i32, &str> = HashMap::from([(1, "a"), (2, "b")]);
    ///
    /// let mut cursor = map.begin();
    /// let previous = cursor.advance();
    /// assert_eq!(previous.key(), Some(&1));
    /// assert_eq!(cursor.key(), Some(&2));
    /// ```
    pub fn advance(&mut self) -> Self {
        let previous = *self;
        self.move_next();
        previous
    }
}

impl<K, V, S> Clone for Cursor<'_, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, S> Copy for Cursor<'_, K, V, S> {}

impl<K, V, S> PartialEq for Cursor<'_, K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.map, other.map) && self.index == other.index
    }
}

impl<K, V, S> Eq for Cursor<'_, K, V, S> {}

impl<K, V, S> Debug for Cursor<'_, K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("entry", &self.get())
            .finish()
    }
}

/// A cursor over the entries of a [`HashMap`] that can modify values in
/// place.
///
/// Keys are never handed out mutably. Obtained from [`HashMap::begin_mut`]
/// and [`HashMap::find_mut`].
///
/// # Examples
///
/// ```rust
/// # use dense_hash::HashMap;
/// #
/// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
///
/// let mut cursor = map.begin_mut();
/// while let Some((_, value)) = cursor.get_mut() {
///     *value *= 10;
///     cursor.move_next();
/// }
///
/// assert_eq!(map.at("a"), Ok(&10));
/// assert_eq!(map.at("b"), Ok(&20));
/// ```
pub struct CursorMut<'a, K, V, S> {
    map: &'a mut HashMap<K, V, S>,
    index: usize,
}

impl<'a, K, V, S> CursorMut<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut HashMap<K, V, S>, index: usize) -> Self {
        let index = index.min(map.len());
        Self { map, index }
    }

    /// Returns the position this cursor points at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the cursor is past the last entry.
    pub fn is_end(&self) -> bool {
        self.index >= self.map.len()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.map.get_index(self.index)
    }

    /// Returns the entry under the cursor with a mutable value.
    pub fn get_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.get_index_mut(self.index)
    }

    /// Converts the cursor into the entry it points at, borrowed for the
    /// cursor's whole lifetime.
    pub fn into_mut(self) -> Option<(&'a K, &'a mut V)> {
        let Self { map, index } = self;
        map.get_index_mut(index)
    }

    /// Moves to the next position and returns the moved cursor.
    ///
    /// A cursor at the end stays at the end.
    pub fn move_next(&mut self) -> &mut Self {
        if !self.is_end() {
            self.index += 1;
        }
        self
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self.map, self.index)
    }
}

impl<K, V, S> Debug for CursorMut<'_, K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index)
            .field("entry", &self.get())
            .finish()
    }
}
