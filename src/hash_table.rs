//! A raw hash table over a dense element store.
//!
//! This module provides [`HashTable`], the storage engine behind
//! [`HashMap`](crate::HashMap). It knows nothing about keys: every keyed
//! operation takes a precomputed hash and an equality predicate.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::Error;
use crate::policy::LoadPolicy;

#[inline(always)]
fn bucket_for(hash: u64, bucket_count: usize) -> usize {
    (hash % bucket_count as u64) as usize
}

fn empty_buckets(count: usize) -> Vec<Vec<usize>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, Vec::new);
    buckets
}

/// A stored value together with the full hash it was inserted under.
#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

/// Debug statistics for bucket index analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets in the index
    pub bucket_count: usize,
    /// Number of buckets holding no position
    pub empty_buckets: usize,
    /// Length of the longest bucket
    pub longest_chain: usize,
    /// Average length of the non-empty buckets
    pub mean_chain: f64,
    /// Buckets per element (bucket_count / populated)
    pub bucket_ratio: f64,
    /// Allocated element store slots
    pub store_capacity: usize,
    /// Bytes allocated for the element store and the index
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Index Debug Statistics ===");
        println!(
            "Population: {} in {} buckets ({:.2} buckets per element)",
            self.populated, self.bucket_count, self.bucket_ratio
        );
        println!(
            "Chains: {} empty, longest {}, mean {:.2}",
            self.empty_buckets, self.longest_chain, self.mean_chain
        );
        println!("Store capacity: {} slots", self.store_capacity);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A hash table storing its values contiguously, indexed by chained
/// position buckets.
///
/// `HashTable<V>` keeps every value in a single dense vector (the element
/// store) and maintains an index of `bucket_count` buckets, each a list of
/// positions into that vector. Like other raw tables, it requires you to
/// provide both the hash value and an equality predicate for each operation.
///
/// Removal moves the last element into the vacated position, so the store
/// never has holes and iteration simply walks the vector. The price is that
/// positions are not stable: any insert or removal may move an element or
/// rebuild the index.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use dense_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     dense_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     dense_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    entries: Vec<Slot<V>>,
    buckets: Vec<Vec<usize>>,
    policy: LoadPolicy,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("buckets", &self.buckets)
            .field("populated", &self.entries.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table using the default [`LoadPolicy`].
    ///
    /// The index starts out with [`LoadPolicy::min_buckets`] buckets, so
    /// lookups on an empty table are valid.
    pub fn new() -> Self {
        Self::with_capacity_and_policy(0, LoadPolicy::default())
    }

    /// Creates an empty table whose element store can hold `capacity`
    /// values without reallocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// assert_eq!(table.bucket_count(), table.policy().min_buckets());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, LoadPolicy::default())
    }

    /// Creates an empty table governed by `policy`.
    pub fn with_policy(policy: LoadPolicy) -> Self {
        Self::with_capacity_and_policy(0, policy)
    }

    /// Creates an empty table with the given store capacity and policy.
    pub fn with_capacity_and_policy(capacity: usize, policy: LoadPolicy) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            buckets: empty_buckets(policy.min_buckets()),
            policy,
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns how many values the element store can hold without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns the current number of buckets in the index.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the policy governing rehashes.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Replaces the rehash policy, rebuilding the index if it violates the
    /// new thresholds.
    pub fn set_policy(&mut self, policy: LoadPolicy) {
        log::debug!("load policy changed from {:?} to {:?}", self.policy, policy);
        self.policy = policy;
        self.rehash_if_needed();
    }

    #[inline(always)]
    fn bucket_of(&self, hash: u64) -> usize {
        bucket_for(hash, self.buckets.len())
    }

    /// Returns the position in the element store of the value matching `eq`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(7, |v: &u32| *v == 70).or_insert(70);
    /// table.entry(8, |v: &u32| *v == 80).or_insert(80);
    ///
    /// assert_eq!(table.find_index(8, |v| *v == 80), Some(1));
    /// assert_eq!(table.find_index(9, |v| *v == 90), None);
    /// ```
    pub fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.buckets[self.bucket_of(hash)]
            .iter()
            .copied()
            .find(|&index| {
                let slot = &self.entries[index];
                slot.hash == hash && eq(&slot.value)
            })
    }

    /// Finds a value in the table.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.find_index(hash, eq)
            .map(|index| &self.entries[index].value)
    }

    /// Finds a value in the table and returns a mutable reference to it.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        Some(&mut self.entries[index].value)
    }

    /// Returns the value stored at `index` in the element store.
    pub fn get_index(&self, index: usize) -> Option<&V> {
        self.entries.get(index).map(|slot| &slot.value)
    }

    /// Returns a mutable reference to the value stored at `index`.
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut V> {
        self.entries.get_mut(index).map(|slot| &mut slot.value)
    }

    /// Gets the entry for the value matching `eq`, for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::hash_table::Entry;
    /// # use dense_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<(u32, &str)> = HashTable::new();
    ///
    /// match table.entry(1, |(k, _)| *k == 1) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((1, "one"));
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// assert!(matches!(table.entry(1, |(k, _)| *k == 1), Entry::Occupied(_)));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_index(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Appends a value known to be absent and returns its position.
    ///
    /// The position is not moved by the rehash check that follows: rebuilds
    /// only touch the index.
    fn push(&mut self, hash: u64, value: V) -> usize {
        let index = self.entries.len();
        let bucket = self.bucket_of(hash);
        self.entries.push(Slot { hash, value });
        self.buckets[bucket].push(index);
        self.rehash_if_needed();
        index
    }

    /// Removes the value matching `eq` from the table and returns it.
    ///
    /// The last value in the element store is moved into the vacated
    /// position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |v: &u32| *v == 10).or_insert(10);
    /// table.entry(2, |v: &u32| *v == 20).or_insert(20);
    ///
    /// assert_eq!(table.remove(1, |v| *v == 10), Some(10));
    /// assert_eq!(table.remove(1, |v| *v == 10), None);
    /// assert_eq!(table.get_index(0), Some(&20));
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        Some(self.swap_remove_at(index))
    }

    /// Removes the value at `index` in the element store, moving the last
    /// value into its place.
    pub fn swap_remove_index(&mut self, index: usize) -> Option<V> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.swap_remove_at(index))
    }

    /// Removes and returns the last value in the element store.
    pub fn pop(&mut self) -> Option<V> {
        let last = self.entries.len().checked_sub(1)?;
        Some(self.swap_remove_at(last))
    }

    /// Caller guarantees `index < len`.
    fn swap_remove_at(&mut self, index: usize) -> V {
        let last = self.entries.len() - 1;

        self.unlink(self.entries[index].hash, index);
        if index != last {
            self.relink(self.entries[last].hash, last, index);
        }

        let slot = self.entries.swap_remove(index);
        self.rehash_if_needed();
        slot.value
    }

    /// Drops `index` from the bucket of `hash`.
    fn unlink(&mut self, hash: u64, index: usize) {
        let bucket = self.bucket_of(hash);
        let chain = &mut self.buckets[bucket];
        let found = chain.iter().position(|&i| i == index);
        debug_assert!(found.is_some(), "position {index} missing from bucket {bucket}");
        if let Some(at) = found {
            chain.swap_remove(at);
        }
    }

    /// Rewrites the `from` entry in the bucket of `hash` to `to`.
    fn relink(&mut self, hash: u64, from: usize, to: usize) {
        let bucket = self.bucket_of(hash);
        let found = self.buckets[bucket].iter_mut().find(|i| **i == from);
        debug_assert!(found.is_some(), "position {from} missing from bucket {bucket}");
        if let Some(slot) = found {
            *slot = to;
        }
    }

    /// Retains only the values for which `keep` returns `true`.
    ///
    /// Removed positions are filled from the end of the store, so the values
    /// that survive may change position.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut V) -> bool) {
        let mut index = 0;
        while index < self.entries.len() {
            if keep(&mut self.entries[index].value) {
                index += 1;
            } else {
                // The element moved into `index` still has to be examined.
                self.swap_remove_at(index);
            }
        }
    }

    /// Removes all values from the table.
    ///
    /// The element store keeps its allocation; the index drops back to
    /// [`LoadPolicy::min_buckets`] buckets.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.reset_index();
    }

    fn reset_index(&mut self) {
        self.buckets = empty_buckets(self.policy.min_buckets());
    }

    /// Reserves capacity for at least `additional` more values in the
    /// element store.
    ///
    /// The index is sized by the load policy alone and is not affected.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reserve`] if the capacity overflows or the allocator
    /// reports a failure. The table is unchanged in that case.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.entries.try_reserve(additional)?;
        Ok(())
    }

    /// Shrinks the element store and every bucket to fit their contents.
    pub fn shrink_to_fit(&mut self) {
        log::trace!(
            "shrinking store from {} to {} slots",
            self.entries.capacity(),
            self.entries.len()
        );
        self.entries.shrink_to_fit();
        for chain in &mut self.buckets {
            chain.shrink_to_fit();
        }
    }

    /// Rebuilds the index if the current bucket count violates the policy.
    /// Returns `true` if a rebuild happened.
    fn rehash_if_needed(&mut self) -> bool {
        let len = self.entries.len();
        let bucket_count = self.buckets.len();
        if !self.policy.needs_rehash(bucket_count, len) {
            return false;
        }

        let target = self.policy.target_buckets(len);
        if target == bucket_count {
            return false;
        }

        self.rebuild(target);
        true
    }

    /// Replaces the index with a fresh one of `bucket_count` buckets.
    ///
    /// The new index is fully populated before it is swapped in, and the
    /// element store is never touched.
    fn rebuild(&mut self, bucket_count: usize) {
        log::trace!(
            "rebuilding index: {} -> {} buckets for {} elements",
            self.buckets.len(),
            bucket_count,
            self.entries.len()
        );

        let mut buckets = empty_buckets(bucket_count);
        for (index, slot) in self.entries.iter().enumerate() {
            buckets[bucket_for(slot.hash, bucket_count)].push(index);
        }
        self.buckets = buckets;
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in element store order: insertion order, except
    /// where a removal moved the last value into a vacated position.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator yielding mutable references to all values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.entries.iter_mut(),
        }
    }

    /// Removes all values from the table, returning them as an iterator.
    ///
    /// The index is reset up front; values not consumed are dropped with the
    /// iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |v: &u8| *v == 1).or_insert(1);
    /// table.entry(2, |v: &u8| *v == 2).or_insert(2);
    ///
    /// let drained: Vec<u8> = table.drain().collect();
    /// assert_eq!(drained, vec![1, 2]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.reset_index();
        Drain {
            inner: self.entries.drain(..),
        }
    }

    /// Computes how many buckets hold each chain length.
    ///
    /// Index `i` of the result counts the buckets holding exactly `i`
    /// positions.
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for chain in &self.buckets {
            hist[chain.len()] += 1;
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let populated = self.entries.len();
        let bucket_count = self.buckets.len();
        let empty_buckets = self.buckets.iter().filter(|chain| chain.is_empty()).count();
        let used = bucket_count - empty_buckets;
        let positions: usize = self.buckets.iter().map(Vec::len).sum();

        DebugStats {
            populated,
            bucket_count,
            empty_buckets,
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            mean_chain: if used == 0 {
                0.0
            } else {
                positions as f64 / used as f64
            },
            bucket_ratio: if populated == 0 {
                0.0
            } else {
                bucket_count as f64 / populated as f64
            },
            store_capacity: self.entries.capacity(),
            total_bytes: self.entries.capacity() * core::mem::size_of::<Slot<V>>()
                + self.buckets.capacity() * core::mem::size_of::<Vec<usize>>()
                + self
                    .buckets
                    .iter()
                    .map(|chain| chain.capacity() * core::mem::size_of::<usize>())
                    .sum::<usize>(),
        }
    }

    /// Pretty-prints the chain length histogram using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_bucket_histogram(&self) {
        let hist = self.bucket_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        println!("chain length histogram ({} buckets):", self.buckets.len());
        for (length, &count) in hist.iter().enumerate() {
            let width = if max == 0 { 0 } else { count * 60 / max };
            println!("{length:>4} | {:<60} {count}", "█".repeat(width));
        }
    }

    /// Asserts the index and the store agree, and that the sizing policy
    /// holds.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let bucket_count = self.buckets.len();
        let mut seen = alloc::vec![0usize; self.entries.len()];

        for (bucket, chain) in self.buckets.iter().enumerate() {
            for &index in chain {
                assert!(index < self.entries.len(), "stale position {index}");
                assert_eq!(
                    bucket_for(self.entries[index].hash, bucket_count),
                    bucket,
                    "position {index} filed under the wrong bucket"
                );
                seen[index] += 1;
            }
        }
        assert!(
            seen.iter().all(|&count| count == 1),
            "every position must be indexed exactly once: {seen:?}"
        );
        assert!(
            !self.policy.needs_rehash(bucket_count, self.entries.len()),
            "{} buckets for {} elements violates {:?}",
            bucket_count,
            self.entries.len(),
            self.policy
        );
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the table, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry will be inserted under.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts a value into the table and returns a mutable reference to it.
    ///
    /// The value is appended to the element store; the reference is taken
    /// after any rebuild the insertion triggered.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let index = table.push(self.hash, value);
        &mut table.entries[index].value
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the position of the entry in the element store.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.entries[self.index].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.entries[self.index].value
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        let Self { table, index } = self;
        &mut table.entries[index].value
    }

    /// Removes the value from the table, moving the last value into its
    /// position.
    pub fn remove(self) -> V {
        self.table.swap_remove_at(self.index)
    }
}

/// An iterator over the values of a [`HashTable`], in element store order.
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| &slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| &mut slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    inner: alloc::vec::Drain<'a, Slot<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<Slot<V>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;
    use test_log::test;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn insert_item(table: &mut HashTable<Item>, state: &HashState, key: u64, value: i32) -> bool {
        match table.entry(hash_key(state, key), |v| v.key == key) {
            Entry::Vacant(v) => {
                v.insert(Item { key, value });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn balanced() -> LoadPolicy {
        LoadPolicy::new(3, 2, 3).unwrap()
    }

    #[test]
    fn empty_table_has_floor_buckets() {
        let table: HashTable<Item> = HashTable::with_policy(balanced());
        assert_eq!(table.bucket_count(), 3);
        assert!(table.is_empty());
        assert!(table.find(12345, |_| true).is_none());
        table.assert_consistent();
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..32u64 {
            assert!(insert_item(&mut table, &state, k, (k as i32) * 2));
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
            table.assert_consistent();
        }
        assert_eq!(table.len(), 32);

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(&state, k);

        assert!(insert_item(&mut table, &state, k, 7));

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                assert_eq!(occ.index(), 0);
                occ.get_mut().value = 11;
            }
            Entry::Vacant(_) => panic!("second lookup should be occupied"),
        }

        assert!(!insert_item(&mut table, &state, k, 99));
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
    }

    #[test]
    fn insertion_order_is_store_order() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..50u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        let keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn remove_moves_last_into_hole() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        let removed = table.remove(hash_key(&state, 1), |v| v.key == 1);
        assert_eq!(removed, Some(Item { key: 1, value: 1 }));
        table.assert_consistent();

        let keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(keys, vec![0, 4, 2, 3]);
        assert_eq!(table.find_index(hash_key(&state, 4), |v| v.key == 4), Some(1));
    }

    #[test]
    fn remove_last_skips_relink() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..4u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        assert_eq!(table.remove(hash_key(&state, 3), |v| v.key == 3).map(|v| v.key), Some(3));
        table.assert_consistent();

        let keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(keys, vec![0, 1, 2]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        insert_item(&mut table, &state, 1, 1);

        assert!(table.remove(hash_key(&state, 2), |v| v.key == 2).is_none());
        assert!(table.swap_remove_index(1).is_none());
        assert_eq!(table.len(), 1);
        table.assert_consistent();
    }

    #[test]
    fn grows_and_shrinks_with_population() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());

        for k in 0..1000u64 {
            insert_item(&mut table, &state, k, k as i32);
            table.assert_consistent();
        }
        assert!(table.bucket_count() * 2 >= 1000);

        for k in 0..1000u64 {
            assert!(table.remove(hash_key(&state, k), |v| v.key == k).is_some());
            table.assert_consistent();
        }
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), 3);
    }

    #[test]
    fn explicit_collision() {
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());

        for k in 0..200u64 {
            match table.entry(0, |v| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: k as i32,
                    });
                }
                Entry::Occupied(_) => unreachable!(),
            }
        }
        table.assert_consistent();

        let stats = table.debug_stats();
        assert_eq!(stats.longest_chain, 200);
        assert_eq!(stats.empty_buckets, stats.bucket_count - 1);

        for k in (0..200u64).step_by(3) {
            assert_eq!(table.remove(0, |v| v.key == k).map(|v| v.key), Some(k));
        }
        table.assert_consistent();

        for k in 0..200u64 {
            assert_eq!(table.find(0, |v| v.key == k).is_some(), k % 3 != 0);
        }
    }

    #[test]
    fn pop_and_retain() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..100u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        assert_eq!(table.pop().map(|v| v.key), Some(99));
        table.assert_consistent();

        table.retain(|v| v.key % 4 == 0);
        table.assert_consistent();
        assert_eq!(table.len(), 25);
        for k in 0..99u64 {
            let found = table.find(hash_key(&state, k), |v| v.key == k).is_some();
            assert_eq!(found, k % 4 == 0, "key {k}");
        }

        table.retain(|_| false);
        assert!(table.is_empty());
        assert!(table.pop().is_none());
        table.assert_consistent();
    }

    #[test]
    fn clear_resets_index_and_keeps_store() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());
        for k in 0..64u64 {
            insert_item(&mut table, &state, k, k as i32);
        }
        let capacity = table.capacity();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), 3);
        assert_eq!(table.capacity(), capacity);
        table.assert_consistent();

        assert!(insert_item(&mut table, &state, 5, 5));
        table.assert_consistent();
    }

    #[test]
    fn iter_mut_and_drain() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..10u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        for item in table.iter_mut() {
            item.value *= 10;
        }
        assert_eq!(table.find(hash_key(&state, 3), |v| v.key == 3).unwrap().value, 30);

        let mut drain = table.drain();
        assert_eq!(drain.len(), 10);
        assert_eq!(drain.next().map(|v| v.key), Some(0));
        drop(drain);

        assert!(table.is_empty());
        table.assert_consistent();
    }

    #[test]
    fn set_policy_rebuilds() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());
        for k in 0..10u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        table.set_policy(LoadPolicy::new(64, 2, 3).unwrap());
        assert_eq!(table.bucket_count(), 64);
        table.assert_consistent();

        table.set_policy(balanced());
        table.assert_consistent();
        assert!(table.bucket_count() <= 30);
    }

    #[test]
    fn reserve_and_try_reserve() {
        let mut table: HashTable<Item> = HashTable::new();
        table.reserve(100);
        assert!(table.capacity() >= 100);

        assert!(table.try_reserve(10).is_ok());
        assert!(matches!(
            table.try_reserve(usize::MAX),
            Err(Error::Reserve(_))
        ));
        assert!(table.is_empty());
        table.assert_consistent();
    }

    #[test]
    fn shrink_to_fit_keeps_contents() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(1000);
        for k in 0..10u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        table.shrink_to_fit();
        assert!(table.capacity() < 1000);
        for k in 0..10u64 {
            assert!(table.find(hash_key(&state, k), |v| v.key == k).is_some());
        }
        table.assert_consistent();
    }

    #[test]
    fn string_values() {
        let state = HashState::default();
        let hash_str = |s: &str| {
            let mut h = state.build_hasher();
            h.write(s.as_bytes());
            h.finish()
        };

        let mut table: HashTable<String> = HashTable::new();
        for word in ["hello", "world", "rust", "table"] {
            table
                .entry(hash_str(word), |s| s == word)
                .or_insert_with(|| word.to_string());
        }

        let value_ref = match table.entry(hash_str("rust"), |s| s == "rust") {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(_) => unreachable!("Entry should be occupied: {:#?}", table),
        };
        value_ref.push_str("acean");

        assert!(table.find(hash_str("rust"), |s| s == "rustacean").is_some());
        assert_eq!(
            table.iter().cloned().collect::<Vec<_>>(),
            vec!["hello", "world", "rustacean", "table"]
        );
    }

    #[test]
    fn randomized_operations_keep_index_consistent() {
        let state = HashState::default();
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());
        let mut live = std::collections::HashSet::new();

        for _ in 0..5000 {
            let key = rng.random_range(0..300u64);
            if rng.random_bool(0.55) {
                assert_eq!(insert_item(&mut table, &state, key, 0), live.insert(key));
            } else {
                let removed = table.remove(hash_key(&state, key), |v| v.key == key);
                assert_eq!(removed.is_some(), live.remove(&key));
            }
            assert_eq!(table.len(), live.len());
            table.assert_consistent();
        }
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    #[cfg(feature = "std")]
    fn histogram_output() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_policy(balanced());
        for k in 0..10_000u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        let hist = table.bucket_histogram();
        assert_eq!(hist.iter().sum::<usize>(), table.bucket_count());
        assert_eq!(
            hist.iter()
                .enumerate()
                .map(|(length, count)| length * count)
                .sum::<usize>(),
            table.len()
        );

        table.print_bucket_histogram();
        table.debug_stats().print();
    }

    #[test]
    fn test_clone() {
        let state = HashState::default();
        let mut original: HashTable<Item> = HashTable::new();
        for k in 0..20u64 {
            insert_item(&mut original, &state, k, k as i32);
        }

        let cloned = original.clone();
        cloned.assert_consistent();
        assert_eq!(cloned.len(), 20);

        let hash = hash_key(&state, 3);
        if let Some(item) = original.find_mut(hash, |v| v.key == 3) {
            item.value = 999;
        }
        assert_eq!(original.find(hash, |v| v.key == 3).unwrap().value, 999);
        assert_eq!(cloned.find(hash, |v| v.key == 3).unwrap().value, 3);
    }
}
