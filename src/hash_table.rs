//! HashTable: string keys, separate chaining, load-factor driven resizing.

use crate::chain::{self, Chain, NodeHandle};
use crate::config::{ResizeLimits, TableConfig, DEFAULT_BUCKET_COUNT};
use crate::error::ConfigError;
use crate::hasher::{HashFn, HasherKind};
use crate::observer::{LogObserver, Op, TableEvent, TableObserver};
use core::fmt;

/// One key/value pair. The key is fixed once stored; the value is not.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    key: String,
    value: V,
}

type Bucket<V> = Option<Chain<Entry<V>>>;

fn empty_buckets<V>(n: usize) -> Vec<Bucket<V>> {
    std::iter::repeat_with(|| None).take(n).collect()
}

// First node in `chain` whose key equals `key`.
fn find_node<V>(chain: &Chain<Entry<V>>, key: &str) -> Option<NodeHandle> {
    chain
        .iter()
        .find(|(e, _)| e.key == key)
        .map(|(_, handle)| handle)
}

/// String-keyed map with separate chaining. Each occupied bucket holds a
/// [`Chain`] of entries, and the bucket count follows the load factor
/// within the configured clamps. `O` receives a [`TableEvent`] per probe
/// and per resize.
pub struct HashTable<V, O = LogObserver> {
    buckets: Vec<Bucket<V>>,
    item_count: usize,
    limits: ResizeLimits,
    default_value: V,
    hasher: HasherKind,
    hash: HashFn,
    observer: O,
}

impl<V: Default> HashTable<V> {
    /// Table with the default configuration: 64 buckets clamped to
    /// `[8, 32768]`, factor 2, thresholds 0.75/0.25, FNV-1a.
    pub fn new() -> Self {
        Self::with_observer(LogObserver)
    }
}

impl<V: Default> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    pub fn with_config(config: TableConfig<V>) -> Result<Self, ConfigError> {
        Self::with_config_and_observer(config, LogObserver)
    }
}

impl<V: Default, O: TableObserver> HashTable<V, O> {
    pub fn with_observer(observer: O) -> Self {
        Self::from_parts(
            DEFAULT_BUCKET_COUNT,
            ResizeLimits::default(),
            V::default(),
            HasherKind::default(),
            observer,
        )
    }
}

impl<V, O: TableObserver> HashTable<V, O> {
    pub fn with_config_and_observer(
        config: TableConfig<V>,
        observer: O,
    ) -> Result<Self, ConfigError> {
        let r = config.validate()?;
        Ok(Self::from_parts(
            r.bucket_count,
            r.limits,
            r.default_value,
            r.hasher,
            observer,
        ))
    }

    fn from_parts(
        bucket_count: usize,
        limits: ResizeLimits,
        default_value: V,
        hasher: HasherKind,
        observer: O,
    ) -> Self {
        Self {
            buckets: empty_buckets(bucket_count),
            item_count: 0,
            limits,
            default_value,
            hasher,
            hash: hasher.hash_fn(),
            observer,
        }
    }

    // ---- introspection ----

    #[inline]
    pub fn len(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn min_bucket_count(&self) -> usize {
        self.limits.min_bucket_count
    }

    pub fn max_bucket_count(&self) -> usize {
        self.limits.max_bucket_count
    }

    pub fn resize_up_factor(&self) -> usize {
        self.limits.resize_up_factor
    }

    pub fn resize_down_factor(&self) -> usize {
        self.limits.resize_down_factor
    }

    pub fn load_before_resize_up(&self) -> f64 {
        self.limits.load_before_resize_up
    }

    pub fn load_before_resize_down(&self) -> f64 {
        self.limits.load_before_resize_down
    }

    pub fn load_factor(&self) -> f64 {
        self.item_count as f64 / self.bucket_count() as f64
    }

    pub fn hasher(&self) -> HasherKind {
        self.hasher
    }

    pub fn default_value(&self) -> &V {
        &self.default_value
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Number of entries chained in bucket `index` (0 when the bucket is
    /// empty or out of range).
    pub fn chain_len(&self, index: usize) -> usize {
        self.buckets
            .get(index)
            .and_then(Option::as_ref)
            .map_or(0, Chain::len)
    }

    /// Bucket `key` maps to under the current hasher and bucket count.
    #[inline]
    pub fn hash_index(&self, key: &str) -> usize {
        // bucket_count >= 1 always holds, see ResizeLimits::shrunk.
        ((self.hash)(key.as_bytes()) % self.bucket_count() as u64) as usize
    }

    // Locate `key`, reporting what was found to the observer.
    fn probe(&self, op: Op, key: &str) -> (usize, Option<NodeHandle>) {
        let index = self.hash_index(key);
        let found = match &self.buckets[index] {
            Some(chain) => {
                let found = find_node(chain, key);
                let event = if found.is_some() {
                    TableEvent::ChainHit { op, key, index }
                } else {
                    TableEvent::ChainMiss { op, key, index }
                };
                self.observer.on_event(&event);
                found
            }
            None => {
                self.observer.on_event(&TableEvent::NoChain { op, key, index });
                None
            }
        };
        (index, found)
    }

    // ---- item access ----

    /// Set `key` to `value`, overwriting in place if the key is present.
    /// Runs a resize check afterwards. Returns the new item count.
    pub fn push_item(&mut self, key: impl Into<String>, value: V) -> usize {
        self.insert(key.into(), value, true)
    }

    fn insert(&mut self, key: String, value: V, should_resize: bool) -> usize {
        let (index, found) = self.probe(Op::Push, &key);
        match (found, self.buckets[index].as_mut()) {
            (Some(handle), Some(chain)) => {
                if let Some(entry) = chain.get_mut(handle) {
                    entry.value = value;
                }
            }
            (None, Some(chain)) => {
                chain.push_to_tail(Entry { key, value });
                self.item_count += 1;
            }
            (_, None) => {
                self.buckets[index] = Some(Chain::with_value(Entry { key, value }));
                self.item_count += 1;
                self.observer.on_event(&TableEvent::ChainCreated { index });
            }
        }
        if should_resize {
            self.resize();
        }
        self.item_count
    }

    /// Value stored for `key`, or the configured default on a miss.
    /// Never resizes.
    pub fn find_item(&self, key: &str) -> &V {
        let (index, found) = self.probe(Op::Find, key);
        found
            .and_then(|h| self.buckets[index].as_ref()?.get(h))
            .map_or(&self.default_value, |e| &e.value)
    }

    /// Mutable access to a stored value. Misses return `None`, since the
    /// default value is shared.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let (index, found) = self.probe(Op::Find, key);
        let chain = self.buckets[index].as_mut()?;
        chain.get_mut(found?).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.probe(Op::Find, key).1.is_some()
    }

    /// Remove `key`. Runs a resize check afterwards, whether or not the key
    /// was present. Returns the removed value and the new item count.
    pub fn pop_item(&mut self, key: &str) -> (Option<V>, usize) {
        let (index, found) = self.probe(Op::Pop, key);
        let mut removed = None;
        if let (Some(handle), Some(chain)) = (found, self.buckets[index].as_mut()) {
            removed = chain.pop_node(handle).map(|e| e.value);
            if removed.is_some() {
                self.item_count -= 1;
            }
            if chain.is_empty() {
                self.buckets[index] = None;
                self.observer.on_event(&TableEvent::ChainRemoved { index });
            }
        }
        self.resize();
        (removed, self.item_count)
    }

    // ---- stable names ----

    #[inline]
    pub fn put(&mut self, key: impl Into<String>, value: V) -> usize {
        self.push_item(key, value)
    }

    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: V) -> usize {
        self.push_item(key, value)
    }

    #[inline]
    pub fn push(&mut self, key: impl Into<String>, value: V) -> usize {
        self.push_item(key, value)
    }

    #[inline]
    pub fn get(&self, key: &str) -> &V {
        self.find_item(key)
    }

    #[inline]
    pub fn find(&self, key: &str) -> &V {
        self.find_item(key)
    }

    /// Like [`pop`](Self::pop) without the item count.
    #[inline]
    pub fn delete(&mut self, key: &str) -> Option<V> {
        self.pop_item(key).0
    }

    #[inline]
    pub fn pop(&mut self, key: &str) -> (Option<V>, usize) {
        self.pop_item(key)
    }

    /// Drop every entry. The bucket count is left as is.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.item_count = 0;
    }

    // ---- resizing ----

    /// Grow or shrink according to the current load factor and return the
    /// resulting bucket count. Growth is checked first, so a configuration
    /// whose thresholds overlap always grows.
    pub fn resize(&mut self) -> usize {
        let load_factor = self.load_factor();
        self.observer.on_event(&TableEvent::ResizeCheck {
            load_factor,
            bucket_count: self.bucket_count(),
        });
        if load_factor >= self.limits.load_before_resize_up {
            self.resize_up()
        } else if load_factor <= self.limits.load_before_resize_down {
            self.resize_down()
        } else {
            self.bucket_count()
        }
    }

    /// Multiply the bucket count by the growth factor, clamped to the
    /// maximum, and rehash. No-op when already at the maximum.
    pub fn resize_up(&mut self) -> usize {
        let from = self.bucket_count();
        let to = self.limits.grown(from);
        if to > from {
            self.rebuild(to);
        } else {
            self.observer
                .on_event(&TableEvent::ResizeSkipped { bucket_count: from });
        }
        self.bucket_count()
    }

    /// Divide the bucket count by the shrink factor, clamped to the
    /// minimum, and rehash. No-op when already at the minimum.
    pub fn resize_down(&mut self) -> usize {
        let from = self.bucket_count();
        let to = self.limits.shrunk(from);
        if to < from {
            self.rebuild(to);
        } else {
            self.observer
                .on_event(&TableEvent::ResizeSkipped { bucket_count: from });
        }
        self.bucket_count()
    }

    /// Bind a different hasher and rehash every entry at the current
    /// bucket count.
    pub fn rebind_hasher(&mut self, hasher: HasherKind) {
        if hasher == self.hasher {
            return;
        }
        self.hasher = hasher;
        self.hash = hasher.hash_fn();
        self.rebuild(self.bucket_count());
    }

    // Install a fresh array of `bucket_count` buckets, then move every
    // entry of the old one into it.
    fn rebuild(&mut self, bucket_count: usize) {
        let from = self.bucket_count();
        self.observer.on_event(&TableEvent::ResizeStart {
            from,
            to: bucket_count,
        });
        let old = std::mem::replace(&mut self.buckets, empty_buckets(bucket_count));
        let expected = std::mem::take(&mut self.item_count);
        self.rehash_from_array(old);
        debug_assert_eq!(self.item_count, expected, "rehash lost or duplicated entries");
        self.observer.on_event(&TableEvent::ResizeEnd {
            from,
            to: bucket_count,
            item_count: self.item_count,
        });
    }

    // Entries keep their chain order; resizing is suppressed so a rehash
    // can never trigger another one.
    fn rehash_from_array(&mut self, old: Vec<Bucket<V>>) {
        for chain in old.into_iter().flatten() {
            for Entry { key, value } in chain {
                self.insert(key, value, false);
            }
        }
    }

    // ---- iteration ----

    /// All entries, in no particular order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.item_count,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Check every structural invariant of the table.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let bucket_count = self.bucket_count();
        assert!(bucket_count >= 1);
        assert!(self.limits.min_bucket_count <= bucket_count);
        assert!(bucket_count <= self.limits.max_bucket_count);

        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            let Some(chain) = bucket else { continue };
            chain.assert_links();
            assert!(!chain.is_empty(), "empty chain left in bucket {index}");
            for (entry, _) in chain.iter() {
                assert_eq!(self.hash_index(&entry.key), index, "stale entry {:?}", entry.key);
                assert!(seen.insert(entry.key.clone()), "duplicate key {:?}", entry.key);
                total += 1;
            }
        }
        assert_eq!(total, self.item_count, "item_count != sum of chain lengths");
    }
}

impl<V, O> fmt::Debug for HashTable<V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("item_count", &self.item_count)
            .field("bucket_count", &self.buckets.len())
            .field("hasher", &self.hasher)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Iterator over `(key, value)` pairs of a [`HashTable`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket<V>>,
    chain: Option<chain::Iter<'a, Entry<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((entry, _)) = self.chain.as_mut().and_then(|it| it.next()) {
                self.remaining -= 1;
                return Some((entry.key.as_str(), &entry.value));
            }
            if let Some(chain) = self.buckets.next()? {
                self.chain = Some(chain.iter());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, O: TableObserver> IntoIterator for &'a HashTable<V, O> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
