//! chained-hashtable: a single-threaded, string-keyed hash table using
//! separate chaining over doubly linked lists, with a choice of hashers and
//! automatic resizing in both directions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the chain, the hasher and the resize policy independent so
//!   each can be reasoned about on its own.
//! - Layers:
//!   - `hasher`: closed registry of deterministic byte hashers (naive,
//!     djb2, FNV-1, FNV-1a). The table resolves a name once at
//!     construction and keeps a plain function pointer.
//!   - `Chain<T>`: doubly linked list whose nodes live in a generational
//!     arena (`slotmap`). Links are handles, not pointers, so there is a
//!     single owner (the arena) and O(1) removal given a `NodeHandle`.
//!   - `HashTable<V, O>`: bucket array of optional chains plus the resize
//!     policy. `O` is a `TableObserver` receiving trace points.
//!
//! Table invariants
//! - `min_bucket_count <= bucket_count <= max_bucket_count`, and
//!   `bucket_count >= 1`, so `hash % bucket_count` is always defined.
//! - Every key lives in exactly one chain, in the bucket given by the
//!   current hasher and bucket count.
//! - `item_count` equals the sum of chain lengths.
//! - A bucket never holds an empty chain; chains are created on first
//!   insert and dropped when their last entry is popped.
//!
//! Resizing
//! - Checked after every insert and every delete, never after lookups.
//!   Growth is tested before shrinking, so overlapping thresholds grow.
//! - A resize installs a fresh bucket array, then re-inserts every entry
//!   of the old one with the resize check suppressed, so a rehash cannot
//!   cascade into another resize. Requests beyond the clamps are no-ops.
//!
//! Observability
//! - The table never logs directly. It reports chain hits/misses and
//!   resize start/end to its observer; `LogObserver` (the default) sends
//!   them to the `log` facade, `NoopObserver` drops them.
//!
//! Notes and non-goals
//! - Single-threaded; wrap the whole table in a lock to share it.
//! - Keys are `String`s hashed through their UTF-8 bytes; there is no
//!   generic key type and no per-process hash seed.
//! - Iteration order is unspecified.
//!
//! ```
//! use chained_hashtable::{HashTable, TableConfig};
//!
//! let mut t: HashTable<&str> =
//!     HashTable::with_config(TableConfig::default().with_bucket_count(2)).unwrap();
//! t.put("line_1", "Tiny hash table!");
//! t.put("line_2", "Filled beyond capacity!");
//! t.put("line_3", "Linked list saves the day!");
//! assert!(t.bucket_count() > 2);
//! assert_eq!(*t.get("line_3"), "Linked list saves the day!");
//! assert_eq!(*t.get("line_4"), "");
//! ```

pub mod chain;
mod chain_proptest;
pub mod config;
mod error;
mod hash_table;
mod hash_table_proptest;
pub mod hasher;
pub mod observer;

// Public surface
pub use chain::{Chain, NodeHandle};
pub use config::TableConfig;
pub use error::ConfigError;
pub use hash_table::{HashTable, Iter};
pub use hasher::HasherKind;
pub use observer::{LogObserver, NoopObserver, TableEvent, TableObserver};
