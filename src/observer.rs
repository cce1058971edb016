//! Trace points emitted by [`HashTable`](crate::HashTable).
//!
//! The table reports what it is doing through a [`TableObserver`]; the
//! observer only sees events and cannot steer the table. The default
//! [`LogObserver`] forwards everything to the `log` facade.

use log::{debug, trace};

/// Which table operation produced a chain event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    Push,
    Find,
    Pop,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent<'a> {
    /// The bucket held a chain containing `key`.
    ChainHit { op: Op, key: &'a str, index: usize },
    /// The bucket held a chain without `key`.
    ChainMiss { op: Op, key: &'a str, index: usize },
    /// The bucket was empty.
    NoChain { op: Op, key: &'a str, index: usize },
    ChainCreated { index: usize },
    /// A chain became empty and its bucket was cleared.
    ChainRemoved { index: usize },
    ResizeCheck { load_factor: f64, bucket_count: usize },
    ResizeStart { from: usize, to: usize },
    ResizeEnd { from: usize, to: usize, item_count: usize },
    /// A resize was requested but clamped to the current size.
    ResizeSkipped { bucket_count: usize },
}

pub trait TableObserver {
    fn on_event(&self, _event: &TableEvent<'_>) {}
}

/// Discards every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl TableObserver for NoopObserver {}

/// Chain events at `trace`, resize events at `debug`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

impl TableObserver for LogObserver {
    fn on_event(&self, event: &TableEvent<'_>) {
        match *event {
            TableEvent::ChainHit { op, key, index } => {
                trace!(target: "chained_hashtable::chain", "{op:?} {key:?}: key found in chain at {index}")
            }
            TableEvent::ChainMiss { op, key, index } => {
                trace!(target: "chained_hashtable::chain", "{op:?} {key:?}: key not in chain at {index}")
            }
            TableEvent::NoChain { op, key, index } => {
                trace!(target: "chained_hashtable::chain", "{op:?} {key:?}: no chain at {index}")
            }
            TableEvent::ChainCreated { index } => {
                trace!(target: "chained_hashtable::chain", "new chain at {index}")
            }
            TableEvent::ChainRemoved { index } => {
                trace!(target: "chained_hashtable::chain", "chain at {index} is empty, clearing bucket")
            }
            TableEvent::ResizeCheck {
                load_factor,
                bucket_count,
            } => {
                trace!(target: "chained_hashtable::resize", "load factor {load_factor:.3} over {bucket_count} buckets")
            }
            TableEvent::ResizeStart { from, to } => {
                debug!(target: "chained_hashtable::resize", "resizing {from} -> {to} buckets")
            }
            TableEvent::ResizeEnd {
                from,
                to,
                item_count,
            } => {
                debug!(target: "chained_hashtable::resize", "resized {from} -> {to} buckets, rehashed {item_count} items")
            }
            TableEvent::ResizeSkipped { bucket_count } => {
                trace!(target: "chained_hashtable::resize", "resize clamped, staying at {bucket_count} buckets")
            }
        }
    }
}

impl<O: TableObserver + ?Sized> TableObserver for &O {
    fn on_event(&self, event: &TableEvent<'_>) {
        (**self).on_event(event)
    }
}

impl<O: TableObserver + ?Sized> TableObserver for std::rc::Rc<O> {
    fn on_event(&self, event: &TableEvent<'_>) {
        (**self).on_event(event)
    }
}
