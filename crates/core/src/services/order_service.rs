//! Display-order bookkeeping for the trend table.
//!
//! The stored order is only a preference: it is reconciled against the live
//! roster every time the table is built, and moving rows never touches
//! ledger values.

use std::collections::HashSet;
use std::hash::Hash;

/// Splice-move the element at `from` to `to`.
///
/// An out-of-range `from` leaves the sequence unchanged; a `to` past the end
/// (after removal) appends.
pub fn reorder<T>(order: &mut Vec<T>, from: usize, to: usize) {
    if from >= order.len() {
        return;
    }
    let item = order.remove(from);
    let to = to.min(order.len());
    order.insert(to, item);
}

/// Merge a stored order with the live keys.
///
/// Result: stored keys that are still live (first occurrence only), then the
/// live keys not yet included, each partition keeping its original relative
/// order. Stale stored keys are dropped. Applying it to its own output with
/// the same live keys gives the same sequence.
pub fn reconcile_order<K>(live: &[K], stored: &[K]) -> Vec<K>
where
    K: Clone + Eq + Hash,
{
    let live_set: HashSet<&K> = live.iter().collect();
    let mut included: HashSet<&K> = HashSet::with_capacity(live.len());
    let mut out = Vec::with_capacity(live.len());

    for key in stored {
        if live_set.contains(key) && included.insert(key) {
            out.push(key.clone());
        }
    }
    for key in live {
        if included.insert(key) {
            out.push(key.clone());
        }
    }

    out
}
