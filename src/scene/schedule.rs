//! Schedule queue
//!
//! Nodes waiting for a transform update are kept in two intrusive,
//! index-based doubly linked lists:
//!
//! - the **schedule** list, drained by an update pass;
//! - the **reschedule** list, nodes that asked for another update on a later
//!   pass (slow parents keep converging after their inputs stop changing).
//!
//! A node has a single pair of links, so it sits in at most one list at a time.
//! Membership is tracked explicitly with [`Membership`] rather than inferred
//! from link values. All list state lives behind one lock (the schedule lock),
//! independent of any family lock.
//!
//! Roots are pushed to the front of the schedule list and everything else to
//! the back. That ordering only biases parents earlier; a node's update always
//! walks its whole subtree, and a node reached through such a walk is unlinked
//! then, so it is not updated twice.

use parking_lot::Mutex;
use slotmap::SecondaryMap;

use crate::scene::NodeKey;

/// Which list, if any, a node is linked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    #[default]
    NotLinked,
    InSchedule,
    InReschedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Schedule,
    Reschedule,
}

impl ListKind {
    fn membership(self) -> Membership {
        match self {
            Self::Schedule => Membership::InSchedule,
            Self::Reschedule => Membership::InReschedule,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
    list: ListKind,
}

#[derive(Debug, Clone, Copy, Default)]
struct Ends {
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
    len: usize,
}

#[derive(Debug, Default)]
struct QueueState {
    links: SecondaryMap<NodeKey, Link>,
    schedule: Ends,
    reschedule: Ends,
}

impl QueueState {
    fn membership(&self, key: NodeKey) -> Membership {
        self.links
            .get(key)
            .map_or(Membership::NotLinked, |link| link.list.membership())
    }

    fn push_front(&mut self, list: ListKind, key: NodeKey) -> bool {
        if self.links.contains_key(key) {
            return false;
        }
        let ends = match list {
            ListKind::Schedule => &mut self.schedule,
            ListKind::Reschedule => &mut self.reschedule,
        };
        let old_head = ends.head;
        self.links.insert(
            key,
            Link {
                prev: None,
                next: old_head,
                list,
            },
        );
        match old_head.and_then(|head| self.links.get_mut(head)) {
            Some(head) => head.prev = Some(key),
            None => ends.tail = Some(key),
        }
        ends.head = Some(key);
        ends.len += 1;
        true
    }

    fn push_back(&mut self, list: ListKind, key: NodeKey) -> bool {
        if self.links.contains_key(key) {
            return false;
        }
        let ends = match list {
            ListKind::Schedule => &mut self.schedule,
            ListKind::Reschedule => &mut self.reschedule,
        };
        let old_tail = ends.tail;
        self.links.insert(
            key,
            Link {
                prev: old_tail,
                next: None,
                list,
            },
        );
        match old_tail.and_then(|tail| self.links.get_mut(tail)) {
            Some(tail) => tail.next = Some(key),
            None => ends.head = Some(key),
        }
        ends.tail = Some(key);
        ends.len += 1;
        true
    }

    /// Unlinks `key` from whichever list holds it.
    fn unlink(&mut self, key: NodeKey) -> Option<ListKind> {
        let link = self.links.remove(key)?;
        let ends = match link.list {
            ListKind::Schedule => &mut self.schedule,
            ListKind::Reschedule => &mut self.reschedule,
        };
        match link.prev.and_then(|prev| self.links.get_mut(prev)) {
            Some(prev) => prev.next = link.next,
            None => ends.head = link.next,
        }
        match link.next.and_then(|next| self.links.get_mut(next)) {
            Some(next) => next.prev = link.prev,
            None => ends.tail = link.prev,
        }
        ends.len -= 1;
        Some(link.list)
    }

    fn pop_front(&mut self, list: ListKind) -> Option<NodeKey> {
        let head = match list {
            ListKind::Schedule => self.schedule.head,
            ListKind::Reschedule => self.reschedule.head,
        }?;
        self.unlink(head);
        Some(head)
    }
}

/// The schedule and reschedule lists behind a single lock.
#[derive(Debug, Default)]
pub struct ScheduleQueue {
    state: Mutex<QueueState>,
}

impl ScheduleQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Schedule list
    // ========================================================================

    /// Links `key` at the head of the schedule list.
    ///
    /// Returns `false` (and changes nothing) when the node is already linked
    /// into either list.
    pub fn add_front(&self, key: NodeKey) -> bool {
        self.state.lock().push_front(ListKind::Schedule, key)
    }

    /// Links `key` at the tail of the schedule list. See [`add_front`](Self::add_front).
    pub fn add_back(&self, key: NodeKey) -> bool {
        self.state.lock().push_back(ListKind::Schedule, key)
    }

    /// Unlinks and returns the head of the schedule list.
    pub fn pop_scheduled(&self) -> Option<NodeKey> {
        self.state.lock().pop_front(ListKind::Schedule)
    }

    /// Schedules a node for the next update pass: roots at the front, other
    /// nodes at the back.
    ///
    /// A node parked in the reschedule list is moved over, since it is going
    /// to be updated on this pass anyway.
    pub fn schedule(&self, key: NodeKey, is_root: bool) -> bool {
        let mut state = self.state.lock();
        if state.membership(key) == Membership::InReschedule {
            state.unlink(key);
        }
        let linked = if is_root {
            state.push_front(ListKind::Schedule, key)
        } else {
            state.push_back(ListKind::Schedule, key)
        };
        log::trace!("schedule {key:?} (root: {is_root}) -> {linked}");
        linked
    }

    /// Unlinks `key` from the schedule list. Nodes that are not in the
    /// schedule list are left alone.
    pub fn delink(&self, key: NodeKey) -> bool {
        let mut state = self.state.lock();
        if state.membership(key) == Membership::InSchedule {
            state.unlink(key);
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Reschedule list
    // ========================================================================

    /// Links `key` at the tail of the reschedule list.
    ///
    /// Returns `false` when the node is already linked into either list.
    pub fn add_rescheduled(&self, key: NodeKey) -> bool {
        self.state.lock().push_back(ListKind::Reschedule, key)
    }

    /// Same as [`add_rescheduled`](Self::add_rescheduled).
    pub fn reschedule(&self, key: NodeKey) -> bool {
        self.add_rescheduled(key)
    }

    /// Unlinks and returns the head of the reschedule list.
    pub fn pop_rescheduled(&self) -> Option<NodeKey> {
        self.state.lock().pop_front(ListKind::Reschedule)
    }

    /// Moves every rescheduled node into the schedule list, in order, for the
    /// next pass. `is_root` decides front or back placement for each node.
    ///
    /// Returns the number of nodes moved.
    pub fn promote_rescheduled(&self, mut is_root: impl FnMut(NodeKey) -> bool) -> usize {
        let mut moved = 0;
        while let Some(key) = self.pop_rescheduled() {
            if self.schedule(key, is_root(key)) {
                moved += 1;
            }
        }
        moved
    }

    // ========================================================================
    // Queries & maintenance
    // ========================================================================

    /// Unlinks `key` from any list (used when a node is destroyed).
    pub fn forget(&self, key: NodeKey) {
        self.state.lock().unlink(key);
    }

    #[must_use]
    pub fn membership(&self, key: NodeKey) -> Membership {
        self.state.lock().membership(key)
    }

    #[must_use]
    pub fn is_scheduled(&self, key: NodeKey) -> bool {
        self.membership(key) == Membership::InSchedule
    }

    /// Number of nodes in the schedule list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().schedule.len
    }

    /// Whether the schedule list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in the reschedule list.
    #[must_use]
    pub fn rescheduled_len(&self) -> usize {
        self.state.lock().reschedule.len
    }

    /// Snapshot of the schedule list in drain order.
    #[must_use]
    pub fn scheduled_keys(&self) -> Vec<NodeKey> {
        let state = self.state.lock();
        let mut keys = Vec::with_capacity(state.schedule.len);
        let mut cursor = state.schedule.head;
        while let Some(key) = cursor {
            keys.push(key);
            cursor = state.links.get(key).and_then(|link| link.next);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<NodeKey> {
        let mut arena: SlotMap<NodeKey, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn fifo_with_front_insertions() {
        let k = keys(4);
        let queue = ScheduleQueue::new();
        assert!(queue.add_back(k[0]));
        assert!(queue.add_back(k[1]));
        assert!(queue.add_front(k[2]));
        assert!(queue.add_back(k[3]));

        assert_eq!(queue.scheduled_keys(), vec![k[2], k[0], k[1], k[3]]);
        assert_eq!(queue.pop_scheduled(), Some(k[2]));
        assert_eq!(queue.pop_scheduled(), Some(k[0]));
        assert_eq!(queue.pop_scheduled(), Some(k[1]));
        assert_eq!(queue.pop_scheduled(), Some(k[3]));
        assert_eq!(queue.pop_scheduled(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn double_link_is_rejected() {
        let k = keys(1);
        let queue = ScheduleQueue::new();
        assert!(queue.add_back(k[0]));
        assert!(!queue.add_front(k[0]));
        assert!(!queue.add_rescheduled(k[0]));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.rescheduled_len(), 0);
    }

    #[test]
    fn delink_middle_keeps_order() {
        let k = keys(3);
        let queue = ScheduleQueue::new();
        for &key in &k {
            queue.add_back(key);
        }
        assert!(queue.delink(k[1]));
        assert!(!queue.delink(k[1]));
        assert_eq!(queue.scheduled_keys(), vec![k[0], k[2]]);
        assert_eq!(queue.membership(k[1]), Membership::NotLinked);
    }

    #[test]
    fn delink_ignores_reschedule_list() {
        let k = keys(1);
        let queue = ScheduleQueue::new();
        queue.add_rescheduled(k[0]);
        assert!(!queue.delink(k[0]));
        assert_eq!(queue.membership(k[0]), Membership::InReschedule);
    }

    #[test]
    fn schedule_moves_out_of_reschedule_list() {
        let k = keys(2);
        let queue = ScheduleQueue::new();
        queue.add_rescheduled(k[0]);
        queue.add_rescheduled(k[1]);

        assert!(queue.schedule(k[1], false));
        assert_eq!(queue.membership(k[1]), Membership::InSchedule);
        assert_eq!(queue.rescheduled_len(), 1);
        assert_eq!(queue.pop_rescheduled(), Some(k[0]));
    }

    #[test]
    fn promote_moves_everything() {
        let k = keys(3);
        let queue = ScheduleQueue::new();
        for &key in &k {
            queue.add_rescheduled(key);
        }
        let moved = queue.promote_rescheduled(|key| key == k[2]);
        assert_eq!(moved, 3);
        assert_eq!(queue.rescheduled_len(), 0);
        assert_eq!(queue.scheduled_keys(), vec![k[2], k[0], k[1]]);
    }

    #[test]
    fn forget_unlinks_from_either_list() {
        let k = keys(2);
        let queue = ScheduleQueue::new();
        queue.add_back(k[0]);
        queue.add_rescheduled(k[1]);
        queue.forget(k[0]);
        queue.forget(k[1]);
        assert!(queue.is_empty());
        assert_eq!(queue.rescheduled_len(), 0);
    }
}
