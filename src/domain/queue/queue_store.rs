use std::collections::BTreeMap;

use crate::domain::stream::priority::Priority;
use crate::domain::stream::stream_store::StreamKey;
use crate::domain::utils::id::DeviceId;

/// Identifies the egress queue of one priority class on one hop direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueKey {
    pub from: DeviceId,
    pub to: DeviceId,
    pub priority: Priority,
}

impl QueueKey {
    pub fn new(from: &DeviceId, to: &DeviceId, priority: Priority) -> Self {
        Self { from: from.clone(), to: to.clone(), priority }
    }
}

/// Per-run queue state: which streams sit in which (hop, priority) queue.
///
/// Queues are created on first assignment. Looking up a key that was never assigned
/// yields an empty queue.
#[derive(Debug, Clone)]
pub struct QueueStore {
    queues: BTreeMap<QueueKey, Vec<StreamKey>>,
    priority_classes: u8,
}

impl QueueStore {
    pub fn new(priority_classes: u8) -> Self {
        Self { queues: BTreeMap::new(), priority_classes }
    }

    /// Streams in the queue, in FIFO (ingestion) order.
    pub fn queue(&self, key: &QueueKey) -> &[StreamKey] {
        self.queues.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every priority class of hop `from -> to` with its queue content, highest priority first.
    pub fn hop_queues<'a>(&'a self, from: &DeviceId, to: &DeviceId) -> Vec<(Priority, &'a [StreamKey])> {
        Priority::all(self.priority_classes).map(|priority| (priority, self.queue(&QueueKey::new(from, to, priority)))).collect()
    }

    pub(crate) fn push(&mut self, key: QueueKey, stream: StreamKey) {
        self.queues.entry(key).or_default().push(stream);
    }

    /// Non-empty queues in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&QueueKey, &[StreamKey])> {
        self.queues.iter().filter(|(_, streams)| !streams.is_empty()).map(|(key, streams)| (key, streams.as_slice()))
    }

    pub fn num_of_queues(&self) -> usize {
        self.queues.values().filter(|streams| !streams.is_empty()).count()
    }

    pub fn priority_classes(&self) -> u8 {
        self.priority_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn unassigned_queue_is_empty_not_absent() {
        let store = QueueStore::new(8);
        let key = QueueKey::new(&DeviceId::new("A"), &DeviceId::new("B"), Priority::HIGHEST);
        assert!(store.queue(&key).is_empty());
        assert_eq!(store.hop_queues(&DeviceId::new("A"), &DeviceId::new("B")).len(), 8);
    }

    #[test]
    fn queues_are_directional() {
        let mut keys: SlotMap<StreamKey, ()> = SlotMap::with_key();
        let stream = keys.insert(());

        let a = DeviceId::new("A");
        let b = DeviceId::new("B");
        let mut store = QueueStore::new(8);
        store.push(QueueKey::new(&a, &b, Priority::HIGHEST), stream);

        assert_eq!(store.queue(&QueueKey::new(&a, &b, Priority::HIGHEST)), &[stream]);
        assert!(store.queue(&QueueKey::new(&b, &a, Priority::HIGHEST)).is_empty());
        assert_eq!(store.num_of_queues(), 1);
    }
}
