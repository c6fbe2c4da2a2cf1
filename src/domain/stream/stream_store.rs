use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::domain::stream::stream::Stream;
use crate::domain::utils::id::StreamId;
use crate::error::{Error, Result};

new_key_type! {
    pub struct StreamKey;
}

/// Owns every ingested stream of one analysis run.
///
/// Queues and delay bounds refer to streams by `StreamKey`; `order` keeps ingestion order,
/// which is also the FIFO order inside each queue.
#[derive(Debug, Default, Clone)]
pub struct StreamStore {
    streams: SlotMap<StreamKey, Stream>,
    name_index: HashMap<StreamId, StreamKey>,
    order: Vec<StreamKey>,
}

impl StreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stream. Stream names must be unique within a run.
    pub fn insert(&mut self, stream: Stream) -> Result<StreamKey> {
        if self.name_index.contains_key(&stream.id) {
            return Err(Error::malformed(None, format!("duplicate stream name {}", stream.id)));
        }

        let id = stream.id.clone();
        let key = self.streams.insert(stream);
        self.name_index.insert(id, key);
        self.order.push(key);
        Ok(key)
    }

    pub fn get(&self, key: StreamKey) -> Option<&Stream> {
        self.streams.get(key)
    }

    pub fn get_mut(&mut self, key: StreamKey) -> Option<&mut Stream> {
        self.streams.get_mut(key)
    }

    /// Keys in ingestion order.
    pub fn keys(&self) -> Vec<StreamKey> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stream::priority::Priority;
    use crate::domain::stream::stream::TrafficClass;
    use crate::domain::utils::id::DeviceId;

    fn stream(name: &str) -> Stream {
        Stream::new(StreamId::new(name), Priority::HIGHEST, TrafficClass::Ats, DeviceId::new("ES1"), DeviceId::new("ES2"), 100, 1.0, 1.0)
    }

    #[test]
    fn keeps_ingestion_order_and_rejects_duplicates() {
        let mut store = StreamStore::new();
        store.insert(stream("b")).unwrap();
        store.insert(stream("a")).unwrap();
        assert!(store.insert(stream("b")).is_err());

        let names: Vec<&str> = store.keys().into_iter().filter_map(|key| store.get(key)).map(|s| s.id.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(store.len(), 2);
    }
}
