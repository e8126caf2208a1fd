use std::fmt;

use rustc_hash::FxHashMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::models::EnrichedVideo;

/// Enriched videos of one run, keyed by `bvid`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCollection {
    entries: Vec<EnrichedVideo>,
    index: FxHashMap<String, usize>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut index = FxHashMap::default();
        index.reserve(capacity);
        Self {
            entries: Vec::with_capacity(capacity),
            index,
        }
    }

    /// Inserts `video` under its `bvid`.
    ///
    /// An existing entry with the same key is replaced in place and returned,
    /// so the key keeps its original position.
    pub fn insert(&mut self, video: EnrichedVideo) -> Option<EnrichedVideo> {
        match self.index.get(&video.bvid) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], video)),
            None => {
                self.index.insert(video.bvid.clone(), self.entries.len());
                self.entries.push(video);
                None
            }
        }
    }

    pub fn get(&self, bvid: &str) -> Option<&EnrichedVideo> {
        self.index.get(bvid).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|v| v.bvid.as_str())
    }

    /// Entries ordered by live viewer count, highest first. Ties keep
    /// insertion order.
    pub fn ranked_by_live(&self) -> Vec<&EnrichedVideo> {
        let mut ranked: Vec<_> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count_num.cmp(&a.count_num));
        ranked
    }
}

impl FromIterator<EnrichedVideo> for ResultCollection {
    fn from_iter<I: IntoIterator<Item = EnrichedVideo>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut collection = Self::with_capacity(iter.size_hint().0);
        for video in iter {
            collection.insert(video);
        }
        collection
    }
}

impl Serialize for ResultCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for video in &self.entries {
            map.serialize_entry(&video.bvid, video)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = ResultCollection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of bvid to video entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut collection =
                    ResultCollection::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((bvid, mut video)) = access.next_entry::<String, EnrichedVideo>()? {
                    video.bvid = bvid;
                    collection.insert(video);
                }
                Ok(collection)
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
