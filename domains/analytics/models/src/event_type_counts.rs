use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// Per-type event counts in the order the event store returned them.
///
/// Serializes as a JSON object whose keys keep that order, so a summary read
/// back from the cache lists types exactly like a freshly computed one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTypeCounts(Vec<(String, u64)>);

impl EventTypeCounts {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, event_type: impl Into<String>, count: u64) {
        self.0.push((event_type.into(), count));
    }

    pub fn get(&self, event_type: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == event_type)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn total(&self) -> u64 { self.0.iter().map(|(_, count)| count).sum() }
}

impl<S: Into<String>> FromIterator<(S, u64)> for EventTypeCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, count)| (name.into(), count))
                .collect(),
        )
    }
}

impl Serialize for EventTypeCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct CountsVisitor;

impl<'de> Visitor<'de> for CountsVisitor {
    type Value = EventTypeCounts;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of event type to count")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut counts = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            counts.push((name, count));
        }
        Ok(EventTypeCounts(counts))
    }
}

impl<'de> Deserialize<'de> for EventTypeCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CountsVisitor)
    }
}
