use core::fmt;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::marker::PhantomData;

use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::Serialize;
use serde::ser::SerializeMap;
use serde::ser::Serializer;

use crate::chaining::ChainingHashTable;
use crate::config::DEFAULT_INITIAL_CAPACITY;
use crate::config::DEFAULT_LOAD_FACTOR;
use crate::hash_table::HashTable;
use crate::hash_table::grown_capacity;
use crate::hash_table::needs_growth;
use crate::open_addressing::OpenAddressingHashTable;

/// Size hints above this are not trusted for pre-allocation.
const MAX_PRESIZED_CAPACITY: usize = 1 << 16;

/// Smallest doubling of the default capacity that holds `hint` entries
/// without a rehash.
fn presized_capacity(hint: usize) -> usize {
    let mut capacity = DEFAULT_INITIAL_CAPACITY;
    while capacity < MAX_PRESIZED_CAPACITY && needs_growth(hint, capacity, DEFAULT_LOAD_FACTOR) {
        capacity = grown_capacity(capacity);
    }
    capacity
}

macro_rules! impl_serde {
    ($table:ident, $visitor:ident, $expecting:literal) => {
        impl<K, V, S> Serialize for $table<K, V, S>
        where
            K: Serialize,
            V: Serialize,
        {
            fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for (key, value) in self.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }

        struct $visitor<K, V, S>(PhantomData<$table<K, V, S>>);

        impl<'de, K, V, S> Visitor<'de> for $visitor<K, V, S>
        where
            K: Deserialize<'de> + Hash + Eq,
            V: Deserialize<'de>,
            S: BuildHasher + Default,
        {
            type Value = $table<K, V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str($expecting)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let capacity = presized_capacity(access.size_hint().unwrap_or(0));
                let mut table = $table::with_capacity(capacity);
                while let Some((key, value)) = access.next_entry()? {
                    table.insert(key, value);
                }
                Ok(table)
            }
        }

        impl<'de, K, V, S> Deserialize<'de> for $table<K, V, S>
        where
            K: Deserialize<'de> + Hash + Eq,
            V: Deserialize<'de>,
            S: BuildHasher + Default,
        {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_map($visitor(PhantomData))
            }
        }
    };
}

impl_serde!(ChainingHashTable, ChainingVisitor, "a map of chained entries");
impl_serde!(
    OpenAddressingHashTable,
    OpenAddressingVisitor,
    "a map of open-addressed entries"
);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::string::ToString;

    use super::*;
    use crate::test_util::SipHashBuilder;

    #[test]
    fn presizing() {
        assert_eq!(presized_capacity(0), 16);
        assert_eq!(presized_capacity(14), 16);
        assert_eq!(presized_capacity(15), 32);
        assert_eq!(presized_capacity(usize::MAX), MAX_PRESIZED_CAPACITY);
    }

    #[test]
    fn chaining_json_round_trip() {
        let mut table: ChainingHashTable<String, u32, SipHashBuilder> = ChainingHashTable::new();
        for k in 0..40 {
            table.insert(k.to_string(), k);
        }

        let json = serde_json::to_string(&table).unwrap();
        let restored: ChainingHashTable<String, u32, SipHashBuilder> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(restored, table);
    }

    #[test]
    fn tombstones_are_not_serialized() {
        let mut table: OpenAddressingHashTable<String, u32, SipHashBuilder> =
            OpenAddressingHashTable::new();
        table.insert("kept".to_string(), 1);
        table.insert("gone".to_string(), 2);
        assert!(table.remove(&"gone".to_string()));

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"kept":1}"#);

        let restored: OpenAddressingHashTable<String, u32, SipHashBuilder> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.tombstones(), 0);
        assert_eq!(restored.find(&"kept".to_string()), Some(&1));
    }

    #[test]
    fn matches_a_plain_map_encoding() {
        let mut table: OpenAddressingHashTable<u32, String, SipHashBuilder> =
            OpenAddressingHashTable::new();
        let mut model = BTreeMap::new();
        for k in 0..25u32 {
            table.insert(k, k.to_string());
            model.insert(k, k.to_string());
        }

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value, serde_json::to_value(&model).unwrap());
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let restored: ChainingHashTable<String, u32, SipHashBuilder> =
            serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.find(&"a".to_string()), Some(&2));
    }

    #[test]
    fn rejects_non_maps() {
        let result: Result<ChainingHashTable<String, u32, SipHashBuilder>, _> =
            serde_json::from_str("[1, 2]");
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("a map of chained entries"), "{err}");
    }
}
