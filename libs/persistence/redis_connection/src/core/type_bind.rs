use std::{borrow::Cow, marker::PhantomData, time::Duration};

use bytes::Bytes;

use super::{key::CacheKey, value::CacheValue};
use crate::store::{CacheStore, CacheStoreError};

/// Associates a key family with the value type stored under it.
pub trait CacheTypeBind: CacheKey {
    type Value: CacheValue;

    fn bind_with_args<'s>(
        &self, store: &'s dyn CacheStore, args: <Self as CacheKey>::Args<'_>,
    ) -> CacheBinding<'s, Self::Value> {
        let key = CacheKey::get_key_with_args(self, args);
        CacheBinding::new(store, key)
    }
}

/// A concrete key bound to a store, typed by the value it holds.
pub struct CacheBinding<'s, V> {
    store: &'s dyn CacheStore,
    key: Cow<'static, str>,
    __phantom: PhantomData<V>,
}

impl<'s, V> CacheBinding<'s, V>
where
    V: CacheValue,
{
    pub fn new(store: &'s dyn CacheStore, key: Cow<'static, str>) -> Self {
        Self {
            store,
            key,
            __phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str { &self.key }

    pub async fn try_get(&self) -> Result<Option<V>, CacheStoreError> {
        match self.store.get(&self.key).await? {
            Some(bytes) => Ok(Some(V::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn set_with_expire(
        &self, value: &V, duration: Duration,
    ) -> Result<(), CacheStoreError> {
        let bytes = value.to_bytes()?;
        self.store
            .set_ex(&self.key, Bytes::from(bytes), duration)
            .await
    }
}
