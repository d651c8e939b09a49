/// Declare a cache key family.
///
/// ```ignore
/// cache_key!(SummaryKey::<Json<Summary>> => "summary:{}:{}"[from: str, to: str]);
/// ```
#[macro_export]
macro_rules! cache_key {
    ($name:ident::<$t:ty> => $format_key:literal[$($arg:ident:$ty:ident),*]) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $format_key), concat!("\n ## Value Type \n ", stringify!($t)))]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ($(&'r $ty,)*);

            fn get_key_with_args(&self, args: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                let ($($arg,)*) = args;

                (format!($format_key, $($arg),*)).into()
            }
        }

        impl $crate::core::type_bind::CacheTypeBind for $name {
            type Value = $t;
        }
    };
    ($name:ident::<$t:ty> => $key:literal) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $key), concat!("\n ## Value Type \n ", stringify!($t)))]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ();

            fn get_key_with_args(&self, _: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                ($key).into()
            }
        }

        impl $crate::core::type_bind::CacheTypeBind for $name {
            type Value = $t;
        }
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        MemoryCacheStore,
        core::{CacheKey, CacheTypeBind, Json},
    };

    cache_key!(PairKey::<Json<Vec<u32>>> => "test:pair:{}:{}"[left: str, right: str]);
    cache_key!(FixedKey::<Json<String>> => "test:fixed");

    #[test]
    fn test_key_with_args_is_literal() {
        let key = PairKey.get_key_with_args(("a:b", "2024-01-01T00:00:00Z"));

        assert_eq!(key, "test:pair:a:b:2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_key_without_args() {
        assert_eq!(FixedKey.get_key_with_args(()), "test:fixed");
    }

    #[tokio::test]
    async fn test_binding_roundtrip() {
        let store = MemoryCacheStore::default();
        let binding = PairKey.bind_with_args(&store, ("x", "y"));

        assert_eq!(binding.try_get().await.unwrap(), None);

        binding
            .set_with_expire(&Json(vec![1, 2, 3]), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(binding.try_get().await.unwrap(), Some(Json(vec![1, 2, 3])));
    }
}
