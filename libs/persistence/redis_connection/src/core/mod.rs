pub mod key;
pub mod type_bind;
pub mod value;

pub use key::CacheKey;
pub use type_bind::{CacheBinding, CacheTypeBind};
pub use value::{CacheError, CacheValue, Json};
