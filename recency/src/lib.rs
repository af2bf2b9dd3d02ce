#![doc = include_str!("../../README.md")]
#![deny(missing_docs)]
#![cfg_attr(all(doc, ENABLE_DOC_AUTO_CFG), feature(doc_auto_cfg))]

mod error;
mod iter;
mod linked_hashmap;
mod lru;

pub use error::{
    CacheError,
    Result,
};
pub use iter::{
    Entries,
    IntoIter,
    Keys,
    Values,
};
pub use lru::Lru;

#[cfg(not(feature = "ahash"))]
type RandomState = std::hash::RandomState;
#[cfg(feature = "ahash")]
type RandomState = ahash::RandomState;

/// See [`Lru`].
pub type LRU<Key, Value> = Lru<Key, Value>;
