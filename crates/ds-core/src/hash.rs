//! Fast hash map and hash set type aliases.
//!
//! Extension keys and allow-lists are short strings hashed on every file the
//! engine visits, so the workspace uses the Fx hash from `rustc-hash` instead
//! of SipHash. None of these tables are exposed to untrusted input.
//!
//! # Examples
//!
//! ```
//! use ds_core::{FxHashMap, FxHashSet};
//!
//! let mut counts: FxHashMap<String, u64> = FxHashMap::default();
//! *counts.entry(".txt".to_owned()).or_default() += 1;
//!
//! let allowed: FxHashSet<&str> = ["txt", "doc"].into_iter().collect();
//! assert!(allowed.contains("doc"));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;
