/// External lookup cache: on-disk answers in front of the package index
mod cached_remote_facts;
mod lookup_cache;
mod system_clock;

pub use cached_remote_facts::CachedRemoteFacts;
pub use lookup_cache::{LookupCache, DEFAULT_TTL_HOURS};
pub use system_clock::SystemClock;
