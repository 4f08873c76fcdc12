//! Walkthrough of LRU-K admission and eviction.
//!
//! Run with `RUST_LOG=lrukit=trace` to see admission and eviction events.

use lrukit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cache = LrukBuilder::<&str, u32>::new(2)
        .k(2)
        .on_evict(|key, value| println!("evicted {key} -> {value}"))
        .try_build()?;

    cache.put("a", 1);
    println!("after one put:  contains(a) = {}", cache.contains(&"a"));
    cache.put("a", 1);
    println!("after two puts: contains(a) = {}", cache.contains(&"a"));

    cache.put("b", 2);
    cache.put("b", 2);
    cache.put("c", 3);
    cache.put("c", 3); // admits "c", evicting "a"

    println!("cached keys (MRU first): {:?}", cache.keys());

    for page in 0..5 {
        cache.put("scan", page);
        cache.remove(&"scan");
    }
    println!("stats: {:?}", cache.stats());

    cache.resize(1)?;
    println!("after resize(1): {:?}", cache.items());

    cache.clear();
    println!("after clear: len = {}", cache.len());
    Ok(())
}
