//! Memoizes resolved registry items behind an Lru cache.
//!
//! Run with `cargo run --example registry` to see the cache's trace output.

use recency::Lru;
use tracing::{
    Level,
    info,
};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Fingerprint(u64);

#[derive(Debug, Clone)]
struct ResolvedItem {
    name: String,
    dependencies: Vec<String>,
}

fn fingerprint(name: &str) -> Fingerprint {
    Fingerprint(name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    }))
}

fn resolve(name: &str) -> ResolvedItem {
    info!(name, "Resolving registry item");
    ResolvedItem {
        name: name.to_string(),
        dependencies: vec![format!("{name}-utils")],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut cache: Lru<Fingerprint, ResolvedItem> = Lru::try_new(2)?;

    for name in ["button", "dialog", "button", "tooltip", "dialog"] {
        let item = cache.get_or_insert_with(fingerprint(name), |_| resolve(name));
        info!(name = %item.name, dependencies = ?item.dependencies, "Using item");
    }

    let cached: Vec<_> = cache.values().map(|item| item.name.as_str()).collect();
    info!(?cached, "Most recently used first");
    Ok(())
}
