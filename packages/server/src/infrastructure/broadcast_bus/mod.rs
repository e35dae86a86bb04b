//! Broadcast Bus の実装
//!
//! ## 実装
//!
//! - `inmemory`: 単一プロセス内の実装
//! - 複数プロセス構成では分散 pub-sub で `BroadcastBus` を実装する

pub mod inmemory;

pub use inmemory::InMemoryBroadcastBus;
