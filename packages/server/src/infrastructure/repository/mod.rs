//! 外部コラボレーターの実装
//!
//! 本番環境ではリレーショナル DB などが担う部分です。
//! 開発とテスト用にインメモリ実装を提供します。

pub mod inmemory;

pub use inmemory::{FixtureError, InMemoryDirectory, InMemoryMessageStore, StoredMessage};
