//! Real-time group messaging and notification gateway.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-server
//! cargo run --bin huddle-server -- --host 0.0.0.0 --port 3000 --fixtures fixtures.json
//! cargo run --bin huddle-server -- --overflow-policy disconnect --circle-delivery best-effort
//! cargo run --bin huddle-server -- --store-capacity 10000
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use huddle_server::{
    domain::{DeliveryStrictness, OverflowPolicy, RoomPolicy},
    infrastructure::{
        broadcast_bus::{InMemoryBroadcastBus, inmemory::DEFAULT_QUEUE_CAPACITY},
        repository::{InMemoryDirectory, InMemoryMessageStore},
    },
    ui::Server,
    usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, SendMessageUseCase},
};
use huddle_shared::{logger::setup_logger, time::SystemClock};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OverflowArg {
    /// Drop the event for the slow subscriber only
    Drop,
    /// Disconnect the slow subscriber
    Disconnect,
}

impl From<OverflowArg> for OverflowPolicy {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Drop => Self::Drop,
            OverflowArg::Disconnect => Self::Disconnect,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeliveryArg {
    /// Do not persist circle messages
    Ephemeral,
    /// Persist, broadcast even if persisting fails
    BestEffort,
    /// Broadcast only persisted messages
    Durable,
}

impl From<DeliveryArg> for DeliveryStrictness {
    fn from(arg: DeliveryArg) -> Self {
        match arg {
            DeliveryArg::Ephemeral => Self::Ephemeral,
            DeliveryArg::BestEffort => Self::BestEffort,
            DeliveryArg::Durable => Self::Durable,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "huddle-server")]
#[command(about = "Real-time group messaging and notification gateway", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// What to do when a connection's outbound queue is full
    #[arg(long, value_enum, default_value = "drop")]
    overflow_policy: OverflowArg,

    /// Persistence strictness for circle rooms
    #[arg(long, value_enum, default_value = "durable")]
    circle_delivery: DeliveryArg,

    /// Announce joins and leaves in circle rooms
    #[arg(long)]
    announce_circle_presence: bool,

    /// Maximum number of messages the store keeps (unlimited if omitted)
    #[arg(long)]
    store_capacity: Option<usize>,

    /// JSON file with users, tokens and circle memberships
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME")], "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Directory and Message Store
    // 2. Broadcast Bus
    // 3. UseCases
    // 4. Server

    // 1. Create the directory (credentials + circle membership) and message store
    let directory = match &args.fixtures {
        Some(path) => match InMemoryDirectory::load(path).await {
            Ok(directory) => directory,
            Err(e) => {
                tracing::error!("Failed to load fixtures from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("No fixtures given, every token will be rejected");
            InMemoryDirectory::new()
        }
    };
    tracing::info!(
        "Directory loaded ({} users, {} circles)",
        directory.user_count().await,
        directory.circle_count().await
    );
    let directory = Arc::new(directory);
    let store = Arc::new(InMemoryMessageStore::with_clock(
        Arc::new(SystemClock),
        args.store_capacity,
    ));
    match args.store_capacity {
        Some(capacity) => tracing::info!("Message store ready (capacity {})", capacity),
        None => tracing::info!("Message store ready (unlimited)"),
    }

    // 2. Create the Broadcast Bus
    let overflow_policy = OverflowPolicy::from(args.overflow_policy);
    let bus = Arc::new(InMemoryBroadcastBus::new(
        args.queue_capacity,
        overflow_policy,
    ));
    tracing::info!(
        "Broadcast bus ready (queue capacity {}, overflow policy {:?})",
        args.queue_capacity,
        overflow_policy
    );

    // 3. Create UseCases
    let circle_policy = RoomPolicy {
        strictness: args.circle_delivery.into(),
        announce_presence: args.announce_circle_presence,
    };
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        directory.clone(),
        directory,
        bus.clone(),
        circle_policy,
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(bus.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(store, bus));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_capacity_is_unlimited_by_default() {
        // テスト項目: --store-capacity を省略するとストアの上限は無い
        // given (前提条件):
        let argv = ["huddle-server"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.store_capacity, None);
    }

    #[test]
    fn test_store_capacity_flag_is_parsed() {
        // テスト項目: --store-capacity で指定した値がストアの上限になる
        // given (前提条件):
        let argv = ["huddle-server", "--store-capacity", "10"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.store_capacity, Some(10));
    }
}
