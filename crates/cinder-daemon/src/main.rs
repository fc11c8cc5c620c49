//! cinder-daemon: the Cinder streak service daemon.
//!
//! Single OS process running a Tokio async runtime. Clients talk to the
//! daemon via JSON-RPC over Unix socket; a background scheduler fires
//! the daily reminder and streak-warning sweeps.

mod commands;
mod config;
mod rpc;
mod scheduler;

use std::sync::Arc;

use tracing::{error, info};

use cinder_flash::FlashEngine;
use cinder_forge::ForgeEngine;
use cinder_notify::LogNotifier;
use cinder_shop::ShopEngine;
use cinder_social::SocialEngine;
use cinder_streak::StreakEngine;
use cinder_types::SystemClock;
use cinder_wallet::WalletLedger;

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

type Ledger = WalletLedger<SystemClock>;
type Forge = ForgeEngine<SystemClock, Ledger>;
type Streaks = StreakEngine<SystemClock, Ledger, Arc<Forge>>;
type Flash = FlashEngine<SystemClock, Ledger>;
type Shop = ShopEngine<SystemClock, Ledger>;
type Social = SocialEngine<SystemClock>;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<tokio::sync::Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Wall clock shared by every engine.
    pub clock: SystemClock,
    /// Coin ledger.
    pub wallet: Ledger,
    /// Streak engine. Completions stoke the forge through it.
    pub streaks: Streaks,
    /// Flash challenge engine.
    pub flash: Flash,
    /// Shop engine.
    pub shop: Shop,
    /// Crystal Forge engine.
    pub forge: Arc<Forge>,
    /// Social engine.
    pub social: Social,
    /// Push notifier used by the scheduler sweeps.
    pub notifier: LogNotifier,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;
    let data_dir = config.data_dir();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("cinder={}", config.log.log_level).parse()?),
        )
        .init();

    info!("Cinder daemon starting");

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    // 3. Open database
    let db_path = data_dir.join("cinder.db");
    let conn = cinder_db::open(&db_path)?;
    let db = Arc::new(tokio::sync::Mutex::new(conn));

    // 4. Build engines. The forge doubles as the streak engine's stoke
    //    hook, so completions feed crystal progress.
    let clock = SystemClock;
    let wallet = WalletLedger::new(clock);
    let forge = Arc::new(ForgeEngine::new(clock, WalletLedger::new(clock)));
    let streaks = StreakEngine::new(clock, WalletLedger::new(clock), forge.clone());
    let flash = FlashEngine::new(clock, WalletLedger::new(clock));
    let shop = ShopEngine::new(clock, WalletLedger::new(clock));
    let social = SocialEngine::new(clock);

    // 5. Build daemon state
    let state = Arc::new(DaemonState {
        db,
        config,
        clock,
        wallet,
        streaks,
        flash,
        shop,
        forge,
        social,
        notifier: LogNotifier,
    });

    // 6. Start the notification scheduler
    tokio::spawn(scheduler::run(state.clone()));

    // 7. Start IPC server
    let socket_path = data_dir.join("daemon.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    info!("Starting JSON-RPC server on {:?}", socket_path);

    // 8. Run the RPC server until shutdown
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}
