//! Cache management CLI commands.

use clap::Subcommand;
use console::style;
use loppo::cache::namespace_stats;

use super::common::format_bytes;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// List namespaces with entry counts and sizes
    List,
    /// List the URLs stored in a namespace
    Keys {
        /// Namespace name (e.g., loppo-tiles)
        namespace: String,
    },
    /// Show totals across every namespace
    Stats,
    /// Delete a namespace and everything in it
    Delete {
        /// Namespace name
        namespace: String,
    },
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(debug)?;
    runner.log_startup("cache");

    let app = runner.start_app(true)?;
    let store = app.store();
    let names = app.manager().names().clone();

    let result = runner.block_on(async {
        match action {
            CacheAction::List => {
                let stats = namespace_stats(store.as_ref()).await?;
                if stats.is_empty() {
                    println!("No cache namespaces");
                }
                for (name, stats) in stats {
                    let label = if names.is_current(&name) {
                        style(name).green()
                    } else {
                        style(format!("{} (stale)", name)).dim()
                    };
                    println!(
                        "{:<32} {:>8} entries  {:>10}",
                        label,
                        stats.entries,
                        format_bytes(stats.bytes)
                    );
                }
            }
            CacheAction::Keys { namespace } => {
                if !store.list_namespaces().await?.contains(&namespace) {
                    return Err(CliError::InvalidArgument(format!(
                        "No namespace named '{}'",
                        namespace
                    )));
                }
                for key in store.open(&namespace).await?.keys().await? {
                    println!("{}", key);
                }
            }
            CacheAction::Stats => {
                let stats = namespace_stats(store.as_ref()).await?;
                let entries: u64 = stats.iter().map(|(_, s)| s.entries).sum();
                let bytes: u64 = stats.iter().map(|(_, s)| s.bytes).sum();
                println!("Backend:    {}", app.config().store);
                println!("Namespaces: {}", stats.len());
                println!("Entries:    {}", entries);
                println!("Size:       {}", format_bytes(bytes));
            }
            CacheAction::Delete { namespace } => {
                if store.delete_namespace(&namespace).await? {
                    println!("{} Deleted {}", style("✓").green(), namespace);
                } else {
                    println!("No namespace named '{}'", namespace);
                }
            }
        }
        Ok::<(), CliError>(())
    });

    runner.stop_app(app);
    result
}
