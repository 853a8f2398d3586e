//! Install and activate commands.
//!
//! Each CLI invocation is a fresh process, so `install` and `activate` are
//! separate steps. `activate` accepts a shell namespace left behind by an
//! earlier `install`.

use console::style;
use loppo::config::CacheBackend;

use super::common::format_bytes;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Fetch the shell resources into a fresh shell namespace.
pub fn run_install(debug: bool, activate: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(debug)?;
    runner.log_startup("install");
    warn_if_memory_backend(&runner);

    let app = runner.start_app(false)?;
    let manager = app.manager();

    println!("Installing {} from {}", manager.names().shell(), manager.manifest().origin());

    let result = runner.block_on(async {
        let report = manager.install(app.client().as_ref()).await?;
        let activation = if activate {
            Some(manager.activate().await?)
        } else {
            None
        };
        Ok::<_, CliError>((report, activation))
    });
    runner.stop_app(app);
    let (report, activation) = result?;

    println!(
        "{} Stored {} resources ({}) in {}",
        style("✓").green(),
        report.resources,
        format_bytes(report.bytes),
        report.namespace
    );

    if let Some(activation) = activation {
        print_activation(&activation.deleted, &activation.kept);
    }

    Ok(())
}

/// Delete every namespace except the current shell and tile caches.
pub fn run_activate(debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(debug)?;
    runner.log_startup("activate");
    warn_if_memory_backend(&runner);

    let app = runner.start_app(true)?;
    let manager = app.manager();

    let result = runner.block_on(manager.activate());
    runner.stop_app(app);
    let report = result?;

    print_activation(&report.deleted, &report.kept);
    Ok(())
}

fn print_activation(deleted: &[String], kept: &[String]) {
    println!("{} Activated", style("✓").green());
    for name in kept {
        println!("  kept    {}", name);
    }
    for name in deleted {
        println!("  deleted {}", style(name).dim());
    }
}

fn warn_if_memory_backend(runner: &CliRunner) {
    if runner.config().cache.backend == CacheBackend::Memory {
        println!(
            "{} cache.backend is 'memory'; nothing is kept after this command exits",
            style("Note:").yellow()
        );
    }
}
