//! Fetch command - route one request through the interceptor.

use std::path::PathBuf;

use console::style;
use loppo::fetch::{Request, ResponseSource};

use super::common::format_bytes;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub url: String,
    pub method: String,
    pub offline: bool,
    pub output: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(debug)?;
    runner.log_startup("fetch");

    let app = runner.start_app(args.offline)?;
    let request = Request::new(args.method, args.url);
    let route = app.interceptor().route(&request);

    let result = runner.block_on(app.fetch_handle().fetch(request.clone()));
    runner.stop_app(app);
    let response = result?;

    let source = match response.source {
        ResponseSource::Network => style("network").green(),
        ResponseSource::Cache => style("cache").cyan(),
        ResponseSource::Synthetic => style("synthetic").yellow(),
    };

    println!("{}", request);
    println!("  Route:   {:?}", route);
    println!("  Status:  {}", response.status);
    println!("  Source:  {}", source);
    println!(
        "  Type:    {}",
        response.content_type.as_deref().unwrap_or("(none)")
    );
    println!("  Size:    {}", format_bytes(response.body.len() as u64));

    if let Some(path) = args.output {
        std::fs::write(&path, &response.body).map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        })?;
        println!("  Saved:   {}", path.display());
    }

    Ok(())
}
