//! Fetch command - deliver one intercepted request

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome, FetchOutcome};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::{Destination, Method, Request};
use console::style;
use std::io::Write;
use std::path::Path;
use tokio::fs;

/// Execute the fetch command
///
/// Response metadata goes to stderr so the body can be piped from stdout.
pub async fn execute(args: FetchArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let sim = Simulator::new(config, state_dir)?;

    let method: Method = args.method.parse().unwrap_or_else(|e| match e {});
    let mut request = Request::new(method, &args.url);
    if args.navigate {
        request = request.with_destination(Destination::Document);
    }

    let (response, source) = match sim.agent.handle(Event::Fetch(request)).await? {
        EventOutcome::Fetched(FetchOutcome::Respond { response, source }) => (response, source),
        EventOutcome::Fetched(FetchOutcome::Passthrough) => {
            eprintln!(
                "{} {} {} not intercepted",
                style("passthrough").yellow(),
                args.method.to_uppercase(),
                args.url
            );
            return Ok(());
        }
        other => return Err(unexpected(other)),
    };

    eprintln!(
        "{} {} {} ({}, {} bytes)",
        style(response.status()).bold(),
        response.response_type(),
        response.url(),
        style(source).cyan(),
        response.body_len()
    );

    let body = response.bytes();
    match args.output {
        Some(path) => fs::write(&path, &body)
            .await
            .map_err(|e| OffcacheError::io(format!("writing {}", path.display()), e))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&body)
                .and_then(|()| stdout.flush())
                .map_err(|e| OffcacheError::io("writing response body", e))?;
        }
    }
    Ok(())
}
