// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Brushlink CLI entrypoint.
//!
//! Loads an inference artifact, builds the diagram and serves MCP over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp` until interrupted.
//!
//! Use `--mcp` to serve over stdio instead, or `--summary` to print the diagram description.

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};

use brushlink::cell::RenderMode;
use brushlink::diagram::Diagram;
use brushlink::logging::{init_logging, LogConfig};
use brushlink::mcp::{describe, BrushlinkMcp};

const DEFAULT_MCP_HTTP_PORT: u16 = 27436;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <artifact.json> [--static] [--pred-check <var>]... [--scatter <var>]... [--mcp-http-port <port>] [-v]\n  {program} <artifact.json> [--static] [--pred-check <var>]... [--scatter <var>]... --mcp [-v]\n  {program} <artifact.json> [--static] [--pred-check <var>]... [--scatter <var>]... --summary\n\nBy default MCP is served over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n--mcp serves MCP over stdio instead.\n--summary prints the diagram description as JSON and exits.\n\n--static disables selections; coordinate selectors stay live.\n--pred-check adds a row of predictive checks for an observed variable.\n--scatter adds a pairwise scatter cell for every pair of the named variables (at least two).\n-v raises log verbosity (-vv for trace); BRUSHLINK_LOG or RUST_LOG override it."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    artifact: Option<String>,
    static_mode: bool,
    predictive_checks: Vec<String>,
    scatter: Vec<String>,
    mcp: bool,
    mcp_http_port: Option<u16>,
    summary: bool,
    verbosity: u8,
}

impl CliOptions {
    fn mode(&self) -> RenderMode {
        if self.static_mode {
            RenderMode::Static
        } else {
            RenderMode::Interactive
        }
    }
}

/// `-v`, `-vv`, `-vvv`, ...
fn is_verbosity_flag(arg: &str) -> bool {
    arg.strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b == b'v'))
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--static" => {
                if options.static_mode {
                    return Err(());
                }
                options.static_mode = true;
            }
            "--pred-check" => {
                let name = args.next().ok_or(())?;
                options.predictive_checks.push(name);
            }
            "--scatter" => {
                let name = args.next().ok_or(())?;
                options.scatter.push(name);
            }
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            "--summary" => {
                if options.summary {
                    return Err(());
                }
                options.summary = true;
            }
            flag if is_verbosity_flag(flag) => {
                let count = u8::try_from(flag.len() - 1).map_err(|_| ())?;
                options.verbosity = options.verbosity.saturating_add(count);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.artifact.is_some() {
                    return Err(());
                }
                options.artifact = Some(arg);
            }
        }
    }

    if options.artifact.is_none() {
        return Err(());
    }
    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }
    if options.summary && (options.mcp || options.mcp_http_port.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn build_diagram(options: &CliOptions) -> Result<Diagram, Box<dyn Error>> {
    let path = options.artifact.as_deref().unwrap_or_default();
    let diagram = Diagram::open(path, options.mode(), &options.predictive_checks)?;
    if options.scatter.is_empty() {
        Ok(diagram)
    } else {
        Ok(diagram.with_scatter(&options.scatter)?)
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "brushlink".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(&LogConfig::from_verbosity(options.verbosity))?;
        let diagram = build_diagram(&options)?;

        if options.summary {
            println!("{}", serde_json::to_string_pretty(&describe(&diagram))?);
            return Ok(());
        }

        let mcp = BrushlinkMcp::new(Arc::new(diagram));
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        if options.mcp {
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let mcp_http_port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
            let address = listener.local_addr()?;
            tracing::info!(%address, "serving MCP over HTTP at /mcp");

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();
            let server_shutdown = shutdown_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service =
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

            let router = Router::new().nest_service("/mcp", mcp_service);
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                });
                if let Err(err) = serve.await {
                    tracing::error!(error = %err, "MCP HTTP server error");
                }
            });

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            shutdown_token.cancel();
            let _ = server_handle.await;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("brushlink: {err}");
        std::process::exit(1);
    }
}
