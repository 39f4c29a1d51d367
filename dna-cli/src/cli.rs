#![allow(clippy::print_stdout)]

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use dna::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_READ_TIMEOUT_MS, DEFAULT_ROOT, DnaConfig, DnaOps,
    tool_descriptors,
};
use serde_json::Value;

use crate::logging::init_tracing;
use crate::mcp::McpServer;
use crate::server;

#[derive(Debug, Parser)]
#[command(
    name = "dna-mcp",
    version,
    about = "Privacy-gated SNP queries over a local DNA profile store, served over MCP"
)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding one sub-directory per subject
    #[arg(long, env = "DNA_PROFILES_DIR", default_value = DEFAULT_ROOT, global = true)]
    pub root: String,

    /// Largest file, in bytes, that will be read
    #[arg(long, env = "DNA_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE, global = true)]
    pub max_file_size: u64,

    /// Per-file read timeout in milliseconds
    #[arg(long, env = "DNA_READ_TIMEOUT_MS", default_value_t = DEFAULT_READ_TIMEOUT_MS, global = true)]
    pub read_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve MCP over stdin/stdout (default)
    Stdio,
    /// Serve MCP and the plain tool endpoints over HTTP
    Http {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Print the tool descriptors as JSON
    Tools,
    /// Run one tool and print its payload
    Call {
        /// Tool name, e.g. `query_snp_data`
        name: String,
        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

impl Cli {
    #[must_use]
    pub fn config(&self) -> DnaConfig {
        DnaConfig::from_user_path(&self.root)
            .with_max_file_size(self.max_file_size)
            .with_read_timeout(Duration::from_millis(self.read_timeout_ms))
    }
}

/// Parse the command line and run the selected command.
///
/// # Errors
/// Returns an error if the transport fails, arguments cannot be parsed as
/// JSON, or the named tool does not exist.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    tracing::info!(root = %config.root.display(), "using subject store");
    let server = McpServer::new(DnaOps::with_fs(config));

    match cli.command.unwrap_or(Command::Stdio) {
        Command::Stdio => {
            server
                .serve(tokio::io::stdin(), tokio::io::stdout())
                .await
        }
        Command::Http { host, port } => {
            server::serve(server, SocketAddr::new(host, port), cli.verbose).await
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_descriptors())?);
            Ok(())
        }
        Command::Call { name, arguments } => {
            let arguments: Value = serde_json::from_str(&arguments)
                .with_context(|| format!("arguments for {name} are not valid JSON"))?;
            let payload = server.ops().call(&name, arguments).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
    }
}
