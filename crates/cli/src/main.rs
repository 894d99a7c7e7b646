use clap::Parser;
use compactdenial_application::use_cases::QueryTarget;
use compactdenial_domain::config::parse_server_addr;
use compactdenial_domain::{CliOverrides, DnsQuery};
use compactdenial_infrastructure::dns::ResponseParser;
use std::process::ExitCode;
use tracing::{debug, error};

mod bootstrap;
mod di;
mod output;

#[derive(Parser, Debug)]
#[command(name = "compactrcode")]
#[command(version)]
#[command(
    about = "Query a DNS name and print its response code, reporting Compact Denial of Existence answers as NXDOMAIN"
)]
struct Cli {
    /// DNS query name
    qname: String,

    /// DNS query type (mnemonic or TYPEnnn)
    qtype: String,

    /// Query this server directly without recursion (IP or IP:PORT)
    #[arg(short = 's', long, value_name = "ADDR")]
    server: Option<String>,

    /// Print the full response instead of the code
    #[arg(short = 'r', long, conflicts_with = "bitmaps")]
    response: bool,

    /// Print the decoded NSEC type bitmap windows instead of the code
    #[arg(short = 'b', long)]
    bitmaps: bool,

    /// Set the Compact Answers OK EDNS flag
    #[arg(long)]
    co: bool,

    /// Recursive resolver to use instead of the configured list (repeatable)
    #[arg(long = "resolver", value_name = "ADDR")]
    resolvers: Vec<String>,

    /// EDNS UDP payload size
    #[arg(long, value_name = "N")]
    payload: Option<u16>,

    /// Total query timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Trust compact denial without AD=1 (insecure, responses can be forged)
    #[arg(long)]
    allow_unauthenticated: bool,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            resolvers: self.resolvers.clone(),
            udp_payload: self.payload,
            timeout_secs: self.timeout,
            compact_ok: self.co,
            allow_unauthenticated: self.allow_unauthenticated,
            log_level: self.log_level.clone(),
        }
    }

    fn target(&self) -> anyhow::Result<QueryTarget> {
        match &self.server {
            Some(server) => parse_server_addr(server)
                .map(QueryTarget::Server)
                .map_err(|e| anyhow::anyhow!(e)),
            None => Ok(QueryTarget::Recursive),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!(error = %e, "compactrcode failed");
            eprintln!("compactrcode: {:#}", e);
            ExitCode::from(output::EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);

    let query = DnsQuery::parse(&cli.qname, &cli.qtype)?;
    let target = cli.target()?;

    debug!(
        name = %query.name,
        record_type = %query.record_type,
        target = ?target,
        "Resolving"
    );

    let use_cases = di::UseCases::new(&config);
    let outcome = use_cases.resolve_rcode.execute(&query, target).await?;

    if cli.response {
        match &outcome.response {
            Some(response) => print!("{}", ResponseParser::render(&response.wire)?),
            None => println!("{}", outcome.rcode),
        }
    } else if cli.bitmaps {
        if let Some(response) = &outcome.response {
            let inspections = use_cases.inspect_bitmaps.execute(&response.message)?;
            print!("{}", output::format_bitmaps(&inspections));
        }
    } else {
        println!("{}", outcome.rcode);
    }

    Ok(output::exit_status(outcome.rcode))
}
