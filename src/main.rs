use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uniprot_mcp::config::{find_config_file, get_config, load_config, Config};
use uniprot_mcp::mcp::McpServer;
use uniprot_mcp::models::{OutputFormat, PageContent, ProteinSummary, SearchRequest};
use uniprot_mcp::uniprot::UniProtClient;
use uniprot_mcp::utils::HttpClient;

/// UniProt MCP - search the UniProt protein database and serve it as MCP tools
#[derive(Parser, Debug)]
#[command(name = "uniprot-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the UniProt protein database and expose it as MCP tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputMode::Auto)]
    output: OutputMode,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputMode {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// UniProt response format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Xml,
    Tsv,
    Fasta,
    List,
    Txt,
    Gff,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Xml => OutputFormat::Xml,
            Format::Tsv => OutputFormat::Tsv,
            Format::Fasta => OutputFormat::Fasta,
            Format::List => OutputFormat::List,
            Format::Txt => OutputFormat::Txt,
            Format::Gff => OutputFormat::Gff,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (for Claude Desktop and other MCP clients)
    Serve {
        /// Run in stdio mode (for MCP clients like Claude Desktop)
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in HTTP/SSE mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP/SSE mode
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to for HTTP/SSE mode
        #[arg(long)]
        host: Option<String>,
    },

    /// Search UniProt
    Search {
        /// UniProt query string (e.g., "insulin AND organism_name:human")
        query: String,

        /// Response format
        #[arg(long, short, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Fields to retrieve, comma-separated (TSV and JSON formats only)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,

        /// Include isoforms in the results
        #[arg(long)]
        include_isoform: bool,

        /// Request compressed results
        #[arg(long)]
        compressed: bool,

        /// Entries per page (defaults to the configured page size)
        #[arg(long, short)]
        size: Option<u32>,

        /// Walk all result pages instead of just the first
        #[arg(long)]
        all: bool,
    },

    /// Fetch the FASTA sequence for an accession
    Fasta {
        /// UniProt accession (e.g., "P38398")
        accession: String,
    },

    /// Fetch entry data for one or more accessions
    Get {
        /// UniProt accession(s), comma-separated
        #[arg(value_delimiter = ',')]
        accessions: Vec<String>,

        /// Fields to retrieve, comma-separated
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("uniprot_mcp={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    let client = Arc::new(build_client(&config)?);

    match cli.command {
        Some(Commands::Serve {
            stdio,
            http,
            port,
            host,
        }) => {
            let server = McpServer::new(client);

            // Use HTTP mode if --http flag is provided, otherwise use --stdio flag
            let use_http = http || !stdio;

            if use_http {
                let addr = format!(
                    "{}:{}",
                    host.unwrap_or(config.server.host),
                    port.unwrap_or(config.server.port)
                );
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                tracing::info!("Running MCP server in stdio mode");
                server.run().await?;
            }
        }

        Some(Commands::Search {
            query,
            format,
            fields,
            include_isoform,
            compressed,
            size,
            all,
        }) => {
            let mut request = SearchRequest::new(&query)
                .format(format.into())
                .include_isoform(include_isoform)
                .compressed(compressed)
                .size(effective_page_size(size, &config))
                .paginate(all);
            if let Some(fields) = fields {
                request = request.fields(fields);
            }

            if all {
                run_paginated_search(&client, &request, cli.output).await?;
            } else {
                let page = client.search_page(&request).await?;
                print_page(&page, cli.output)?;
            }
        }

        Some(Commands::Fasta { accession }) => {
            let fasta = client.get_fasta(&accession).await?;
            print!("{}", fasta);
        }

        Some(Commands::Get { accessions, fields }) => {
            if accessions.is_empty() {
                anyhow::bail!("At least one accession is required");
            }

            let page = client.get_data(&accessions, fields.as_deref()).await?;
            print_page(&page, cli.output)?;
        }

        None => {
            // Default to stdio MCP server when run without a subcommand
            // (matches how MCP clients typically launch servers)
            let server = McpServer::new(client);
            server.run().await?;
        }
    }

    Ok(())
}

/// Build the UniProt client from configuration
fn build_client(config: &Config) -> Result<UniProtClient> {
    let http = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.uniprot.timeout_secs,
    ))?);
    let client = UniProtClient::with_client(http, &config.uniprot.base_url)
        .with_retry_policy(config.retry.to_policy());
    Ok(client)
}

/// Page size for a search: the CLI flag wins, the configured default otherwise
fn effective_page_size(cli_size: Option<u32>, config: &Config) -> u32 {
    cli_size.unwrap_or(config.uniprot.default_page_size)
}

/// Walk all pages of a search, printing each page as it arrives
async fn run_paginated_search(
    client: &UniProtClient,
    request: &SearchRequest,
    output: OutputMode,
) -> Result<()> {
    let mut pages = client.search_pages(request);
    let mut page_number = 0u32;

    while let Some(page) = pages.next_page().await {
        let page = page?;
        page_number += 1;
        tracing::debug!(
            "Fetched page {} ({} total results)",
            page_number,
            page.total_results
        );
        print_page(&page, output)?;
    }

    Ok(())
}

/// Print one result page in the requested output mode
fn print_page(page: &uniprot_mcp::SearchPage, output: OutputMode) -> Result<()> {
    let mode = match output {
        OutputMode::Auto => {
            if std::io::stdout().is_terminal() {
                OutputMode::Table
            } else {
                OutputMode::Json
            }
        }
        other => other,
    };

    match (&page.content, mode) {
        (PageContent::Json(_), OutputMode::Table) => print_table(page),
        (_, OutputMode::Json) => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        (content, _) => {
            println!("{}", content.to_display_string());
        }
    }

    Ok(())
}

/// Render the entries of a JSON page as a table
fn print_table(page: &uniprot_mcp::SearchPage) {
    use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
    use owo_colors::OwoColorize;

    let entries = match page.content.results() {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            println!("No results.");
            return;
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Accession", "Protein", "Gene(s)", "Organism"]);

    for entry in entries {
        let summary = ProteinSummary::from_entry(entry);
        table.add_row(vec![
            summary.accession,
            summary.protein_name,
            summary.gene_names,
            summary.organism,
        ]);
    }

    println!("{}", table);
    println!(
        "{} {} (showing {})",
        "Total results:".bold(),
        page.total_results,
        entries.len()
    );
}
