use clap::{Parser, Subcommand};
use repair_site::{config, generate, logging, output, server};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repair-site")]
#[command(about = "Website and document server for a phone repair shop")]
#[command(long_about = "\
Website and document server for a phone repair shop

The site directory holds an optional config.toml and the generated
documents:

  site/
  ├── config.toml          # Site config (optional, sparse)
  ├── index.html           # Home            → /
  ├── services.html        # Services        → /services
  ├── gallery.html         # Gallery         → /gallery
  ├── about.html           # About           → /about
  ├── contact.html         # Contact form    → /contact
  ├── preisliste.html      # Price list      → /preisliste
  └── assets/              # Anything else, served as-is

Page requests are matched by keyword, so /de/services/akku still serves
services.html. Paths containing a dot are served as static files.

Run 'repair-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site root over HTTP
    Serve {
        /// Port to listen on (overrides PORT and config.toml)
        #[arg(long)]
        port: Option<u16>,
        /// Interface to bind (overrides config.toml)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Render the six documents into the site root
    Generate {
        /// Write documents here instead of the configured site root
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate config.toml and list which documents are present
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);

    match cli.command {
        Command::Serve { port, bind } => {
            let mut site_config = config::load_config(&cli.site)?;
            if let Some(port) = port {
                site_config.server.port = port;
            }
            if let Some(host) = bind {
                site_config.server.host = host;
            }
            let root = site_config.server.root.clone();
            for (doc, present) in output::document_presence(&root) {
                if !present {
                    tracing::warn!(document = %doc, "document missing; run 'repair-site generate'");
                }
            }
            let addr = server::parse_addr(&site_config.server.bind_addr())?;
            server::serve(addr, root).await?;
        }
        Command::Generate { output: target } => {
            let site_config = config::load_config(&cli.site)?;
            let output_dir = target.unwrap_or_else(|| site_config.server.root.clone());
            let written = generate::generate(&site_config, &output_dir)?;
            output::print_generate_output(&written, &output_dir);
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let site_config = config::load_config(&cli.site)?;
            let documents = output::document_presence(&site_config.server.root);
            output::print_check_output(&site_config, &documents);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
