use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{info, warn};

use smartpac::utils::host_from_url;
use smartpac::{ProxyEngine, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Standalone PAC script
    Pac,
    /// JSON configuration object for a browser proxy API
    Config,
}

/// Compile browser proxy rules into a PAC script or a proxy configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the profile (YAML, TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Output file path, stdout when omitted
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// What to generate
    #[arg(short, long, value_enum, default_value = "pac")]
    format: OutputFormat,

    /// Evaluate a single request URL in-process instead of generating output
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Host of the request given with --url, read from the URL when omitted
    #[arg(long, value_name = "HOST", requires = "url")]
    host: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let profile = Profile::load_from_file(&args.config)
        .with_context(|| format!("Failed to load profile '{}'", args.config))?;

    let (engine, errors) = ProxyEngine::from_profile(&profile);
    for e in &errors {
        warn!("Rule skipped: {}", e);
    }

    if let Some(url) = &args.url {
        let host = match &args.host {
            Some(host) => host.clone(),
            None => host_from_url(url)
                .with_context(|| format!("No host in '{}', pass --host", url))?,
        };
        let token = engine.find_proxy_for_url(url, &host);
        println!("\"{}\"", token);
        return Ok(());
    }

    let output = match args.format {
        OutputFormat::Pac => engine.generate_pac_script()?,
        OutputFormat::Config => engine.proxy_config()?.to_json()?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, output).with_context(|| format!("Failed to write '{}'", path))?;
            info!("Successfully wrote {:?} output to {}", args.format, path);
        }
        None => println!("{}", output),
    }

    Ok(())
}
