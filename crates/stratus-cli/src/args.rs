use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Interactive shell for cloud infrastructure operations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    #[arg(short = 't', long)]
    pub token: Option<String>,

    #[arg(long)]
    pub tenant_id: Option<String>,

    #[arg(short = 'i', long)]
    pub identity_type: Option<String>,

    #[arg(short = 'r', long)]
    pub region: Option<String>,

    #[arg(short = 'l', long)]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Echo every recorded message regardless of severity")]
    pub verbose: bool,

    #[arg(long, help = "Log provider HTTP traffic at debug level")]
    pub http_debug: bool,

    #[arg(long, help = "Skip TLS certificate verification on provider calls")]
    pub no_verify_ssl: bool,

    #[arg(long, help = "Shell state directory (default ~/.stratus)")]
    pub home_dir: Option<PathBuf>,
}
