use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Quill: in-memory content store for posts, comments, and authors",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the content store over HTTP
    Serve(ServeArgs),
    /// Check a seed file for broken invariants
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// JSON seed file, overrides the configured one
    #[arg(long)]
    pub seed: Option<PathBuf>,
    /// Address to bind, overrides the configured one
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub seed: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["quill", "serve", "--seed", "site.json", "--bind", "127.0.0.1:4000"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.seed, Some(PathBuf::from("site.json")));
        assert_eq!(args.bind.map(|a| a.port()), Some(4000));
        assert!(args.config.is_none());
    }

    #[test]
    fn parse_check_with_globals() {
        let cli = Cli::try_parse_from(["quill", "check", "site.json", "-v", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn bad_bind_rejected() {
        assert!(Cli::try_parse_from(["quill", "serve", "--bind", "nowhere"]).is_err());
    }
}
