use anyhow::Context;
use colored::Colorize;
use quill_core::{IntegrityReport, SiteData};
use quill_server::{QuillServer, ServerConfig};
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Check(args) => cmd_check(args, &cli.format),
    }
}

fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(seed) = &args.seed {
        config.seed_path = Some(seed.clone());
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    let server = QuillServer::from_config(config).context("failed to prepare store")?;
    let running = server.start().await?;
    println!("{} Quill serving on {}", "✓".green().bold(), running.url().bold());
    tokio::signal::ctrl_c().await?;
    running.stop().await?;
    println!("Stopped.");
    Ok(())
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let data = SiteData::load(&args.seed)
        .with_context(|| format!("failed to load {}", args.seed.display()))?;
    let report = data.check_integrity();
    println!("{}", render_report(&report, format));
    verdict(&report)
}

fn verdict(report: &IntegrityReport) -> anyhow::Result<()> {
    let count = report.violations.len();
    if report.has_dangling_references() {
        anyhow::bail!("{count} violation(s) found, including dangling author references");
    }
    if !report.is_valid() {
        anyhow::bail!("{count} violation(s) found");
    }
    Ok(())
}

fn render_report(report: &IntegrityReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({
            "authors": report.author_count,
            "posts": report.post_count,
            "comments": report.comment_count,
            "violations": report
                .violations
                .iter()
                .map(|v| json!({ "kind": format!("{:?}", v.kind), "description": v.description }))
                .collect::<Vec<_>>(),
        })
        .to_string(),
        OutputFormat::Text => {
            let mut out = format!(
                "{} authors, {} posts, {} comments",
                report.author_count.to_string().bold(),
                report.post_count.to_string().bold(),
                report.comment_count.to_string().bold(),
            );
            if report.is_valid() {
                out.push_str(&format!("\n{} No issues.", "✓".green().bold()));
            }
            for violation in &report.violations {
                out.push_str(&format!("\n  {} {}", "✗".red(), violation.description));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Author, Post};
    use std::path::PathBuf;

    fn serve_args() -> ServeArgs {
        ServeArgs {
            config: None,
            seed: None,
            bind: None,
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:5000\"\nseed_path = \"a.json\"\n").unwrap();

        let mut args = serve_args();
        args.config = Some(path);
        let config = server_config(&args).unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.seed_path, Some(PathBuf::from("a.json")));

        args.seed = Some(PathBuf::from("b.json"));
        args.bind = Some("127.0.0.1:6000".parse().unwrap());
        let config = server_config(&args).unwrap();
        assert_eq!(config.bind_addr.port(), 6000);
        assert_eq!(config.seed_path, Some(PathBuf::from("b.json")));
    }

    #[test]
    fn json_report() {
        let data = SiteData::new(vec![Post::new("Hi", "x", "ghost")], vec![Author::new("a1", "Ann")]);
        let rendered = render_report(&data.check_integrity(), &OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["posts"], 1);
        assert_eq!(value["violations"][0]["kind"], "DanglingPostAuthor");
    }

    #[test]
    fn verdict_names_dangling_references() {
        let dangling = SiteData::new(vec![Post::new("Hi", "x", "ghost")], Vec::new());
        let err = verdict(&dangling.check_integrity()).unwrap_err();
        assert!(err.to_string().contains("dangling author references"));

        let duplicated = SiteData::new(Vec::new(), vec![Author::new("a1", "Ann"), Author::new("a1", "Bo")]);
        let err = verdict(&duplicated.check_integrity()).unwrap_err();
        assert_eq!(err.to_string(), "1 violation(s) found");
    }

    #[test]
    fn check_fails_on_violations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "posts": [{ "id": "x", "title": "X", "body": "", "author": "nobody" }] }"#).unwrap();
        assert!(cmd_check(CheckArgs { seed: path }, &OutputFormat::Text).is_err());
    }

    #[test]
    fn check_passes_clean_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "authors": [{ "id": "a1" }] }"#).unwrap();
        assert!(cmd_check(CheckArgs { seed: path }, &OutputFormat::Text).is_ok());
    }
}
