use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

mod config;
mod error;
mod hostkey;
mod ledger;
mod logging;
mod manifest;
mod notify;
mod postaction;
mod probe;
mod readiness;
mod ssh_session;
mod stats;
mod transport;
mod verify;
mod worker;

mod orchestrator;

use logging::{Status, status_line};

#[derive(Parser, Debug)]
#[command(name = "bmt-deploy", about = "Parallel SFTP fleet deployer")]
struct Cli {
    /// Directory containing ip.txt, file.txt and config.json (defaults to ./config)
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
    /// Skip the interactive mode prompt and deploy in the given mode
    #[arg(long, value_parser = ["move", "nomove"])]
    mode: Option<String>,
    /// Raise log verbosity to debug
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let log_dir = PathBuf::from("log");
    if let Err(e) = logging::init(&log_dir, cli.verbose) {
        eprintln!("warning: could not initialize file logging: {}", e);
    }

    let file_dir = PathBuf::from("file");
    let ip_path = cli.config_dir.join("ip.txt");
    let file_manifest_path = cli.config_dir.join("file.txt");

    if !file_dir.is_dir() {
        status_line(Status::Failed, None, "missing mandatory input: file/ directory not found");
        return 1;
    }
    let ip_text = match std::fs::read_to_string(&ip_path) {
        Ok(t) => t,
        Err(_) => {
            status_line(Status::Failed, None, &format!("missing mandatory input: {}", ip_path.display()));
            return 1;
        }
    };
    let manifest_text = match std::fs::read_to_string(&file_manifest_path) {
        Ok(t) => t,
        Err(_) => {
            status_line(
                Status::Failed,
                None,
                &format!("missing mandatory input: {}", file_manifest_path.display()),
            );
            return 1;
        }
    };

    let hosts = manifest::parse_hosts(&ip_text);
    if hosts.is_empty() {
        status_line(Status::Failed, None, "ip.txt contains no hosts");
        return 1;
    }
    let (manifest_entries, warnings) = manifest::parse_manifest(&manifest_text);
    for w in &warnings {
        status_line(Status::Warning, None, &w.to_string());
    }
    if manifest_entries.is_empty() {
        status_line(Status::Failed, None, "file.txt contains no usable entries");
        return 1;
    }

    let config = match config::Config::load_or_init(&cli.config_dir) {
        Ok(c) => c,
        Err(e) => {
            status_line(Status::Failed, None, &format!("failed to load config.json: {}", e));
            return 1;
        }
    };

    let move_mode = match cli.mode {
        Some(m) => m == "move",
        None => prompt_mode(),
    };

    hostkey::sanitize_all(&hosts, config.ssh.port);

    let orchestrator = orchestrator::Orchestrator {
        hosts,
        manifest: manifest_entries,
        local_dir: file_dir,
        move_mode,
        notifier: notify::Notifier::new(config.notification.clone()),
        config,
        ledger: ledger::Ledger::new(ledger::default_path()),
    };

    orchestrator.run()
}

/// Mandatory interactive prompt from the distilled spec's CLI surface: repeats until
/// the operator types `move` or `nomove`.
fn prompt_mode() -> bool {
    loop {
        print!("Enter mode (move/nomove) : ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            continue;
        }
        match line.trim() {
            "move" => return true,
            "nomove" => return false,
            _ => continue,
        }
    }
}
