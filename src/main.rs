use clap::Parser;
use std::env;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .or_else(|| {
                env::var("DEBTPLAN_PORT")
                    .ok()
                    .and_then(|s| s.parse::<u16>().ok())
            })
            .unwrap_or(DEFAULT_PORT);
        if let Err(e) = debtplan::api::run_http_server(port).await {
            error!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let cli = debtplan::api::Cli::parse();
    match debtplan::api::run_cli(cli) {
        Ok(output) => println!("{output}"),
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
