use clap::Parser;
use surety_app::{run, Cli};

#[tokio::main]
async fn main() {
    surety_app::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
