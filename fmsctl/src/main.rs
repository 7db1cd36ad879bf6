use clap::Parser;

#[tokio::main]
async fn main() {
    fmsctl::logging::init();
    let cli = fmsctl::Cli::parse();
    if let Err(err) = fmsctl::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
