use clap::Parser;
use repo_miner::Error;
use repo_miner_app::Args;

/// Mines GitHub commits and issues into CSV files and summarizes them

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    repo_miner_app::run(args).await
}
