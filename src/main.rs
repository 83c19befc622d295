#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pathscope_cli::cli::run().await
}
