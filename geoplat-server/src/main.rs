#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geoplat_server::run().await
}
