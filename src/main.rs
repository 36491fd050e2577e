#[tokio::main]
async fn main() -> anyhow::Result<()> {
    minima_kit::service::run_cli().await
}
