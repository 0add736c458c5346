#[tokio::main]
async fn main() -> anyhow::Result<()> {
    word_drill_client::run().await
}
