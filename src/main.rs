#[tokio::main]
async fn main() -> vocpub::Result<()> {
    vocpub::cli::main().await
}
