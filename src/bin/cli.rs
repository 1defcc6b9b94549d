use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    jobboard_store::cli::run().await
}
