#[tokio::main]
async fn main() {
    boatme_scheduler::run().await;
}
