use rocketwatch::server::main::run_server;

#[tokio::main]
async fn main() {
    run_server().await;
}
