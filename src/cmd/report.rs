use rocketwatch::report::main::run_report;

#[tokio::main]
async fn main() {
    run_report().await;
}
