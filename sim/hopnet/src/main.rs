use hopnet::cli::initialize_from_arguments;

/// Runs a routing session on the topology given on the command line
#[tokio::main]
async fn main() {
    println!("Hopnet v{}", env!("CARGO_PKG_VERSION"));
    println!("--- Network Router Simulation ---");
    initialize_from_arguments().await;
    println!("Done");
}
