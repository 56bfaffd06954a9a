use anyhow::Result;
use clap::Parser;
use ppi_cluster::cluster::{evaluate_clusters, Algorithm};
use ppi_cluster::config::Config;
use ppi_cluster::data::load_graph;
use ppi_cluster::storage::{save_results, RunResults};

#[derive(Parser, Debug)]
#[clap(
    name = "ppi-cluster",
    about = "Cluster protein-protein interaction networks and score the partition"
)]
struct Cli {
    /// Path to an edge-list or matrix-market file
    #[clap(long)]
    input: String,

    /// louvain, mcl, girvan-newman, walktrap, fast-greedy or leiden
    #[clap(long, default_value = "louvain")]
    algorithm: Algorithm,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting {} clustering", args.algorithm);
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let config = Config::default();

    // 1. Load and normalize the graph
    let graph = load_graph(&args.input)?;

    // 2. Cluster
    let partition = args.algorithm.run_with(&graph, &config)?;

    // 3. Evaluate
    let stats = evaluate_clusters(&graph, &partition);
    log::info!(
        "{} clusters (avg size {:.2}, max {}, min {}), modularity {:.4}",
        stats.num_clusters,
        stats.avg_cluster_size,
        stats.max_cluster_size,
        stats.min_cluster_size,
        stats.modularity
    );

    // 4. Save results
    save_results(
        &RunResults {
            algorithm: args.algorithm,
            graph: &graph,
            partition: &partition,
            stats: &stats,
            config: &config,
        },
        &args.output_dir,
    )?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
