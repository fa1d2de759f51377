mod command_line_args;

use command_line_args::parse_args_or_exit;
use command_line_args::Arguments;

use mlc_miner::transaction_reader::{read_taxonomy, read_transactions};
use mlc_miner::{
    DatasetStats, Flat, Generalization, Miner, MiningStats, PatternWriter, Result, Taxonomy,
};

use std::path::Path;
use std::process;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn log_dataset(args: &Arguments, stats: &DatasetStats) {
    info!(
        transactions = %args.transactions_path,
        taxonomy = %args.taxonomy_path.as_ref().map(String::as_str).unwrap_or("-"),
        "dataset"
    );
    info!(
        utility = stats.total_utility,
        transactions = stats.transactions,
        generalized_items = stats.generalized_items,
        depth = stats.depth,
        max_length = stats.max_length,
        avg_length = stats.avg_length,
        "dataset characteristics"
    );
}

fn log_statistics(args: &Arguments, stats: &MiningStats) {
    for level in &stats.levels {
        info!(
            level = level.level,
            promising_items = level.promising_items,
            patterns = level.patterns,
            candidates = level.candidates,
            "level statistics"
        );
    }
    info!(
        eucs = args.use_eucs,
        min_utility = args.min_utility,
        millis = stats.elapsed.as_millis() as u64,
        patterns = stats.patterns,
        candidates = stats.candidates,
        "mining statistics"
    );
}

fn mine<G: Generalization>(args: &Arguments, generalization: &G) -> Result<()> {
    let timer = Instant::now();
    let transactions = read_transactions(Path::new(&args.transactions_path), args.max_transactions)?;
    info!(
        transactions = transactions.len(),
        millis = timer.elapsed().as_millis() as u64,
        "loaded transactions"
    );

    let miner = Miner::new(generalization, args.miner_config())?;
    log_dataset(args, &miner.dataset_stats(&transactions));

    let mut writer = match args.output_path {
        Some(ref path) => Some(PatternWriter::create(Path::new(path))?),
        None => None,
    };
    let stats = miner.run_with_sink(&transactions, |itemsets| match writer.as_mut() {
        Some(writer) => writer.write_all(itemsets),
        None => Ok(()),
    })?;
    if let Some(writer) = writer {
        writer.finish()?;
    }

    log_statistics(args, &stats);
    Ok(())
}

fn run(args: &Arguments) -> Result<()> {
    match args.taxonomy_path {
        Some(ref path) => {
            let taxonomy: Taxonomy = read_taxonomy(Path::new(path))?;
            info!(edges = taxonomy.len(), depth = taxonomy.max_level(), "loaded taxonomy");
            mine(args, &taxonomy)
        }
        None => mine(args, &Flat),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let arguments = parse_args_or_exit();

    if let Err(err) = run(&arguments) {
        println!("Error: {}", err);
        process::exit(1);
    }
}
