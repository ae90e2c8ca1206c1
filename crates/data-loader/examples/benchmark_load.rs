use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = Path::new("data/model");

    println!("Loading catalog and similarity matrix...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (movies, dimension) = index.counts();
    let cells = dimension * dimension;

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies);
    println!("Matrix: {}x{}", dimension, dimension);
    println!("Non-finite scores: {}", index.count_non_finite_scores());
    println!("\nPerformance: {:.0} scores/second",
             cells as f64 / elapsed.as_secs_f64());
}
