use clap::Parser;
use dense_hash::HashMap;
use dense_hash::LoadPolicy;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "count", default_value_t = 1000)]
    count: u64,

    /// Erase every n-th key after filling; 0 keeps everything.
    #[arg(short = 'e', long = "erase_every", default_value_t = 2)]
    erase_every: u64,

    #[arg(long = "min_buckets")]
    min_buckets: Option<usize>,

    #[arg(long = "grow_ratio")]
    grow_ratio: Option<usize>,

    #[arg(long = "shrink_ratio")]
    shrink_ratio: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let default = LoadPolicy::default();
    let policy = match LoadPolicy::new(
        args.min_buckets.unwrap_or(default.min_buckets()),
        args.grow_ratio.unwrap_or(default.grow_ratio()),
        args.shrink_ratio.unwrap_or(default.shrink_ratio()),
    ) {
        Ok(policy) => policy,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    println!("Filling map with {} keys using {:?}", args.count, policy);

    let mut map: HashMap<u64, u64> = HashMap::with_policy(policy);
    for key in 0..args.count {
        map.insert(key, key * key);
    }

    println!(
        "Inserted {} keys into {} buckets ({:.2} per bucket)",
        map.len(),
        map.bucket_count(),
        map.len() as f64 / map.bucket_count() as f64
    );
    map.debug_stats().print();

    if args.erase_every > 0 {
        for key in (0..args.count).step_by(args.erase_every as usize) {
            map.remove(&key);
        }

        println!(
            "After erasing every {} key(s): {} keys in {} buckets",
            args.erase_every,
            map.len(),
            map.bucket_count()
        );
        map.debug_stats().print();
    }

    map.print_bucket_histogram();
}
