use clap::Parser;
use clap::ValueEnum;
use twin_hash::AnyHashTable;
use twin_hash::DefaultHashBuilder;
use twin_hash::HashTable;
use twin_hash::Strategy;
use twin_hash::TableConfig;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Chaining,
    OpenAddressing,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Chaining => Strategy::Chaining,
            StrategyArg::OpenAddressing => Strategy::OpenAddressing,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 's', long, value_enum, default_value_t = StrategyArg::OpenAddressing)]
    strategy: StrategyArg,

    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.9)]
    load_factor: f64,

    #[arg(short = 'n', long, default_value_t = 1000)]
    count: u64,

    /// Removes every other key after filling, to leave tombstones behind.
    #[arg(long)]
    remove_half: bool,

    #[arg(short = 'r', long, default_value_t = 100)]
    repetitions: usize,

    /// Prints every occupied bucket or slot.
    #[arg(long)]
    dump: bool,
}

fn main() {
    let args = Args::parse();
    let config = TableConfig::default()
        .with_initial_capacity(args.initial_capacity)
        .with_load_factor(args.load_factor);

    let mut table: AnyHashTable<u64, u64, DefaultHashBuilder> =
        match AnyHashTable::try_with_config(args.strategy.into(), config) {
            Ok(table) => table,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        };

    println!(
        "Filling {:?} table (initial capacity {}, threshold {}) with {} keys...",
        args.strategy, args.initial_capacity, args.load_factor, args.count
    );

    let mut last_capacity = table.capacity();
    for key in 0..args.count {
        table.insert(key, key * key);
        if table.capacity() != last_capacity {
            println!(
                "  grew {} -> {} at {} entries",
                last_capacity,
                table.capacity(),
                table.len()
            );
            last_capacity = table.capacity();
        }
    }

    if args.remove_half {
        let removed = (0..args.count)
            .step_by(2)
            .filter(|key| table.remove(key))
            .count();
        println!("Removed {removed} keys");
    }

    println!("Entries: {}", table.len());
    println!("Capacity: {}", table.capacity());
    println!("Load factor: {:.2}%", table.load_factor() * 100.0);
    if let AnyHashTable::OpenAddressing(inner) = &table {
        println!("Tombstones: {}", inner.tombstones());
    }

    let keys: Vec<u64> = (0..args.count).collect();
    let seconds = table.measure_find_time(&keys, args.repetitions);
    let lookups = keys.len() * args.repetitions;
    println!(
        "Find time for {} lookups x {} repetitions: {:.6}s ({:.1} ns/lookup)",
        keys.len(),
        args.repetitions,
        seconds,
        seconds * 1e9 / lookups.max(1) as f64
    );

    if args.dump {
        print!("{table}");
    }
}
