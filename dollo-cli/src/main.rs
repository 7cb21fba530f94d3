use clap::Parser;
use dollo::{
    engine::{Engine, Outcome},
    log::{info, LogLevel},
    matrix::Matrix,
    oracle::splr::SplrOracle,
};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
struct Args {
    /// Input matrix file (0 = absent, 1 = unresolved, 2 = present).
    input_file: std::path::PathBuf,

    /// Write the completed matrix to this file instead of stdout.
    #[clap(long, short = 'o')]
    output: Option<std::path::PathBuf>,

    /// Maximum number of times each character may be lost.
    #[clap(long = "max-losses", short = 'k', default_value_t = 1)]
    max_losses: u8,

    /// Number of solver threads (advisory).
    #[clap(long, short = 't', default_value_t = 1)]
    threads: u32,

    /// Make output more verbose (use multiple times for more verbose output).
    #[clap(long, short = 'v', parse(from_occurrences))]
    verbose: u8,

    /// Make output less verbose.
    #[clap(long, short = 'q', parse(from_occurrences), conflicts_with = "verbose")]
    quiet: u8,

    /// Include originating source locations in log messages.
    #[clap(long)]
    log_src: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let start = std::time::Instant::now();

    let matrix = Matrix::parse(std::fs::File::open(&args.input_file)?)?;

    let mut engine = Engine::new(&matrix, args.max_losses, SplrOracle::default());

    match (args.verbose, args.quiet) {
        (0, 0) => engine.ctx.logger.set_log_level(Some(LogLevel::Info)),
        (1, _) => engine.ctx.logger.set_log_level(Some(LogLevel::Verbose)),
        (2, _) => engine.ctx.logger.set_log_level(Some(LogLevel::Debug)),
        (_, 0) => engine.ctx.logger.set_log_level(Some(LogLevel::Trace)),
        _ => engine.ctx.logger.set_log_level(None),
    }

    engine.ctx.logger.log_source_locations(args.log_src);

    info!(engine.ctx, "Dollo matrix completion");
    info!(
        engine.ctx,
        taxa = matrix.taxa(),
        characters = matrix.characters(),
        unresolved = engine.var_count(),
        k = args.max_losses,
    );

    let outcome = engine.run(args.threads)?;

    let duration = start.elapsed();
    info!(
        engine.ctx,
        rounds = engine.ctx.stats.rounds,
        constraints = engine.ctx.stats.constraints,
        = duration,
    );

    match outcome {
        Outcome::Completed(solution) => {
            match &args.output {
                Some(path) => solution.write(std::fs::File::create(path)?)?,
                None => solution.write(std::io::stdout().lock())?,
            }
            Ok(())
        }
        Outcome::Infeasible => {
            eprintln!("no completion exists for k = {}", args.max_losses);
            std::process::exit(1);
        }
    }
}
