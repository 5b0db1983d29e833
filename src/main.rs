use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use epidemic_regimes::{
    io::{
        DEFAULT_FEATURE, EpidemicColumn, FeatureTable, calendar_gaps, fill_daily_gaps,
        read_feature_table, write_bounds_table, write_epidemic_table, write_prior_table,
    },
    optimization::loglik_optimizer::LineSearcher,
    priors::{PriorMode, PriorOptions, StationaryPrior, rolling_priors},
    regime::core::FitOptions,
    rolling::{RollingOptions, epidemic_probability_series},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "epidemic-regimes")]
#[command(version)]
#[command(about = "Rolling Markov-switching estimates of epidemic-regime probabilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the rolling switching model and write epidemic probabilities
    Fit(FitArgs),
    /// Compute rolling prior bounds, draws or summaries
    Priors(PriorArgs),
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with a `date` column and numeric feature columns
    csv: PathBuf,

    /// Feature columns to process
    #[arg(long, num_args = 1.., default_value = DEFAULT_FEATURE)]
    cols: Vec<String>,

    /// Reindex to a contiguous daily calendar and forward-fill gaps
    #[arg(long)]
    fill_gaps: bool,

    /// Rolling window length
    #[arg(long, default_value_t = 100)]
    window: usize,

    /// Window step
    #[arg(long, default_value_t = 1)]
    step: usize,

    /// Base random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output CSV path
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args)]
struct FitArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Random restarts per window
    #[arg(long = "n-init", default_value_t = 20)]
    n_init: usize,

    /// L-BFGS iteration cap per restart
    #[arg(long, default_value_t = 200)]
    max_iter: usize,

    /// EM iterations per restart
    #[arg(long, default_value_t = 100)]
    em_iter: usize,

    /// Standard deviation of the start-vector jitter
    #[arg(long, default_value_t = 0.1)]
    jitter: f64,

    /// Skip the L-BFGS polish after EM
    #[arg(long)]
    no_polish: bool,

    /// Line search for the polish (MoreThuente | HagerZhang)
    #[arg(long, default_value = "MoreThuente")]
    line_search: LineSearcher,

    /// Parallel workers
    #[arg(long = "n-jobs", default_value_t = 1)]
    n_jobs: usize,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

#[derive(Args)]
struct PriorArgs {
    #[command(flatten)]
    input: InputArgs,

    /// bounds | raw | summary
    #[arg(long, default_value = "bounds")]
    mode: PriorMode,

    /// Monte Carlo draws per window in summary mode
    #[arg(long, default_value_t = 10_000)]
    draws: usize,

    /// Stationary prior: fixed | dirichlet
    #[arg(long, default_value = "fixed")]
    stationary: StationaryPrior,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Fit(args) => run_fit(args),
        Commands::Priors(args) => run_priors(args),
    }
}

fn load_table(input: &InputArgs) -> Result<FeatureTable> {
    let table = read_feature_table(&input.csv, &input.cols)
        .with_context(|| format!("reading {}", input.csv.display()))?;
    info!(
        rows = table.len(),
        columns = input.cols.len(),
        path = %input.csv.display(),
        "loaded table"
    );

    if table.is_daily_contiguous() {
        return Ok(table);
    }
    if input.fill_gaps {
        let (filled, inserted) = fill_daily_gaps(&table);
        info!(inserted, "filled calendar gaps");
        return Ok(filled);
    }
    for (after, missing) in calendar_gaps(table.dates()) {
        warn!(%after, missing, "calendar gap; pass --fill-gaps to forward-fill");
    }
    Ok(table)
}

fn run_fit(args: FitArgs) -> Result<()> {
    let input = &args.input;
    let table = load_table(input)?;

    let mut fit = FitOptions::new(args.n_init, args.max_iter)?
        .with_em(args.em_iter, FitOptions::default().em_tol)?
        .with_jitter(args.jitter)?
        .with_polish(!args.no_polish);
    fit.mle_opts.line_searcher = args.line_search;
    let opts = RollingOptions::new(input.window, input.step, args.n_jobs)?
        .with_seed(input.seed)
        .with_fit(fit)
        .with_progress(args.progress);

    let mut columns = Vec::with_capacity(input.cols.len());
    for name in &input.cols {
        info!(column = %name, "fitting column");
        let series = table.series(name)?;
        let run = epidemic_probability_series(&series, &opts)
            .with_context(|| format!("rolling fit of column '{name}'"))?;
        info!(
            column = %name,
            covered = run.probabilities.covered(),
            failed = run.report.failed(),
            "column done"
        );
        columns.push(EpidemicColumn {
            name: name.clone(),
            levels: series.values().to_owned(),
            diff: run.diff.align_to_source(run.diff.values()),
            prob: run.probabilities.values,
        });
    }

    write_epidemic_table(&input.out, table.dates(), &columns)
        .with_context(|| format!("writing {}", input.out.display()))?;
    info!(path = %input.out.display(), "saved epidemic probabilities");
    Ok(())
}

fn run_priors(args: PriorArgs) -> Result<()> {
    let input = &args.input;
    let table = load_table(input)?;
    let opts = PriorOptions::new(input.window, input.step)?
        .with_mode(args.mode)
        .with_draws(args.draws)?
        .with_stationary(args.stationary)
        .with_seed(input.seed);

    if args.mode != PriorMode::Bounds && input.cols.len() != 1 {
        bail!("--mode {:?} takes exactly one column, got {}", args.mode, input.cols.len());
    }

    let mut tables = Vec::with_capacity(input.cols.len());
    let mut end_dates = Vec::new();
    for name in &input.cols {
        let diff = table.series(name)?.difference()?;
        let rows = rolling_priors(diff.values(), &opts)
            .with_context(|| format!("prior run on column '{name}'"))?;
        end_dates = diff.dates().to_vec();
        tables.push((name.clone(), rows));
    }

    let written = match (args.mode, tables.as_slice()) {
        (PriorMode::Bounds, many) if many.len() > 1 => {
            write_bounds_table(&input.out, &end_dates, many)
        }
        (mode, [(_, rows)]) => write_prior_table(&input.out, &end_dates, rows, mode),
        _ => bail!("no feature columns given"),
    };
    written.with_context(|| format!("writing {}", input.out.display()))?;
    info!(path = %input.out.display(), "saved prior table");
    Ok(())
}
