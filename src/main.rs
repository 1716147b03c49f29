use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use repair_dispatch::config::{DemoConfig, DispatchConfig, EmptyPoolPolicy, WorkerSpec};
use repair_dispatch::report::{render_records_table, render_summary, RunReport, RunSummary};
use repair_dispatch::scheduler::{demo_jobs, CompletionRecord, Dispatcher, Job};
use repair_dispatch::shutdown::install_shutdown_handler;
use repair_dispatch::worker::Worker;

#[derive(Parser, Debug)]
#[command(name = "repair-dispatch")]
#[command(version)]
#[command(about = "Dispatch a queue of repair jobs across a pool of technicians")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the queue to completion and print every completion record
    Run(RunArgs),

    /// Print the synthesized job queue without running it
    Queue(QueueArgs),
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct QueueArgs {
    /// Number of jobs to synthesize
    #[arg(long, default_value = "10")]
    jobs: usize,

    /// Seed for random categories (omit for a different queue each time)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Worker in name:seconds form. Repeat for more workers.
    /// Defaults to Dalton:15 and Wapol:25.
    #[arg(long = "worker", short = 'w')]
    workers: Vec<WorkerSpec>,

    /// Run with no workers at all (jobs are abandoned)
    #[arg(long, conflicts_with = "workers")]
    no_workers: bool,

    /// Service center name
    #[arg(long, default_value = "First Service Center")]
    name: String,

    /// Service center location
    #[arg(long, default_value = "Long Ring Long Land Street")]
    location: String,

    /// Re-check interval while every worker is busy
    #[arg(long, default_value = "100")]
    poll_interval_ms: u64,

    /// Fail instead of completing when there are no workers
    #[arg(long)]
    reject_empty_pool: bool,

    #[command(flatten)]
    queue: QueueArgs,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct QueueItem<'a> {
    subject: &'a str,
    category: String,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    report: &'a RunReport,
    records: &'a [CompletionRecord],
    summary: &'a RunSummary,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn build_jobs(count: usize, seed: Option<u64>) -> Vec<Job> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    demo_jobs(count, &mut rng)
}

fn print_queue(jobs: &[Job], output: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Json => {
            let items: Vec<QueueItem> = jobs
                .iter()
                .map(|j| QueueItem {
                    subject: j.subject(),
                    category: j.category().to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Table => {
            println!("{:<20} {:<10}", "SUBJECT", "CATEGORY");
            for job in jobs {
                println!("{:<20} {:<10}", job.subject(), job.category());
            }
        }
    }
    Ok(())
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn handle_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let demo = DemoConfig {
        workers: if args.no_workers {
            Vec::new()
        } else if args.workers.is_empty() {
            DemoConfig::default().workers
        } else {
            args.workers
        },
        job_count: args.queue.jobs,
        seed: args.queue.seed,
    };

    let workers = demo
        .workers
        .iter()
        .map(|spec| Worker::from_secs(spec.name.clone(), spec.average_secs))
        .collect::<Result<Vec<_>, _>>()?;
    let worker_names: Vec<String> = workers.iter().map(|w| w.name().to_string()).collect();
    let jobs = build_jobs(demo.job_count, demo.seed);

    let policy = if args.reject_empty_pool {
        EmptyPoolPolicy::Reject
    } else {
        EmptyPoolPolicy::Drop
    };
    let config = DispatchConfig::default()
        .with_poll_interval_ms(args.poll_interval_ms)
        .with_empty_pool_policy(policy);

    if matches!(args.queue.output, OutputFormat::Table) {
        print_queue(&jobs, &args.queue.output)?;
        println!();
    }

    let dispatcher = Dispatcher::new(args.name, args.location, workers, jobs)
        .with_config(config)
        .with_cancellation(install_shutdown_handler());

    let report = dispatcher.run().await?;
    let records = dispatcher.repair_records();
    let summary =
        RunSummary::from_records(&records).with_workers(worker_names.iter().map(String::as_str));

    match args.queue.output {
        OutputFormat::Json => {
            let output = RunOutput {
                report: &report,
                records: &records,
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!(
                "{} finished in {:.1}s: {} completed, {} abandoned{}",
                report.dispatcher,
                report.elapsed_secs(),
                report.completed,
                report.abandoned,
                if report.cancelled { " (cancelled)" } else { "" }
            );
            println!();
            print!("{}", render_records_table(&records));
            println!();
            print!("{}", render_summary(&summary));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Commands::Run(run_args) => handle_run(run_args).await,
        Commands::Queue(queue_args) => {
            let jobs = build_jobs(queue_args.jobs, queue_args.seed);
            print_queue(&jobs, &queue_args.output)
        }
    }
}
