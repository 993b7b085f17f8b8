use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollstage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a page document.
    Validate(ValidateArgs),
    /// Evaluate a page at fixed scroll positions and print the frames as JSON.
    Sample(SampleArgs),
    /// Mount a page on a simulated host, scroll once and step animation frames.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll offset to sample (repeatable). Overrides `--steps`.
    #[arg(long = "at")]
    at: Vec<f64>,

    /// Number of even steps from the top of the page to its last scroll offset.
    #[arg(long, default_value_t = 20)]
    steps: usize,

    /// Evaluate positions in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Print only the summary statistics.
    #[arg(long)]
    stats_only: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll offset to jump to after mounting.
    #[arg(long)]
    scroll_to: f64,

    /// Animation frames to step.
    #[arg(long, default_value_t = 60)]
    frames: usize,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

#[derive(serde::Serialize)]
struct SimulatedFrame {
    frame: usize,
    clock_secs: f64,
    settled: bool,
    progress: Vec<(String, f64)>,
}

#[derive(serde::Serialize)]
struct SimulationReport {
    frames: Vec<SimulatedFrame>,
    last: scrollstage::PageFrame,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_page(path: &Path) -> anyhow::Result<scrollstage::Page> {
    scrollstage::Page::from_path(path).with_context(|| format!("load page '{}'", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output JSON")?;
    println!("{s}");
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let page = read_page(&args.in_path)?;
    let vp = page.viewport;
    println!(
        "ok: {} sections, document height {}px, max scroll {}px",
        page.sections.len(),
        page.document_height(vp),
        page.max_scroll(vp)
    );
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let page = read_page(&args.in_path)?;
    let positions = if args.at.is_empty() {
        scrollstage::even_positions(&page, args.steps)
    } else {
        args.at
    };
    let threading = scrollstage::SampleThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let report = scrollstage::sample_frames(&page, &positions, &threading)
        .context("sample page frames")?;
    if args.stats_only {
        print_json(&report.stats)
    } else {
        print_json(&report)
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.dt.is_finite() && args.dt > 0.0) {
        anyhow::bail!("--dt must be a positive number of seconds");
    }
    let page = read_page(&args.in_path)?;
    let ids: Vec<String> = page.sections.iter().map(|s| s.id.clone()).collect();
    let host = scrollstage::ScrollHost::new(page.viewport);
    let session = scrollstage::StageSession::mount(&host, page).context("mount page")?;

    host.scroll_to(args.scroll_to);
    let mut frames = Vec::with_capacity(args.frames);
    for frame in 0..args.frames {
        host.advance_frame(args.dt);
        let progress = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Ok((id.clone(), session.progress(i)?.get())))
            .collect::<scrollstage::StageResult<Vec<_>>>()?;
        frames.push(SimulatedFrame {
            frame,
            clock_secs: host.clock_secs(),
            settled: session.is_settled(),
            progress,
        });
    }

    let last = session.frame().context("evaluate final frame")?;
    session.unmount();
    tracing::debug!(
        listeners = host.listener_count(),
        pending = host.pending_frames(),
        "session unmounted"
    );
    print_json(&SimulationReport { frames, last })
}
