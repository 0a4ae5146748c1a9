use std::fs::File;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use stevedore::cli::{BenchArgs, CliArgs, Command, CommonArgs, SolverArgs};
use stevedore::output::{write_json, write_text, PackReport};
use stevedore::packer::{BinSelection, CostPacker};
use stevedore::problem::{load_problem, Problem};

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let solver = match &cli.command {
        Command::Text(args) | Command::Json(args) => &args.solver,
        Command::Bench(args) => &args.solver,
    };

    env_logger::Builder::new()
        .filter_level(if solver.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("stevedore v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Text(args) => solve(args, OutputFormat::Text),
        Command::Json(args) => solve(args, OutputFormat::Json),
        Command::Bench(args) => bench(args),
    }
}

enum OutputFormat {
    Text,
    Json,
}

fn build_packer(solver: &SolverArgs, problem: &Problem) -> Result<CostPacker> {
    let selection = BinSelection::from_str(&solver.bin_algo)?;

    let mut packer = CostPacker::new()
        .pack_algo(solver.pack_algo)
        .sort_algo(solver.sort_algo)
        .rotation(!solver.no_rotation)
        .bin_algo(selection);

    for item in &problem.items {
        packer.add_item(item.width, item.height, Some(item.rid))?;
    }
    for bin in &problem.bins {
        packer.add_bin(bin.width, bin.height, bin.cost, 1, Some(bin.bid))?;
    }

    Ok(packer)
}

fn solve(args: &CommonArgs, format: OutputFormat) -> Result<()> {
    let problem = load_problem(&args.input)?;
    info!(
        "{}: {} items, {} bin types",
        args.input.display(),
        problem.items.len(),
        problem.bins.len()
    );

    let mut packer = build_packer(&args.solver, &problem)?;

    let start = Instant::now();
    packer.pack();
    let elapsed = start.elapsed();

    let report = PackReport::from_packer(&packer);

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_report(&format, file, &report)?;
            info!("wrote {}", path.display());
        }
        None => write_report(&format, io::stdout().lock(), &report)?,
    }

    info!(
        "total cost {} across {} bins in {:.4}s",
        report.total_cost,
        report.bins.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

fn bench(args: &BenchArgs) -> Result<()> {
    for input in &args.inputs {
        let problem = load_problem(input)?;
        let mut packer = build_packer(&args.solver, &problem)?;

        let start = Instant::now();
        packer.pack();
        let elapsed = start.elapsed();

        info!(
            "{}: total cost = {}, elapsed = {:.4}s",
            input.display(),
            packer.total_cost(),
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn write_report<W: Write>(format: &OutputFormat, out: W, report: &PackReport) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report),
        OutputFormat::Json => write_json(out, report),
    }
}
