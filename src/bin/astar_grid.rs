//! Headless harness: reads a text grid, runs the search and prints the outcome.
//!
//! Usage:
//!   astar-grid maze.txt
//!   astar-grid --heuristic euclidean --frames out/ < maze.txt
//!
//! Exit codes: 0 path found, 1 no path, 2 aborted, 3 invalid input.
use anyhow::{Context, Result};
use astar_visualizer::{
    run_search, FrameBuffer, Grid, HeuristicKind, SearchOutcome, VisualizerConfig,
};
use clap::Parser;
use log::info;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Runs an A* search on a text grid ('.' empty, '#' barrier, 'S' start, 'E' end)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid file, read from stdin when omitted or "-"
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Heuristic, overrides the configuration file
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicKind>,

    /// Cell side in pixels for rendered frames
    #[arg(long)]
    cell_size: Option<u32>,

    /// Abort the search after this many redraw steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Directory to write one PPM frame per step into
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Only print the outcome line, not the final grid
    #[arg(short, long)]
    quiet: bool,
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("could not read grid from {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("could not read grid from stdin")?;
            Ok(text)
        }
    }
}

fn write_frame(frame: &FrameBuffer, dir: &Path, index: usize) -> io::Result<()> {
    let file = File::create(dir.join(format!("frame_{index:05}.ppm")))?;
    frame.write_ppm(BufWriter::new(file))
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => VisualizerConfig::load(path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
        None => VisualizerConfig::default(),
    };
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic;
    }
    let text = read_input(args.input.as_ref())?;
    let mut grid = Grid::parse_with_cell_size(&text, args.cell_size.unwrap_or(config.cell_size()))?;
    let (start, end) = grid.endpoints()?;
    grid.recompute_all_neighbours();
    grid.update();
    info!(
        "{}x{} grid, goal reachable: {}",
        grid.rows(),
        grid.rows(),
        grid.reachable(start, end)
    );

    let mut frames = match &args.frames {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("could not create frame directory {}", dir.display()))?;
            Some((dir.as_path(), FrameBuffer::new(grid.width(), grid.width())))
        }
        None => None,
    };
    let mut steps = 0;
    let mut frame_error = None;
    let run = run_search(&mut grid, start, end, config.heuristic, |grid| {
        if let Some((dir, frame)) = frames.as_mut() {
            grid.draw(frame, &config.palette);
            if let Err(err) = write_frame(frame, *dir, steps) {
                frame_error = Some(err);
                return ControlFlow::Break(());
            }
        }
        steps += 1;
        match args.max_steps {
            Some(max) if steps >= max => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    })?;
    if let Some(err) = frame_error {
        return Err(err).context("could not write frame");
    }
    if let Some((dir, frame)) = frames.as_mut() {
        grid.draw(frame, &config.palette);
        write_frame(frame, *dir, steps).context("could not write frame")?;
    }

    let code = match &run.outcome {
        SearchOutcome::Success(path) => {
            println!("outcome: success");
            println!("path length: {}", path.len());
            ExitCode::SUCCESS
        }
        SearchOutcome::NoPath => {
            println!("outcome: no path");
            ExitCode::from(1)
        }
        SearchOutcome::Aborted => {
            println!("outcome: aborted");
            ExitCode::from(2)
        }
    };
    println!("expanded: {}", run.expansions);
    if !args.quiet {
        print!("{}", grid);
    }
    Ok(code)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(3)
        }
    }
}
