use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geodetic_sql::dataset::{kkj_etrs, n60_n2000};
use geodetic_sql::{
    Direction, FileSink, HeightDataset, HeightSources, HttpFetcher, KkjEtrsNetwork, KkjEtrsSources,
    Point,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Output {
    /// Directory the migration files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the KKJ / ETRS-TM35FIN network migrations
    KkjEtrs(Output),

    /// Write the N60 / N2000 height network migrations
    #[command(name = "n60-n2000")]
    N60N2000(Output),

    /// Write both sets of migrations
    All(Output),

    /// Transform a point from KKJ to ETRS-TM35FIN (--reverse for the other way)
    Transform {
        /// Easting
        #[arg(long)]
        x: f64,

        /// Northing
        #[arg(long)]
        y: f64,

        /// Transform from ETRS-TM35FIN to KKJ
        #[arg(long)]
        reverse: bool,
    },

    /// Convert an N60 height to N2000
    Height {
        /// ETRS-TM35FIN easting
        #[arg(long)]
        x: f64,

        /// ETRS-TM35FIN northing
        #[arg(long)]
        y: f64,

        /// N60 height
        #[arg(long)]
        n60: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let start_time = std::time::Instant::now();

    let fetcher = HttpFetcher::new();

    match args.command {
        Command::KkjEtrs(out) => {
            let mut sink = output_sink(&out.output)?;
            kkj_etrs::run(&fetcher, &mut sink, &KkjEtrsSources::default())
                .context("KKJ/ETRS conversion failed")?;
        }
        Command::N60N2000(out) => {
            let mut sink = output_sink(&out.output)?;
            n60_n2000::run(&fetcher, &mut sink, &HeightSources::default())
                .context("N60/N2000 conversion failed")?;
        }
        Command::All(out) => {
            let mut sink = output_sink(&out.output)?;
            kkj_etrs::run(&fetcher, &mut sink, &KkjEtrsSources::default())
                .context("KKJ/ETRS conversion failed")?;
            n60_n2000::run(&fetcher, &mut sink, &HeightSources::default())
                .context("N60/N2000 conversion failed")?;
        }
        Command::Transform { x, y, reverse } => {
            let direction = if reverse {
                Direction::Tm35FinToKkj
            } else {
                Direction::KkjToTm35Fin
            };
            let network = KkjEtrsNetwork::load(&fetcher, &KkjEtrsSources::default())?
                .affine_network(direction)?;
            let p = network.transform(Point::new(x, y))?;
            println!("{} {}", p.e, p.n);
        }
        Command::Height { x, y, n60 } => {
            let network =
                HeightDataset::load(&fetcher, &HeightSources::default())?.height_network()?;
            let n2000 = network.to_n2000(Point::new(x, y), n60)?;
            println!("{}", n2000);
        }
    }

    let elapsed = start_time.elapsed();
    info!("Total processing time: {:?}", elapsed);

    Ok(())
}

fn output_sink(dir: &Path) -> Result<FileSink> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    Ok(FileSink::new(dir))
}
