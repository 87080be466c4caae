#![deny(warnings)]

//! Headless CLI: build a turn's world from a source dump, or relink a saved
//! snapshot, and write the normalized snapshot back out.

use anyhow::{anyhow, bail, Context, Result};
use ec_core::BuildConfig;
use ec_world::{build_world, flatten, link, repair, World};
use persistence::{read_snapshot_file, read_source_dump, write_snapshot_file, SnapshotFile};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  ec-cli extract --source <dump.json> --config <build.yaml> --out <snapshot.json>
  ec-cli relink --snapshot <in.json> --out <out.json> [--repair]
  ec-cli --version";

#[derive(Debug, PartialEq)]
enum Command {
    Extract {
        source: PathBuf,
        config: PathBuf,
        out: PathBuf,
    },
    Relink {
        snapshot: PathBuf,
        out: PathBuf,
        repair: bool,
    },
    Version,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut it = args.into_iter();
    let cmd = it.next().ok_or_else(|| anyhow!("missing command\n{USAGE}"))?;
    let mut source = None;
    let mut config = None;
    let mut snapshot = None;
    let mut out = None;
    let mut repair = false;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--source" => source = it.next().map(PathBuf::from),
            "--config" => config = it.next().map(PathBuf::from),
            "--snapshot" => snapshot = it.next().map(PathBuf::from),
            "--out" => out = it.next().map(PathBuf::from),
            "--repair" => repair = true,
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }
    let need = |value: Option<PathBuf>, flag: &str| {
        value.ok_or_else(|| anyhow!("{cmd} needs {flag}\n{USAGE}"))
    };
    match cmd.as_str() {
        "--version" | "version" => Ok(Command::Version),
        "extract" => Ok(Command::Extract {
            source: need(source, "--source")?,
            config: need(config, "--config")?,
            out: need(out, "--out")?,
        }),
        "relink" => Ok(Command::Relink {
            snapshot: need(snapshot, "--snapshot")?,
            out: need(out, "--out")?,
            repair,
        }),
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn report(world: &World) {
    let s = world.summary();
    println!(
        concat!(
            "World OK | game: {} | turn: {} | systems: {} | planets: {} ",
            "| colonies: {} | ships: {} | players: {}"
        ),
        world.game(),
        world.turn(),
        s.systems,
        s.planets,
        s.colonies,
        s.ships,
        s.players
    );
}

fn extract(source: PathBuf, config: PathBuf, out: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&config)
        .with_context(|| format!("reading {}", config.display()))?;
    let cfg: BuildConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing {}", config.display()))?;
    let dump = read_source_dump(&source)?;
    info!(game = %cfg.game, turn = %cfg.turn, repair = cfg.repair, "building world");

    let build = build_world(&dump.source, &cfg)?;
    for e in &build.extract.excluded {
        warn!(cors = %e.cors, kind = ?e.kind, missing = e.missing, "excluded from snapshot");
    }
    report(&build.world);

    let file = SnapshotFile::new(flatten(&build.world)).with_marker(dump.marker(cfg.turn));
    write_snapshot_file(&out, &file)?;
    Ok(())
}

fn relink(snapshot: PathBuf, out: PathBuf, run_repair: bool) -> Result<()> {
    let input = read_snapshot_file(&snapshot)?;
    let marker = input.turn.clone();
    let mut snap = input.into_snapshot();
    if run_repair {
        let (repaired, changes) = repair(snap);
        info!(defaults = !changes.is_empty(), "repair pass applied");
        snap = repaired;
    }
    let world = link(&snap)?;
    report(&world);

    let file = SnapshotFile::new(flatten(&world)).with_marker(marker);
    write_snapshot_file(&out, &file)?;
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match parse_args(std::env::args().skip(1))? {
        Command::Version => {
            println!(
                "ec-cli {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_SHA"),
                env!("BUILD_DATE")
            );
            Ok(())
        }
        Command::Extract {
            source,
            config,
            out,
        } => extract(source, config, out),
        Command::Relink {
            snapshot,
            out,
            repair,
        } => relink(snapshot, out, repair),
    }
}
