//! `gobin`: convert Go game records to binary move logs and inspect them.
//!
//! - `gobin convert a.sgf b.sgf --out-dir logs` writes `logs/a.sgfbin`, ..
//! - `gobin dump a.sgfbin` prints a log back as SGF
//! - `gobin extract a.sgfbin --ply 30` shows the position and feature planes
//!   before ply 30

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use gobin::features;
use gobin::{BOARD_SIZE, Error, Goban, PASS, PLANE_COUNT, Record, Stone, Turn, codec};

const EXTENSION: &str = "sgfbin";

/// Plane groups as printed by `extract`: name, first plane, plane count.
const PLANE_GROUPS: &[(&str, usize, usize)] = &[
    ("own", features::OWN, 1),
    ("opponent", features::OPPONENT, 1),
    ("empty", features::EMPTY, 1),
    ("ones", features::ONES, 1),
    ("turns since", features::TURNS_SINCE, 8),
    ("own liberties", features::OWN_LIBERTIES, 8),
    ("opponent liberties", features::OPPONENT_LIBERTIES, 8),
    ("capture size", features::CAPTURE_SIZE, 8),
    ("self-atari size", features::SELF_ATARI_SIZE, 8),
    ("legal", features::LEGAL, 1),
    ("zeros", features::ZEROS, 1),
    ("black to move", features::BLACK_TO_MOVE, 1),
    ("ladder", features::LADDER_CAPTURE, 2),
];

/// Binary move logs for Go game records
#[derive(Parser)]
#[command(name = "gobin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert SGF records into binary move logs
    Convert {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for the written logs; next to each input by default
        #[arg(long, env = "GOBIN_OUT_DIR")]
        out_dir: Option<PathBuf>,
        /// Skip records flagged as unclean or that do not replay legally
        #[arg(long)]
        strict: bool,
    },
    /// Print a binary move log as SGF
    Dump { input: PathBuf },
    /// Replay a log and summarize the feature planes before a ply
    Extract {
        input: PathBuf,
        #[arg(long)]
        ply: usize,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gobin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Convert {
            inputs,
            out_dir,
            strict,
        } => run_convert(&inputs, out_dir.as_deref(), strict),
        Commands::Dump { input } => run_dump(&input).map(|()| ExitCode::SUCCESS),
        Commands::Extract { input, ply, json } => {
            run_extract(&input, ply, json).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let path = input.with_extension(EXTENSION);
    match out_dir {
        Some(dir) => dir.join(path.file_name().unwrap_or_default()),
        None => path,
    }
}

/// Convert one record, returning the written path and its ply count.
fn convert_one(input: &Path, out_dir: Option<&Path>, strict: bool) -> Result<(PathBuf, usize)> {
    let raw = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let text = String::from_utf8_lossy(&raw);
    let record = Record::parse(&text).with_context(|| format!("parsing {}", input.display()))?;

    let plies = codec::plies(&record.turns);
    if strict {
        if !record.meta.is_clean() {
            bail!("{} is flagged as unclean", input.display());
        }
        features::replay(&record.turns, plies)
            .with_context(|| format!("replaying {}", input.display()))?;
    }

    let bytes = codec::encode(&record.turns)
        .with_context(|| format!("encoding {}", input.display()))?;
    let out = output_path(input, out_dir);
    fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
    Ok((out, plies))
}

fn run_convert(inputs: &[PathBuf], out_dir: Option<&Path>, strict: bool) -> Result<ExitCode> {
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut converted = 0;
    let mut failed = 0;
    for input in inputs {
        match convert_one(input, out_dir, strict) {
            Ok((out, plies)) => {
                debug!(input = %input.display(), output = %out.display(), plies, "converted");
                converted += 1;
            }
            Err(e) => {
                warn!(input = %input.display(), "{e:#}");
                failed += 1;
            }
        }
    }

    info!(converted, failed, "conversion finished");
    Ok(if converted == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn read_log(input: &Path) -> Result<Vec<u8>> {
    fs::read(input).with_context(|| format!("reading {}", input.display()))
}

fn run_dump(input: &Path) -> Result<()> {
    let turns = codec::decode(&read_log(input)?)
        .with_context(|| format!("decoding {}", input.display()))?;
    print!("{}", codec::to_sgf(&turns));
    Ok(())
}

#[derive(Serialize)]
struct Summary {
    plies: usize,
    ply: usize,
    to_move: Stone,
    label: usize,
    next: Turn,
    populations: Vec<usize>,
}

/// Board coordinate as shown in the board dump, e.g. `D16`.
fn coord(label: usize) -> String {
    if label == PASS {
        return "pass".to_string();
    }
    const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRST";
    let (x, y) = (label % BOARD_SIZE, label / BOARD_SIZE);
    format!("{}{}", COLUMNS[x] as char, BOARD_SIZE - y)
}

/// Replay `turns` up to `ply` and summarize the planes seen before it.
fn inspect(turns: &[Turn], ply: usize) -> Result<(Goban, Summary)> {
    let plies = codec::plies(turns);
    let Some(next) = turns.iter().filter(|t| t.is_ply()).nth(ply).copied() else {
        return Err(Error::OutOfRange { ply, plies }.into());
    };
    let goban = features::replay(turns, ply)?;
    let planes = features::planes(&goban, next.stone);
    let summary = Summary {
        plies,
        ply,
        to_move: next.stone,
        label: features::label_of(&next),
        next,
        populations: (0..PLANE_COUNT).map(|k| planes.count(k)).collect(),
    };
    Ok((goban, summary))
}

fn run_extract(input: &Path, ply: usize, json: bool) -> Result<()> {
    let turns = codec::decode(&read_log(input)?)
        .with_context(|| format!("decoding {}", input.display()))?;
    let (goban, summary) = inspect(&turns, ply)
        .with_context(|| format!("extracting ply {ply} of {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{goban}");
    println!(
        "ply {ply}/{}: {} to move, label {} ({})",
        summary.plies,
        summary.to_move,
        summary.label,
        coord(summary.label)
    );
    for &(name, first, len) in PLANE_GROUPS {
        let counts = &summary.populations[first..first + len];
        let counts: Vec<String> = counts.iter().map(usize::to_string).collect();
        println!("{name:>20} [{first:>2}]: {}", counts.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_arguments() {
        let cli = Cli::try_parse_from(["gobin", "convert", "a.sgf", "b.sgf", "--strict"]).unwrap();
        match cli.command {
            Commands::Convert { inputs, strict, .. } => {
                assert_eq!(inputs.len(), 2);
                assert!(strict);
            }
            _ => panic!("expected convert"),
        }
        assert!(Cli::try_parse_from(["gobin", "convert"]).is_err());
    }

    #[test]
    fn rejects_negative_ply() {
        assert!(Cli::try_parse_from(["gobin", "extract", "a.sgfbin", "--ply", "-1"]).is_err());
    }

    #[test]
    fn output_paths() {
        assert_eq!(
            output_path(Path::new("games/a.sgf"), None),
            PathBuf::from("games/a.sgfbin")
        );
        assert_eq!(
            output_path(Path::new("games/a.sgf"), Some(Path::new("out"))),
            PathBuf::from("out/a.sgfbin")
        );
    }

    #[test]
    fn coordinates() {
        assert_eq!(coord(0), "A19");
        assert_eq!(coord(3 * 19 + 15), "Q16");
        assert_eq!(coord(PASS), "pass");
    }

    #[test]
    fn plane_groups_cover_every_plane() {
        let total: usize = PLANE_GROUPS.iter().map(|&(_, _, len)| len).sum();
        assert_eq!(total, PLANE_COUNT);
        for pair in PLANE_GROUPS.windows(2) {
            assert_eq!(pair[0].1 + pair[0].2, pair[1].1);
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gobin-cli-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn converts_and_skips_unclean_records() {
        let dir = scratch_dir("unclean");
        let clean = dir.join("clean.sgf");
        let resigned = dir.join("resigned.sgf");
        fs::write(&clean, "(;GM[1]SZ[19];B[dd];W[pp];B[])").unwrap();
        fs::write(&resigned, "(;GM[1]SZ[19]RE[W+R];B[dd])").unwrap();

        let (out, plies) = convert_one(&clean, None, true).unwrap();
        assert_eq!(plies, 3);
        assert_eq!(fs::read(&out).unwrap().len(), 6);
        assert!(convert_one(&resigned, None, true).is_err());
        assert!(convert_one(&resigned, None, false).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn strict_conversion_replays_the_game() {
        let dir = scratch_dir("replay");
        let illegal = dir.join("illegal.sgf");
        fs::write(&illegal, "(;GM[1]SZ[19];B[dd];W[dd])").unwrap();

        let err = convert_one(&illegal, None, true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::CorruptLog(_))
        ));
        assert!(!dir.join("illegal.sgfbin").exists());
        assert!(convert_one(&illegal, None, false).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn exit_code_reflects_any_success() {
        let dir = scratch_dir("exit");
        let out = dir.join("out");
        let good = dir.join("good.sgf");
        let bad = dir.join("bad.sgf");
        let missing = dir.join("missing.sgf");
        fs::write(&good, "(;GM[1]SZ[19];B[dd];W[pp])").unwrap();
        fs::write(&bad, "(;GM[1]SZ[13];B[dd])").unwrap();

        let mixed = [bad.clone(), good, missing.clone()];
        assert_eq!(
            run_convert(&mixed, Some(&out), false).unwrap(),
            ExitCode::SUCCESS
        );
        assert!(out.join("good.sgfbin").exists());
        assert!(!out.join("bad.sgfbin").exists());

        assert_eq!(
            run_convert(&[bad, missing], Some(&out), false).unwrap(),
            ExitCode::FAILURE
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn inspect_matches_extraction() {
        let bytes = codec::encode_record("(;GM[1]SZ[19];B[pd];W[dp];B[];W[dd])").unwrap();
        let turns = codec::decode(&bytes).unwrap();
        for ply in 0..4 {
            let (goban, summary) = inspect(&turns, ply).unwrap();
            let sample = features::extract(&bytes, ply).unwrap();
            assert_eq!(summary.label, sample.label);
            assert_eq!(summary.to_move, sample.to_move);
            assert_eq!(summary.populations[features::OWN], sample.planes.count(features::OWN));
            assert_eq!(summary.populations[features::LEGAL], sample.planes.count(features::LEGAL));
            assert_eq!(goban.ply(), ply);
        }
        assert!(inspect(&turns, 4).is_err());
    }
}
