//! Build automation tasks for the sqldao workspace.
//!
//! Run with `cargo xtask <command>`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Fuzz targets defined in `fuzz/Cargo.toml`.
const FUZZ_TARGETS: &[&str] = &["strip_sql", "extract_parameters", "convert_value"];

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for sqldao")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all checks (format, lint, test)
    Ci,
    /// Run cargo fmt --check
    Fmt,
    /// Run clippy with all features
    Clippy,
    /// Run all tests
    Test,
    /// Generate documentation
    Doc,
    /// Run benchmarks
    Bench,
    /// Run a fuzz target (requires cargo-fuzz and a nightly toolchain)
    Fuzz {
        /// Target name, or `all` to run each target briefly
        target: String,
        /// Maximum run time in seconds
        #[arg(long, default_value_t = 60)]
        seconds: u64,
    },
    /// Clean build artifacts
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    let workspace_root = workspace_root()?;
    sh.change_dir(&workspace_root);

    match cli.command {
        Command::Ci => {
            println!("Running CI checks...");
            fmt(&sh)?;
            clippy(&sh)?;
            test(&sh)?;
            println!("All CI checks passed!");
        }
        Command::Fmt => fmt(&sh)?,
        Command::Clippy => clippy(&sh)?,
        Command::Test => test(&sh)?,
        Command::Doc => doc(&sh)?,
        Command::Bench => bench(&sh)?,
        Command::Fuzz { target, seconds } => fuzz(&sh, &target, seconds)?,
        Command::Clean => clean(&sh)?,
    }

    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    let output = std::process::Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("failed to run cargo locate-project")?;

    let path = String::from_utf8(output.stdout)
        .context("invalid UTF-8 in cargo output")?
        .trim()
        .to_string();

    Ok(PathBuf::from(path)
        .parent()
        .context("failed to get workspace root")?
        .to_path_buf())
}

fn fmt(sh: &Shell) -> Result<()> {
    println!("Checking formatting...");
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    println!("Formatting check passed.");
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    println!("Running clippy...");
    cmd!(
        sh,
        "cargo clippy --all-features --all-targets -- -D warnings"
    )
    .run()?;
    println!("Clippy check passed.");
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    println!("Running tests...");
    cmd!(sh, "cargo test --all-features").run()?;
    println!("Checking minimal feature set...");
    cmd!(sh, "cargo check -p dao-types --no-default-features").run()?;
    println!("All tests passed.");
    Ok(())
}

fn doc(sh: &Shell) -> Result<()> {
    println!("Generating documentation...");
    cmd!(sh, "cargo doc --all-features --no-deps").run()?;
    println!("Documentation generated.");
    Ok(())
}

fn bench(sh: &Shell) -> Result<()> {
    println!("Running benchmarks...");
    cmd!(sh, "cargo bench -p dao-sql").run()?;
    Ok(())
}

fn fuzz(sh: &Shell, target: &str, seconds: u64) -> Result<()> {
    let targets: Vec<&str> = if target == "all" {
        FUZZ_TARGETS.to_vec()
    } else if FUZZ_TARGETS.contains(&target) {
        vec![target]
    } else {
        bail!(
            "unknown fuzz target '{target}', expected one of: {}",
            FUZZ_TARGETS.join(", ")
        );
    };

    let max_time = format!("-max_total_time={seconds}");
    let _dir = sh.push_dir("fuzz");
    for target in targets {
        println!("Fuzzing {target} for {seconds}s...");
        cmd!(sh, "cargo +nightly fuzz run {target} -- {max_time}").run()?;
    }
    println!("Fuzzing finished.");
    Ok(())
}

fn clean(sh: &Shell) -> Result<()> {
    println!("Cleaning build artifacts...");
    cmd!(sh, "cargo clean").run()?;
    println!("Clean complete.");
    Ok(())
}
