mod logging;
mod output;
mod runner;
mod script;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use output::{OutputWriter, RunOutput};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// memfs - An in-memory file system with name and largest-file indices
#[derive(Parser)]
#[command(name = "memfs")]
#[command(about = "In-memory hierarchical file system simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log filter, e.g. "debug" or "memfs_core=trace" (defaults to MEMFS_LOG env var or "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in demonstration session
    Demo,

    /// Run a session script (one command per line)
    Run {
        /// Script path (reads stdin if omitted)
        script: Option<PathBuf>,

        /// Stop at the first failing command and exit non-zero
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    if let Err(err) = logging::init_logging(cli.log_level.as_deref()) {
        output.write_error(&err, 2);
        return ExitCode::from(2);
    }

    let result = match cli.command {
        Commands::Demo => cmd_run(&output, script::DEMO_SCRIPT, false),
        Commands::Run { script, strict } => {
            read_script(script).and_then(|source| cmd_run(&output, &source, strict))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.write_error(&err, 1);
            ExitCode::from(1)
        }
    }
}

fn read_script(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read script: {}", path.display())),
        None => {
            if atty::is(atty::Stream::Stdin) {
                bail!("No script given and stdin is a terminal (pass a path or pipe a script)");
            }
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn cmd_run(output: &OutputWriter, source: &str, strict: bool) -> Result<()> {
    let json = output.is_json();
    let run = runner::run_script(source, strict, |step| {
        if json {
            return;
        }
        match &step.result {
            Some(result) => print!("{}", result.to_text()),
            None => output.write_step_error(step),
        }
    });

    let failed = run.failed();
    let stopped = strict && failed > 0;
    let data = RunOutput {
        success: !stopped,
        result_code: if stopped { 1 } else { 0 },
        failed,
        stats: run.fs.stats(),
        steps: run.steps,
    };

    // Text mode already streamed each step
    output.write(&data, || {
        format!(
            "\n{} commands, {} failed ({} directories, {} files, {} bytes)\n",
            data.steps.len(),
            data.failed,
            data.stats.directories,
            data.stats.files,
            data.stats.total_bytes
        )
    })?;

    if stopped {
        bail!("Script stopped after a failing command");
    }
    Ok(())
}
