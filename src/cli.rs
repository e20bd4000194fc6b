use crate::config::loader::RunnerConfig;
use crate::config::types::ExecutionOutcome;
use crate::exec::executor::Runner;
use crate::utils::writer::try_write_text_with_progress;
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Runner configuration file (JSON); defaults to ./procrun.json when present
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command line through the configured shell
    System {
        /// Command line passed verbatim to `<shell> -c`
        command: String,
    },
    /// Launch a program by absolute path, without a shell
    Exec {
        /// Absolute program path followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Launch a program with its standard output written to a file
    ExecRedirect {
        /// File to create or truncate
        #[arg(long, short)]
        output: PathBuf,
        /// Absolute program path followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Contend for a shared mutex from several delayed threads
    Lock {
        /// Delay before each thread tries to lock
        #[arg(long, default_value_t = 0)]
        wait_to_obtain_ms: u64,
        /// How long each thread holds the lock
        #[arg(long, default_value_t = 0)]
        wait_to_release_ms: u64,
        /// Number of contending threads
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
}

/// Writer utility arguments
#[derive(Parser)]
#[command(name = "writer", about = "Write content to a file, creating parent directories")]
struct WriterCli {
    /// Target file path
    file_path: PathBuf,
    /// Content to write
    content: String,
}

fn load_config(path: Option<&PathBuf>) -> Result<RunnerConfig> {
    let config = match path {
        Some(path) => RunnerConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RunnerConfig::load_default()?,
    };
    Ok(config)
}

fn report(label: &str, outcome: &ExecutionOutcome) -> bool {
    eprintln!("{}: {}", label, outcome);
    outcome.is_success()
}

/// Entry point of the `procrun` binary. Returns whether the operation succeeded.
pub fn run() -> Result<bool> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = Runner::new(load_config(cli.config.as_ref())?);

    let succeeded = match cli.command {
        Commands::System { command } => {
            let outcome = ExecutionOutcome::from(runner.system(&command));
            report(&command, &outcome)
        }
        Commands::Exec { command } => {
            let outcome = ExecutionOutcome::from(runner.exec(command.as_slice()));
            report(&command[0], &outcome)
        }
        Commands::ExecRedirect { output, command } => {
            let outcome = ExecutionOutcome::from(runner.exec_redirect(&output, command.as_slice()));
            report(&command[0], &outcome)
        }
        Commands::Lock {
            wait_to_obtain_ms,
            wait_to_release_ms,
            threads,
        } => {
            let mutex = Arc::new(Mutex::new(()));
            let handles = (0..threads)
                .map(|_| {
                    crate::safety::scoped_lock::start_thread_obtaining_mutex(
                        Arc::clone(&mutex),
                        wait_to_obtain_ms,
                        wait_to_release_ms,
                    )
                })
                .collect::<crate::config::types::Result<Vec<_>>>()?;

            let mut all_ok = true;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        eprintln!("lock thread failed: {}", e);
                        all_ok = false;
                    }
                    Err(_) => {
                        eprintln!("lock thread panicked");
                        all_ok = false;
                    }
                }
            }
            eprintln!(
                "{} thread(s) completed: {}",
                threads,
                if all_ok { "success" } else { "failure" }
            );
            all_ok
        }
    };

    Ok(succeeded)
}

/// Entry point of the `writer` binary.
pub fn run_writer() -> Result<bool> {
    env_logger::init();

    let cli = match WriterCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            log::error!("Usage: writer <file_path> <content_to_write>");
            let _ = e.print();
            return Ok(false);
        }
    };

    let written = try_write_text_with_progress(&cli.file_path, &cli.content);
    Ok(report_write(
        &cli.file_path,
        &written,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    ))
}

/// Print the writer's result line: success on `out`, the failure on `err`.
fn report_write<O: Write, E: Write>(
    path: &Path,
    written: &crate::config::types::Result<()>,
    out: &mut O,
    err: &mut E,
) -> bool {
    match written {
        Ok(()) => {
            let _ = writeln!(out, "File written successfully: {}", path.display());
            true
        }
        Err(e) => {
            log::error!("{}", e);
            let _ = writeln!(err, "{}", e);
            false
        }
    }
}
