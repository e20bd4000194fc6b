use anyhow::Result;

fn main() -> Result<()> {
    let succeeded = procrun::cli::run_writer()?;
    std::process::exit(if succeeded { 0 } else { 1 });
}
