use std::process::ExitCode;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = dcm_organize::cli::parse();
    app::run(args)
}
