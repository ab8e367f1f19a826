use std::process::ExitCode;

fn main() -> ExitCode {
    match log_filter::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
