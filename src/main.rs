//! dupurge - duplicate file finder and purger
//!
//! Entry point for the dupurge CLI application.

use dupurge::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging::init_logging,
};

fn main() {
    let cli = Cli::parse_args();
    let json_errors = cli.json_errors;
    let verbose = cli.verbose;

    init_logging(cli.verbose, cli.quiet);

    match dupurge::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err),
                }
            } else if verbose > 0 {
                eprintln!("[{}] Error: {:?}", exit_code.code_prefix(), err);
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
