use std::env;

fn main() {
    spotter::logging::init_from_env();
    let args: Vec<String> = env::args().collect();
    std::process::exit(spotter::cli::run_with_args(&args));
}
