use mecs::commands::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenv::dotenv().ok();

    if mecs::libs::messages::macros::is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mecs=debug")))
            .with_target(false)
            .init();
    }

    if let Err(error) = Cli::menu() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
