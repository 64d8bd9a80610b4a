fn main() {
    #[cfg(feature = "cli")]
    oxidfu::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oxidfu: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
