/// Initializes logging; `verbose` enables debug output for quill.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module(
            "quill",
            if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info },
        )
        .parse_default_env()
        .init();
}
