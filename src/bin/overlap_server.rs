use smash_waldo::config::EditorConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::load_from_file().unwrap_or_else(|e| {
        log::warn!("{e}; using default configuration");
        EditorConfig::default()
    });

    // an address on the command line wins over the config file
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.server_addr.clone());

    smash_waldo::server::serve(&addr, config.reference_space())
}
