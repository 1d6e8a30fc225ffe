use ferrofetch::cache::ValueCache;
use ferrofetch::config::{self, Config};
use ferrofetch::modules::{self, FactLine};
use ferrofetch::{display, platform};

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let platform = platform::detect();
    let config = match config::load(&platform) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ferrofetch: {}", err);
            Config::default()
        }
    };
    let mut cache = ValueCache::open(&platform);

    let mut items: Vec<(config::ConfigEntry, FactLine)> = Vec::new();
    for entry in &config.display.items {
        match entry.value.as_str() {
            "cpu_usage" => {
                items.push((entry.clone(), modules::cpu_usage::render(&config.cpu)));
            }
            "disk" => {
                for line in modules::disk::render(&config.disk) {
                    items.push((entry.clone(), line));
                }
            }
            "gpu" => {
                for line in modules::gpu::render(&config.gpu, &mut cache) {
                    items.push((entry.clone(), line));
                }
            }
            other => {
                let mut line = modules::identity::render(other, &platform)
                    .unwrap_or_else(|| FactLine {
                        key: entry.key.clone(),
                        value: format!("unknown item '{}'", other),
                    });
                if !entry.key.is_empty() {
                    line.key = entry.key.clone();
                }
                items.push((entry.clone(), line));
            }
        }
    }

    display::render(&config, &items);
}
