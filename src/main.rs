use jungle_park::{JunglePark, WindowConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = jungle_park::run::<JunglePark>(WindowConfig::default()) {
        log::error!("jungle park exited with an error: {e:#}");
        std::process::exit(1);
    }
}
