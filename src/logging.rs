use log::LevelFilter;

/// Install the platform logger; calling it again is a no-op
#[cfg(target_os = "android")]
pub fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("ImageSelector"),
    );
}

/// Install the platform logger; calling it again is a no-op
///
/// `RUST_LOG` wins when set, otherwise warnings and up plus info for this crate.
#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    let result = if std::env::var("RUST_LOG").is_ok() {
        env_logger::Builder::from_default_env().try_init()
    } else {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .filter_module("image_selector", LevelFilter::Info)
            .filter_module("photo_pager", LevelFilter::Info)
            .try_init()
    };

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
