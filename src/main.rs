use bike_messenger::services::OverlayCapability;
use bike_messenger::utils::format_relative_time;
use bike_messenger::{App, AppConfig};
use chrono::Utc;
use once_cell::sync::Lazy;

static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    RUNTIME.block_on(async move {
        // Desktop hosts have no overlay window.
        let app = match App::from_config(&config, OverlayCapability::Unavailable).await {
            Ok(app) => app,
            Err(e) => {
                log::error!("Failed to open message storage: {}", e);
                std::process::exit(1);
            }
        };

        let now = Utc::now();
        for msg in app.messages() {
            let last = msg
                .last_sent_at
                .map(|ts| format_relative_time(ts, now))
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{:>2}. {:<30} {:<20} {}  sent {}x, last {}",
                msg.order + 1,
                msg.text,
                msg.icon,
                msg.color,
                msg.send_count,
                last
            );
        }
    });
}
