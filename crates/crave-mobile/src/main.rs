//! CRAVE Mobile Application
//!
//! Android shell entrypoint for the Dioxus mobile app.

#[cfg(any(target_os = "android", test))]
mod alerts;
#[cfg(target_os = "android")]
mod app;
#[cfg(any(target_os = "android", test))]
mod completion;
#[cfg(any(target_os = "android", test))]
mod config;
#[cfg(any(target_os = "android", test))]
mod data;
#[cfg(any(target_os = "android", test))]
mod list_state;
#[cfg(any(target_os = "android", test))]
mod secret_store;
#[cfg(any(target_os = "android", test))]
mod speech;

#[cfg(target_os = "android")]
fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crave=info".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting CRAVE mobile shell...");
    dioxus::LaunchBuilder::mobile().launch(app::App);
}

#[cfg(not(target_os = "android"))]
fn main() {
    println!(
        "crave-mobile is intended for Android targets. Try: cargo build -p crave-mobile --target aarch64-linux-android"
    );
}
