use std::process::ExitCode;

#[cfg(target_os = "linux")]
#[tokio::main]
async fn main() -> ExitCode {
    use appliance_beacon::{lifecycle, logging, BluerAdapter, Config, Shutdown, SystemInterfaces, UnixSignals};
    use tracing::error;

    logging::init();

    let shutdown = Shutdown::new();
    let signals = match UnixSignals::new() {
        Ok(signals) => signals,
        Err(err) => {
            error!(error = %err, "problem subscribing to termination signals");
            return ExitCode::FAILURE;
        }
    };
    lifecycle::spawn_signal_handler(signals, shutdown.clone());

    let config = Config::default();
    match lifecycle::run(&config, &SystemInterfaces, BluerAdapter::new(), &shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.exit_code()),
    }
}

#[cfg(not(target_os = "linux"))]
fn main() -> ExitCode {
    appliance_beacon::logging::init();
    tracing::error!("no Bluetooth peripheral backend for this platform");
    ExitCode::FAILURE
}
