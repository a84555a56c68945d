// Example usage of the BCI retriever

use anyhow::Context;
use bci::utils::conf_helper;
use bci::{Signal, SignalRetriever, TimeWindow, WindowPolicy};
use tracing::{info, Level};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let config = conf_helper::load_config_with_env("bci.json").context("loading bci.json")?;
    let retriever = SignalRetriever::from_config(config)?;

    let shot = 169572;

    // Raw CO2 phase on the V2 chord
    let raw = Signal::fetch(&retriever, shot, "V2", "CO2", Some([0.0, 2.0]), false)?;
    info!("Raw V2 CO2: {} samples at {} Hz from t0 = {} s", raw.len(), raw.fs(), raw.t0());

    // Same window, vibration subtracted
    let corrected = Signal::fetch(&retriever, shot, "V2", "CO2", Some([0.0, 2.0]), true)?;
    info!(
        "Vibration-subtracted V2 CO2: {} samples, last at {} s",
        corrected.len(),
        corrected.last_time()
    );

    if let (Some(first), Some(last)) = (corrected.x().first(), corrected.x().last()) {
        info!("First: {}, last: {}", first, last);
    }

    // HeNe has no vibration reference
    match Signal::fetch(&retriever, shot, "V2", "HeNe", None, true) {
        Ok(_) => info!("unexpected HeNe correction"),
        Err(e) => info!("HeNe correction refused: {}", e),
    }

    // First 100 us in the field layout downstream analysis expects
    let head = raw.trim(&TimeWindow::new(0.0, 1e-4)?, WindowPolicy::Bracket)?;
    println!("{}", serde_json::to_string(&head)?);

    Ok(())
}
