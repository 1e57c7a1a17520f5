//! Print the frames a shot sequence would send, without a controller.
//!
//! Usage: cargo run --example dry_run -- [power] [shots]

use std::time::Duration;

use uc2000::{ShotConfig, plan};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let power: f64 = args.next().as_deref().unwrap_or("10").parse()?;
    let shots: u32 = args.next().as_deref().unwrap_or("2").parse()?;

    let config = ShotConfig::default()
        .power(power)
        .shot_time(Duration::from_millis(500))
        .delay(Duration::from_millis(500))
        .shots(shots);

    for step in plan(&config)? {
        println!("{step}");
    }
    Ok(())
}
