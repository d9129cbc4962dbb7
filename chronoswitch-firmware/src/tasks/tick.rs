//! Scheduler tick task
//!
//! Raises [`MINUTE_TICK`] once per tick period. The controller decides
//! what a tick means (auto re-enable countdown, due-action check).

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::MINUTE_TICK;

/// Tick task - signals the controller every `period_s` seconds
#[embassy_executor::task]
pub async fn tick_task(period_s: u32) {
    info!("Tick task started, period {}s", period_s);

    let mut ticker = Ticker::every(Duration::from_secs(period_s as u64));

    loop {
        ticker.next().await;
        trace!("Minute tick");
        MINUTE_TICK.signal(());
    }
}
