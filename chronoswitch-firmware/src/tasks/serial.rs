//! Host serial receive task
//!
//! Splits the byte stream into requests and forwards them to the
//! controller. Replies are written by the controller itself.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use chronoswitch_protocol::RequestParser;

use crate::channels::REQUEST_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Serial RX task - parses host requests byte by byte
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut parser = RequestParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(request)) => {
                            debug!("Request: {:?}", request);
                            // Requests are answered in order, so wait for room
                            REQUEST_CHANNEL.send(Ok(request)).await;
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Request parse error: {:?}", e);
                            REQUEST_CHANNEL.send(Err(e)).await;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
            }
        }
    }
}
