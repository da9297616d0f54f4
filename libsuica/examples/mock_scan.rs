//! Scan a simulated Suica card through the wire backend.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p libsuica --example mock_scan

use libsuica::protocol::Frame;
use libsuica::session::{ScanConfig, ScanService};
use libsuica::test_support::{SAMPLE_HISTORY_BLOCK, SAMPLE_IDM, SAMPLE_PMM};
use libsuica::transport::{MockTransport, TransportHardware};
use libsuica::utils::ms;

fn card_frames() -> anyhow::Result<Vec<Vec<u8>>> {
    let mut polling = vec![0x01];
    polling.extend_from_slice(&SAMPLE_IDM);
    polling.extend_from_slice(&SAMPLE_PMM);
    polling.extend_from_slice(&[0x00, 0x03]);

    let mut service = vec![0x03];
    service.extend_from_slice(&SAMPLE_IDM);
    service.extend_from_slice(&[0x01, 0x00, 0x01]);

    let mut read = vec![0x07];
    read.extend_from_slice(&SAMPLE_IDM);
    read.extend_from_slice(&[0x00, 0x00, 0x01]);
    read.extend_from_slice(&SAMPLE_HISTORY_BLOCK);

    Ok(vec![
        Frame::encode(&polling)?,
        Frame::encode(&service)?,
        Frame::encode(&read)?,
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mock = MockTransport::with_responses(card_frames()?);
    let config = ScanConfig::builder()
        .poll_interval(ms(100))
        .command_timeout(ms(1000))
        .history_blocks(1)
        .build()?;
    let handle = ScanService::spawn(config, |sink| TransportHardware::new(mock, sink))?;

    let record = handle.scan().await?;
    println!("{}", record);
    if let Some(date) = record.last_use_date.to_naive_date() {
        println!("last used: {}", date.format("%Y-%m-%d"));
    }

    handle.shutdown().await?;
    Ok(())
}
