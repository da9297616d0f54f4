#[path = "../common/mod.rs"]
mod common;

use libsuica::session::{ScanService, ScanState};
use libsuica::test_support::CardSimulator;
use libsuica::transport::{MockTransport, TransportHardware};
use libsuica::utils::ms;
use libsuica::{Error, HardwareError, ReadResponse};

#[tokio::test]
async fn wire_reader_scan_returns_record() {
    common::helpers::init_logger();
    let mock = common::fixtures::suica_card_transport();
    let handle = ScanService::spawn(common::helpers::fast_config(), |sink| {
        TransportHardware::new(mock.clone(), sink)
    })
    .unwrap();

    let record = handle.scan().await.unwrap();
    assert_eq!(record.remaining_balance, 1000);
    assert_eq!(record.last_use_date.to_string(), "2022年1月21日");
    assert_eq!(handle.state().await.unwrap(), ScanState::Idle);
}

#[tokio::test]
async fn card_arriving_late_is_picked_up_by_polling() {
    let mock = MockTransport::new();
    let handle = ScanService::spawn(common::helpers::fast_config(), |sink| {
        TransportHardware::new(mock.clone(), sink)
    })
    .unwrap();

    let scan = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.scan().await })
    };
    tokio::time::sleep(ms(30)).await;
    assert_eq!(handle.state().await.unwrap(), ScanState::Scanning);

    for frame in [
        common::fixtures::polling_frame(),
        common::fixtures::request_service_frame([0x00, 0x01]),
        common::fixtures::read_frame(0, 0, &common::fixtures::history_blocks()),
    ] {
        mock.push_response(frame);
    }
    let record = tokio::time::timeout(ms(1000), scan)
        .await
        .expect("scan finished")
        .unwrap()
        .unwrap();
    assert_eq!(record.remaining_balance, 1000);
}

#[tokio::test]
async fn read_error_is_reported_to_waiter() {
    let handle = ScanService::spawn(common::helpers::fast_config(), |sink| {
        CardSimulator::new(sink).with_read(Err(HardwareError::new("rf field lost")))
    })
    .unwrap();

    assert_eq!(
        handle.scan().await,
        Err(Error::ReadFailed(HardwareError::new("rf field lost")))
    );
}

#[tokio::test]
async fn status_flags_error_is_reported_to_waiter() {
    let recorder = std::sync::Arc::new(std::sync::Mutex::new(None));
    let slot = recorder.clone();
    let handle = ScanService::spawn(common::helpers::fast_config(), move |sink| {
        let sim = CardSimulator::new(sink).with_read(Ok(ReadResponse::new(0x01, 0x00, vec![])));
        *slot.lock().unwrap() = Some(sim.recorder());
        sim
    })
    .unwrap();

    assert_eq!(
        handle.scan().await,
        Err(Error::StatusFlagsAbnormal {
            status1: 0x01,
            status2: 0x00
        })
    );
    let recorder = recorder.lock().unwrap().take().unwrap();
    assert_eq!(
        recorder.invalidations().last().and_then(|(_, r)| r.clone()),
        Some("status flags abnormal".to_string())
    );
}

#[tokio::test]
async fn handles_fail_after_shutdown() {
    let handle = ScanService::spawn(common::helpers::fast_config(), |sink| {
        CardSimulator::new(sink).with_card(None)
    })
    .unwrap();
    handle.shutdown().await.unwrap();

    let mut state = handle.state().await;
    for _ in 0..100 {
        if state.is_err() {
            break;
        }
        tokio::time::sleep(ms(5)).await;
        state = handle.state().await;
    }
    assert_eq!(state, Err(Error::ServiceStopped));
    assert_eq!(handle.scan().await, Err(Error::ServiceStopped));
}

#[tokio::test]
async fn oversized_block_batch_is_rejected_before_spawning() {
    let config = libsuica::session::ScanConfig {
        history_blocks: 200,
        ..common::helpers::fast_config()
    };
    let mock = common::fixtures::suica_card_transport();
    let result = ScanService::spawn(config, |sink| TransportHardware::new(mock.clone(), sink));
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert!(mock.sent().is_empty());
}
