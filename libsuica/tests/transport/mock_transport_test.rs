#[path = "../common/mod.rs"]
mod common;

use libsuica::protocol::{Command, Response};
use libsuica::session::EventSink;
use libsuica::transport::{MockTransport, Transport, TransportHardware};
use libsuica::{Error, SystemCode};

#[test]
fn mock_preserves_queue_across_reset() {
    let mut m = MockTransport::with_responses([common::fixtures::polling_frame()]);
    m.reset().unwrap();
    assert_eq!(m.receive(1000).unwrap(), common::fixtures::polling_frame());
    assert!(matches!(m.receive(1000), Err(Error::Timeout)));
}

#[test]
fn execute_round_trips_polling() {
    let mock = MockTransport::with_responses([common::fixtures::polling_frame()]);
    let (sink, _rx) = EventSink::channel();
    let mut hw = TransportHardware::new(mock.clone(), sink);

    let response = hw
        .execute(&Command::Polling {
            system_code: SystemCode::SUICA,
            request_code: 1,
            time_slot: 0,
        })
        .unwrap();
    assert!(matches!(response, Response::Polling { .. }));
    assert_eq!(response.idm(), &common::fixtures::sample_idm());
    assert_eq!(mock.sent().len(), 1);
}

#[test]
fn execute_reports_corrupt_frames() {
    let mut frame = common::fixtures::polling_frame();
    let last = frame.len() - 2;
    frame[last] ^= 0x01; // DCS
    let mock = MockTransport::with_responses([frame]);
    let (sink, _rx) = EventSink::channel();
    let mut hw = TransportHardware::new(mock, sink);

    let err = hw
        .execute(&Command::Polling {
            system_code: SystemCode::SUICA,
            request_code: 1,
            time_slot: 0,
        })
        .unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
}
