#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Mutex};

use libsuica::card::SuicaRecord;
use libsuica::protocol::Frame;
use libsuica::session::{
    EventSink, ScanConfig, ScanState, SessionController, SessionEvent, Transition,
};
use libsuica::transport::{MockTransport, TransportHardware};
use libsuica::constants::{FELICA_MAX_PAYLOAD_LEN, MAX_BLOCKS_PER_READ};
use libsuica::{BlockData, Error, ServiceCode};
use tokio::sync::mpsc::UnboundedReceiver;

type Controller = SessionController<TransportHardware<MockTransport>>;

fn controller(mock: &MockTransport) -> (Controller, UnboundedReceiver<SessionEvent>) {
    controller_with(mock, ScanConfig::default())
}

fn controller_with(
    mock: &MockTransport,
    config: ScanConfig,
) -> (Controller, UnboundedReceiver<SessionEvent>) {
    let (sink, rx) = EventSink::channel();
    let hw = TransportHardware::new(mock.clone(), sink);
    (SessionController::new(hw, config), rx)
}

/// Feed queued completions back until the reader goes quiet.
fn pump(ctl: &mut Controller, rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<Transition> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(ctl.handle(event));
    }
    out
}

fn final_outcome(transitions: &[Transition]) -> Option<&Transition> {
    transitions
        .iter()
        .rev()
        .find(|t| matches!(t, Transition::Terminated(_)))
}

#[test]
fn sample_card_reads_1000_yen() {
    common::helpers::init_logger();
    let mock = common::fixtures::suica_card_transport();
    let (mut ctl, mut rx) = controller(&mock);
    let records: Arc<Mutex<Vec<SuicaRecord>>> = Arc::default();
    let sink = records.clone();

    ctl.start_scan(move |r| sink.lock().unwrap().push(r)).unwrap();
    ctl.poll();
    let transitions = pump(&mut ctl, &mut rx);

    let record = match final_outcome(&transitions) {
        Some(Transition::Terminated(Ok(record))) => *record,
        other => panic!("expected a record, got {:?}", other),
    };
    assert_eq!(record.to_string(), "2022年1月21日 1000円");
    assert_eq!(records.lock().unwrap().as_slice(), &[record]);
    assert_eq!(ctl.state(), ScanState::Idle);

    // Polling, RequestService, one batched read.
    let sent: Vec<Vec<u8>> = mock
        .sent()
        .iter()
        .map(|f| Frame::decode(f).unwrap())
        .collect();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], vec![0x00, 0x00, 0x03, 0x01, 0x00]);
    assert_eq!(sent[1][0], 0x02);
    assert_eq!(sent[2][0], 0x06);
    assert_eq!(sent[2][12], 12);
    assert_eq!(mock.pending_responses(), 0);

    // The reader's own invalidation notice arrived after completion.
    assert_eq!(transitions.last(), Some(&Transition::Ignored));
}

#[test]
fn missing_service_never_reads() {
    let mock = MockTransport::with_responses([
        common::fixtures::polling_frame(),
        common::fixtures::request_service_frame([0xff, 0xff]),
    ]);
    let (mut ctl, mut rx) = controller(&mock);
    ctl.start_scan(|_| panic!("no record expected")).unwrap();
    ctl.poll();
    let transitions = pump(&mut ctl, &mut rx);

    assert_eq!(
        final_outcome(&transitions),
        Some(&Transition::Terminated(Err(Error::ServiceNotPresent(
            ServiceCode::SUICA_HISTORY
        ))))
    );
    assert_eq!(mock.sent().len(), 2);
}

#[test]
fn abnormal_status_flags_end_the_attempt() {
    let mock = MockTransport::with_responses([
        common::fixtures::polling_frame(),
        common::fixtures::request_service_frame([0x00, 0x01]),
        common::fixtures::read_frame(0x01, 0xA6, &[]),
    ]);
    let (mut ctl, mut rx) = controller(&mock);
    ctl.start_scan(|_| panic!("no record expected")).unwrap();
    ctl.poll();
    let transitions = pump(&mut ctl, &mut rx);

    assert_eq!(
        final_outcome(&transitions),
        Some(&Transition::Terminated(Err(Error::StatusFlagsAbnormal {
            status1: 0x01,
            status2: 0xA6
        })))
    );
}

#[test]
fn card_removed_before_read_is_a_read_failure() {
    let mock = MockTransport::with_responses([
        common::fixtures::polling_frame(),
        common::fixtures::request_service_frame([0x00, 0x01]),
    ]);
    let (mut ctl, mut rx) = controller(&mock);
    ctl.start_scan(|_| {}).unwrap();
    ctl.poll();
    let transitions = pump(&mut ctl, &mut rx);

    assert!(matches!(
        final_outcome(&transitions),
        Some(Transition::Terminated(Err(Error::ReadFailed(_))))
    ));
}

#[test]
fn empty_field_keeps_scanning() {
    let mock = MockTransport::new();
    let (mut ctl, mut rx) = controller(&mock);
    ctl.start_scan(|_| {}).unwrap();
    ctl.poll();
    ctl.poll();

    assert!(pump(&mut ctl, &mut rx).is_empty());
    assert_eq!(ctl.state(), ScanState::Scanning);
    assert_eq!(mock.sent().len(), 2);
    assert_eq!(mock.reset_count(), 1);
}

#[test]
fn largest_block_count_fits_one_frame() {
    let config = ScanConfig::builder()
        .history_blocks(MAX_BLOCKS_PER_READ)
        .build()
        .unwrap();
    let mut blocks = vec![common::fixtures::history_block()];
    blocks.extend((1..MAX_BLOCKS_PER_READ).map(|i| BlockData::from_bytes([i; 16])));
    let mock = MockTransport::with_responses([
        common::fixtures::polling_frame(),
        common::fixtures::request_service_frame([0x00, 0x01]),
        common::fixtures::read_frame(0, 0, &blocks),
    ]);
    let (mut ctl, mut rx) = controller_with(&mock, config);
    ctl.start_scan(|_| {}).unwrap();
    ctl.poll();
    let transitions = pump(&mut ctl, &mut rx);

    match final_outcome(&transitions) {
        Some(Transition::Terminated(Ok(record))) => assert_eq!(record.remaining_balance, 1000),
        other => panic!("expected a record, got {:?}", other),
    }
    let read = Frame::decode(&mock.sent()[2]).unwrap();
    assert_eq!(read[12], MAX_BLOCKS_PER_READ);
    assert!(read.len() <= FELICA_MAX_PAYLOAD_LEN);
}
