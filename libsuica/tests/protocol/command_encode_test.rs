#[path = "../common/mod.rs"]
mod common;

use libsuica::constants::POLLING_REQUEST_SYSTEM_CODE;
use libsuica::protocol::codec::encode_command_frame;
use libsuica::protocol::{Command, Frame};
use libsuica::types::{BlockReference, ServiceCode, SystemCode};

#[test]
fn suica_polling_bytes() {
    let cmd = Command::Polling {
        system_code: SystemCode::SUICA,
        request_code: POLLING_REQUEST_SYSTEM_CODE,
        time_slot: 0,
    };
    let frame = encode_command_frame(&cmd).unwrap();
    assert_eq!(hex::encode(&frame), "0000ff05fb0000030100fc00");
}

#[test]
fn request_service_sends_service_little_endian() {
    let idm = common::fixtures::sample_idm();
    let cmd = Command::RequestService {
        idm,
        services: vec![ServiceCode::SUICA_HISTORY],
    };
    let payload = Frame::decode(&encode_command_frame(&cmd).unwrap()).unwrap();

    let mut expected = vec![0x02];
    expected.extend_from_slice(idm.as_bytes());
    expected.extend_from_slice(&[0x01, 0x0f, 0x09]);
    assert_eq!(payload, expected);
}

#[test]
fn history_read_requests_twelve_two_byte_elements() {
    let idm = common::fixtures::sample_idm();
    let cmd = Command::ReadWithoutEncryption {
        idm,
        services: vec![ServiceCode::SUICA_HISTORY],
        blocks: BlockReference::batch(12),
    };
    let payload = cmd.encode();

    assert_eq!(payload[0], 0x06);
    assert_eq!(&payload[1..9], idm.as_bytes());
    assert_eq!(&payload[9..12], &[0x01, 0x0f, 0x09]);
    assert_eq!(payload[12], 12);
    let elements: Vec<&[u8]> = payload[13..].chunks(2).collect();
    assert_eq!(elements.len(), 12);
    for (i, element) in elements.iter().enumerate() {
        assert_eq!(*element, &[0x80, i as u8]);
    }
}
