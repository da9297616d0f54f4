// libsuica/src/constants.rs
//! Protocol and card-layout constants used across the crate

/// FeliCa wire frame preamble: 0x00 0x00 0xFF
pub const FELICA_PREAMBLE: [u8; 3] = [0x00, 0x00, 0xFF];

/// FeliCa wire frame postamble: 0x00
pub const FELICA_POSTAMBLE: u8 = 0x00;

/// Minimal FeliCa wire frame length in bytes
pub const FELICA_MIN_FRAME_LEN: usize = 7;

/// Maximum payload length for FeliCa frames
pub const FELICA_MAX_PAYLOAD_LEN: usize = 255;

/// FeliCa command codes. Each response code is the command code + 1.
pub const CMD_POLLING: u8 = 0x00;
/// Request Service command code.
pub const CMD_REQUEST_SERVICE: u8 = 0x02;
/// Read Without Encryption command code.
pub const CMD_READ_WITHOUT_ENCRYPTION: u8 = 0x06;

/// Polling request code asking the card to append its system code.
pub const POLLING_REQUEST_SYSTEM_CODE: u8 = 0x01;

/// First byte of a two-byte block list element (access mode 0, service index 0).
pub const BLOCK_LIST_TWO_BYTE_ELEMENT: u8 = 0x80;

/// Size of one FeliCa block.
pub const BLOCK_SIZE: usize = 16;

/// Number of history blocks held by the Suica balance/history service.
pub const SUICA_HISTORY_BLOCKS: u8 = 12;

/// Most blocks a card accepts in one Read Without Encryption command.
/// Keeps the request well inside [`FELICA_MAX_PAYLOAD_LEN`].
pub const MAX_BLOCKS_PER_READ: u8 = 15;

/// Alert text shown by the platform reader sheet.
pub const DEFAULT_ALERT_MESSAGE: &str = "NFCをどうぞ";
