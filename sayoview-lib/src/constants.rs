// Protocol constants for the SayoDevice screen-read exchange

use std::time::Duration;

/// USB vendor ID of the SayoDevice keypad.
pub const VENDOR_ID: u16 = 0x8089;

/// USB product ID of the reference device.
pub const PRODUCT_ID: u16 = 0x0009;

/// Vendor usage page carrying the screen-read channel. The device exposes
/// several HID interfaces; only this one answers framebuffer requests.
pub const USAGE_PAGE: u16 = 0xFF12;

/// Onboard display width in pixels.
pub const SCREEN_WIDTH: usize = 160;

/// Onboard display height in pixels.
pub const SCREEN_HEIGHT: usize = 80;

/// Every outgoing report is exactly this long, zero padding included.
pub const REQUEST_LEN: usize = 1024;

/// Framebuffer bytes requested per chunk (0x3F4).
pub const CHUNK_SIZE: usize = 0x3F4;

/// Cap on the length a response may declare in its header (0x3FC).
pub const RESPONSE_MAX_LEN: usize = 0x3FC;

/// Response header bytes counted inside the declared length.
pub const RESPONSE_OVERHEAD: usize = 8;

/// Byte offset where response payload begins.
pub const RESPONSE_PAYLOAD_START: usize = 0xC;

/// Sleep between polls while the device has nothing for us yet.
pub const READ_BACKOFF: Duration = Duration::from_micros(100);

/// Quiet time after which one stall window is charged.
pub const STALL_WINDOW: Duration = Duration::from_millis(50);

/// Stall windows tolerated before a cycle is abandoned.
pub const MAX_STALL_WINDOWS: u32 = 5;

/// Completed frames buffered between the acquisition and consumer loops.
pub const FRAME_RELAY_DEPTH: usize = 2;

/// Consumer rate used when no FPS limit is configured. Keeps an uncapped
/// viewer from saturating the HID channel while still covering 144 Hz panels.
pub const DEFAULT_POLL_HZ: u32 = 200;
