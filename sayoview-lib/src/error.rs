use thiserror::Error;

/// The primary error type for the `sayoview-lib` library.
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("no HID device with VID={vendor_id:#06x} PID={product_id:#06x}. Is the SayoDevice connected?")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("device present, but no interface exposes usage page {usage_page:#06x}")]
    UsagePageNotFound { usage_page: u16 },

    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("write to device failed: {0}")]
    WriteFailed(#[source] hidapi::HidError),

    #[error("read from device failed: {0}")]
    ReadFailed(#[source] hidapi::HidError),
}
