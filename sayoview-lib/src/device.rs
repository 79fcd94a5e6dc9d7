//! HID transport session for the SayoDevice screen channel.

use crate::constants::{PRODUCT_ID, USAGE_PAGE, VENDOR_ID};
use crate::error::ScreenError;
use bytes::Bytes;
use hidapi::{HidApi, HidDevice};
use tracing::info;

/// Read buffer size; reports never exceed one request length.
const READ_BUF_LEN: usize = 1024;

/// The raw write/read seam between the acquisition cycle and the wire.
///
/// `try_read` never sleeps: it returns `Ok(None)` immediately when no report
/// is pending, leaving backoff to the caller. Either error aborts the
/// current acquisition cycle but not the session.
pub trait ScreenTransport {
    fn write(&mut self, packet: &[u8]) -> Result<(), ScreenError>;
    fn try_read(&mut self) -> Result<Option<Bytes>, ScreenError>;
}

/// An exclusively-owned open handle to the device's screen-read interface.
pub struct SayoScreen {
    device: HidDevice,
}

impl SayoScreen {
    /// Find and open the reference device on its vendor usage page.
    pub fn open() -> Result<Self, ScreenError> {
        let api = HidApi::new()?;
        Self::open_with(&api, VENDOR_ID, PRODUCT_ID, USAGE_PAGE)
    }

    /// Find and open a specific vendor/product on a specific usage page.
    ///
    /// The device exposes several HID interfaces (keys, config, screen);
    /// only the one on the target usage page answers framebuffer requests.
    pub fn open_with(
        api: &HidApi,
        vendor_id: u16,
        product_id: u16,
        usage_page: u16,
    ) -> Result<Self, ScreenError> {
        info!(vendor_id, product_id, "searching for SayoDevice screen interface");

        let matches: Vec<_> = api
            .device_list()
            .filter(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .collect();
        if matches.is_empty() {
            return Err(ScreenError::DeviceNotFound { vendor_id, product_id });
        }

        let screen_if = matches
            .into_iter()
            .find(|d| d.usage_page() == usage_page)
            .ok_or(ScreenError::UsagePageNotFound { usage_page })?;

        let device = api.open_path(screen_if.path())?;
        // Non-blocking reads; the acquisition cycle owns the backoff policy.
        device.set_blocking_mode(false)?;

        info!(
            "connected to {} {}",
            device.get_manufacturer_string()?.unwrap_or_default(),
            device.get_product_string()?.unwrap_or_default()
        );

        Ok(Self { device })
    }
}

impl ScreenTransport for SayoScreen {
    fn write(&mut self, packet: &[u8]) -> Result<(), ScreenError> {
        self.device.write(packet).map_err(ScreenError::WriteFailed)?;
        Ok(())
    }

    fn try_read(&mut self) -> Result<Option<Bytes>, ScreenError> {
        let mut buf = [0u8; READ_BUF_LEN];
        let n = self.device.read(&mut buf).map_err(ScreenError::ReadFailed)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(Bytes::copy_from_slice(&buf[..n])))
    }
}
