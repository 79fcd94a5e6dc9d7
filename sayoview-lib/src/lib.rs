pub mod acquire;
pub mod checksum;
pub mod constants;
pub mod device;
pub mod error;
pub mod frame;
pub mod packet;
pub mod pacing;
pub mod relay;
pub mod viewer;

// Re-export the front-end facing pieces for easy access
pub use acquire::{Acquisition, CycleOutcome};
pub use device::{SayoScreen, ScreenTransport};
pub use error::ScreenError;
pub use pacing::Pacer;
pub use viewer::ScreenViewer;
