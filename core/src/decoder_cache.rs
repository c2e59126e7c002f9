//! Per-device hardware decoder table.
//!
//! Decoders are created lazily the first time a device sends a key and then
//! kept for the lifetime of the session. There is no eviction; the number of
//! physical keyboards attached to one device is small.

use ahash::AHashMap;

use crate::decoder::{DeviceId, HardwareEventDecoder, HardwareKeyboardEventDecoder, RawKeyEvent};
use crate::event::Event;

/// Builds a decoder for a device seen for the first time.
pub type DecoderFactory = Box<dyn Fn(DeviceId) -> Box<dyn HardwareEventDecoder>>;

/// Memoizing map from device id to its hardware decoder.
pub struct DeviceDecoderTable {
    decoders: AHashMap<DeviceId, Box<dyn HardwareEventDecoder>>,
    factory: DecoderFactory,
}

impl std::fmt::Debug for DeviceDecoderTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDecoderTable")
            .field("decoders", &self.decoders)
            .finish_non_exhaustive()
    }
}

impl Default for DeviceDecoderTable {
    fn default() -> Self {
        Self::new(Box::new(|device_id| -> Box<dyn HardwareEventDecoder> {
            Box::new(HardwareKeyboardEventDecoder::new(device_id))
        }))
    }
}

impl DeviceDecoderTable {
    pub fn new(factory: DecoderFactory) -> Self {
        Self {
            decoders: AHashMap::new(),
            factory,
        }
    }

    /// Get the decoder for `device_id`, creating it on first use.
    pub fn decoder_for(&mut self, device_id: DeviceId) -> &mut dyn HardwareEventDecoder {
        let factory = &self.factory;
        self.decoders
            .entry(device_id)
            .or_insert_with(|| {
                tracing::debug!(device_id, "creating hardware decoder");
                factory(device_id)
            })
            .as_mut()
    }

    /// Decode a raw key event with its device's decoder.
    pub fn decode(&mut self, raw: &RawKeyEvent) -> Event {
        self.decoder_for(raw.device_id).decode_hardware_key(raw)
    }

    pub fn contains(&self, device_id: DeviceId) -> bool {
        self.decoders.contains_key(&device_id)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}
