use crate::domain::delay::delay_model::{DelayModel, DelayModelType, HopContext, HopDelay};
use crate::error::{Error, Result};

/// Model B, processing plus transmission plus blocking.
///
/// Blocking is the transmission time, at this hop's capacity, of every stream of a
/// strictly higher priority class anywhere in the network, not only on this hop.
#[derive(Debug, Clone, Copy)]
pub struct ProcessingBlockingModel {
    /// Per-hop processing delay in seconds.
    processing_delay: f64,
}

impl ProcessingBlockingModel {
    pub fn new(processing_delay: f64) -> Self {
        Self { processing_delay }
    }
}

impl DelayModel for ProcessingBlockingModel {
    fn model_type(&self) -> DelayModelType {
        DelayModelType::ProcessingBlocking
    }

    fn hop_delay(&self, ctx: &HopContext<'_>) -> Result<HopDelay> {
        if ctx.capacity <= 0.0 {
            return Err(Error::CapacityExceeded {
                stream: ctx.stream.id.clone(),
                from: ctx.from.clone(),
                to: ctx.to.clone(),
                capacity: ctx.capacity,
                reserved_rate: 0.0,
            });
        }

        let mut delay = HopDelay::new(ctx.from, ctx.to);
        delay.processing = self.processing_delay;
        delay.transmission = ctx.stream.size_in_bits() / ctx.capacity;
        delay.blocking = ctx.higher_priority_in_network().map(|other| other.size_in_bits() / ctx.capacity).sum();
        Ok(delay)
    }
}
