use crate::domain::delay::delay_model::{DelayModel, DelayModelType, HopContext, HopDelay};
use crate::error::{Error, Result};

/// Model A, the rate-reservation bound.
///
/// Per hop, with `b_H` the summed frame size (bits) and `r_H` the summed reserved rate
/// (bit/s) of the strictly higher priority streams queued on the same hop:
///
/// ```text
/// queueing     = b_H / (C - r_H)
/// transmission = size / C
/// ```
///
/// Best-effort streams count towards `b_H` but reserve no rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateReservationModel;

impl DelayModel for RateReservationModel {
    fn model_type(&self) -> DelayModelType {
        DelayModelType::RateReservation
    }

    fn hop_delay(&self, ctx: &HopContext<'_>) -> Result<HopDelay> {
        let (burst_higher, rate_higher) = ctx
            .higher_priority_on_hop()
            .fold((0.0, 0.0), |(b, r), other| (b + other.size_in_bits(), r + other.rate().unwrap_or(0.0)));

        let effective_capacity = ctx.capacity - rate_higher;
        if effective_capacity <= 0.0 {
            return Err(Error::CapacityExceeded {
                stream: ctx.stream.id.clone(),
                from: ctx.from.clone(),
                to: ctx.to.clone(),
                capacity: ctx.capacity,
                reserved_rate: rate_higher,
            });
        }

        let mut delay = HopDelay::new(ctx.from, ctx.to);
        delay.queueing = burst_higher / effective_capacity;
        delay.transmission = ctx.stream.size_in_bits() / ctx.capacity;
        Ok(delay)
    }
}
