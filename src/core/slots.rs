use crate::domain::model::{Period, SlotOffer};
use crate::domain::ports::SlotOccupancy;
use chrono::{Days, NaiveDate};

/// Lazy walk over open visit slots from tomorrow through `today + max_days_ahead`.
///
/// Dates ascend and Morning comes before Afternoon. Occupancy is read when a
/// slot is reached, not up front. The cursor only moves forward; build a new
/// scanner for every query.
#[derive(Debug)]
pub struct AvailableSlots<'a, S: SlotOccupancy + ?Sized> {
    occupancy: &'a S,
    current: Option<NaiveDate>,
    last: Option<NaiveDate>,
    period_index: usize,
}

impl<'a, S: SlotOccupancy + ?Sized> AvailableSlots<'a, S> {
    pub fn new(occupancy: &'a S, today: NaiveDate, max_days_ahead: u32) -> Self {
        Self {
            occupancy,
            current: today.checked_add_days(Days::new(1)),
            last: today.checked_add_days(Days::new(u64::from(max_days_ahead))),
            period_index: 0,
        }
    }
}

impl<S: SlotOccupancy + ?Sized> Iterator for AvailableSlots<'_, S> {
    type Item = SlotOffer;

    fn next(&mut self) -> Option<SlotOffer> {
        let last = self.last?;
        let capacity = self.occupancy.slot_capacity();

        while let Some(date) = self.current.filter(|d| *d <= last) {
            while let Some(&period) = Period::ALL.get(self.period_index) {
                self.period_index += 1;
                let booked = self.occupancy.count_active(date, period);
                if booked < capacity {
                    return Some(SlotOffer {
                        date,
                        period,
                        remaining: capacity - booked,
                    });
                }
                tracing::debug!("Slot {} {} full, skipping", date, period);
            }
            self.current = date.succ_opt();
            self.period_index = 0;
        }

        self.current = None;
        None
    }
}
