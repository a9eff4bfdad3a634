use crate::filter::FilterError;
use crate::http::Event;
use std::vec;

/// A transform from one event to zero or more derived records.
///
/// Implementations must be pure functions of the event: deriving the same
/// event twice yields the same records.
pub trait Filter {
    type Record;

    fn derive(&mut self, event: &Event) -> Result<Vec<Self::Record>, FilterError>;
}

impl<F: Filter + ?Sized> Filter for &mut F {
    type Record = F::Record;

    fn derive(&mut self, event: &Event) -> Result<Vec<Self::Record>, FilterError> {
        (**self).derive(event)
    }
}

/// Lazy, order-preserving iterator of the records a filter derives.
///
/// An event the filter rejects is logged and skipped.
pub struct Records<I, F: Filter> {
    events: I,
    filter: F,
    pending: vec::IntoIter<F::Record>,
}

impl<I, F: Filter> Records<I, F> {
    pub fn new(events: I, filter: F) -> Self {
        Self {
            events,
            filter,
            pending: Vec::new().into_iter(),
        }
    }

    pub fn into_filter(self) -> F {
        self.filter
    }
}

impl<I, F> Iterator for Records<I, F>
where
    I: Iterator<Item = Event>,
    F: Filter,
{
    type Item = F::Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(record);
            }

            let event = self.events.next()?;

            match self.filter.derive(&event) {
                Ok(records) => self.pending = records.into_iter(),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        agent = event.agent_id(),
                        timestamp = event.timestamp(),
                        "skipping event"
                    );
                }
            }
        }
    }
}

pub trait FilterExt: Iterator<Item = Event> + Sized {
    /// Derives records from every event with `filter`.
    fn records<F: Filter>(self, filter: F) -> Records<Self, F> {
        Records::new(self, filter)
    }
}

impl<I: Iterator<Item = Event>> FilterExt for I {}
