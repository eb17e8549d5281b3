//! Loading state for a view that waits on AI responses.
//!
//! Each request gets a ticket. Only the newest ticket may deliver a result,
//! and dismissing the view invalidates everything outstanding, so a response
//! that arrives late is dropped instead of overwriting newer state.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState<T> {
    Idle,
    Loading,
    Ready(T),
}

/// Identifies one request issued through a [`RequestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    generation: u64,
    state: SlotState<T>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: SlotState::Idle,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding any outstanding one.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = SlotState::Loading;
        Ticket(self.generation)
    }

    /// Stores `value` if `ticket` is still current. Returns whether it was
    /// applied.
    pub fn complete(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 != self.generation || !self.is_loading() {
            tracing::debug!("Dropping stale response for request {}", ticket.0);
            return false;
        }
        self.state = SlotState::Ready(value);
        true
    }

    /// Clears the slot and invalidates outstanding tickets.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.state = SlotState::Idle;
    }

    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            SlotState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
