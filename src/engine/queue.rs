use crate::models::Enrollment;

use super::error::EngineError;

/// Slots allocated the first time the queue receives an enrollment.
const INITIAL_SLOTS: usize = 8;

/// FIFO of pending enrollments backed by a ring buffer.
///
/// `head` is the slot holding the oldest request and `len` the number of
/// occupied slots starting there, wrapping around the end of `slots`.
#[derive(Debug, Default)]
pub struct EnrollmentQueue {
    slots: Vec<Option<Enrollment>>,
    head: usize,
    len: usize,
}

impl EnrollmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append at the tail. Only fails when the buffer cannot grow.
    pub fn enqueue(&mut self, enrollment: Enrollment) -> Result<(), EngineError> {
        if self.len == self.slots.len() {
            self.grow()?;
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(enrollment);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest enrollment.
    ///
    /// An empty queue reports [`EngineError::EmptyQueue`] and stays as it was.
    pub fn dequeue(&mut self) -> Result<Enrollment, EngineError> {
        if self.is_empty() {
            return Err(EngineError::EmptyQueue);
        }
        let enrollment = self.slots[self.head]
            .take()
            .ok_or(EngineError::EmptyQueue)?;
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        Ok(enrollment)
    }

    /// Oldest enrollment without removing it.
    pub fn peek(&self) -> Option<&Enrollment> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.head].as_ref()
        }
    }

    /// Pending enrollments, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Enrollment> + '_ {
        let capacity = self.slots.len();
        (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % capacity].as_ref())
    }

    /// Drop every pending enrollment without processing it. Returns how many
    /// were discarded.
    pub fn drain(&mut self) -> usize {
        let discarded = self.len;
        self.slots.clear();
        self.slots.shrink_to_fit();
        self.head = 0;
        self.len = 0;
        discarded
    }

    /// Double the buffer, unrolling the ring so the oldest entry lands at 0.
    fn grow(&mut self) -> Result<(), EngineError> {
        let new_capacity = (self.slots.len() * 2).max(INITIAL_SLOTS);
        let mut slots: Vec<Option<Enrollment>> = Vec::new();
        slots
            .try_reserve_exact(new_capacity)
            .map_err(|_| EngineError::ResourceExhausted("enrollment queue"))?;

        let capacity = self.slots.len();
        for offset in 0..self.len {
            slots.push(self.slots[(self.head + offset) % capacity].take());
        }
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.head = 0;
        Ok(())
    }
}
