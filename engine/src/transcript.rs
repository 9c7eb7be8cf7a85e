use nebula_types::OutputEvent;

/// Output shown above the prompt, with a monotonic revision counter.
///
/// Every mutation bumps the revision; the renderer uses it as a cache key.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    events: Vec<OutputEvent>,
    revision: usize,
}

impl Transcript {
    #[inline]
    #[must_use]
    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    #[inline]
    #[must_use]
    pub fn revision(&self) -> usize {
        self.revision
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&OutputEvent> {
        self.events.last()
    }

    pub fn push(&mut self, event: OutputEvent) {
        self.events.push(event);
        self.bump();
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = OutputEvent>) {
        let before = self.events.len();
        self.events.extend(events);
        if self.events.len() != before {
            self.bump();
        }
    }

    /// Swap the newest event for `event`, or push it onto an empty transcript.
    pub fn replace_last(&mut self, event: OutputEvent) {
        match self.events.last_mut() {
            Some(last) => *last = event,
            None => self.events.push(event),
        }
        self.bump();
    }

    pub fn clear(&mut self) {
        if self.events.is_empty() {
            return;
        }
        self.events.clear();
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
