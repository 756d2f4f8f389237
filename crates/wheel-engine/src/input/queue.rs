use glam::Vec2;

/// Raw input as delivered by the host, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp { pos: Vec2 },
    /// Host-side UI event. `kind` identifies it; `a`, `b`, `c` carry data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Events pushed by the host between frames, drained once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { pos: Vec2::new(10.0, 20.0) });
        q.push(InputEvent::PointerUp { pos: Vec2::new(10.0, 20.0) });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event_keeps_payload() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        assert_eq!(
            q.drain(),
            vec![InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 }]
        );
    }
}
