use std::collections::VecDeque;

use crate::constant::SCROLLBACK_LINES;
use crate::remote::ServiceStatus;

/// Buffered output of the service currently being followed.
///
/// Lifecycle per the service-output contract: a stream is opened when a
/// service is followed, and dropped and recreated (buffer cleared) whenever
/// the followed service or its status changes. Each recreation bumps a
/// generation number; lines tagged with an older generation are discarded,
/// so a dying stream cannot write into its successor's buffer.
#[derive(Debug, Default)]
pub struct ServiceTail {
    service_id: Option<String>,
    status: Option<ServiceStatus>,
    generation: u64,
    lines: VecDeque<String>,
    finished: bool,
}

impl ServiceTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a service at its current status. Returns `true` when a fresh
    /// stream must be opened (first follow, different service, or a status
    /// change on the same service).
    pub fn follow(&mut self, service_id: &str, status: ServiceStatus) -> bool {
        let same_service = self.service_id.as_deref() == Some(service_id);
        if same_service && self.status == Some(status) {
            return false;
        }

        self.service_id = Some(service_id.to_string());
        self.status = Some(status);
        self.generation += 1;
        self.lines.clear();
        self.finished = false;
        true
    }

    /// Stop following entirely (selection cleared, session switched).
    pub fn unfollow(&mut self) {
        self.service_id = None;
        self.status = None;
        self.generation += 1;
        self.lines.clear();
        self.finished = false;
    }

    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn push_line(&mut self, generation: u64, line: String) {
        if generation != self.generation {
            return;
        }
        if self.lines.len() == SCROLLBACK_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The stream closed normally (`[DONE]` or transport end).
    pub fn finish(&mut self, generation: u64) {
        if generation == self.generation {
            self.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_reports_when_a_stream_is_needed() {
        let mut tail = ServiceTail::new();
        assert!(tail.follow("web", ServiceStatus::Running));
        // Same service, same status: keep the stream.
        assert!(!tail.follow("web", ServiceStatus::Running));
        // Status change drops and recreates.
        assert!(tail.follow("web", ServiceStatus::Stopped));
        // Different service always recreates.
        assert!(tail.follow("worker", ServiceStatus::Stopped));
    }

    #[test]
    fn status_change_clears_buffer_and_bumps_generation() {
        let mut tail = ServiceTail::new();
        tail.follow("web", ServiceStatus::Running);
        let first = tail.generation();
        tail.push_line(first, "listening on :3000".into());
        assert_eq!(tail.len(), 1);

        tail.follow("web", ServiceStatus::Stopping);
        assert!(tail.is_empty());
        assert!(tail.generation() > first);

        // A late line from the old stream is dropped.
        tail.push_line(first, "late".into());
        assert!(tail.is_empty());
    }

    #[test]
    fn finish_only_applies_to_current_generation() {
        let mut tail = ServiceTail::new();
        tail.follow("web", ServiceStatus::Running);
        let old = tail.generation();
        tail.follow("web", ServiceStatus::Stopped);

        tail.finish(old);
        assert!(!tail.is_finished());
        tail.finish(tail.generation());
        assert!(tail.is_finished());
    }

    #[test]
    fn scrollback_is_capped() {
        let mut tail = ServiceTail::new();
        tail.follow("web", ServiceStatus::Running);
        let generation = tail.generation();
        for i in 0..(SCROLLBACK_LINES + 5) {
            tail.push_line(generation, format!("line {i}"));
        }
        assert_eq!(tail.len(), SCROLLBACK_LINES);
        assert_eq!(tail.lines().next(), Some("line 5"));
    }

    #[test]
    fn unfollow_resets_everything() {
        let mut tail = ServiceTail::new();
        tail.follow("web", ServiceStatus::Running);
        let generation = tail.generation();
        tail.push_line(generation, "x".into());
        tail.unfollow();
        assert!(tail.is_empty());
        assert_eq!(tail.service_id(), None);
        // Old generation lines stay dead after unfollow too.
        tail.push_line(generation, "y".into());
        assert!(tail.is_empty());
    }
}
