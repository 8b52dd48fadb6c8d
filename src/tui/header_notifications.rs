//! Header notification management
//!
//! Provides a queue-based notification system for displaying transient messages
//! in the header area, e.g. "Display window closed" or "Countdown complete".
//! Validation warnings are not routed through here; the control view renders
//! those inline next to the fields they concern.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default duration for header notifications (5 seconds)
const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// A notification to be displayed in the header
#[derive(Debug, Clone)]
pub struct HeaderNotification {
    /// The message to display
    pub message: String,
    /// When the notification was created
    pub created_at: Instant,
    /// How long the notification should be shown
    pub duration: Duration,
}

impl HeaderNotification {
    /// Create a new header notification with default duration (5 seconds)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Create a new header notification with custom duration
    pub fn with_duration(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration,
        }
    }

    /// Check if this notification has expired
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Manages a FIFO queue of header notifications
///
/// Shows one notification at a time, removing expired ones automatically.
#[derive(Debug)]
pub struct HeaderNotificationManager {
    /// Queue of notifications (oldest first)
    queue: VecDeque<HeaderNotification>,
    /// Maximum queue size to prevent unbounded growth
    max_queue_size: usize,
}

impl Default for HeaderNotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderNotificationManager {
    /// Create a new notification manager
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_queue_size: 10,
        }
    }

    /// Push a new notification onto the queue
    pub fn push(&mut self, message: impl Into<String>) {
        let notification = HeaderNotification::new(message);
        self.queue.push_back(notification);

        // Trim excess notifications (oldest first)
        while self.queue.len() > self.max_queue_size {
            self.queue.pop_front();
        }
    }

    /// Push a notification with custom duration
    pub fn push_with_duration(&mut self, message: impl Into<String>, duration: Duration) {
        let notification = HeaderNotification::with_duration(message, duration);
        self.queue.push_back(notification);

        while self.queue.len() > self.max_queue_size {
            self.queue.pop_front();
        }
    }

    /// Tick - remove expired notifications from the front of the queue
    pub fn tick(&mut self) {
        while let Some(front) = self.queue.front() {
            if front.is_expired() {
                self.queue.pop_front();
            } else {
                break;
            }
        }
    }

    /// Get the current notification to display (oldest non-expired)
    pub fn current(&self) -> Option<&HeaderNotification> {
        self.queue.front().filter(|n| !n.is_expired())
    }

    /// Get the current notification message, if any
    pub fn current_message(&self) -> Option<&str> {
        self.current().map(|n| n.message.as_str())
    }

    /// Clear all notifications
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Check if there are any active notifications
    pub fn is_empty(&self) -> bool {
        self.current().is_none()
    }

    /// Get the number of queued notifications
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_notification_creation() {
        let notif = HeaderNotification::new("Display window closed");
        assert_eq!(notif.message, "Display window closed");
        assert!(!notif.is_expired());
    }

    #[test]
    fn test_notification_expiry() {
        let notif = HeaderNotification::with_duration("Countdown complete", Duration::from_millis(10));
        assert!(!notif.is_expired());
        sleep(Duration::from_millis(20));
        assert!(notif.is_expired());
    }

    #[test]
    fn test_default_keeps_pushed_messages() {
        let mut manager = HeaderNotificationManager::default();
        manager.push("kept");
        assert_eq!(manager.current_message(), Some("kept"));
    }

    #[test]
    fn test_manager_push_and_current() {
        let mut manager = HeaderNotificationManager::new();
        assert!(manager.is_empty());

        manager.push("Organization logo set");
        assert!(!manager.is_empty());
        assert_eq!(manager.current_message(), Some("Organization logo set"));

        manager.push("Event logo set");
        // Should still show first (FIFO)
        assert_eq!(manager.current_message(), Some("Organization logo set"));
    }

    #[test]
    fn test_manager_tick() {
        let mut manager = HeaderNotificationManager::new();
        manager.push_with_duration("Short", Duration::from_millis(10));
        manager.push("Long");

        assert_eq!(manager.current_message(), Some("Short"));

        sleep(Duration::from_millis(20));
        manager.tick();

        // Should now show the second message
        assert_eq!(manager.current_message(), Some("Long"));
    }

    #[test]
    fn test_manager_clear() {
        let mut manager = HeaderNotificationManager::new();
        manager.push("Test 1");
        manager.push("Test 2");
        assert_eq!(manager.len(), 2);

        manager.clear();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_manager_max_queue_size() {
        let mut manager = HeaderNotificationManager::new();
        for i in 0..15 {
            manager.push(format!("Message {}", i));
        }
        // Should be capped at max_queue_size (10)
        assert_eq!(manager.len(), 10);
        // Should have dropped oldest messages
        assert_eq!(manager.current_message(), Some("Message 5"));
    }
}
