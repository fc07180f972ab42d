//! Streaming events emitted while a model is producing output.

/// Event types for streaming callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The model process was started
    Started { model: String },
    /// One line of model output, as printed
    Text(String),
    /// Output finished successfully
    Complete { duration_ms: u64 },
    /// The invocation failed
    Error(String),
}

/// Callback trait for streaming events
pub trait StreamCallback: Send + Sync {
    fn on_event(&self, event: StreamEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Callback that collects events into a channel (test-only)
    struct ChannelCallback {
        sender: tokio::sync::mpsc::UnboundedSender<StreamEvent>,
    }

    impl StreamCallback for ChannelCallback {
        fn on_event(&self, event: StreamEvent) {
            let _ = self.sender.send(event);
        }
    }

    #[test]
    fn test_channel_callback() {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let callback = ChannelCallback { sender };

        callback.on_event(StreamEvent::Text("Hello".to_string()));
        callback.on_event(StreamEvent::Complete { duration_ms: 5 });

        assert_eq!(
            receiver.try_recv().unwrap(),
            StreamEvent::Text("Hello".to_string())
        );
        assert!(receiver.try_recv().is_ok());
    }
}
