//! One-shot UI events and their delivery channel.

use crate::ui::navigation::Route;
use log::warn;
use tokio::sync::mpsc;

pub const TASK_DELETED_MESSAGE: &str = "Task deleted";
pub const UNDO_ACTION_LABEL: &str = "Undo";
pub const BLANK_TITLE_MESSAGE: &str = "Title cannot be empty";

/// Side effect a screen must perform exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Open another screen.
    Navigate(Route),
    /// Leave the current screen.
    PopBackStack,
    /// Show a transient message, optionally with an action button.
    ShowSnackbar {
        message: String,
        action: Option<String>,
    },
}

impl UiEvent {
    pub fn snackbar(message: impl Into<String>, action: Option<&str>) -> Self {
        Self::ShowSnackbar {
            message: message.into(),
            action: action.map(str::to_string),
        }
    }
}

/// Creates an ordered, unbounded, single-consumer event channel.
///
/// `source` only labels log lines emitted when the consumer is gone.
pub fn ui_event_channel(source: &'static str) -> (UiEventSender, UiEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiEventSender { tx, source }, UiEventReceiver { rx })
}

/// Producer half, owned by a view-state.
#[derive(Debug, Clone)]
pub struct UiEventSender {
    tx: mpsc::UnboundedSender<UiEvent>,
    source: &'static str,
}

impl UiEventSender {
    /// Queues `event`. Events are buffered until the consumer reads them.
    pub fn send(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            warn!(
                "event=ui_event module=ui status=dropped source={} reason=receiver_closed",
                self.source
            );
        }
    }
}

/// Consumer half, handed out once per view-state.
#[derive(Debug)]
pub struct UiEventReceiver {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl UiEventReceiver {
    /// Waits for the next event. `None` once the view-state is dropped and
    /// every queued event has been delivered.
    pub async fn recv(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }

    /// Drains every queued event in emission order.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::{ui_event_channel, UiEvent};
    use crate::ui::navigation::Route;

    #[tokio::test]
    async fn events_keep_emission_order() {
        let (tx, mut rx) = ui_event_channel("test");
        tx.send(UiEvent::snackbar("one", None));
        tx.send(UiEvent::Navigate(Route::TaskList));
        tx.send(UiEvent::PopBackStack);

        assert_eq!(rx.recv().await, Some(UiEvent::snackbar("one", None)));
        assert_eq!(rx.recv().await, Some(UiEvent::Navigate(Route::TaskList)));
        assert_eq!(rx.recv().await, Some(UiEvent::PopBackStack));
    }

    #[tokio::test]
    async fn queued_events_survive_sender_drop() {
        let (tx, mut rx) = ui_event_channel("test");
        tx.send(UiEvent::PopBackStack);
        drop(tx);

        assert_eq!(rx.drain(), vec![UiEvent::PopBackStack]);
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn send_after_receiver_drop_does_not_panic() {
        let (tx, rx) = ui_event_channel("test");
        drop(rx);
        tx.send(UiEvent::PopBackStack);
    }
}
