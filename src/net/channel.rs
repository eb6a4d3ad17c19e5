//! Transport capability between the two peers

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Something that happened on the connection since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Connection established; sending is now possible
    Open,
    /// A text message from the peer
    Data(String),
    /// The peer went away. Nothing further will arrive.
    Close,
}

/// A reliable, ordered, message-oriented connection to one peer.
///
/// Incoming events are queued by the transport and drained with `poll`
/// between simulation steps.
pub trait Channel {
    /// Queue a message for the peer. Dropped silently if the peer is gone.
    fn send(&mut self, text: String);
    /// Next queued event, if any
    fn poll(&mut self) -> Option<ChannelEvent>;
    /// Hang up; the peer receives `Close`
    fn close(&mut self);
}

/// In-process channel pair, used by the headless demo and tests
pub struct LoopbackChannel {
    tx: Option<Sender<ChannelEvent>>,
    rx: Receiver<ChannelEvent>,
}

impl LoopbackChannel {
    /// Two connected ends. Each sees `Open` on its first poll.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = crossbeam_channel::unbounded::<ChannelEvent>();
        let (tx_b, rx_b) = crossbeam_channel::unbounded::<ChannelEvent>();
        let _ = tx_a.send(ChannelEvent::Open);
        let _ = tx_b.send(ChannelEvent::Open);
        (
            Self {
                tx: Some(tx_b),
                rx: rx_a,
            },
            Self {
                tx: Some(tx_a),
                rx: rx_b,
            },
        )
    }
}

impl Channel for LoopbackChannel {
    fn send(&mut self, text: String) {
        if let Some(tx) = &self.tx {
            if tx.send(ChannelEvent::Data(text)).is_err() {
                log::trace!("Loopback peer gone, message dropped");
            }
        }
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    fn close(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(ChannelEvent::Close);
        }
    }
}

impl Drop for LoopbackChannel {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_opens_then_delivers_in_order() {
        let (mut a, mut b) = LoopbackChannel::pair();
        assert_eq!(a.poll(), Some(ChannelEvent::Open));
        assert_eq!(b.poll(), Some(ChannelEvent::Open));

        a.send("one".into());
        a.send("two".into());
        assert_eq!(b.poll(), Some(ChannelEvent::Data("one".into())));
        assert_eq!(b.poll(), Some(ChannelEvent::Data("two".into())));
        assert_eq!(b.poll(), None);
        assert_eq!(a.poll(), None);
    }

    #[test]
    fn test_drop_delivers_close() {
        let (a, mut b) = LoopbackChannel::pair();
        drop(a);
        assert_eq!(b.poll(), Some(ChannelEvent::Open));
        assert_eq!(b.poll(), Some(ChannelEvent::Close));
        assert_eq!(b.poll(), None);
        // Sending to a departed peer is harmless
        b.send("anyone?".into());
    }

    #[test]
    fn test_close_stops_sending() {
        let (mut a, mut b) = LoopbackChannel::pair();
        a.close();
        a.send("late".into());
        assert_eq!(b.poll(), Some(ChannelEvent::Open));
        assert_eq!(b.poll(), Some(ChannelEvent::Close));
        assert_eq!(b.poll(), None);
    }
}
