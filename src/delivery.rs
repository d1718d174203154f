//! The delivery-report sink (spec.md S6, "exposed"): the boundary producer
//! messages cross on their way out of this crate's ownership, carrying the
//! error that prevented delivery (or, for the scanner, a timeout).

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use crate::errors::ErrorKind;
use crate::message::Message;

/// Consumes ownership of a batch of messages that share one outcome.
pub trait DeliveryReportSink: Send + Sync {
    fn deliver(&self, topic: &str, messages: Vec<Message>, error: ErrorKind);
}

/// One delivered batch, as observed by a `ChannelDeliveryReportSink`.
#[derive(Debug)]
pub struct DeliveryReport {
    pub topic: String,
    pub messages: Vec<Message>,
    pub error: ErrorKind,
}

/// A sink that hands delivery reports to a bounded-contention channel
/// (spec.md S5 "delivering to the delivery-report sink (bounded-buffer
/// contention permitted)"), for an application event loop to drain.
pub struct ChannelDeliveryReportSink {
    tx: Mutex<Sender<DeliveryReport>>,
}

impl ChannelDeliveryReportSink {
    pub fn new() -> (Self, Receiver<DeliveryReport>) {
        let (tx, rx) = channel();
        (
            ChannelDeliveryReportSink { tx: Mutex::new(tx) },
            rx,
        )
    }
}

impl DeliveryReportSink for ChannelDeliveryReportSink {
    fn deliver(&self, topic: &str, messages: Vec<Message>, error: ErrorKind) {
        if messages.is_empty() {
            return;
        }
        let report = DeliveryReport {
            topic: topic.to_owned(),
            messages,
            error,
        };
        // A closed receiver just means nobody is listening for reports
        // anymore; dropping the batch is the correct behavior, not an error.
        let _ = self.tx.lock().unwrap().send(report);
    }
}
