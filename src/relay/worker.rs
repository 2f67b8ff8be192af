//! Worker thread draining the severity queues into a sink.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, unbounded, Receiver, RecvError, Sender};

use crate::codec::{LogMessage, Severity};

use super::sink::LogSink;

/// Commands processed by the worker besides log entries.
#[derive(Debug)]
pub(crate) enum Control {
    Flush(Sender<()>),
    Shutdown(Sender<()>),
}

/// Producer side of the three severity queues.
pub(crate) struct Queues {
    info: Sender<LogMessage>,
    warning: Sender<LogMessage>,
    error: Sender<LogMessage>,
}

impl Queues {
    pub(crate) fn sender(&self, severity: Severity) -> &Sender<LogMessage> {
        match severity {
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        }
    }
}

/// Spawn the worker thread.
///
/// Returns the queue senders, the control sender and the join handle.
pub(crate) fn spawn_worker(
    capacity: usize,
    sink: Box<dyn LogSink>,
) -> io::Result<(Queues, Sender<Control>, JoinHandle<()>)> {
    let (info_tx, info_rx) = bounded(capacity);
    let (warning_tx, warning_rx) = bounded(capacity);
    let (error_tx, error_rx) = bounded(capacity);
    let (control_tx, control_rx) = unbounded();

    let worker = Worker {
        info: info_rx,
        warning: warning_rx,
        error: error_rx,
        control: control_rx,
        sink,
    };
    let handle = thread::Builder::new()
        .name("log-relay".into())
        .spawn(move || worker.run())?;

    let queues = Queues {
        info: info_tx,
        warning: warning_tx,
        error: error_tx,
    };
    Ok((queues, control_tx, handle))
}

struct Worker {
    info: Receiver<LogMessage>,
    warning: Receiver<LogMessage>,
    error: Receiver<LogMessage>,
    control: Receiver<Control>,
    sink: Box<dyn LogSink>,
}

impl Worker {
    fn run(self) {
        loop {
            // select! picks uniformly among ready operations, so no severity
            // starves another.
            let next = select! {
                recv(self.info) -> msg => Step::Entry(msg),
                recv(self.warning) -> msg => Step::Entry(msg),
                recv(self.error) -> msg => Step::Entry(msg),
                recv(self.control) -> cmd => Step::Control(cmd),
            };

            match next {
                Step::Entry(Ok(message)) => self.sink.deliver(message),
                Step::Control(Ok(Control::Flush(ack))) => {
                    self.drain();
                    let _ = ack.send(());
                }
                Step::Control(Ok(Control::Shutdown(ack))) => {
                    self.drain();
                    let _ = ack.send(());
                    return;
                }
                // All producers are gone.
                Step::Entry(Err(RecvError)) | Step::Control(Err(RecvError)) => {
                    self.drain();
                    return;
                }
            }
        }
    }

    /// Deliver everything currently queued, one severity at a time.
    fn drain(&self) {
        for queue in [&self.info, &self.warning, &self.error] {
            while let Ok(message) = queue.try_recv() {
                self.sink.deliver(message);
            }
        }
    }
}

enum Step {
    Entry(Result<LogMessage, RecvError>),
    Control(Result<Control, RecvError>),
}
