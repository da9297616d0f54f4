// libsuica/src/session/service.rs

//! Async front end: a tokio task owning a [`SessionController`].
//!
//! The task is the only place the controller is touched. Requests from
//! [`ScanHandle`]s, hardware completions, poll ticks and the command
//! deadline are all handled on it one at a time.

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, sleep_until};

use crate::card::SuicaRecord;
use crate::session::{
    EventSink, ResultCallback, ScanConfig, ScanOutcome, ScanState, SessionController,
    SessionEvent, SessionId, TagHardware, Transition,
};
use crate::{Error, Result};

const REQUEST_QUEUE_DEPTH: usize = 16;

enum Request {
    Start {
        on_result: ResultCallback,
        waiter: Option<oneshot::Sender<ScanOutcome>>,
        reply: oneshot::Sender<Result<SessionId>>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    State {
        reply: oneshot::Sender<ScanState>,
    },
    Shutdown,
}

/// Cloneable handle to a running scan service.
///
/// Every method fails with [`Error::ServiceStopped`] once the service task
/// has exited.
#[derive(Debug, Clone)]
pub struct ScanHandle {
    requests: mpsc::Sender<Request>,
}

impl ScanHandle {
    /// Begin a scan; `on_result` runs on the service task on success.
    pub async fn start_scan<F>(&self, on_result: F) -> Result<SessionId>
    where
        F: FnOnce(SuicaRecord) + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Start {
            on_result: Box::new(on_result),
            waiter: None,
            reply,
        })
        .await?;
        rx.await.map_err(|_| Error::ServiceStopped)?
    }

    /// Begin a scan and wait for it to end, however it ends.
    pub async fn scan(&self) -> ScanOutcome {
        let (reply, started) = oneshot::channel();
        let (waiter, outcome) = oneshot::channel();
        self.send(Request::Start {
            on_result: Box::new(|_| {}),
            waiter: Some(waiter),
            reply,
        })
        .await?;
        started.await.map_err(|_| Error::ServiceStopped)??;
        outcome.await.map_err(|_| Error::ServiceStopped)?
    }

    /// Cancel the current scan. Returns false when none was active.
    pub async fn stop_scan(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Stop { reply }).await?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    /// Current state of the controller.
    pub async fn state(&self) -> Result<ScanState> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::State { reply }).await?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    /// Cancel any scan and end the service task.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Request::Shutdown).await
    }

    async fn send(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| Error::ServiceStopped)
    }
}

/// Scan service task state.
pub struct ScanService<H> {
    controller: SessionController<H>,
    requests: mpsc::Receiver<Request>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    waiter: Option<oneshot::Sender<ScanOutcome>>,
    deadline: Option<Instant>,
}

impl<H> ScanService<H>
where
    H: TagHardware + Send + 'static,
{
    /// Validate `config`, build the hardware around a fresh [`EventSink`]
    /// and start the service on the current tokio runtime.
    ///
    /// The task ends when [`ScanHandle::shutdown`] is called or every
    /// handle has been dropped.
    pub fn spawn<F>(config: ScanConfig, make_hardware: F) -> Result<ScanHandle>
    where
        F: FnOnce(EventSink) -> H,
    {
        config.validate()?;
        let (sink, events) = EventSink::channel();
        let (tx, requests) = mpsc::channel(REQUEST_QUEUE_DEPTH);

        let service = Self {
            controller: SessionController::new(make_hardware(sink), config),
            requests,
            events,
            waiter: None,
            deadline: None,
        };
        tokio::spawn(service.run());
        Ok(ScanHandle { requests: tx })
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.controller.config().poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("scan service started");

        loop {
            let scanning = self.controller.state() == ScanState::Scanning;
            let deadline = self.deadline;

            // Completions first: a poll must never run while a detection
            // it produced is still queued.
            tokio::select! {
                biased;

                Some(event) = self.events.recv() => {
                    let transition = self.controller.handle(event);
                    self.after(transition);
                }

                request = self.requests.recv() => match request {
                    Some(Request::Shutdown) | None => break,
                    Some(request) => self.on_request(request),
                },

                _ = ticker.tick(), if scanning => self.controller.poll(),

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let transition = self.controller.expire();
                    self.after(transition);
                }
            }
        }

        let transition = self.controller.stop_scan();
        self.after(transition);
        info!("scan service stopped");
    }

    fn on_request(&mut self, request: Request) {
        match request {
            Request::Start {
                on_result,
                waiter,
                reply,
            } => {
                let started = self.controller.start_scan(on_result);
                if started.is_ok() {
                    self.waiter = waiter;
                    self.deadline = None;
                    self.controller.poll();
                }
                let _ = reply.send(started);
            }
            Request::Stop { reply } => {
                let transition = self.controller.stop_scan();
                let stopped = matches!(transition, Transition::Terminated(_));
                self.after(transition);
                let _ = reply.send(stopped);
            }
            Request::State { reply } => {
                let _ = reply.send(self.controller.state());
            }
            Request::Shutdown => {}
        }
    }

    fn after(&mut self, transition: Transition) {
        match transition {
            Transition::Ignored => {}
            Transition::Advanced(state) => {
                self.deadline = match self.controller.config().command_timeout {
                    Some(timeout) if state.is_awaiting_completion() => {
                        Some(Instant::now() + timeout)
                    }
                    _ => None,
                };
            }
            Transition::Terminated(outcome) => {
                self.deadline = None;
                if let Some(waiter) = self.waiter.take() {
                    let _ = waiter.send(outcome);
                }
            }
        }
    }
}
