use futures::{channel::mpsc, SinkExt};
use lottosim_types::{CfgUpdate, Command, QueuedTicket, Settings, Target, Ticket};
use thiserror::Error;

/// Handle for sending commands to a worker.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Command>,
}

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("worker mailbox closed")]
    Closed,
}

impl Mailbox {
    pub(crate) fn new(sender: mpsc::Sender<Command>) -> Self {
        Self { sender }
    }

    pub async fn send(&mut self, command: Command) -> Result<(), MailboxError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| MailboxError::Closed)
    }

    /// Begin a new session, or resume a paused one.
    pub async fn start(&mut self) -> Result<(), MailboxError> {
        self.send(Command::Start).await
    }

    pub async fn pause(&mut self) -> Result<(), MailboxError> {
        self.send(Command::Pause).await
    }

    /// Cancel the session, keeping stats.
    pub async fn stop(&mut self) -> Result<(), MailboxError> {
        self.send(Command::Stop).await
    }

    /// Cancel the session and zero stats.
    pub async fn reset(&mut self) -> Result<(), MailboxError> {
        self.send(Command::Reset).await
    }

    pub async fn settings(&mut self, settings: Settings) -> Result<(), MailboxError> {
        self.send(Command::Settings(settings)).await
    }

    pub async fn queue(&mut self, tickets: Vec<Ticket>) -> Result<(), MailboxError> {
        let entries = tickets.into_iter().map(QueuedTicket::from).collect();
        self.send(Command::Queue(entries)).await
    }

    pub async fn target(&mut self, target: Target) -> Result<(), MailboxError> {
        self.send(Command::Target(target)).await
    }

    pub async fn cfg(&mut self, cfg: CfgUpdate) -> Result<(), MailboxError> {
        self.send(Command::Cfg(cfg)).await
    }
}
