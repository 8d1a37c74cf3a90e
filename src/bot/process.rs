//! Subprocess bots
//!
//! One line per request on the child's stdin, one line per response on its
//! stdout. stderr passes through so bots can print diagnostics.

use std::process::Stdio;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::Instant;

use super::{Bot, BotError};

pub struct ProcessBot {
    name: String,
    /// Held so the child is killed when the bot is dropped
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    timeout: Duration,
    /// Bytes of a response line not yet terminated; survives a timed-out read
    pending: Vec<u8>,
    /// Requests written whose answers have not been read yet
    unanswered: usize,
}

impl ProcessBot {
    pub fn spawn(program: &str, args: &[String], timeout: Duration) -> Result<Self, BotError> {
        let spawn_error = |reason: String| BotError::Spawn {
            command: program.to_string(),
            reason,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error("stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error("stdout not captured".to_string()))?;

        log::info!("Started bot process {program} {}", args.join(" "));

        Ok(Self {
            name: program.to_string(),
            _child: child,
            stdin,
            stdout: BufReader::new(stdout),
            timeout,
            pending: Vec::new(),
            unanswered: 0,
        })
    }

    async fn send(&mut self, payload: &str) -> Result<(), BotError> {
        let mut line = Vec::with_capacity(payload.len() + 1);
        line.extend_from_slice(payload.as_bytes());
        line.push(b'\n');
        self.stdin.write_all(&line).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Next complete line. Cancelling leaves any partial line in `pending`
    /// for the following call.
    async fn next_line(&mut self) -> Result<String, BotError> {
        let read = self.stdout.read_until(b'\n', &mut self.pending).await?;
        if read == 0 && self.pending.is_empty() {
            return Err(BotError::Closed);
        }

        let bytes = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&bytes);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read until the answer to the newest request; earlier answers arrived
    /// too late for their turn and are dropped.
    async fn receive(&mut self) -> Result<String, BotError> {
        loop {
            let line = self.next_line().await?;
            self.unanswered = self.unanswered.saturating_sub(1);
            if self.unanswered == 0 {
                return Ok(line);
            }
            log::debug!("{}: discarding late response {line:?}", self.name);
        }
    }
}

impl Bot for ProcessBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move<'a>(&'a mut self, payload: &'a str) -> BoxFuture<'a, Result<String, BotError>> {
        async move {
            let timeout = self.timeout;
            let deadline = Instant::now() + timeout;

            match tokio::time::timeout_at(deadline, self.send(payload)).await {
                Ok(sent) => sent?,
                Err(_) => {
                    log::warn!("{}: stdin blocked, request not delivered", self.name);
                    return Err(BotError::Timeout(timeout));
                }
            }
            self.unanswered += 1;

            match tokio::time::timeout_at(deadline, self.receive()).await {
                Ok(response) => response,
                Err(_) => Err(BotError::Timeout(timeout)),
            }
        }
        .boxed()
    }
}
