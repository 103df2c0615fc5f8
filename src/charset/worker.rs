use std::{
    sync::mpsc,
    thread::{
        self,
        JoinHandle,
    },
};

use tracing::{
    debug,
    error,
};

use super::generator::{
    generate_characters,
    CharsetRequest,
};
use crate::core::LexyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetUpdate {
    Progress(u8),
    Complete(Result<Vec<char>, String>),
}

impl CharsetUpdate {
    pub fn is_complete(&self) -> bool {
        matches!(self, CharsetUpdate::Complete(_))
    }
}

/// A character generation running on its own thread. Updates arrive in order: zero or more
/// `Progress` messages followed by exactly one `Complete`.
pub struct CharsetJob {
    receiver: mpsc::Receiver<CharsetUpdate>,
    join_handle: Option<JoinHandle<()>>,
    completed: bool,
}

impl CharsetJob {
    pub fn spawn(request: CharsetRequest) -> Result<Self, LexyError> {
        let (sender, receiver) = mpsc::channel();

        let join_handle = thread::Builder::new().name("charset-worker".to_string()).spawn(move || {
            debug!("Generating characters for '{}'", request.language);

            let progress_sender = sender.clone();
            let result = generate_characters(&request, |percent| {
                let _ = progress_sender.send(CharsetUpdate::Progress(percent));
            })
            .map_err(|e| {
                error!("Character generation failed: {}", e);
                e.to_string()
            });

            let _ = sender.send(CharsetUpdate::Complete(result));
        })?;

        Ok(Self { receiver, join_handle: Some(join_handle), completed: false })
    }

    /// Drains whatever updates have arrived without blocking.
    pub fn poll(&mut self) -> Vec<CharsetUpdate> {
        let mut updates = Vec::new();

        while let Ok(update) = self.receiver.try_recv() {
            if update.is_complete() {
                self.completed = true;
            }
            updates.push(update);
        }

        updates
    }

    pub fn wait(self) -> Result<Vec<char>, LexyError> {
        self.wait_with_progress(|_| {})
    }

    /// Blocks until the job completes, forwarding each progress value to `on_progress`.
    pub fn wait_with_progress<F>(mut self, mut on_progress: F) -> Result<Vec<char>, LexyError>
    where
        F: FnMut(u8),
    {
        let outcome = loop {
            match self.receiver.recv() {
                Ok(CharsetUpdate::Progress(percent)) => on_progress(percent),
                Ok(CharsetUpdate::Complete(result)) => break result.map_err(LexyError::Custom),
                Err(_) => {
                    break Err(LexyError::Custom(
                        "Character worker stopped without a result".to_string(),
                    ))
                }
            }
        };

        self.completed = true;
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
        outcome
    }

    /// True once the `Complete` update has been observed through `poll`.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::charset::CharacterFilter;

    #[test]
    fn test_progress_precedes_completion() {
        let mut job =
            CharsetJob::spawn(CharsetRequest::new("Korean", CharacterFilter::Letters, 50)).unwrap();

        let mut updates = Vec::new();
        while !job.is_complete() {
            updates.extend(job.poll());
            thread::sleep(Duration::from_millis(1));
        }

        let (last, rest) = updates.split_last().unwrap();
        assert!(rest.iter().all(|u| matches!(u, CharsetUpdate::Progress(_))));
        assert!(matches!(rest.last(), Some(CharsetUpdate::Progress(100))));
        match last {
            CharsetUpdate::Complete(Ok(chars)) => assert_eq!(chars.len(), 50),
            other => panic!("unexpected final update: {:?}", other),
        }
    }

    #[test]
    fn test_wait_collects_characters() {
        let mut seen = Vec::new();
        let chars = CharsetJob::spawn(CharsetRequest::new("Greek", CharacterFilter::Letters, 24))
            .unwrap()
            .wait_with_progress(|p| seen.push(p))
            .unwrap();

        assert_eq!(chars.len(), 24);
        assert_eq!(seen.last(), Some(&100));
    }

    #[test]
    fn test_unknown_language_completes_empty() {
        let chars =
            CharsetJob::spawn(CharsetRequest::new("Elvish", CharacterFilter::Any, 10)).unwrap().wait().unwrap();
        assert!(chars.is_empty());
    }
}
