use std::collections::VecDeque;
use std::env;
use std::io;
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::Interaction;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = match env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    YesNo(bool),
    Line(String),
}

/// Interaction double that replays queued replies and records what it was asked.
///
/// Replies are consumed in order; asking for a yes/no when the next reply is a
/// line (or the other way round) fails with `InvalidData`, and running out of
/// replies fails with `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    said: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn push_yes_no(&self, answer: bool) -> &Self {
        self.push(Reply::YesNo(answer))
    }

    pub fn push_line(&self, line: impl Into<String>) -> &Self {
        self.push(Reply::Line(line.into()))
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Lines emitted via `say`, in order.
    pub fn said(&self) -> Vec<String> {
        lock(&self.said).clone()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }

    fn push(&self, reply: Reply) -> &Self {
        lock(&self.replies).push_back(reply);
        self
    }

    fn take_reply(&self, prompt: &str) -> io::Result<Reply> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.replies).pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted reply for {prompt:?}"),
            )
        })
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Interaction for ScriptedInteraction {
    fn say(&self, message: &str) -> io::Result<()> {
        lock(&self.said).push(message.to_string());
        Ok(())
    }

    fn ask_yes_no(&self, prompt: &str) -> io::Result<bool> {
        match self.take_reply(prompt)? {
            Reply::YesNo(answer) => Ok(answer),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected yes/no for {prompt:?}, scripted {other:?}"),
            )),
        }
    }

    fn ask_line(&self, prompt: &str) -> io::Result<String> {
        match self.take_reply(prompt)? {
            Reply::Line(line) => Ok(line),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected a line for {prompt:?}, scripted {other:?}"),
            )),
        }
    }
}
