use super::SystemContext;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

#[derive(Debug, Default)]
pub struct StdioContext {
    pending: VecDeque<String>,
}

impl StdioContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SystemContext for StdioContext {
    fn write(&mut self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn read_token(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(String::from)),
            }
        }
    }
}

/// Captures output in memory and serves input from a preset string.
#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
    input: VecDeque<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &str) -> Self {
        Self {
            buffer: String::new(),
            input: input.split_whitespace().map(String::from).collect(),
        }
    }

    pub fn into_data(self) -> String {
        self.buffer
    }
}

impl SystemContext for BufferedContext {
    fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn read_token(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
