// src/system/prompt.rs

use anyhow::Result;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Interactive questions asked of the user.
pub trait Prompt {
    /// Asks a yes/no question. Defaults to "no".
    fn confirm(&self, message: &str) -> Result<bool>;
    /// Asks for a line of text.
    fn input(&self, message: &str) -> Result<String>;
}

/// Asks on the terminal with `dialoguer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()?)
    }

    fn input(&self, message: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()?)
    }
}

/// Answers from a fixed script. Used when no terminal is available and in tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    confirmations: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirmations(self, answers: &[bool]) -> Self {
        self.confirmations.borrow_mut().extend(answers.iter().copied());
        self
    }

    pub fn with_inputs(self, answers: &[&str]) -> Self {
        self.inputs
            .borrow_mut()
            .extend(answers.iter().map(|s| s.to_string()));
        self
    }

    /// Every question asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.borrow_mut().push(message.to_string());
        // An exhausted script declines.
        Ok(self.confirmations.borrow_mut().pop_front().unwrap_or(false))
    }

    fn input(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.inputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No answer available for '{}'", message))
    }
}
