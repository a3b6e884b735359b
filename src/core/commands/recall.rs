use async_trait::async_trait;

use super::{CommandError, CommandHandler};
use crate::core::session::Session;

/// `do <line>`: dispatches `<line>` as if it had been typed.
pub struct DoCommand;

#[async_trait(?Send)]
impl CommandHandler for DoCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        session.dispatch(rest).await;
        Ok(())
    }
}

/// `y [line]`: replays the remembered command, or remembers `line`.
pub struct YCommand;

#[async_trait(?Send)]
impl CommandHandler for YCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        if rest.is_empty() {
            let line = session.registers.y.clone();
            session.dispatch(&line).await;
        } else {
            session.registers.y = rest.to_string();
            session.out("Will remember...");
        }
        Ok(())
    }
}

pub struct WhatCommand;

#[async_trait(?Send)]
impl CommandHandler for WhatCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        if rest.is_empty() {
            let line = session.registers.y.clone();
            session.out(&line);
        } else {
            session.registers.y = rest.to_string();
            session.out("Will remember...");
        }
        Ok(())
    }
}
