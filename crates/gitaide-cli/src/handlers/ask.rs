//! Ask command handler: prompt passthrough.

use anyhow::Result;
use gitaide_core::{SessionError, TerminationReason};

use super::{Mode, run_assistant};
use crate::bootstrap::CliContext;

/// Send `words` to the assistant as one prompt.
///
/// When stdin is a terminal the session is interactive; typing the exit
/// command ends it and counts as success.
pub async fn execute(ctx: &CliContext, words: &[String]) -> Result<()> {
    let prompt = ctx.prompt(words.join(" "));
    match run_assistant(ctx, &prompt, Mode::Show, true).await {
        Ok(_) => Ok(()),
        Err(err) if ended_by_exit_command(&err) => {
            println!();
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn ended_by_exit_command(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SessionError>()
        .and_then(SessionError::termination_reason)
        == Some(TerminationReason::ExitCommand)
}
