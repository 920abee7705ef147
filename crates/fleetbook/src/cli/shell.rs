//! Line-oriented interactive form session.
//!
//! Each input line is one command acting on a single [`FormController`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::controller::FormController;
use crate::error::Result;
use crate::record::{Field, RecordId};
use crate::store::DocumentStore;

use super::{render, OutputFormat};

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  list                 show the cached vehicles
  show                 show the form
  edit <id>            load a vehicle into the form
  set <field> <value>  change a form field (brand, model, color, plate, year, price, engine)
  submit               save the form
  cancel               clear the form and leave edit mode
  rm <id>              remove a vehicle
  refresh              reload the vehicle list
  help                 show this help
  quit                 leave the shell
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Print the cached listing.
    List,
    /// Print the form.
    Show,
    /// Begin editing a cached record.
    Edit(RecordId),
    /// Replace one draft field.
    Set(Field, String),
    /// Submit the draft.
    Submit,
    /// Cancel editing.
    Cancel,
    /// Delete a record.
    Remove(RecordId),
    /// Re-list the collection.
    Refresh,
    /// Print usage.
    Help,
    /// End the session.
    Quit,
}

/// Parse one input line.
///
/// Blank lines parse to `None`.
///
/// # Errors
///
/// Returns a message for unknown commands and missing arguments.
pub fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "show" => ShellCommand::Show,
        "edit" => ShellCommand::Edit(required_id(rest, "edit")?),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim_start()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: set <field> <value>".to_string());
            }
            ShellCommand::Set(field.parse()?, value.to_string())
        }
        "submit" | "save" => ShellCommand::Submit,
        "cancel" => ShellCommand::Cancel,
        "rm" | "remove" => ShellCommand::Remove(required_id(rest, "rm")?),
        "refresh" => ShellCommand::Refresh,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn required_id(rest: &str, command: &str) -> std::result::Result<RecordId, String> {
    if rest.is_empty() {
        Err(format!("usage: {command} <id>"))
    } else {
        Ok(RecordId::new(rest))
    }
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails. Command
/// failures are printed and the session continues.
pub async fn run_shell<S, R, W>(
    controller: &FormController<S>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    S: DocumentStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output
        .write_all(render::form(&controller.view()).as_bytes())
        .await?;
    output.write_all(PROMPT.as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_line(&line) {
            Ok(None) => String::new(),
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => execute(controller, command).await,
            Err(message) => format!("{message}\n"),
        };
        output.write_all(reply.as_bytes()).await?;
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
    }

    debug!("Shell session ended");
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn execute<S: DocumentStore>(controller: &FormController<S>, command: ShellCommand) -> String {
    match command {
        ShellCommand::List => render::records(&controller.records(), OutputFormat::Plain)
            .unwrap_or_else(|e| format!("error: {e}\n")),
        ShellCommand::Show => render::form(&controller.view()),
        ShellCommand::Edit(id) => match controller.begin_edit_by_id(&id) {
            Ok(()) => render::form(&controller.view()),
            Err(e) => format!("error: {e}\n"),
        },
        ShellCommand::Set(field, value) => {
            controller.update_field(field, &value);
            String::new()
        }
        ShellCommand::Submit => match controller.submit().await {
            Ok(outcome) => format!("{outcome}\n"),
            Err(e) => format!("error: {e}\n"),
        },
        ShellCommand::Cancel => {
            controller.cancel();
            format!("{}\n", controller.mode().title())
        }
        ShellCommand::Remove(id) => match controller.remove(&id).await {
            Ok(()) => format!("removed record {id}\n"),
            Err(e) => format!("error: {e}\n"),
        },
        ShellCommand::Refresh => match controller.refresh().await {
            Ok(count) => format!("{count} vehicles\n"),
            Err(e) => format!("error: {e}\n"),
        },
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}
