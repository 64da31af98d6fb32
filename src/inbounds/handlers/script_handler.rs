use std::io::BufRead;

use tracing::debug;

use crate::domain::services::matching_engine::{BookQuery, OrderEntry};
use crate::inbounds::api_error::ScriptError;
use crate::inbounds::dtos::{Command, Response};

use super::handle_command;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Functions:                                               |
/// |   - run_script                                           |
/// +----------------------------------------------------------+

/// Runs every command in `reader` against `engine`, one per line.
///
/// # Flow
///
/// 1. Skips blank lines and `#` comments
/// 2. Parses the line as a text or JSON command
/// 3. Applies it and hands the response to `on_response` together with the engine
///
/// # Error Handling
///
/// * A line that does not parse stops the script with `ScriptError::Command`
/// * Engine rejections do not stop the script; they arrive as `Response::Rejected`
///
/// Returns the number of commands handled.
pub fn run_script<R, E, F>(reader: R, engine: &mut E, mut on_response: F) -> Result<usize, ScriptError>
where
    R: BufRead,
    E: OrderEntry + BookQuery,
    F: FnMut(&E, &Response),
{
    let mut handled = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let command = match Command::parse_line(&line)
            .map_err(|source| ScriptError::Command { line: number, source })?
        {
            Some(command) => command,
            None => continue,
        };

        debug!(line = number, ?command, "handling command");
        let response = handle_command(engine, command);
        on_response(&*engine, &response);
        handled += 1;
    }
    Ok(handled)
}
