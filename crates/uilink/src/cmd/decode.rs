use uilink_bus::parse_word;
use uilink_frame::decode_words;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_command, CommandRecord, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let words = args
        .words
        .iter()
        .map(|token| parse_word(token).map_err(|message| CliError::new(DATA_INVALID, message)))
        .collect::<CliResult<Vec<u16>>>()?;

    let command = decode_words(&words).map_err(|err| frame_error("decode failed", err))?;
    print_command(&CommandRecord::untimed(&command), format);

    Ok(SUCCESS)
}
