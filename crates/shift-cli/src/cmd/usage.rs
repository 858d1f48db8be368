use crate::output::print_json;
use shift_core::command::help_message;
use shift_core::config::Config;

pub fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    let text = help_message(&config.slash_command);
    if json {
        print_json(&serde_json::json!({ "text": text }))?;
    } else {
        println!("{text}");
    }
    Ok(())
}
