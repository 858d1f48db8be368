use crate::output::print_json;
use shift_core::command::parse_command;

/// Parse slash-command text the way the bot would and print the result.
pub fn run(words: &[String], json: bool) -> anyhow::Result<()> {
    let text = words.join(" ");
    let command = parse_command(&text)?;

    if json {
        print_json(&command)?;
    } else {
        println!("Action:      {:?}", command.action);
        println!("Severity:    {} ({})", command.severity, command.severity.impact());
        println!("Title:       {}", command.title);
        if !command.description.is_empty() {
            println!("Description: {}", command.description);
        }
    }
    Ok(())
}
