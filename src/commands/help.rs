const SECTIONS: [(&str, &str); 6] = [
    (
        "🎯 General",
        "help                      Show this help\n\
         quit                      Leave the console",
    ),
    (
        "🔐 Session",
        "login <email> <password>  Sign in with an admin account\n\
         logout                    Sign out and forget the token\n\
         whoami                    Show the signed-in account",
    ),
    (
        "🧭 Navigation",
        "open <path>               /dashboard /users /transactions /deposits\n\
         \x20                         /investments /withdrawals /bots /create-bot\n\
         back                      Return to the previous page\n\
         refresh                   Reload the current page",
    ),
    (
        "📋 Lists",
        "search <text>             Filter the list (empty text clears)\n\
         page <n> | next | prev    Move between pages\n\
         first | last              Jump to the first or last page\n\
         view <row>                Open the record in row <row>",
    ),
    (
        "✏️ Records",
        "update key=value ...      Edit a user or bot\n\
         status <value>            Change a transaction or bot status\n\
         fund <amount>             Credit a user's balance\n\
         delete confirm            Delete the record",
    ),
    (
        "🤖 Create bot",
        "name <text> | desc <text> Fill in the form\n\
         price <amount>            Pick a price tier\n\
         submit                    Create the bot",
    ),
];

pub fn execute() -> Result<String, String> {
    let body = SECTIONS
        .iter()
        .map(|(title, lines)| format!("{}\n{}", title, lines))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(format!("📖 Trove admin console commands\n\n{}", body))
}
