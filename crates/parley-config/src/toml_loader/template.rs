//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[backend]
# endpoint = "http://localhost:5005/webhooks/rest/webhook"
# timeout_secs = 10          # 1-120
# connect_timeout_secs = 5   # 1-60

[dialog]
# greeting = "hello"         # sent to the backend when a chat starts
# farewell = "Goodbye."      # empty = silent
# failure_notice = "Sorry, I can't reach the assistant right now."
# max_retries = 3            # 1-10 empty utterances before the chat ends

[speech]
# rate = ""                  # prosody rate, e.g. "slow" or "80%"; empty = no markup
# listen_timeout_secs = 8    # 1-120
# output = "console"         # console, command
# command = "say"            # TTS program for output = "command"

[triggers]
# start = ["start chat", "chat with rasa", "talk to rasa"]
# stop = ["stop chat", "end chat", "stop the chat"]
# resume = ["resume chat"]

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
