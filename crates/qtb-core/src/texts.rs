//! User-facing texts.

pub const GREETING: &str = "Hello!";

pub const DEFAULT_HELP: &str = "Commands:\n\
/start - say hello\n\
/help - show this help\n\
/test - start the quiz\n\
/stop - stop the quiz\n\
/repeat - go over the questions you got wrong\n\
/notify - set a reminder";

pub const CORRECT: &str = "Correct answer!";
pub const TEST_FINISHED: &str = "Test finished";
pub const NOT_TESTING: &str =
    "You have not started a test. Use the /help command to read the instructions.";
pub const NOTHING_TO_REVIEW: &str = "No questions to review";
pub const ENTER_REMINDER_TEXT: &str = "Enter the reminder text";
pub const ENTER_REMINDER_DELAY: &str = "In how many seconds should I remind you?";
pub const REMINDER_SET: &str = "Reminder set";
pub const ENTER_INTEGER: &str = "Please enter an integer";
pub const UNKNOWN_COMMAND: &str = "There is no such command yet, or there is a typo in it. \
Use the /help command to read the instructions.";
pub const NEGATIVE_DELAY: &str = "The delay cannot be negative.";

pub fn wrong_answer(correct: &str) -> String {
    format!("Wrong, the correct answer is: {correct}")
}

pub fn reminder_fired(text: &str) -> String {
    format!("Reminder: '{text}'")
}
