pub use super::achievement::Entity as Achievement;
pub use super::affirmation::Entity as Affirmation;
pub use super::assessment::Entity as Assessment;
pub use super::chat_message::Entity as ChatMessage;
pub use super::exercise::Entity as Exercise;
pub use super::exercise_completion::Entity as ExerciseCompletion;
pub use super::goal::Entity as Goal;
pub use super::journal_entry::Entity as JournalEntry;
pub use super::mood::Entity as Mood;
pub use super::user::Entity as User;
pub use super::user_achievement::Entity as UserAchievement;
