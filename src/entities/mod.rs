pub mod achievement;
pub mod affirmation;
pub mod assessment;
pub mod chat_message;
pub mod exercise;
pub mod exercise_completion;
pub mod goal;
pub mod journal_entry;
pub mod mood;
pub mod user;
pub mod user_achievement;

pub use achievement::Entity as Achievement;
pub use affirmation::Entity as Affirmation;
pub use assessment::Entity as Assessment;
pub use chat_message::Entity as ChatMessage;
pub use exercise::Entity as Exercise;
pub use exercise_completion::Entity as ExerciseCompletion;
pub use goal::Entity as Goal;
pub use journal_entry::Entity as JournalEntry;
pub use mood::Entity as Mood;
pub use user::Entity as User;
pub use user_achievement::Entity as UserAchievement;

pub mod prelude;
