pub mod answer;
pub mod assessment;
pub mod attempt;
pub mod lesson;
pub mod lesson_content;
pub mod performance_score;
pub mod performance_task;
pub mod question;
pub mod question_option;
