pub mod advancement;
pub mod reporting;
pub mod round_completion;
