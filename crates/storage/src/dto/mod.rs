pub mod advancement;
pub mod report;
pub mod result;
pub mod round;
