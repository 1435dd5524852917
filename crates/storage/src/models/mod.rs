mod round;
mod round_result;

pub use round::Round;
pub use round_result::RoundResult;
