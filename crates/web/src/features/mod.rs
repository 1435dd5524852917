pub mod advancement;
pub mod results;
pub mod rounds;
