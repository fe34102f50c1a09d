pub mod evaluate;
pub mod trajectory;
