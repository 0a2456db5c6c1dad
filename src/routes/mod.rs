pub mod health;
pub mod macro_trends;
pub mod companies;
pub mod partners;
