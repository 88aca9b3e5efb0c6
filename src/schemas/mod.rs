pub mod comments;
pub mod gallery;
pub mod generate;
pub mod search;
