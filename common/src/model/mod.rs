pub mod audit;
pub mod dashboard;
pub mod document;
pub mod template;
pub mod variable;
