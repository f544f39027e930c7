pub mod credentials;
pub mod issue;
